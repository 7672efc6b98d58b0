use crate::enums::{Classification, Side};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single executed trade from the trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp: NaiveDateTime,
    pub account: String,
    pub coin: String,
    pub side: Side,
    /// Position size in USD. Never negative.
    pub size_usd: Decimal,
    /// Realized profit or loss in USD.
    pub closed_pnl: Decimal,
}

impl TradeRecord {
    /// The calendar date the trade is joined on.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// One day of the Fear & Greed index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub date: NaiveDate,
    /// Index value in `[0, 100]`.
    pub value: u8,
    pub classification: Classification,
}

/// A trade enriched with the sentiment of its calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    #[serde(flatten)]
    pub trade: TradeRecord,
    pub classification: Classification,
    pub sentiment_value: u8,
}

impl JoinedRecord {
    pub fn new(trade: TradeRecord, sentiment: &SentimentRecord) -> Self {
        Self {
            trade,
            classification: sentiment.classification,
            sentiment_value: sentiment.value,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.trade.date()
    }

    pub fn account(&self) -> &str {
        &self.trade.account
    }

    pub fn coin(&self) -> &str {
        &self.trade.coin
    }

    pub fn side(&self) -> Side {
        self.trade.side
    }

    pub fn size_usd(&self) -> Decimal {
        self.trade.size_usd
    }

    pub fn closed_pnl(&self) -> Decimal {
        self.trade.closed_pnl
    }

    /// A trade counts as a win only when it closed strictly positive.
    pub fn is_win(&self) -> bool {
        self.trade.closed_pnl > Decimal::ZERO
    }

    pub fn is_loss(&self) -> bool {
        self.trade.closed_pnl < Decimal::ZERO
    }

    /// Hour of day (0-23) of the trade timestamp.
    pub fn hour(&self) -> u32 {
        self.trade.timestamp.hour()
    }

    /// Day of week with Monday = 0 through Sunday = 6.
    pub fn day_of_week(&self) -> u32 {
        self.trade.timestamp.weekday().num_days_from_monday()
    }
}
