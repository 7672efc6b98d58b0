use chrono::NaiveDate;
use core_types::{JoinedRecord, SentimentRecord, TradeRecord};
use serde::Serialize;
use std::collections::HashMap;

/// Diagnostics of a single inner join between the trade log and the sentiment index.
///
/// Trades on a day without a sentiment entry are dropped by the join; this
/// report makes that loss visible instead of silent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinReport {
    pub sentiment_rows: usize,
    pub trade_rows: usize,
    pub joined_rows: usize,
    /// Trades whose calendar date has no sentiment entry.
    pub dropped_trades: usize,
    /// Extra sentiment rows for a date that already had one. The first row wins.
    pub duplicate_sentiment_dates: usize,
}

/// Inner-joins `trades` with `sentiment` on the trade's calendar date.
///
/// Output rows keep the input order of `trades`.
pub fn inner_join(
    trades: Vec<TradeRecord>,
    sentiment: &[SentimentRecord],
) -> (Vec<JoinedRecord>, JoinReport) {
    let mut by_date: HashMap<NaiveDate, &SentimentRecord> = HashMap::with_capacity(sentiment.len());
    let mut duplicate_sentiment_dates = 0;
    for record in sentiment {
        if by_date.contains_key(&record.date) {
            duplicate_sentiment_dates += 1;
        } else {
            by_date.insert(record.date, record);
        }
    }

    let trade_rows = trades.len();
    let joined: Vec<JoinedRecord> = trades
        .into_iter()
        .filter_map(|trade| {
            by_date
                .get(&trade.date())
                .map(|day| JoinedRecord::new(trade, day))
        })
        .collect();

    let report = JoinReport {
        sentiment_rows: sentiment.len(),
        trade_rows,
        joined_rows: joined.len(),
        dropped_trades: trade_rows - joined.len(),
        duplicate_sentiment_dates,
    };

    if report.dropped_trades > 0 {
        tracing::warn!(
            dropped = report.dropped_trades,
            total = report.trade_rows,
            "Trades without a sentiment entry for their date were dropped by the join."
        );
    }
    if report.duplicate_sentiment_dates > 0 {
        tracing::warn!(
            duplicates = report.duplicate_sentiment_dates,
            "Sentiment index has repeated dates; kept the first entry for each."
        );
    }

    (joined, report)
}
