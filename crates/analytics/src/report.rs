use chrono::NaiveDate;
use core_types::Classification;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The headline KPIs of a filtered view.
///
/// Mean-based metrics are `None` when the view holds no trades; sums and
/// counts are zero in that case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewMetrics {
    pub total_pnl: Decimal,
    pub mean_pnl: Option<Decimal>,
    pub total_trades: usize,
    pub win_rate_pct: Option<Decimal>, // Option<> for cases with 0 trades
    pub unique_accounts: usize,
    pub unique_coins: usize,
    pub total_volume: Decimal,
    pub mean_position_size: Option<Decimal>,
}

impl OverviewMetrics {
    /// The overview of a view with no trades.
    pub fn empty() -> Self {
        Self {
            total_pnl: Decimal::ZERO,
            mean_pnl: None,
            total_trades: 0,
            win_rate_pct: None,
            unique_accounts: 0,
            unique_coins: 0,
            total_volume: Decimal::ZERO,
            mean_position_size: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_trades == 0
    }
}

impl Default for OverviewMetrics {
    fn default() -> Self {
        Self::empty()
    }
}

/// Performance of all trades made under one sentiment classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentStats {
    pub classification: Classification,
    pub total_pnl: Decimal,
    pub mean_pnl: Decimal,
    pub win_rate_pct: Decimal,
    /// Mean of the losing trades only; zero when the group has none.
    pub mean_loss: Decimal,
    pub mean_position_size: Decimal,
    pub trade_count: usize,
}

/// Performance of a single account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraderStats {
    pub account: String,
    pub total_pnl: Decimal,
    pub win_rate_pct: Decimal,
    pub mean_position_size: Decimal,
    pub trade_count: usize,
}

/// Accounts split around the median win rate of the current view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraderSegmentation {
    pub median_win_rate_pct: Option<Decimal>,
    /// Accounts with positive total PnL and a win rate above the median.
    pub consistent_winners: Vec<TraderStats>,
    pub winner_count: usize,
    pub mean_winner_pnl: Option<Decimal>,
    pub mean_winner_win_rate_pct: Option<Decimal>,
}

/// One calendar day of activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub total_pnl: Decimal,
    pub trade_count: usize,
}

/// Trade count for one (date, classification) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub classification: Classification,
    pub trade_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinVolume {
    pub coin: String,
    pub volume: Decimal,
}

/// The dimension `long_short_ratio` groups by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    #[default]
    Classification,
    Coin,
    Account,
}

/// Buy and sell counts of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongShortRatio {
    pub key: String,
    pub buys: usize,
    pub sells: usize,
    /// `buys / sells`; `None` when the group has no sells.
    pub ratio: Option<Decimal>,
}

/// The numeric columns the correlation matrix is computed over, in matrix order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationColumn {
    SizeUsd,
    ClosedPnl,
    Hour,
    DayOfWeek,
}

impl CorrelationColumn {
    pub const ALL: [CorrelationColumn; 4] = [
        CorrelationColumn::SizeUsd,
        CorrelationColumn::ClosedPnl,
        CorrelationColumn::Hour,
        CorrelationColumn::DayOfWeek,
    ];

    pub fn index(&self) -> usize {
        match self {
            CorrelationColumn::SizeUsd => 0,
            CorrelationColumn::ClosedPnl => 1,
            CorrelationColumn::Hour => 2,
            CorrelationColumn::DayOfWeek => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CorrelationColumn::SizeUsd => "Size USD",
            CorrelationColumn::ClosedPnl => "Closed PnL",
            CorrelationColumn::Hour => "Hour",
            CorrelationColumn::DayOfWeek => "Day of Week",
        }
    }
}

/// Pairwise Pearson correlations. Undefined cells hold `f64::NAN`
/// (serialized as JSON `null`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: [CorrelationColumn; 4],
    pub values: [[f64; 4]; 4],
}

impl CorrelationMatrix {
    pub fn get(&self, row: CorrelationColumn, column: CorrelationColumn) -> f64 {
        self.values[row.index()][column.index()]
    }
}

/// Every table of the dashboard for one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Set when the filtered view has no trades; every table is then empty.
    pub no_data: bool,
    pub overview: OverviewMetrics,
    pub per_sentiment: Vec<SentimentStats>,
    pub long_short_by_sentiment: Vec<LongShortRatio>,
    pub sentiment_timeline: Vec<TimelinePoint>,
    pub traders: Vec<TraderStats>,
    pub top_accounts: Vec<TraderStats>,
    pub segmentation: TraderSegmentation,
    pub daily: Vec<DailyStats>,
    pub top_coins: Vec<CoinVolume>,
    pub correlation: CorrelationMatrix,
}
