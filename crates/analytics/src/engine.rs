use crate::error::AnalyticsError;
use crate::report::{
    CoinVolume, CorrelationColumn, CorrelationMatrix, DailyStats, DashboardSnapshot, GroupKey,
    LongShortRatio, OverviewMetrics, SentimentStats, TimelinePoint, TraderSegmentation,
    TraderStats,
};
use crate::stats::{self, Tally, group_by, mean, median, pearson};
use configuration::AnalyticsSettings;
use core_types::JoinedRecord;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::{BTreeMap, HashSet};

/// A stateless calculator for the dashboard's aggregate tables.
///
/// Every method takes the filtered view by reference, never mutates it, and
/// builds its result from scratch. None of them fail: empty views and
/// zero denominators resolve to `None` (decimal metrics) or `NaN`
/// (correlations).
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    settings: AnalyticsSettings,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self {
            settings: AnalyticsSettings::default(),
        }
    }
}

impl MetricsEngine {
    pub fn new(settings: AnalyticsSettings) -> Result<Self, AnalyticsError> {
        if settings.top_n == 0 {
            return Err(AnalyticsError::InvalidSettings(
                "top_n must be greater than 0".to_string(),
            ));
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    /// Computes every table in one pass over the view.
    pub fn snapshot(&self, rows: &[JoinedRecord]) -> DashboardSnapshot {
        tracing::debug!(rows = rows.len(), "Computing dashboard snapshot.");
        let traders = self.per_trader_table(rows);
        let segmentation = segment_traders(&traders);
        let top_accounts = top_by_pnl(&traders, self.settings.top_n);

        DashboardSnapshot {
            no_data: rows.is_empty(),
            overview: self.overview_metrics(rows),
            per_sentiment: self.per_sentiment_table(rows),
            long_short_by_sentiment: self.long_short_ratio(rows, GroupKey::Classification),
            sentiment_timeline: self.sentiment_timeline(rows),
            traders,
            top_accounts,
            segmentation,
            daily: self.daily_rollup(rows),
            top_coins: self.top_coins_by_volume(rows),
            correlation: self.correlation_matrix(rows),
        }
    }

    /// The headline KPIs. An empty view yields [`OverviewMetrics::empty`].
    pub fn overview_metrics(&self, rows: &[JoinedRecord]) -> OverviewMetrics {
        if rows.is_empty() {
            return OverviewMetrics::empty();
        }

        let tally = Tally::of(rows);
        let accounts: HashSet<&str> = rows.iter().map(|r| r.account()).collect();
        let coins: HashSet<&str> = rows.iter().map(|r| r.coin()).collect();

        OverviewMetrics {
            total_pnl: tally.pnl,
            mean_pnl: tally.mean_pnl(),
            total_trades: tally.count,
            win_rate_pct: tally.win_rate_pct(),
            unique_accounts: accounts.len(),
            unique_coins: coins.len(),
            total_volume: tally.size,
            mean_position_size: tally.mean_size(),
        }
    }

    /// One row per classification present, fear to greed.
    pub fn per_sentiment_table(&self, rows: &[JoinedRecord]) -> Vec<SentimentStats> {
        group_by(rows, |r| r.classification)
            .into_iter()
            .map(|(classification, group)| {
                let tally = Tally::of(group);
                SentimentStats {
                    classification,
                    total_pnl: tally.pnl,
                    mean_pnl: tally.mean_pnl().unwrap_or_default(),
                    win_rate_pct: tally.win_rate_pct().unwrap_or_default(),
                    mean_loss: tally.mean_loss(),
                    mean_position_size: tally.mean_size().unwrap_or_default(),
                    trade_count: tally.count,
                }
            })
            .collect()
    }

    /// One row per account, ordered by account identifier.
    pub fn per_trader_table(&self, rows: &[JoinedRecord]) -> Vec<TraderStats> {
        group_by(rows, |r| r.account())
            .into_iter()
            .map(|(account, group)| {
                let tally = Tally::of(group);
                TraderStats {
                    account: account.to_string(),
                    total_pnl: tally.pnl,
                    win_rate_pct: tally.win_rate_pct().unwrap_or_default(),
                    mean_position_size: tally.mean_size().unwrap_or_default(),
                    trade_count: tally.count,
                }
            })
            .collect()
    }

    /// Splits the view's accounts around their median win rate.
    pub fn trader_segments(&self, rows: &[JoinedRecord]) -> TraderSegmentation {
        segment_traders(&self.per_trader_table(rows))
    }

    /// The `top_n` accounts by total PnL, best first.
    pub fn top_accounts_by_pnl(&self, rows: &[JoinedRecord]) -> Vec<TraderStats> {
        top_by_pnl(&self.per_trader_table(rows), self.settings.top_n)
    }

    /// Total PnL and trade count per calendar date, oldest first.
    pub fn daily_rollup(&self, rows: &[JoinedRecord]) -> Vec<DailyStats> {
        group_by(rows, |r| r.date())
            .into_iter()
            .map(|(date, group)| {
                let tally = Tally::of(group);
                DailyStats {
                    date,
                    total_pnl: tally.pnl,
                    trade_count: tally.count,
                }
            })
            .collect()
    }

    /// Trade count per (date, classification), ordered by date then classification.
    pub fn sentiment_timeline(&self, rows: &[JoinedRecord]) -> Vec<TimelinePoint> {
        group_by(rows, |r| (r.date(), r.classification))
            .into_iter()
            .map(|((date, classification), group)| TimelinePoint {
                date,
                classification,
                trade_count: group.len(),
            })
            .collect()
    }

    /// The `top_n` coins by summed position size, largest first.
    pub fn top_coins_by_volume(&self, rows: &[JoinedRecord]) -> Vec<CoinVolume> {
        let mut coins: Vec<CoinVolume> = group_by(rows, |r| r.coin())
            .into_iter()
            .map(|(coin, group)| CoinVolume {
                coin: coin.to_string(),
                volume: group.iter().map(|r| r.size_usd()).sum(),
            })
            .collect();
        // Stable sort: equal volumes keep coin order.
        coins.sort_by(|a, b| b.volume.cmp(&a.volume));
        coins.truncate(self.settings.top_n);
        coins
    }

    /// Buy/sell counts and their ratio for each value of `key`.
    pub fn long_short_ratio(&self, rows: &[JoinedRecord], key: GroupKey) -> Vec<LongShortRatio> {
        match key {
            GroupKey::Classification => {
                side_ratios(group_by(rows, |r| r.classification), |c| c.label().to_string())
            }
            GroupKey::Coin => side_ratios(group_by(rows, |r| r.coin()), |c| c.to_string()),
            GroupKey::Account => side_ratios(group_by(rows, |r| r.account()), |a| a.to_string()),
        }
    }

    /// Pearson correlations between size, PnL, hour of day and day of week.
    pub fn correlation_matrix(&self, rows: &[JoinedRecord]) -> CorrelationMatrix {
        let columns: [Vec<f64>; 4] = [
            rows.iter().map(|r| decimal_to_f64(r.size_usd())).collect(),
            rows.iter().map(|r| decimal_to_f64(r.closed_pnl())).collect(),
            rows.iter().map(|r| f64::from(r.hour())).collect(),
            rows.iter().map(|r| f64::from(r.day_of_week())).collect(),
        ];

        // Variance is decided on the exact values, before the f64 conversion.
        let varies = [
            stats::varies(rows.iter().map(|r| r.size_usd())),
            stats::varies(rows.iter().map(|r| r.closed_pnl())),
            stats::varies(rows.iter().map(|r| r.hour())),
            stats::varies(rows.iter().map(|r| r.day_of_week())),
        ];

        let mut values = [[f64::NAN; 4]; 4];
        for i in 0..4 {
            for j in i..4 {
                let r = if !varies[i] || !varies[j] {
                    f64::NAN
                } else if i == j {
                    1.0
                } else {
                    pearson(&columns[i], &columns[j])
                };
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        CorrelationMatrix {
            columns: CorrelationColumn::ALL,
            values,
        }
    }
}

/// Consistent winners: positive total PnL and a win rate above the median.
fn segment_traders(traders: &[TraderStats]) -> TraderSegmentation {
    let win_rates: Vec<Decimal> = traders.iter().map(|t| t.win_rate_pct).collect();
    let median_win_rate_pct = median(&win_rates);

    let consistent_winners: Vec<TraderStats> = match median_win_rate_pct {
        Some(median) => traders
            .iter()
            .filter(|t| t.total_pnl > Decimal::ZERO && t.win_rate_pct > median)
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    let winner_pnls: Vec<Decimal> = consistent_winners.iter().map(|t| t.total_pnl).collect();
    let winner_rates: Vec<Decimal> = consistent_winners.iter().map(|t| t.win_rate_pct).collect();

    TraderSegmentation {
        median_win_rate_pct,
        winner_count: consistent_winners.len(),
        mean_winner_pnl: mean(&winner_pnls),
        mean_winner_win_rate_pct: mean(&winner_rates),
        consistent_winners,
    }
}

fn top_by_pnl(traders: &[TraderStats], top_n: usize) -> Vec<TraderStats> {
    let mut ranked = traders.to_vec();
    ranked.sort_by(|a, b| b.total_pnl.cmp(&a.total_pnl));
    ranked.truncate(top_n);
    ranked
}

fn side_ratios<K, F>(groups: BTreeMap<K, Vec<&JoinedRecord>>, label: F) -> Vec<LongShortRatio>
where
    K: Ord,
    F: Fn(&K) -> String,
{
    groups
        .into_iter()
        .map(|(key, group)| {
            let tally = Tally::of(group);
            LongShortRatio {
                key: label(&key),
                buys: tally.buys,
                sells: tally.sells,
                ratio: tally.long_short_ratio(),
            }
        })
        .collect()
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use core_types::{Classification, SentimentRecord, Side, TradeRecord};
    use rust_decimal_macros::dec;

    fn row(
        ts: &str,
        account: &str,
        side: Side,
        size: Decimal,
        pnl: Decimal,
        classification: Classification,
    ) -> JoinedRecord {
        let trade = TradeRecord {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            account: account.to_string(),
            coin: "BTC".to_string(),
            side,
            size_usd: size,
            closed_pnl: pnl,
        };
        let sentiment = SentimentRecord {
            date: trade.date(),
            value: 60,
            classification,
        };
        JoinedRecord::new(trade, &sentiment)
    }

    #[test]
    fn mean_loss_only_counts_losing_trades() {
        let rows = vec![
            row("2024-01-01 10:00:00", "a", Side::Buy, dec!(100), dec!(-30), Classification::Fear),
            row("2024-01-01 11:00:00", "a", Side::Buy, dec!(100), dec!(-10), Classification::Fear),
            row("2024-01-01 12:00:00", "a", Side::Buy, dec!(100), dec!(90), Classification::Fear),
            row("2024-01-01 13:00:00", "a", Side::Buy, dec!(100), dec!(5), Classification::Greed),
        ];
        let table = MetricsEngine::default().per_sentiment_table(&rows);

        assert_eq!(table[0].classification, Classification::Fear);
        assert_eq!(table[0].mean_loss, dec!(-20));
        assert_eq!(table[1].classification, Classification::Greed);
        assert_eq!(table[1].mean_loss, Decimal::ZERO);
    }

    #[test]
    fn segmentation_uses_a_strict_median_cut() {
        let traders = vec![
            TraderStats {
                account: "a".to_string(),
                total_pnl: dec!(100),
                win_rate_pct: dec!(80),
                mean_position_size: dec!(10),
                trade_count: 5,
            },
            TraderStats {
                account: "b".to_string(),
                total_pnl: dec!(50),
                win_rate_pct: dec!(50),
                mean_position_size: dec!(10),
                trade_count: 4,
            },
            TraderStats {
                account: "c".to_string(),
                total_pnl: dec!(-10),
                win_rate_pct: dec!(90),
                mean_position_size: dec!(10),
                trade_count: 10,
            },
        ];
        let segments = segment_traders(&traders);

        assert_eq!(segments.median_win_rate_pct, Some(dec!(80)));
        // "a" sits on the median and "c" lost money.
        assert_eq!(segments.winner_count, 0);
        assert_eq!(segments.mean_winner_pnl, None);
    }

    #[test]
    fn top_accounts_keep_table_order_on_ties() {
        let rows = vec![
            row("2024-01-01 10:00:00", "b", Side::Buy, dec!(1), dec!(10), Classification::Fear),
            row("2024-01-01 10:00:00", "a", Side::Buy, dec!(1), dec!(10), Classification::Fear),
            row("2024-01-01 10:00:00", "c", Side::Buy, dec!(1), dec!(40), Classification::Fear),
        ];
        let engine = MetricsEngine::new(AnalyticsSettings { top_n: 2 }).unwrap();
        let top = engine.top_accounts_by_pnl(&rows);

        let accounts: Vec<&str> = top.iter().map(|t| t.account.as_str()).collect();
        assert_eq!(accounts, vec!["c", "a"]);
    }

    #[test]
    fn keeps_its_settings() {
        let engine = MetricsEngine::new(AnalyticsSettings { top_n: 3 }).unwrap();
        assert_eq!(engine.settings().top_n, 3);
        assert_eq!(MetricsEngine::default().settings().top_n, 10);
    }

    #[test]
    fn rejects_zero_top_n() {
        assert!(matches!(
            MetricsEngine::new(AnalyticsSettings { top_n: 0 }),
            Err(AnalyticsError::InvalidSettings(_))
        ));
    }
}
