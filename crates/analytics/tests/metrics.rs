use analytics::{CorrelationColumn, GroupKey, MetricsEngine};
use chrono::{NaiveDate, NaiveDateTime};
use core_types::{Classification, JoinedRecord, SentimentRecord, Side, TradeRecord};
use filters::FilterCriteria;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ============================================================================
// Fixtures
// ============================================================================

struct Trade<'a> {
    ts: &'a str,
    account: &'a str,
    coin: &'a str,
    side: Side,
    size: Decimal,
    pnl: Decimal,
    sentiment: Classification,
}

fn joined(t: Trade<'_>) -> JoinedRecord {
    let trade = TradeRecord {
        timestamp: NaiveDateTime::parse_from_str(t.ts, "%Y-%m-%d %H:%M:%S").unwrap(),
        account: t.account.to_string(),
        coin: t.coin.to_string(),
        side: t.side,
        size_usd: t.size,
        closed_pnl: t.pnl,
    };
    let day = SentimentRecord {
        date: trade.date(),
        value: 50,
        classification: t.sentiment,
    };
    JoinedRecord::new(trade, &day)
}

fn greed_trade(ts: &str, size: Decimal, pnl: Decimal) -> JoinedRecord {
    joined(Trade {
        ts,
        account: "0xa",
        coin: "BTC",
        side: Side::Buy,
        size,
        pnl,
        sentiment: Classification::Greed,
    })
}

/// A mixed view: three accounts, three coins, four days, four classifications.
fn mixed_rows() -> Vec<JoinedRecord> {
    vec![
        joined(Trade { ts: "2024-03-04 09:00:00", account: "0xa", coin: "BTC", side: Side::Buy, size: dec!(1000), pnl: dec!(120), sentiment: Classification::Fear }),
        joined(Trade { ts: "2024-03-04 17:30:00", account: "0xb", coin: "ETH", side: Side::Sell, size: dec!(400), pnl: dec!(-40), sentiment: Classification::Fear }),
        joined(Trade { ts: "2024-03-05 02:15:00", account: "0xc", coin: "SOL", side: Side::Buy, size: dec!(250), pnl: dec!(15), sentiment: Classification::ExtremeFear }),
        joined(Trade { ts: "2024-03-06 12:00:00", account: "0xa", coin: "ETH", side: Side::Sell, size: dec!(3000), pnl: dec!(-200), sentiment: Classification::Greed }),
        joined(Trade { ts: "2024-03-06 13:45:00", account: "0xb", coin: "BTC", side: Side::Buy, size: dec!(800), pnl: dec!(60), sentiment: Classification::Greed }),
        joined(Trade { ts: "2024-03-09 21:05:00", account: "0xc", coin: "BTC", side: Side::Buy, size: dec!(1500), pnl: dec!(0), sentiment: Classification::ExtremeGreed }),
        joined(Trade { ts: "2024-03-09 22:40:00", account: "0xa", coin: "SOL", side: Side::Buy, size: dec!(600), pnl: dec!(35), sentiment: Classification::ExtremeGreed }),
    ]
}

fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn three_greed_trades_overview() {
    let rows = vec![
        greed_trade("2024-01-10 10:00:00", dec!(1000), dec!(100)),
        greed_trade("2024-01-10 11:00:00", dec!(500), dec!(-50)),
        greed_trade("2024-01-11 12:00:00", dec!(2000), dec!(30)),
    ];
    let overview = MetricsEngine::default().overview_metrics(&rows);

    assert_eq!(overview.total_pnl, dec!(80));
    assert_eq!(overview.total_trades, 3);
    assert_eq!(overview.win_rate_pct.unwrap().round_dp(2), dec!(66.67));
    assert_eq!(overview.total_volume, dec!(3500));
    assert_eq!(overview.mean_position_size.unwrap().round_dp(2), dec!(1166.67));
    assert_eq!(overview.mean_pnl.unwrap().round_dp(2), dec!(26.67));
    assert_eq!(overview.unique_accounts, 1);
    assert_eq!(overview.unique_coins, 1);
}

#[test]
fn empty_view_yields_defined_no_data_state() {
    let rows = mixed_rows();
    let empty = FilterCriteria::all().with_coin("DOGE").apply(&rows);
    let engine = MetricsEngine::default();

    let overview = engine.overview_metrics(&empty);
    assert!(overview.is_empty());
    assert_eq!(overview.total_pnl, Decimal::ZERO);
    assert_eq!(overview.win_rate_pct, None);
    assert_eq!(overview.mean_pnl, None);
    assert_eq!(overview.mean_position_size, None);

    assert!(engine.per_sentiment_table(&empty).is_empty());
    assert!(engine.per_trader_table(&empty).is_empty());
    assert!(engine.daily_rollup(&empty).is_empty());
    assert!(engine.long_short_ratio(&empty, GroupKey::Coin).is_empty());

    let segments = engine.trader_segments(&empty);
    assert_eq!(segments.median_win_rate_pct, None);
    assert_eq!(segments.winner_count, 0);

    let snapshot = engine.snapshot(&empty);
    assert!(snapshot.no_data);
    assert!(snapshot.correlation.values.iter().flatten().all(|v| v.is_nan()));
}

#[test]
fn group_without_sells_has_no_ratio() {
    let rows = vec![
        greed_trade("2024-01-10 10:00:00", dec!(100), dec!(1)),
        greed_trade("2024-01-10 11:00:00", dec!(100), dec!(2)),
        joined(Trade { ts: "2024-01-12 09:00:00", account: "0xb", coin: "ETH", side: Side::Buy, size: dec!(10), pnl: dec!(1), sentiment: Classification::Fear }),
        joined(Trade { ts: "2024-01-12 09:30:00", account: "0xb", coin: "ETH", side: Side::Sell, size: dec!(10), pnl: dec!(1), sentiment: Classification::Fear }),
        joined(Trade { ts: "2024-01-12 09:45:00", account: "0xb", coin: "ETH", side: Side::Sell, size: dec!(10), pnl: dec!(1), sentiment: Classification::Fear }),
    ];
    let ratios = MetricsEngine::default().long_short_ratio(&rows, GroupKey::Classification);

    assert_eq!(ratios.len(), 2);
    assert_eq!(ratios[0].key, "Fear");
    assert_eq!((ratios[0].buys, ratios[0].sells), (1, 2));
    assert_eq!(ratios[0].ratio, Some(dec!(0.5)));
    assert_eq!(ratios[1].key, "Greed");
    assert_eq!((ratios[1].buys, ratios[1].sells), (2, 0));
    assert_eq!(ratios[1].ratio, None);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn sentiment_counts_partition_the_view() {
    let rows = mixed_rows();
    let engine = MetricsEngine::default();
    let total = engine.overview_metrics(&rows).total_trades;

    let table = engine.per_sentiment_table(&rows);
    let summed: usize = table.iter().map(|s| s.trade_count).sum();
    assert_eq!(summed, total);
    assert!(table.iter().all(|s| s.trade_count <= total));

    let order: Vec<Classification> = table.iter().map(|s| s.classification).collect();
    assert_eq!(
        order,
        vec![
            Classification::ExtremeFear,
            Classification::Fear,
            Classification::Greed,
            Classification::ExtremeGreed,
        ]
    );
}

#[test]
fn win_rates_stay_within_bounds() {
    let rows = mixed_rows();
    let engine = MetricsEngine::default();
    let hundred = Decimal::ONE_HUNDRED;

    for stats in engine.per_sentiment_table(&rows) {
        assert!(stats.win_rate_pct >= Decimal::ZERO && stats.win_rate_pct <= hundred);
    }
    for stats in engine.per_trader_table(&rows) {
        assert!(stats.win_rate_pct >= Decimal::ZERO && stats.win_rate_pct <= hundred);
    }
    let overall = engine.overview_metrics(&rows).win_rate_pct.unwrap();
    assert!(overall >= Decimal::ZERO && overall <= hundred);
}

#[test]
fn daily_rollup_is_sorted_and_counts_each_date() {
    let mut rows = mixed_rows();
    rows.reverse();
    let daily = MetricsEngine::default().daily_rollup(&rows);

    assert!(daily.windows(2).all(|w| w[0].date < w[1].date));
    for day in &daily {
        let expected = rows.iter().filter(|r| r.date() == day.date).count();
        assert_eq!(day.trade_count, expected);
    }
    assert_eq!(daily[0].date, date("2024-03-04"));
    assert_eq!(daily[0].total_pnl, dec!(80));
}

#[test]
fn correlation_matrix_is_symmetric_with_unit_diagonal() {
    let rows = mixed_rows();
    let matrix = MetricsEngine::default().correlation_matrix(&rows);

    for a in CorrelationColumn::ALL {
        assert_eq!(matrix.get(a, a), 1.0);
        for b in CorrelationColumn::ALL {
            let (ab, ba) = (matrix.get(a, b), matrix.get(b, a));
            assert_eq!(ab, ba);
            assert!((-1.0..=1.0).contains(&ab));
        }
    }
}

#[test]
fn zero_variance_column_is_nan() {
    // Same hour on every trade.
    let rows = vec![
        greed_trade("2024-01-08 10:00:00", dec!(100), dec!(5)),
        greed_trade("2024-01-09 10:00:00", dec!(200), dec!(-5)),
        greed_trade("2024-01-10 10:00:00", dec!(300), dec!(15)),
    ];
    let matrix = MetricsEngine::default().correlation_matrix(&rows);

    assert!(matrix.get(CorrelationColumn::Hour, CorrelationColumn::Hour).is_nan());
    assert!(matrix.get(CorrelationColumn::Hour, CorrelationColumn::SizeUsd).is_nan());
    assert_eq!(matrix.get(CorrelationColumn::SizeUsd, CorrelationColumn::SizeUsd), 1.0);
    assert!(!matrix.get(CorrelationColumn::SizeUsd, CorrelationColumn::ClosedPnl).is_nan());
}

#[test]
fn constant_fractional_size_is_nan() {
    let rows = vec![
        greed_trade("2024-01-08 09:00:00", dec!(0.1), dec!(5)),
        greed_trade("2024-01-09 13:00:00", dec!(0.1), dec!(-5)),
        greed_trade("2024-01-10 17:00:00", dec!(0.1), dec!(15)),
    ];
    let matrix = MetricsEngine::default().correlation_matrix(&rows);

    for column in CorrelationColumn::ALL {
        assert!(matrix.get(CorrelationColumn::SizeUsd, column).is_nan());
        assert!(matrix.get(column, CorrelationColumn::SizeUsd).is_nan());
    }
    assert_eq!(matrix.get(CorrelationColumn::ClosedPnl, CorrelationColumn::ClosedPnl), 1.0);
    assert!(!matrix.get(CorrelationColumn::ClosedPnl, CorrelationColumn::Hour).is_nan());
}

#[test]
fn single_row_correlation_is_all_nan() {
    let rows = vec![greed_trade("2024-01-08 10:00:00", dec!(100), dec!(5))];
    let matrix = MetricsEngine::default().correlation_matrix(&rows);
    assert!(matrix.values.iter().flatten().all(|v| v.is_nan()));
}

#[test]
fn single_account_view_has_one_trader_row() {
    let rows = mixed_rows();
    let only_a: Vec<JoinedRecord> = rows.iter().filter(|r| r.account() == "0xa").cloned().collect();
    let table = MetricsEngine::default().per_trader_table(&only_a);

    assert_eq!(table.len(), 1);
    assert_eq!(table[0].account, "0xa");
    assert_eq!(table[0].trade_count, 3);
    assert_eq!(table[0].total_pnl, dec!(-45));
}

#[test]
fn consistent_winners_beat_the_median() {
    let rows = mixed_rows();
    let segments = MetricsEngine::default().trader_segments(&rows);

    // 0xa: 2/3 wins, 0xb: 1/2, 0xc: 1/2 (a zero PnL is not a win).
    assert_eq!(segments.median_win_rate_pct, Some(dec!(50)));
    assert_eq!(segments.winner_count, 0); // 0xa beats the median but lost money overall

    let profitable: Vec<JoinedRecord> = rows
        .iter()
        .filter(|r| r.account() != "0xa" || r.closed_pnl() > Decimal::ZERO)
        .cloned()
        .collect();
    let segments = MetricsEngine::default().trader_segments(&profitable);
    assert_eq!(segments.winner_count, 1);
    assert_eq!(segments.consistent_winners[0].account, "0xa");
    assert_eq!(segments.mean_winner_pnl, Some(dec!(155)));
}

#[test]
fn timeline_and_top_coins() {
    let rows = mixed_rows();
    let engine = MetricsEngine::default();

    let timeline = engine.sentiment_timeline(&rows);
    assert_eq!(timeline.len(), 4);
    assert_eq!(timeline[0].date, date("2024-03-04"));
    assert_eq!(timeline[0].classification, Classification::Fear);
    assert_eq!(timeline[0].trade_count, 2);

    let coins = engine.top_coins_by_volume(&rows);
    let order: Vec<&str> = coins.iter().map(|c| c.coin.as_str()).collect();
    assert_eq!(order, vec!["ETH", "BTC", "SOL"]);
    assert_eq!(coins[0].volume, dec!(3400));
}

#[test]
fn engine_never_mutates_its_input() {
    let rows = mixed_rows();
    let before = rows.clone();
    let _ = MetricsEngine::default().snapshot(&rows);
    assert_eq!(rows, before);
}

#[test]
fn snapshot_serializes_nan_as_null() {
    let rows = vec![greed_trade("2024-01-08 10:00:00", dec!(100), dec!(5))];
    let snapshot = MetricsEngine::default().snapshot(&rows);
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["no_data"], false);
    assert!(json["correlation"]["values"][0][0].is_null());
    assert_eq!(json["per_sentiment"][0]["classification"], "Greed");
}
