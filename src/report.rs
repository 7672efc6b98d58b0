//! Terminal rendering of the dashboard tables.

use analytics::{CorrelationColumn, DashboardSnapshot, TraderStats};
use comfy_table::{Table, presets::UTF8_FULL};
use generator::GenerationSummary;
use loader::JoinReport;
use rust_decimal::Decimal;

const NOT_AVAILABLE: &str = "n/a";

pub fn print_load_report(report: &JoinReport) {
    let mut table = titled("Data load", vec!["Sentiment rows", "Trade rows", "Joined", "Dropped", "Duplicate dates"]);
    table.add_row(vec![
        report.sentiment_rows.to_string(),
        report.trade_rows.to_string(),
        report.joined_rows.to_string(),
        report.dropped_trades.to_string(),
        report.duplicate_sentiment_dates.to_string(),
    ]);
    println!("{table}");
}

/// Prints every table; the daily rollup is cut to its last `recent_days` dates.
pub fn print_snapshot(snapshot: &DashboardSnapshot, recent_days: usize) {
    if snapshot.no_data {
        println!("No trades match the selected filters.");
        return;
    }

    let o = &snapshot.overview;
    let mut overview = titled("Overview", vec!["Metric", "Value"]);
    overview
        .add_row(vec!["Total PnL".to_string(), money(o.total_pnl)])
        .add_row(vec!["Average PnL".to_string(), optional(o.mean_pnl, money)])
        .add_row(vec!["Total trades".to_string(), o.total_trades.to_string()])
        .add_row(vec!["Win rate".to_string(), optional(o.win_rate_pct, percent)])
        .add_row(vec!["Unique accounts".to_string(), o.unique_accounts.to_string()])
        .add_row(vec!["Unique coins".to_string(), o.unique_coins.to_string()])
        .add_row(vec!["Total volume".to_string(), money(o.total_volume)])
        .add_row(vec!["Average position".to_string(), optional(o.mean_position_size, money)]);
    println!("{overview}");

    let mut sentiment = titled(
        "Performance by sentiment",
        vec!["Sentiment", "Trades", "Total PnL", "Avg PnL", "Win rate", "Avg loss", "Avg size", "Long/short"],
    );
    for stats in &snapshot.per_sentiment {
        let ratio = snapshot
            .long_short_by_sentiment
            .iter()
            .find(|r| r.key == stats.classification.label())
            .and_then(|r| r.ratio);
        sentiment.add_row(vec![
            stats.classification.to_string(),
            stats.trade_count.to_string(),
            money(stats.total_pnl),
            money(stats.mean_pnl),
            percent(stats.win_rate_pct),
            money(stats.mean_loss),
            money(stats.mean_position_size),
            optional(ratio, |r| format!("{:.2}", r)),
        ]);
    }
    println!("{sentiment}");

    println!("{}", trader_table("Top accounts by PnL", &snapshot.top_accounts));

    let seg = &snapshot.segmentation;
    println!(
        "Median win rate: {}. Consistent winners: {} (avg PnL {}, avg win rate {}).",
        optional(seg.median_win_rate_pct, percent),
        seg.winner_count,
        optional(seg.mean_winner_pnl, money),
        optional(seg.mean_winner_win_rate_pct, percent),
    );
    if !seg.consistent_winners.is_empty() {
        println!("{}", trader_table("Consistent winners", &seg.consistent_winners));
    }

    let mut coins = titled("Top coins by volume", vec!["Coin", "Volume"]);
    for coin in &snapshot.top_coins {
        coins.add_row(vec![coin.coin.clone(), money(coin.volume)]);
    }
    println!("{coins}");

    let mut header = vec![String::new()];
    header.extend(CorrelationColumn::ALL.iter().map(|c| c.label().to_string()));
    let mut correlation = titled("Correlation", header);
    for row in CorrelationColumn::ALL {
        let mut cells = vec![row.label().to_string()];
        cells.extend(
            CorrelationColumn::ALL
                .iter()
                .map(|&column| coefficient(snapshot.correlation.get(row, column))),
        );
        correlation.add_row(cells);
    }
    println!("{correlation}");

    let skip = snapshot.daily.len().saturating_sub(recent_days);
    let mut daily = titled(
        &format!("Daily PnL (last {} of {} days)", snapshot.daily.len() - skip, snapshot.daily.len()),
        vec!["Date", "Trades", "Total PnL"],
    );
    for day in &snapshot.daily[skip..] {
        daily.add_row(vec![day.date.to_string(), day.trade_count.to_string(), money(day.total_pnl)]);
    }
    println!("{daily}");
}

pub fn print_generation_summary(summary: &GenerationSummary) {
    let mut table = titled("Sample data", vec!["Item", "Value"]);
    let date_range = match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => NOT_AVAILABLE.to_string(),
    };
    table
        .add_row(vec!["Sentiment file".to_string(), summary.sentiment_path.display().to_string()])
        .add_row(vec!["Trades file".to_string(), summary.trades_path.display().to_string()])
        .add_row(vec!["Date range".to_string(), date_range])
        .add_row(vec!["Unique accounts".to_string(), summary.unique_accounts.to_string()])
        .add_row(vec!["Unique coins".to_string(), summary.unique_coins.to_string()])
        .add_row(vec!["Total trades".to_string(), summary.trade_count.to_string()])
        .add_row(vec!["Total volume".to_string(), money(summary.total_volume)])
        .add_row(vec!["Total PnL".to_string(), money(summary.total_pnl)]);
    println!("{table}");
}

fn trader_table(title: &str, traders: &[TraderStats]) -> Table {
    let mut table = titled(title, vec!["Account", "Trades", "Total PnL", "Win rate", "Avg size"]);
    for trader in traders {
        table.add_row(vec![
            trader.account.clone(),
            trader.trade_count.to_string(),
            money(trader.total_pnl),
            percent(trader.win_rate_pct),
            money(trader.mean_position_size),
        ]);
    }
    table
}

fn titled<T: ToString>(title: &str, header: Vec<T>) -> Table {
    println!("\n{title}");
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(header.iter().map(ToString::to_string).collect::<Vec<_>>());
    table
}

fn money(value: Decimal) -> String {
    format!("${:.2}", value)
}

fn percent(value: Decimal) -> String {
    format!("{:.2}%", value)
}

fn optional(value: Option<Decimal>, format: impl Fn(Decimal) -> String) -> String {
    value.map(format).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn coefficient(value: f64) -> String {
    if value.is_nan() {
        NOT_AVAILABLE.to_string()
    } else {
        format!("{:.3}", value)
    }
}
