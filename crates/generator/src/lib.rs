//! # Sample Data Generator
//!
//! Synthesizes a Fear & Greed index file and a trade history file so the
//! dashboard can be exercised without real exports. Both files use the exact
//! layout the loader expects, and every generated trade falls on a day that
//! has an index row.
//!
//! A seed makes the output reproducible: two runs with the same settings, seed
//! and reference day write byte-identical files.

pub mod error;
pub mod sample;
pub mod writer;

pub use error::GeneratorError;

use chrono::NaiveDate;
use configuration::GeneratorSettings;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// File names the dashboard looks for by default.
pub const SENTIMENT_FILE: &str = "fear_greed_index.csv";
pub const TRADES_FILE: &str = "historical_data.csv";

/// What a generator run wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub sentiment_path: PathBuf,
    pub trades_path: PathBuf,
    pub sentiment_days: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub trade_count: usize,
    pub unique_accounts: usize,
    pub unique_coins: usize,
    pub total_volume: Decimal,
    pub total_pnl: Decimal,
}

/// Generates both files into `settings.output_dir`.
///
/// `today` anchors the window: the index covers the `settings.days` days
/// before it.
pub fn generate(
    settings: &GeneratorSettings,
    today: NaiveDate,
) -> Result<GenerationSummary, GeneratorError> {
    settings
        .validate()
        .map_err(|e| GeneratorError::InvalidParameters(e.to_string()))?;

    let mut rng = match settings.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    std::fs::create_dir_all(&settings.output_dir).map_err(|source| GeneratorError::Io {
        path: settings.output_dir.clone(),
        source,
    })?;
    let sentiment_path = settings.output_dir.join(SENTIMENT_FILE);
    let trades_path = settings.output_dir.join(TRADES_FILE);

    tracing::info!(days = settings.days, path = %sentiment_path.display(), "Generating Fear & Greed index.");
    let sentiment = sample::sentiment_days(&mut rng, settings.days, today)?;
    writer::write_sentiment(&sentiment_path, &sentiment)?;

    tracing::info!(
        trades = settings.num_trades,
        accounts = settings.num_accounts,
        coins = settings.num_coins,
        path = %trades_path.display(),
        "Generating trade history."
    );
    let accounts: Vec<String> = (0..settings.num_accounts)
        .map(|_| sample::account_id(&mut rng))
        .collect();
    let coins = &sample::COINS[..settings.num_coins];
    let start = sample::first_day(settings.days, today);

    let progress_bar = ProgressBar::new(settings.num_trades as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
    {
        progress_bar.set_style(style.progress_chars("#>-"));
    }

    let mut trades = Vec::with_capacity(settings.num_trades);
    for _ in 0..settings.num_trades {
        trades.push(sample::trade(&mut rng, &accounts, coins, start, settings.days));
        progress_bar.inc(1);
    }
    progress_bar.finish_with_message("Trades generated.");
    writer::write_trades(&trades_path, &trades)?;

    let unique_accounts: HashSet<&str> = trades.iter().map(|t| t.account.as_str()).collect();
    let unique_coins: HashSet<&str> = trades.iter().map(|t| t.coin.as_str()).collect();

    let summary = GenerationSummary {
        sentiment_days: sentiment.len(),
        first_date: sentiment.first().map(|s| s.date),
        last_date: sentiment.last().map(|s| s.date),
        trade_count: trades.len(),
        unique_accounts: unique_accounts.len(),
        unique_coins: unique_coins.len(),
        total_volume: trades.iter().map(|t| t.size_usd).sum(),
        total_pnl: trades.iter().map(|t| t.closed_pnl).sum(),
        sentiment_path,
        trades_path,
    };
    tracing::info!(
        trades = summary.trade_count,
        total_volume = %summary.total_volume,
        total_pnl = %summary.total_pnl,
        "Sample data generation complete."
    );
    Ok(summary)
}
