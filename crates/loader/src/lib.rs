//! # Dashboard Data Loader
//!
//! This crate is the system's only contact with the input files. It reads the
//! Fear & Greed index and the trade log, validates every row, and inner-joins
//! them on calendar date.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** Everything file-specific (column names, timestamp layouts,
//!   decimal parsing) stays inside this crate. Downstream crates only see
//!   `core_types::JoinedRecord`.
//! - **Load Once:** `DatasetCache` owns the joined dataset for the life of the
//!   process and reloads it only when asked.
//! - **Visible Loss:** The inner join drops trades without a sentiment day; the
//!   `JoinReport` counts them.
//!
//! ## Public API
//!
//! - `load_dataset`: read, validate and join both files.
//! - `DatasetCache`: the lazily initialized, reloadable holder of a `Dataset`.
//! - `DataLoadError`: the error type for all of the above.

pub mod cache;
pub mod error;
pub mod join;
pub mod source;

pub use cache::DatasetCache;
pub use error::DataLoadError;
pub use join::{JoinReport, inner_join};
pub use source::{read_sentiment, read_trades};

use configuration::DataSources;
use core_types::{JoinedRecord, SentimentRecord};

/// The joined, immutable input of every dashboard computation.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub sentiment: Vec<SentimentRecord>,
    /// Joined trades in trade-log order.
    pub rows: Vec<JoinedRecord>,
    pub report: JoinReport,
}

/// Reads both input files and joins them.
pub fn load_dataset(sources: &DataSources) -> Result<Dataset, DataLoadError> {
    let sentiment = read_sentiment(&sources.sentiment_path)?;
    let trades = read_trades(&sources.trades_path)?;
    let (rows, report) = inner_join(trades, &sentiment);

    tracing::info!(
        joined = report.joined_rows,
        dropped = report.dropped_trades,
        "Dataset ready."
    );

    Ok(Dataset {
        sentiment,
        rows,
        report,
    })
}
