//! # Dashboard Metrics Engine
//!
//! This crate turns a filtered view of joined trades into the aggregate
//! tables the dashboard shows: overview KPIs, per-sentiment and per-trader
//! statistics, trader segmentation, daily rollups, long/short ratios and a
//! correlation matrix.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O and no knowledge of rendering. It depends only on
//!   `core-types` and the analytics section of `configuration`.
//! - **Stateless Calculation:** `MetricsEngine` takes a slice of rows and
//!   returns new structures. Every table is rebuilt from scratch on each call.
//! - **Defined Sentinels:** Empty views and zero denominators produce `None`
//!   (or `NaN` for correlations) instead of errors.
//!
//! ## Public API
//!
//! - `MetricsEngine`: the calculator.
//! - `DashboardSnapshot` and the per-table structs in `report`.
//! - `AnalyticsError`: returned only for invalid engine settings.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use engine::MetricsEngine;
pub use error::AnalyticsError;
pub use report::{
    CoinVolume, CorrelationColumn, CorrelationMatrix, DailyStats, DashboardSnapshot, GroupKey,
    LongShortRatio, OverviewMetrics, SentimentStats, TimelinePoint, TraderSegmentation,
    TraderStats,
};
