//! # Dashboard Filter Stage
//!
//! Narrows the joined dataset to what the user selected: a sentiment
//! classification, an inclusive date range and a coin. Each dimension can be
//! switched off with "All". The output is always an owned copy, so concurrent
//! sessions never share a view.

pub mod criteria;
pub mod error;
pub mod options;

pub use criteria::{ALL, DateRange, FilterCriteria, FilterParams, Selection};
pub use error::FilterError;
pub use options::FilterOptions;
