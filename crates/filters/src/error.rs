use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Date range starts ({start}) after it ends ({end}).")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Unknown sentiment '{0}'. Expected All, Extreme Fear, Fear, Neutral, Greed or Extreme Greed.")]
    UnknownClassification(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    InvalidDate(String),
}
