use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid analytics settings: {0}")]
    InvalidSettings(String),
}
