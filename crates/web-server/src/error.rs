use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Data load error: {0}")]
    DataLoad(#[from] loader::DataLoadError),
    #[error("Filter error: {0}")]
    Filter(#[from] filters::FilterError),
    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
    #[error("Configuration error: {0}")]
    Config(#[from] configuration::error::ConfigError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DataLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Filter(_) => StatusCode::BAD_REQUEST,
            AppError::Analytics(_) | AppError::Config(_) | AppError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            // The load message tells the operator which files to provide.
            AppError::DataLoad(load_err) => {
                tracing::error!(error = %load_err, "Dataset unavailable.");
                load_err.to_string()
            }
            AppError::Filter(filter_err) => filter_err.to_string(),
            AppError::Analytics(analytics_err) => {
                tracing::error!(error = ?analytics_err, "Analytics error.");
                "An error occurred during analysis".to_string()
            }
            AppError::Config(config_err) => {
                tracing::error!(error = ?config_err, "Configuration error.");
                "A server configuration error occurred".to_string()
            }
            AppError::Task(task_err) => {
                tracing::error!(error = ?task_err, "Blocking task failed.");
                "An internal error occurred".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
