use analytics::MetricsEngine;
use axum::{
    Router,
    routing::{get, post},
};
use configuration::Config;
use loader::DatasetCache;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

pub use error::AppError;

/// The shared application state that all handlers can access.
#[derive(Debug)]
pub struct AppState {
    pub cache: DatasetCache,
    pub engine: MetricsEngine,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            cache: DatasetCache::new(config.data.clone()),
            engine: MetricsEngine::new(config.analytics.clone())?,
        })
    }
}

/// Builds the API routes on top of `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/filters", get(handlers::get_filter_options))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/long-short", get(handlers::get_long_short))
        .route("/api/load-report", get(handlers::get_load_report))
        .route("/api/reload", post(handlers::reload_dataset))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// Tracing is initialized by the caller.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = Arc::new(AppState::new(&config)?);

    // A failed startup load is not fatal: requests answer 503 until /api/reload succeeds.
    let warm = Arc::clone(&state);
    match tokio::task::spawn_blocking(move || warm.cache.get()).await? {
        Ok(dataset) => tracing::info!(rows = dataset.rows.len(), "Dataset loaded."),
        Err(e) => tracing::warn!(error = %e, "Dataset not loaded at startup."),
    }

    let app = router(state);

    tracing::info!("Web server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
