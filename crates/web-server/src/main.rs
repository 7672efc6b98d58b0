use tracing_subscriber::{EnvFilter, FmtSubscriber};

// This main function is the entry point when running `cargo run -p web-server`.
// It serves the API with the settings from `config.toml` and `DASHBOARD__*` variables.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = configuration::load_config()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    web_server::run_server(config).await
}
