use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use configuration::{Config, DataOverrides, Logging};
use filters::{FilterCriteria, FilterParams};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod report;

/// The main entry point for the sentiment dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;
    cli.data.apply(&mut config.data);

    // Held until exit so buffered file logs are flushed.
    let _log_guard = init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => handle_report(args, &config),
        Commands::Serve(args) => handle_serve(args, config).await,
        Commands::Generate(args) => handle_generate(args, &config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Explore how market sentiment relates to trader performance.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    data: DataOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard tables for a filtered view.
    Report(ReportArgs),
    /// Serve the dashboard as a JSON API.
    Serve(ServeArgs),
    /// Write synthetic fear_greed_index.csv and historical_data.csv files.
    Generate(GenerateArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// Sentiment classification (e.g., "Extreme Fear"), or "All".
    #[arg(long)]
    sentiment: Option<String>,

    /// Coin symbol (e.g., "BTC"), or "All".
    #[arg(long)]
    coin: Option<String>,

    /// First trade date to include (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last trade date to include (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Parser)]
struct ServeArgs {
    /// Address to bind (overrides server.host).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides server.port).
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct GenerateArgs {
    /// Number of days of index data, ending yesterday.
    #[arg(long)]
    days: Option<u32>,

    /// Number of trades to write.
    #[arg(long)]
    trades: Option<usize>,

    /// Number of distinct accounts.
    #[arg(long)]
    accounts: Option<usize>,

    /// Number of distinct coins (at most 15).
    #[arg(long)]
    coins: Option<usize>,

    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory the two files are written to.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_report(args: ReportArgs, config: &Config) -> anyhow::Result<()> {
    let criteria = FilterCriteria::try_from(FilterParams {
        sentiment: args.sentiment,
        start: args.from.map(|d| d.to_string()),
        end: args.to.map(|d| d.to_string()),
        coin: args.coin,
    })?;

    let dataset = loader::load_dataset(&config.data)?;
    let engine = analytics::MetricsEngine::new(config.analytics.clone())?;

    let view = criteria.apply(&dataset.rows);
    tracing::info!(joined = dataset.rows.len(), selected = view.len(), "Building report.");
    let snapshot = engine.snapshot(&view);

    report::print_load_report(&dataset.report);
    report::print_snapshot(&snapshot, engine.settings().top_n);
    Ok(())
}

async fn handle_serve(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    tracing::info!(host = %config.server.host, port = config.server.port, "Starting dashboard API.");
    web_server::run_server(config).await
}

fn handle_generate(args: GenerateArgs, config: &Config) -> anyhow::Result<()> {
    let mut settings = config.generator.clone();
    if let Some(days) = args.days {
        settings.days = days;
    }
    if let Some(trades) = args.trades {
        settings.num_trades = trades;
    }
    if let Some(accounts) = args.accounts {
        settings.num_accounts = accounts;
    }
    if let Some(coins) = args.coins {
        settings.num_coins = coins;
    }
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(out_dir) = args.out_dir {
        settings.output_dir = out_dir;
    }

    let today = Local::now().date_naive();
    tracing::info!(output_dir = %settings.output_dir.display(), %today, "Generating sample data.");
    let summary = generator::generate(&settings, today)?;
    report::print_generation_summary(&summary);
    Ok(())
}

// ==============================================================================
// Logging
// ==============================================================================

/// Console logs go to stderr; stdout carries the report tables. `RUST_LOG`
/// takes precedence over the configured level.
fn init_tracing(logging: &Logging) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let (file_layer, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "dashboard.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
