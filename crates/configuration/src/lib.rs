use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalyticsSettings, Config, DataSources, GeneratorSettings, Logging, Server,
    MAX_GENERATED_COINS,
};

/// Environment variable prefix, e.g. `DASHBOARD__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "DASHBOARD";

/// Loads the application configuration from the `config.toml` file.
///
/// The file is optional; every setting has a default. Environment variables
/// prefixed with `DASHBOARD__` override values from the file.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Same as [`load_config`], reading the file at `path` instead.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(config)
}

/// Command-line overrides for the input file locations.
#[cfg(feature = "clap")]
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DataOverrides {
    /// Path to the Fear & Greed index CSV.
    #[arg(long, global = true)]
    pub sentiment_path: Option<std::path::PathBuf>,

    /// Path to the trade log CSV.
    #[arg(long, global = true)]
    pub trades_path: Option<std::path::PathBuf>,
}

#[cfg(feature = "clap")]
impl DataOverrides {
    pub fn apply(&self, data: &mut DataSources) {
        if let Some(path) = &self.sentiment_path {
            data.sentiment_path = path.clone();
        }
        if let Some(path) = &self.trades_path {
            data.trades_path = path.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_config(test_name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "dashboard_config_{}_{}",
            test_name,
            uuid::Uuid::new_v4()
        ));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("absent_{}.toml", uuid::Uuid::new_v4()));
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.analytics.top_n, 10);
        assert_eq!(config.data.sentiment_path, PathBuf::from("fear_greed_index.csv"));
    }

    #[test]
    fn file_values_override_defaults() {
        let path = temp_config(
            "override",
            r#"
[data]
trades_path = "trades/2024.csv"

[analytics]
top_n = 5

[generator]
seed = 7
num_coins = 3
"#,
        );
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.data.trades_path, PathBuf::from("trades/2024.csv"));
        assert_eq!(config.data.sentiment_path, PathBuf::from("fear_greed_index.csv"));
        assert_eq!(config.analytics.top_n, 5);
        assert_eq!(config.generator.seed, Some(7));
        assert_eq!(config.generator.num_coins, 3);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let path = temp_config("invalid", "[generator]\nnum_coins = 40\n");
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
