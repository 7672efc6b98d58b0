use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of coin symbols the generator knows about.
pub const MAX_GENERATED_COINS: usize = 15;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSources,
    pub server: Server,
    pub analytics: AnalyticsSettings,
    pub generator: GeneratorSettings,
    pub logging: Logging,
}

impl Config {
    /// Checks the cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analytics.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "analytics.top_n must be greater than 0".to_string(),
            ));
        }
        self.generator.validate()
    }
}

/// Locations of the two input files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSources {
    /// The daily Fear & Greed index (`date,value,classification`).
    pub sentiment_path: PathBuf,
    /// The trade log (`Timestamp IST,Account,Coin,Side,Size USD,Closed PnL`).
    pub trades_path: PathBuf,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            sentiment_path: PathBuf::from("fear_greed_index.csv"),
            trades_path: PathBuf::from("historical_data.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Knobs of the metrics engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// How many rows the "top accounts" and "top coins" tables keep.
    pub top_n: usize,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

/// Parameters for the synthetic data generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub days: u32,
    pub num_trades: usize,
    pub num_accounts: usize,
    pub num_coins: usize,
    /// Fixes the random stream so two runs write identical files.
    pub seed: Option<u64>,
    pub output_dir: PathBuf,
}

impl GeneratorSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.days == 0 {
            return Err(ConfigError::ValidationError(
                "generator.days must be greater than 0".to_string(),
            ));
        }
        if self.num_accounts == 0 {
            return Err(ConfigError::ValidationError(
                "generator.num_accounts must be greater than 0".to_string(),
            ));
        }
        if self.num_coins == 0 || self.num_coins > MAX_GENERATED_COINS {
            return Err(ConfigError::ValidationError(format!(
                "generator.num_coins must be between 1 and {}",
                MAX_GENERATED_COINS
            )));
        }
        Ok(())
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            days: 365,
            num_trades: 50_000,
            num_accounts: 20,
            num_coins: MAX_GENERATED_COINS,
            seed: None,
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_generator_script() {
        let config = Config::default();
        assert_eq!(config.generator.days, 365);
        assert_eq!(config.generator.num_trades, 50_000);
        assert_eq!(config.generator.num_accounts, 20);
        assert_eq!(config.generator.num_coins, 15);
        assert_eq!(config.data.trades_path, PathBuf::from("historical_data.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_top_n() {
        let mut config = Config::default();
        config.analytics.top_n = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_more_coins_than_known() {
        let mut config = Config::default();
        config.generator.num_coins = 16;
        assert!(config.validate().is_err());
    }
}
