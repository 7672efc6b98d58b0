use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error(
        "Input file '{}' was not found. Place 'fear_greed_index.csv' and 'historical_data.csv' \
         next to the binary, set [data] paths in config.toml, or run the `generate` command.",
        path.display()
    )]
    Missing { path: PathBuf },

    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV '{}' (check the header names): {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed row in '{}' at line {line}: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Value out of range in '{}' at line {line}: {reason}", path.display())]
    OutOfRange {
        path: PathBuf,
        line: u64,
        reason: String,
    },
}
