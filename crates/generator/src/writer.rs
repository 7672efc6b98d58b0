use crate::error::GeneratorError;
use core_types::{SentimentRecord, TradeRecord};
use serde::Serialize;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SENTIMENT_HEADER: [&str; 3] = ["date", "value", "classification"];
const TRADE_HEADER: [&str; 6] = [
    "Timestamp IST",
    "Account",
    "Coin",
    "Side",
    "Size USD",
    "Closed PnL",
];

#[derive(Serialize)]
struct TradeRow<'a> {
    #[serde(rename = "Timestamp IST")]
    timestamp: String,
    #[serde(rename = "Account")]
    account: &'a str,
    #[serde(rename = "Coin")]
    coin: &'a str,
    #[serde(rename = "Side")]
    side: &'static str,
    #[serde(rename = "Size USD")]
    size_usd: String,
    #[serde(rename = "Closed PnL")]
    closed_pnl: String,
}

#[derive(Serialize)]
struct SentimentRow {
    date: String,
    value: u8,
    classification: &'static str,
}

/// Writes `date,value,classification` rows.
pub fn write_sentiment(path: &Path, records: &[SentimentRecord]) -> Result<(), GeneratorError> {
    let mut writer = open(path, &SENTIMENT_HEADER)?;
    for record in records {
        let row = SentimentRow {
            date: record.date.to_string(),
            value: record.value,
            classification: record.classification.label(),
        };
        writer.serialize(row).map_err(|e| csv_error(path, e))?;
    }
    writer.flush().map_err(|e| io_error(path, e))
}

/// Writes trades using the exchange export's column names.
pub fn write_trades<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a TradeRecord>,
) -> Result<(), GeneratorError> {
    let mut writer = open(path, &TRADE_HEADER)?;
    for record in records {
        let row = TradeRow {
            timestamp: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            account: &record.account,
            coin: &record.coin,
            side: record.side.as_str(),
            size_usd: record.size_usd.to_string(),
            closed_pnl: record.closed_pnl.to_string(),
        };
        writer.serialize(row).map_err(|e| csv_error(path, e))?;
    }
    writer.flush().map_err(|e| io_error(path, e))
}

/// Opens `path` and writes `header` up front, so a file with no rows still carries it.
fn open(path: &Path, header: &[&str]) -> Result<csv::Writer<std::fs::File>, GeneratorError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;
    writer.write_record(header).map_err(|e| csv_error(path, e))?;
    Ok(writer)
}

fn csv_error(path: &Path, source: csv::Error) -> GeneratorError {
    GeneratorError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn io_error(path: &Path, source: std::io::Error) -> GeneratorError {
    GeneratorError::Io {
        path: path.to_path_buf(),
        source,
    }
}
