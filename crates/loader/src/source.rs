use crate::error::DataLoadError;
use chrono::{NaiveDate, NaiveDateTime};
use core_types::{Classification, SentimentRecord, Side, TradeRecord};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

/// Timestamp layouts accepted for the `Timestamp IST` column, tried in order.
const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

// Raw rows keep every field as text so parse failures can be reported with a line number.
#[derive(Debug, Deserialize)]
struct RawSentimentRow {
    date: String,
    value: String,
    classification: String,
}

#[derive(Debug, Deserialize)]
struct RawTradeRow {
    #[serde(rename = "Timestamp IST")]
    timestamp: String,
    #[serde(rename = "Account")]
    account: String,
    #[serde(rename = "Coin")]
    coin: String,
    #[serde(rename = "Side")]
    side: String,
    #[serde(rename = "Size USD")]
    size_usd: String,
    #[serde(rename = "Closed PnL")]
    closed_pnl: String,
}

/// Reads and validates the Fear & Greed index file.
pub fn read_sentiment(path: &Path) -> Result<Vec<SentimentRecord>, DataLoadError> {
    let rows: Vec<(u64, RawSentimentRow)> = read_rows(path)?;
    let mut records = Vec::with_capacity(rows.len());

    for (line, raw) in rows {
        let malformed = |reason: String| DataLoadError::Malformed {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let date = parse_date(&raw.date).map_err(malformed)?;
        let value: i64 = raw
            .value
            .trim()
            .parse()
            .map_err(|_| malformed(format!("index value '{}' is not an integer", raw.value)))?;
        if !(0..=100).contains(&value) {
            return Err(DataLoadError::OutOfRange {
                path: path.to_path_buf(),
                line,
                reason: format!("index value {} is outside [0, 100]", value),
            });
        }
        let classification = Classification::from_str(&raw.classification)
            .map_err(|e| malformed(e.to_string()))?;

        records.push(SentimentRecord {
            date,
            value: value as u8,
            classification,
        });
    }

    tracing::info!(path = %path.display(), rows = records.len(), "Loaded sentiment index.");
    Ok(records)
}

/// Reads and validates the trade log.
pub fn read_trades(path: &Path) -> Result<Vec<TradeRecord>, DataLoadError> {
    let rows: Vec<(u64, RawTradeRow)> = read_rows(path)?;
    let mut records = Vec::with_capacity(rows.len());

    for (line, raw) in rows {
        let malformed = |reason: String| DataLoadError::Malformed {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let timestamp = parse_timestamp(&raw.timestamp).map_err(malformed)?;
        let side = Side::from_str(&raw.side).map_err(|e| malformed(e.to_string()))?;
        let size_usd = parse_decimal(&raw.size_usd).map_err(malformed)?;
        let closed_pnl = parse_decimal(&raw.closed_pnl).map_err(malformed)?;
        if size_usd < Decimal::ZERO {
            return Err(DataLoadError::OutOfRange {
                path: path.to_path_buf(),
                line,
                reason: format!("position size {} is negative", size_usd),
            });
        }

        records.push(TradeRecord {
            timestamp,
            account: raw.account.trim().to_string(),
            coin: raw.coin.trim().to_string(),
            side,
            size_usd,
            closed_pnl,
        });
    }

    tracing::info!(path = %path.display(), rows = records.len(), "Loaded trade log.");
    Ok(records)
}

/// Parses a trade timestamp in any of the accepted layouts.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, String> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .ok_or_else(|| format!("timestamp '{}' is not in YYYY-MM-DD HH:MM:SS form", text))
}

pub fn parse_date(text: &str) -> Result<NaiveDate, String> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| format!("date '{}' is not in YYYY-MM-DD form", text))
}

/// Parses a decimal amount, accepting scientific notation as written by spreadsheet tools.
pub fn parse_decimal(text: &str) -> Result<Decimal, String> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| format!("'{}' is not a decimal number", text))
}

/// Opens `path` and deserializes every row, pairing it with its 1-based line number.
fn read_rows<T>(path: &Path) -> Result<Vec<(u64, T)>, DataLoadError>
where
    T: DeserializeOwned,
{
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => DataLoadError::Missing {
            path: path.to_path_buf(),
        },
        _ => DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let csv_error = |source: csv::Error| DataLoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(file);
    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: T = record.deserialize(Some(&headers)).map_err(csv_error)?;
        rows.push((line, row));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accepts_the_documented_timestamp_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 2)
            .unwrap()
            .and_hms_opt(22, 50, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-12-02 22:50:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-12-02T22:50:00").unwrap(), expected);
        assert_eq!(parse_timestamp("02-12-2024 22:50").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn decimals_accept_scientific_notation() {
        assert_eq!(parse_decimal(" -50.25 ").unwrap(), dec!(-50.25));
        assert_eq!(parse_decimal("1e-2").unwrap(), dec!(0.01));
        assert!(parse_decimal("ten").is_err());
    }

    #[test]
    fn dates_must_be_iso() {
        assert_eq!(
            parse_date("2024-01-31").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        assert!(parse_date("31/01/2024").is_err());
    }
}
