//! Random draws for the synthetic dataset.

use crate::error::GeneratorError;
use chrono::{Duration, NaiveDate, NaiveTime};
use core_types::{Classification, SentimentRecord, Side, TradeRecord};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Coins a generated trade can be on; the first `num_coins` are used.
pub const COINS: [&str; 15] = [
    "BTC", "ETH", "SOL", "AVAX", "MATIC", "LINK", "UNI", "AAVE", "DOT", "ADA", "XRP", "DOGE",
    "SHIB", "APT", "ARB",
];

/// Daily probability of each classification, in `Classification::ALL` order.
pub const CLASSIFICATION_WEIGHTS: [f64; 5] = [0.15, 0.30, 0.20, 0.25, 0.10];

const WIN_PROBABILITY: f64 = 0.42;
const WIN_SCALE: f64 = 150.0;
const LOSS_SCALE: f64 = 120.0;
const PNL_FLOOR: f64 = 10.0;

const SIZE_MU: f64 = 8.0;
const SIZE_SIGMA: f64 = 1.2;
const MIN_SIZE: f64 = 100.0;
const MAX_SIZE: f64 = 50_000.0;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// One index row per day for `days` days, the last one being the day before `today`.
pub fn sentiment_days<R: Rng + ?Sized>(
    rng: &mut R,
    days: u32,
    today: NaiveDate,
) -> Result<Vec<SentimentRecord>, GeneratorError> {
    let weights = WeightedIndex::new(CLASSIFICATION_WEIGHTS)
        .map_err(|e| GeneratorError::InvalidParameters(e.to_string()))?;
    let start = first_day(days, today);

    let records: Vec<SentimentRecord> = (0..i64::from(days))
        .map(|offset| {
            let classification = Classification::ALL[weights.sample(rng)];
            let (low, high) = classification.value_band();
            SentimentRecord {
                date: start + Duration::days(offset),
                value: rng.gen_range(low..high),
                classification,
            }
        })
        .collect();
    Ok(records)
}

/// The first day of a `days`-long window ending yesterday.
pub fn first_day(days: u32, today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(days))
}

/// `0x` followed by 40 lowercase hex digits.
pub fn account_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let digits: String = (0..40)
        .map(|_| char::from(HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())]))
        .collect();
    format!("0x{digits}")
}

/// A single trade somewhere inside the `days` window starting at `start`.
pub fn trade<R: Rng + ?Sized>(
    rng: &mut R,
    accounts: &[String],
    coins: &[&str],
    start: NaiveDate,
    days: u32,
) -> TradeRecord {
    let timestamp = start.and_time(NaiveTime::MIN)
        + Duration::days(rng.gen_range(0..i64::from(days)))
        + Duration::hours(rng.gen_range(0..24))
        + Duration::minutes(rng.gen_range(0..60));

    let account = accounts[rng.gen_range(0..accounts.len())].clone();
    let coin = coins[rng.gen_range(0..coins.len())].to_string();
    let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };

    let size = lognormal(rng, SIZE_MU, SIZE_SIGMA).clamp(MIN_SIZE, MAX_SIZE);
    let pnl = if rng.gen_bool(WIN_PROBABILITY) {
        exponential(rng, WIN_SCALE) + PNL_FLOOR
    } else {
        -(exponential(rng, LOSS_SCALE) + PNL_FLOOR)
    };

    TradeRecord {
        timestamp,
        account,
        coin,
        side,
        size_usd: cents(size),
        closed_pnl: cents(pnl),
    }
}

/// Uniform draw on `(0, 1]`, safe to take the logarithm of.
fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    1.0 - rng.gen_range(0.0..1.0)
}

fn exponential<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> f64 {
    -scale * open_unit(rng).ln()
}

// Box-Muller.
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let radius = (-2.0 * open_unit(rng).ln()).sqrt();
    let angle = 2.0 * std::f64::consts::PI * rng.gen_range(0.0..1.0);
    radius * angle.cos()
}

fn lognormal<R: Rng + ?Sized>(rng: &mut R, mu: f64, sigma: f64) -> f64 {
    (mu + sigma * standard_normal(rng)).exp()
}

fn cents(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default().round_dp(2)
}
