use chrono::NaiveDate;
use core_types::{Classification, JoinedRecord};
use serde::Serialize;
use std::collections::BTreeSet;

/// The choices a UI can offer for each filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Classifications present in the data, fear to greed.
    pub sentiments: Vec<Classification>,
    /// Coin symbols present in the data, sorted.
    pub coins: Vec<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}

impl FilterOptions {
    pub fn from_rows(rows: &[JoinedRecord]) -> Self {
        let sentiments: BTreeSet<Classification> = rows.iter().map(|r| r.classification).collect();
        let coins: BTreeSet<&str> = rows.iter().map(|r| r.coin()).collect();

        Self {
            sentiments: sentiments.into_iter().collect(),
            coins: coins.into_iter().map(str::to_string).collect(),
            min_date: rows.iter().map(|r| r.date()).min(),
            max_date: rows.iter().map(|r| r.date()).max(),
        }
    }
}
