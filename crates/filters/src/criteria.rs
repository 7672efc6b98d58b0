use crate::error::FilterError;
use chrono::NaiveDate;
use core_types::{Classification, JoinedRecord};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::str::FromStr;

/// The text a UI sends to mean "do not filter on this dimension".
pub const ALL: &str = "All";

/// One dimension of the filter: either everything, or a single value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T> Selection<T> {
    /// Whether `value` passes this predicate. `All` admits everything.
    pub fn admits<U>(&self, value: &U) -> bool
    where
        T: Borrow<U>,
        U: PartialEq + ?Sized,
    {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => <T as Borrow<U>>::borrow(wanted) == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

fn means_all(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text.eq_ignore_ascii_case(ALL)
}

impl Selection<Classification> {
    /// Parses a sentiment selector: `All` (or empty) or one of the five labels.
    pub fn parse_sentiment(text: &str) -> Result<Self, FilterError> {
        if means_all(text) {
            return Ok(Selection::All);
        }
        Classification::from_str(text)
            .map(Selection::Only)
            .map_err(|_| FilterError::UnknownClassification(text.trim().to_string()))
    }
}

impl Selection<String> {
    /// Parses a coin selector: `All` (or empty) or a symbol, matched exactly.
    pub fn parse_coin(text: &str) -> Self {
        if means_all(text) {
            Selection::All
        } else {
            Selection::Only(text.trim().to_string())
        }
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, FilterError> {
        if start > end {
            return Err(FilterError::InvertedDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds a range where a missing bound is left open.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Option<Self>, FilterError> {
        match (start, end) {
            (None, None) => Ok(None),
            (start, end) => Self::new(
                start.unwrap_or(NaiveDate::MIN),
                end.unwrap_or(NaiveDate::MAX),
            )
            .map(Some),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The user's current filter: sentiment, date range and coin.
///
/// Each dimension is independent; a row passes when it satisfies every
/// active predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub sentiment: Selection<Classification>,
    pub date_range: Option<DateRange>,
    pub coin: Selection<String>,
}

impl FilterCriteria {
    /// A filter that lets every row through.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_sentiment(mut self, classification: Classification) -> Self {
        self.sentiment = Selection::Only(classification);
        self
    }

    pub fn with_coin(mut self, coin: impl Into<String>) -> Self {
        self.coin = Selection::Only(coin.into());
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn matches(&self, row: &JoinedRecord) -> bool {
        self.sentiment.admits(&row.classification)
            && self
                .date_range
                .is_none_or(|range| range.contains(row.date()))
            && self.coin.admits(row.coin())
    }

    /// Returns an owned copy of the matching rows, in input order.
    ///
    /// An empty result is valid output.
    pub fn apply(&self, rows: &[JoinedRecord]) -> Vec<JoinedRecord> {
        let filtered: Vec<JoinedRecord> = rows
            .iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect();

        tracing::debug!(
            input = rows.len(),
            output = filtered.len(),
            sentiment = ?self.sentiment,
            coin = ?self.coin,
            "Applied filter."
        );
        filtered
    }
}

/// Raw filter parameters as they arrive from a query string or the CLI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    pub sentiment: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub coin: Option<String>,
}

impl TryFrom<FilterParams> for FilterCriteria {
    type Error = FilterError;

    fn try_from(params: FilterParams) -> Result<Self, Self::Error> {
        let sentiment = match params.sentiment.as_deref() {
            Some(text) => Selection::parse_sentiment(text)?,
            None => Selection::All,
        };
        let coin = params
            .coin
            .as_deref()
            .map(Selection::parse_coin)
            .unwrap_or_default();
        let start = params.start.as_deref().map(parse_date).transpose()?.flatten();
        let end = params.end.as_deref().map(parse_date).transpose()?.flatten();

        Ok(Self {
            sentiment,
            date_range: DateRange::from_bounds(start, end)?,
            coin,
        })
    }
}

// Empty strings count as "not given".
fn parse_date(text: &str) -> Result<Option<NaiveDate>, FilterError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FilterError::InvalidDate(text.to_string()))
}
