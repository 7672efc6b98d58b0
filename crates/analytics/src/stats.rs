//! Small numeric helpers shared by the metric tables.

use core_types::{JoinedRecord, Side};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Running sums over one group of trades.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Tally {
    pub count: usize,
    pub wins: usize,
    pub losses: usize,
    pub buys: usize,
    pub sells: usize,
    pub pnl: Decimal,
    pub loss_pnl: Decimal,
    pub size: Decimal,
}

impl Tally {
    pub fn add(&mut self, row: &JoinedRecord) {
        self.count += 1;
        self.pnl += row.closed_pnl();
        self.size += row.size_usd();
        if row.is_win() {
            self.wins += 1;
        }
        if row.is_loss() {
            self.losses += 1;
            self.loss_pnl += row.closed_pnl();
        }
        match row.side() {
            Side::Buy => self.buys += 1,
            Side::Sell => self.sells += 1,
        }
    }

    pub fn of<'a>(rows: impl IntoIterator<Item = &'a JoinedRecord>) -> Self {
        let mut tally = Self::default();
        for row in rows {
            tally.add(row);
        }
        tally
    }

    pub fn mean_pnl(&self) -> Option<Decimal> {
        ratio(self.pnl, self.count)
    }

    pub fn mean_size(&self) -> Option<Decimal> {
        ratio(self.size, self.count)
    }

    pub fn win_rate_pct(&self) -> Option<Decimal> {
        percentage(self.wins, self.count)
    }

    pub fn mean_loss(&self) -> Decimal {
        ratio(self.loss_pnl, self.losses).unwrap_or(Decimal::ZERO)
    }

    pub fn long_short_ratio(&self) -> Option<Decimal> {
        if self.sells == 0 {
            return None;
        }
        Some(Decimal::from(self.buys) / Decimal::from(self.sells))
    }
}

/// `sum / count`, or `None` for an empty group.
pub(crate) fn ratio(sum: Decimal, count: usize) -> Option<Decimal> {
    if count == 0 {
        return None;
    }
    Some(sum / Decimal::from(count))
}

/// `100 * part / whole`, or `None` when `whole` is zero.
pub(crate) fn percentage(part: usize, whole: usize) -> Option<Decimal> {
    if whole == 0 {
        return None;
    }
    Some(Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole))
}

pub(crate) fn mean(values: &[Decimal]) -> Option<Decimal> {
    ratio(values.iter().copied().sum(), values.len())
}

/// Median with the two middle values averaged for an even count.
pub(crate) fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / Decimal::TWO)
    } else {
        Some(sorted[mid])
    }
}

/// Groups rows by `key`, keeping input order inside each group.
pub(crate) fn group_by<'a, K, F>(rows: &'a [JoinedRecord], key: F) -> BTreeMap<K, Vec<&'a JoinedRecord>>
where
    K: Ord,
    F: Fn(&'a JoinedRecord) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a JoinedRecord>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(row);
    }
    groups
}

/// True when at least two of `values` differ. Empty and single-value input never varies.
pub(crate) fn varies<T: PartialEq>(values: impl IntoIterator<Item = T>) -> bool {
    let mut values = values.into_iter();
    match values.next() {
        Some(first) => values.any(|v| v != first),
        None => false,
    }
}

pub(crate) fn variance_sum(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean) * (v - mean)).sum()
}

/// Pearson correlation of two equally long samples.
///
/// Returns `NaN` for fewer than two points or when either sample has zero variance.
pub(crate) fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return f64::NAN;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let var_x = variance_sum(xs, mean_x);
    let var_y = variance_sum(ys, mean_y);
    if var_x <= 0.0 || var_y <= 0.0 {
        return f64::NAN;
    }

    let covariance: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    (covariance / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}
