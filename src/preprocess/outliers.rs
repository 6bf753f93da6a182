//! IQR-based outlier removal
//!
//! Bounds follow the interquartile-range rule: [Q1 - 1.5*IQR, Q3 + 1.5*IQR],
//! with linearly interpolated quantiles. The training pipeline applies the
//! filter one column at a time, recomputing bounds on the already-filtered
//! table; that order-dependence is part of the trained model's identity and
//! must not be "fixed".

use crate::data::RawTable;

/// Inclusive keep-range for one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierBounds {
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Linearly interpolated quantile of a sorted slice
///
/// Matches the interpolation used when the bounds were first derived for this
/// dataset, so the same rows survive cleaning.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    assert!(!sorted.is_empty(), "quantile of empty slice");
    assert!((0.0..=1.0).contains(&q), "quantile out of range");

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// IQR bounds over the numeric values of a sample; None when empty
pub fn iqr_bounds(values: &[f64]) -> Option<OutlierBounds> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("NaN in quantile input"));

    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;

    Some(OutlierBounds {
        lower: q1 - 1.5 * iqr,
        upper: q3 + 1.5 * iqr,
    })
}

/// Remove rows whose value in `column` falls outside the IQR bounds
///
/// Bounds are computed from the column's current numeric values. Rows whose
/// cell is missing or non-numeric fail the range test and are removed along
/// with the outliers. Returns the number of rows removed, or None when the
/// column does not exist.
pub fn filter_column(table: &mut RawTable, column: &str) -> Option<usize> {
    let idx = table.column_index(column)?;

    let values: Vec<f64> = table
        .numeric_column(column)?
        .into_iter()
        .flatten()
        .collect();

    let before = table.n_rows();
    match iqr_bounds(&values) {
        Some(bounds) => {
            table.retain_rows(|row| {
                row[idx]
                    .as_number()
                    .map(|v| bounds.contains(v))
                    .unwrap_or(false)
            });
        }
        // No numeric values at all: every row fails the range test.
        None => table.retain_rows(|_| false),
    }

    Some(before - table.n_rows())
}
