//! Equal-width histograms for numeric sensor columns.

use crate::error::Result;
use crate::utils::{float_chunked, numeric_values};
use polars::prelude::*;
use serde::Serialize;

/// One histogram bin; `end` is exclusive except for the last bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Histogram of one column, missing values dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
    pub missing: usize,
}

impl Histogram {
    /// Number of values counted.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Bin `values` into `bins` equal-width intervals spanning their range.
///
/// A constant sample is spread over `[v - 0.5, v + 0.5]`.
pub fn build_histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let ca = float_chunked(values);
    let (Some(min), Some(max)) = (ca.min(), ca.max()) else {
        return Vec::new();
    };
    let bin_count = bins.max(1);

    let (low, high) = if max == min {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (high - low) / bin_count as f64;
    let mut counts = vec![0usize; bin_count];

    for value in values {
        let mut index = ((value - low) / width) as usize;
        if index >= bin_count {
            index = bin_count - 1;
        }
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: low + idx as f64 * width,
            end: if idx + 1 == bin_count {
                high
            } else {
                low + (idx as f64 + 1.0) * width
            },
            count,
        })
        .collect()
}

/// Histogram of a named column of `df`.
pub fn column_histogram(df: &DataFrame, column: &str, bins: usize) -> Result<Histogram> {
    let values = numeric_values(df, column)?;
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    Ok(Histogram {
        column: column.to_string(),
        missing: values.len() - present.len(),
        bins: build_histogram(&present, bins),
    })
}
