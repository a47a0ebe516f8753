//! Pearson correlation matrix for the heatmap view.

use crate::error::Result;
use crate::utils::{float_chunked, numeric_values};
use polars::prelude::*;
use serde::Serialize;

/// Square matrix of pairwise correlations.
///
/// A cell is `None` when the pair has fewer than two complete
/// observations or when either column is constant over them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlation between two labelled columns.
    pub fn get(&self, x: &str, y: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == x)?;
        let j = self.labels.iter().position(|l| l == y)?;
        self.values[i][j]
    }
}

/// Compute the Pearson matrix over `columns`, using pairwise-complete rows.
pub fn correlation_matrix(df: &DataFrame, columns: &[String]) -> Result<CorrelationMatrix> {
    let series_values = columns
        .iter()
        .map(|name| numeric_values(df, name))
        .collect::<Result<Vec<_>>>()?;

    let size = columns.len();
    let mut values = vec![vec![None; size]; size];

    for i in 0..size {
        for j in i..size {
            let mut x = Vec::new();
            let mut y = Vec::new();
            for (a, b) in series_values[i].iter().zip(series_values[j].iter()) {
                if let (Some(a), Some(b)) = (a, b) {
                    x.push(*a);
                    y.push(*b);
                }
            }

            let estimate = if i == j {
                // a column with variance correlates perfectly with itself
                (x.len() >= 2 && varies(&x)).then_some(1.0)
            } else {
                pearson(x, y)?
            };
            values[i][j] = estimate;
            values[j][i] = estimate;
        }
    }

    Ok(CorrelationMatrix {
        labels: columns.to_vec(),
        values,
    })
}

/// Whether the values are not all equal.
fn varies(values: &[f64]) -> bool {
    let ca = float_chunked(values);
    ca.min() != ca.max()
}

/// Pearson correlation of complete pairs, `None` when it is undefined.
fn pearson(x: Vec<f64>, y: Vec<f64>) -> Result<Option<f64>> {
    if x.len() < 2 || !varies(&x) || !varies(&y) {
        return Ok(None);
    }

    let pairs = df!["x" => x, "y" => y]?;
    let out = pairs
        .lazy()
        .select([pearson_corr(col("x"), col("y")).alias("r")])
        .collect()?;
    let estimate = out.column("r")?.as_materialized_series().f64()?.get(0);

    Ok(estimate
        .filter(|r| r.is_finite())
        .map(|r| r.clamp(-1.0, 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_correlation_matrix_symmetry_and_diagonal() {
        let df = df![
            "GHI" => [100.0, 200.0, 300.0, 400.0],
            "DNI" => [50.0, 110.0, 140.0, 210.0],
            "RH" => [90.0, 70.0, 60.0, 40.0],
        ]
        .unwrap();

        let matrix = correlation_matrix(&df, &cols(&["GHI", "DNI", "RH"])).unwrap();

        assert_eq!(matrix.get("GHI", "GHI"), Some(1.0));
        assert_eq!(matrix.get("GHI", "DNI"), matrix.get("DNI", "GHI"));
        assert!(matrix.get("GHI", "DNI").unwrap() > 0.9);
        assert!(matrix.get("GHI", "RH").unwrap() < -0.9);
    }

    #[test]
    fn test_correlation_matrix_pairwise_complete() {
        let df = df![
            "GHI" => [Some(1.0), Some(2.0), Some(3.0), None],
            "Tamb" => [Some(2.0), Some(4.0), Some(6.0), Some(100.0)],
        ]
        .unwrap();

        let matrix = correlation_matrix(&df, &cols(&["GHI", "Tamb"])).unwrap();
        // the last row is ignored for this pair
        assert!((matrix.get("GHI", "Tamb").unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_matrix_constant_column() {
        let df = df![
            "GHI" => [1.0, 2.0, 3.0],
            "Precipitation" => [0.0, 0.0, 0.0],
        ]
        .unwrap();

        let matrix = correlation_matrix(&df, &cols(&["GHI", "Precipitation"])).unwrap();
        assert_eq!(matrix.get("GHI", "Precipitation"), None);
        assert_eq!(matrix.get("Precipitation", "Precipitation"), None);
    }

    #[test]
    fn test_correlation_matrix_inexact_constant_column() {
        let df = df![
            "GHI" => [1.0, 2.0, 3.0, 4.0],
            "WS" => [0.1, 0.1, 0.1, 0.1],
        ]
        .unwrap();

        let matrix = correlation_matrix(&df, &cols(&["GHI", "WS"])).unwrap();
        assert_eq!(matrix.get("GHI", "WS"), None);
        assert_eq!(matrix.get("WS", "WS"), None);
    }

    #[test]
    fn test_correlation_matrix_too_few_pairs() {
        let df = df![
            "GHI" => [Some(1.0), None, Some(3.0)],
            "DNI" => [None, Some(2.0), Some(5.0)],
        ]
        .unwrap();

        let matrix = correlation_matrix(&df, &cols(&["GHI", "DNI"])).unwrap();
        assert_eq!(matrix.get("GHI", "DNI"), None);
        assert_eq!(matrix.get("GHI", "GHI"), Some(1.0));
    }

    #[test]
    fn test_correlation_matrix_missing_column() {
        let df = df!["GHI" => [1.0, 2.0]].unwrap();
        let err = correlation_matrix(&df, &cols(&["GHI", "TModA"])).unwrap_err();
        assert!(err.is_schema_error());
    }
}
