//! Row filter for sensor columns that must never be negative.

use crate::config::MissingPolicy;
use crate::error::Result;
use crate::utils::numeric_values;
use polars::prelude::*;

/// Build a mask that is `true` for rows where every listed column is `>= 0`.
///
/// Every column must exist and be numeric. Missing readings are judged by
/// `policy`.
pub(crate) fn non_negative_mask(
    df: &DataFrame,
    columns: &[String],
    policy: MissingPolicy,
) -> Result<BooleanChunked> {
    let mut keep = vec![true; df.height()];

    for name in columns {
        let values = numeric_values(df, name)?;
        for (row, value) in values.into_iter().enumerate() {
            let passes = match value {
                Some(v) => v >= 0.0,
                None => policy == MissingPolicy::Keep,
            };
            keep[row] &= passes;
        }
    }

    Ok(BooleanChunked::from_slice("non_negative".into(), &keep))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    fn mask_values(mask: &BooleanChunked) -> Vec<bool> {
        mask.into_iter().map(|v| v.unwrap_or(false)).collect()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mask_rejects_negative_in_any_column() {
        let df = df![
            "GHI" => [1.0, -0.1, 3.0],
            "WS" => [0.0, 1.0, -2.0],
        ]
        .unwrap();

        let mask = non_negative_mask(&df, &cols(&["GHI", "WS"]), MissingPolicy::Exclude).unwrap();
        assert_eq!(mask_values(&mask), vec![true, false, false]);
    }

    #[test]
    fn test_mask_zero_is_valid() {
        let df = df!["Precipitation" => [0.0, 0.0]].unwrap();
        let mask =
            non_negative_mask(&df, &cols(&["Precipitation"]), MissingPolicy::Exclude).unwrap();
        assert_eq!(mask_values(&mask), vec![true, true]);
    }

    #[test]
    fn test_mask_missing_policy() {
        let df = df!["DNI" => [Some(1.0), None, Some(f64::NAN)]].unwrap();

        let excluded = non_negative_mask(&df, &cols(&["DNI"]), MissingPolicy::Exclude).unwrap();
        assert_eq!(mask_values(&excluded), vec![true, false, false]);

        let kept = non_negative_mask(&df, &cols(&["DNI"]), MissingPolicy::Keep).unwrap();
        assert_eq!(mask_values(&kept), vec![true, true, true]);
    }

    #[test]
    fn test_mask_integer_columns() {
        let df = df!["ModA" => [-1i64, 0, 5]].unwrap();
        let mask = non_negative_mask(&df, &cols(&["ModA"]), MissingPolicy::Exclude).unwrap();
        assert_eq!(mask_values(&mask), vec![false, true, true]);
    }

    #[test]
    fn test_mask_missing_column() {
        let df = df!["GHI" => [1.0]].unwrap();
        let err = non_negative_mask(&df, &cols(&["WSgust"]), MissingPolicy::Exclude).unwrap_err();
        assert!(matches!(err, AnalysisError::ColumnNotFound(ref c) if c == "WSgust"));
    }

    #[test]
    fn test_mask_string_column() {
        let df = df!["WS" => ["1.0", "2.0"]].unwrap();
        let err = non_negative_mask(&df, &cols(&["WS"]), MissingPolicy::Exclude).unwrap_err();
        assert!(matches!(err, AnalysisError::NonNumericColumn { .. }));
    }
}
