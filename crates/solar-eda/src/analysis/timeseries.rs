//! Time-ordered series of one sensor column.

use crate::error::{AnalysisError, Result};
use crate::utils::{is_datetime_dtype, numeric_values, require_column};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::Serialize;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub column: String,
    pub points: Vec<TimePoint>,
}

/// Parse a timestamp as written in the sensor exports.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Read a timestamp column as naive datetimes.
///
/// Date and datetime columns are read directly; anything else is parsed from
/// its text form. A present value that cannot be parsed is an error.
fn read_timestamps(df: &DataFrame, column: &str) -> Result<Vec<Option<NaiveDateTime>>> {
    let stamps = require_column(df, column)?.as_materialized_series();

    if is_datetime_dtype(stamps.dtype()) {
        let millis = stamps
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
            .cast(&DataType::Int64)?;
        return Ok(millis
            .i64()?
            .into_iter()
            .map(|ms| ms.and_then(DateTime::from_timestamp_millis).map(|dt| dt.naive_utc()))
            .collect());
    }

    let text = stamps.cast(&DataType::String)?;
    text.str()?
        .into_iter()
        .map(|raw| match raw {
            None => Ok(None),
            Some(raw) => parse_timestamp(raw).map(Some).ok_or_else(|| {
                AnalysisError::InvalidTimestamp {
                    column: column.to_string(),
                    value: raw.to_string(),
                }
            }),
        })
        .collect()
}

/// Build the series of `value_column` ordered by `timestamp_column`.
///
/// Rows with a missing timestamp or value are skipped.
pub fn time_series(
    df: &DataFrame,
    timestamp_column: &str,
    value_column: &str,
) -> Result<TimeSeries> {
    let stamps = read_timestamps(df, timestamp_column)?;
    let values = numeric_values(df, value_column)?;

    let mut points: Vec<TimePoint> = stamps
        .into_iter()
        .zip(values)
        .filter_map(|(timestamp, value)| Some(TimePoint {
            timestamp: timestamp?,
            value: value?,
        }))
        .collect();

    points.sort_by_key(|p| p.timestamp);

    Ok(TimeSeries {
        column: value_column.to_string(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 8, 9)
            .unwrap()
            .and_hms_opt(0, 1, 0)
            .unwrap();

        assert_eq!(parse_timestamp("2021-08-09 00:01"), Some(expected));
        assert_eq!(parse_timestamp("2021-08-09 00:01:00"), Some(expected));
        assert_eq!(parse_timestamp("2021-08-09T00:01:00.000"), Some(expected));
        assert!(parse_timestamp("2021-08-09").is_some());
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_time_series_sorted_and_skips_missing() {
        let df = df![
            "Timestamp" => [Some("2021-08-09 00:03"), Some("2021-08-09 00:01"), None, Some("2021-08-09 00:02")],
            "GHI" => [Some(3.0), Some(1.0), Some(9.0), None],
        ]
        .unwrap();

        let series = time_series(&df, "Timestamp", "GHI").unwrap();

        let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 3.0]);
        assert!(series.points[0].timestamp < series.points[1].timestamp);
    }

    #[test]
    fn test_time_series_invalid_timestamp() {
        let df = df![
            "Timestamp" => ["2021-08-09 00:01", "not a time"],
            "GHI" => [1.0, 2.0],
        ]
        .unwrap();

        let err = time_series(&df, "Timestamp", "GHI").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidTimestamp { ref value, .. } if value == "not a time"));
    }

    #[test]
    fn test_time_series_native_datetime_column() {
        let day = NaiveDate::from_ymd_opt(2021, 8, 9).unwrap();
        let early = day.and_hms_opt(6, 0, 0).unwrap();
        let late = day.and_hms_opt(6, 30, 0).unwrap();

        let df = DataFrame::new(vec![
            Series::new("Timestamp".into(), &[late, early]).into(),
            Series::new("GHI".into(), &[250.0, 120.0]).into(),
        ])
        .unwrap();
        assert!(matches!(df.column("Timestamp").unwrap().dtype(), DataType::Datetime(_, _)));

        let series = time_series(&df, "Timestamp", "GHI").unwrap();
        let points: Vec<(NaiveDateTime, f64)> =
            series.points.iter().map(|p| (p.timestamp, p.value)).collect();
        assert_eq!(points, vec![(early, 120.0), (late, 250.0)]);
    }

    #[test]
    fn test_time_series_native_date_column() {
        let first = NaiveDate::from_ymd_opt(2021, 8, 9).unwrap();
        let second = NaiveDate::from_ymd_opt(2021, 8, 10).unwrap();

        let df = DataFrame::new(vec![
            Series::new("Timestamp".into(), &[second, first]).into(),
            Series::new("GHI".into(), &[Some(5.0), Some(4.0)]).into(),
        ])
        .unwrap();

        let series = time_series(&df, "Timestamp", "GHI").unwrap();
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].timestamp, first.and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(series.points[1].value, 5.0);
    }

    #[test]
    fn test_time_series_missing_timestamp_column() {
        let df = df!["GHI" => [1.0]].unwrap();
        assert!(time_series(&df, "Timestamp", "GHI").unwrap_err().is_schema_error());
    }
}
