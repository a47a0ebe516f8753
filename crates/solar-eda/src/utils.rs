//! Shared utilities for cleaning and analysis.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency.

use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use serde_json::{Map, Number, Value};

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType holds calendar timestamps (date or datetime).
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Names of all numeric columns, in frame order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

// =============================================================================
// Column Access
// =============================================================================

/// Look up a column, failing with a schema error naming it.
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| AnalysisError::ColumnNotFound(name.to_string()))
}

/// Look up a column that must hold numbers.
pub fn require_numeric_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    let column = require_column(df, name)?;
    if !is_numeric_dtype(column.dtype()) {
        return Err(AnalysisError::NonNumericColumn {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }
    Ok(column)
}

/// Read a numeric column as `f64` values.
///
/// Nulls and NaNs both come back as `None`; a NaN read from a CSV is a
/// missing reading, not a number.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = require_numeric_column(df, name)?;
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    let values = series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Read a numeric column as a `Float64` chunked array, NaNs turned into nulls.
///
/// Polars aggregations (`mean`, `median`, `std`, `min`, `max`) skip nulls, so
/// the result can be aggregated directly.
pub fn numeric_chunked(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let values = numeric_values(df, name)?;
    Ok(Float64Chunked::new(name.into(), &values))
}

/// Wrap already-present values in a chunked array for aggregation.
pub fn float_chunked(values: &[f64]) -> Float64Chunked {
    Float64Chunked::from_slice(PlSmallStr::EMPTY, values)
}

/// Count the missing (null or NaN) entries of a numeric column.
pub fn missing_count(values: &[Option<f64>]) -> usize {
    values.iter().filter(|v| v.is_none()).count()
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill missing values in a numeric Series with a specific value.
///
/// The result is always `Float64`; NaN entries are treated like nulls.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let float_series = series.cast(&DataType::Float64)?;
    let filled: Vec<Option<f64>> = float_series
        .f64()?
        .into_iter()
        .map(|v| match v {
            Some(x) if !x.is_nan() => Some(x),
            _ => Some(fill_value),
        })
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

// =============================================================================
// JSON Conversion
// =============================================================================

/// Converts a Polars `AnyValue` to a JSON `Value`.
///
/// NaN and infinite floats become `null`; dates, datetimes and other
/// complex values are stringified with their `Display` form.
pub fn any_value_to_json(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),

        AnyValue::Int8(i) => Value::Number(i.into()),
        AnyValue::Int16(i) => Value::Number(i.into()),
        AnyValue::Int32(i) => Value::Number(i.into()),
        AnyValue::Int64(i) => Value::Number(i.into()),

        AnyValue::UInt8(u) => Value::Number(u.into()),
        AnyValue::UInt16(u) => Value::Number(u.into()),
        AnyValue::UInt32(u) => Value::Number(u.into()),
        AnyValue::UInt64(u) => Value::Number(u.into()),

        AnyValue::Float32(f) => Number::from_f64(f as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        AnyValue::Float64(f) => Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),

        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),

        _ => Value::String(format!("{}", value)),
    }
}

/// Convert a frame to a list of JSON records (one object per row).
pub fn dataframe_to_records(df: &DataFrame) -> Result<Vec<Map<String, Value>>> {
    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let mut record = Map::new();
        for column in df.get_columns() {
            let value = column.get(row)?;
            record.insert(column.name().to_string(), any_value_to_json(value));
        }
        records.push(record);
    }
    Ok(records)
}

// =============================================================================
// Tests
// =============================================================================
