//! Custom error types for the solar EDA toolkit.
//!
//! This module provides a single error hierarchy using `thiserror`.
//! Every failure in the cleaner, the anomaly detector and the analyses is
//! returned to the caller through [`AnalysisError`]; nothing is logged and
//! swallowed inside the library.
//!
//! Errors are serializable so the presentation layer (the CLI's `--json`
//! mode, or any other front end) can forward them as `{code, message}`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for cleaning and analysis operations.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Column exists but does not hold numeric values.
    #[error("Column '{column}' has type {dtype}, expected a numeric column")]
    NonNumericColumn { column: String, dtype: String },

    /// The input cannot support the requested statistic.
    #[error("Degenerate input in column '{column}': {reason}")]
    DegenerateInput { column: String, reason: String },

    /// A timestamp cell could not be parsed.
    #[error("Cannot parse timestamp '{value}' in column '{column}'")]
    InvalidTimestamp { column: String, value: String },

    /// Named dataset is not part of the catalog.
    #[error("Unknown dataset '{0}'")]
    UnknownDataset(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for a [`AnalysisError::DegenerateInput`].
    pub fn degenerate(column: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::DegenerateInput {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Get error code for front-end handling.
    ///
    /// Both missing and mistyped columns report `SCHEMA_ERROR`: from the
    /// caller's point of view the dataset does not have the expected shape.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) | Self::NonNumericColumn { .. } => "SCHEMA_ERROR",
            Self::DegenerateInput { .. } => "DEGENERATE_INPUT",
            Self::InvalidTimestamp { .. } => "INVALID_TIMESTAMP",
            Self::UnknownDataset(_) => "UNKNOWN_DATASET",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error means the dataset lacks an expected column shape.
    pub fn is_schema_error(&self) -> bool {
        self.error_code() == "SCHEMA_ERROR"
    }

    /// Check if this error means the data cannot support the statistic.
    ///
    /// Callers of the anomaly detector typically report "no anomalies" for
    /// these instead of failing the whole view.
    pub fn is_degenerate(&self) -> bool {
        self.error_code() == "DEGENERATE_INPUT"
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}
