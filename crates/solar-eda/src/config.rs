//! Configuration types for the dashboard and its analyses.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sensor columns that can never legitimately hold negative readings.
pub const DEFAULT_NON_NEGATIVE_COLUMNS: [&str; 8] = [
    "GHI",
    "DNI",
    "DHI",
    "ModA",
    "ModB",
    "WS",
    "WSgust",
    "Precipitation",
];

/// Columns shown in the correlation heatmap.
pub const DEFAULT_CORRELATION_COLUMNS: [&str; 8] =
    ["GHI", "DNI", "DHI", "Tamb", "RH", "WS", "TModA", "TModB"];

/// Columns plotted as histograms.
pub const DEFAULT_HISTOGRAM_COLUMNS: [&str; 5] = ["GHI", "DNI", "DHI", "WS", "Tamb"];

/// How a missing value is judged by the non-negativity filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MissingPolicy {
    /// A missing reading fails the `>= 0` test and the row is dropped.
    #[default]
    Exclude,
    /// A missing reading passes the test; it is imputed afterwards.
    Keep,
}

/// Which standard deviation the z-score divides by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StdDevKind {
    /// Divide the squared deviations by `n` (ddof = 0).
    #[default]
    Population,
    /// Divide the squared deviations by `n - 1` (ddof = 1).
    Sample,
}

impl StdDevKind {
    /// Delta degrees of freedom for this kind.
    pub fn ddof(self) -> u8 {
        match self {
            StdDevKind::Population => 0,
            StdDevKind::Sample => 1,
        }
    }
}

/// Configuration for cleaning and analysing a sensor dataset.
///
/// Use [`DashboardConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use solar_eda::config::{DashboardConfig, MissingPolicy};
///
/// let config = DashboardConfig::builder()
///     .z_threshold(2.5)
///     .missing_policy(MissingPolicy::Keep)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Columns whose values must be `>= 0` for a row to survive cleaning.
    pub non_negative_columns: Vec<String>,

    /// How missing values are judged by the non-negativity filter.
    /// Default: Exclude
    pub missing_policy: MissingPolicy,

    /// Rows with `|z|` strictly above this value are anomalies.
    /// Default: 3.0
    pub z_threshold: f64,

    /// Standard deviation used by the z-score.
    /// Default: Population
    pub std_dev_kind: StdDevKind,

    /// Column scanned by the z-score analysis.
    /// Default: "GHI"
    pub anomaly_column: String,

    /// Column holding the observation time.
    /// Default: "Timestamp"
    pub timestamp_column: String,

    /// Columns included in the correlation heatmap.
    pub correlation_columns: Vec<String>,

    /// Columns binned by the histogram analysis.
    pub histogram_columns: Vec<String>,

    /// Number of equal-width histogram bins.
    /// Default: 30
    pub histogram_bins: usize,

    /// Number of compass sectors in the wind rose.
    /// Default: 16
    pub wind_sectors: usize,

    /// Number of wind speed classes in the wind rose.
    /// Default: 6
    pub wind_speed_bins: usize,

    /// Rows shown by the dataset preview.
    /// Default: 5
    pub preview_rows: usize,

    /// Directory the dataset catalog resolves file names against.
    /// Default: "data"
    pub data_dir: PathBuf,
}

fn owned(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            non_negative_columns: owned(&DEFAULT_NON_NEGATIVE_COLUMNS),
            missing_policy: MissingPolicy::default(),
            z_threshold: 3.0,
            std_dev_kind: StdDevKind::default(),
            anomaly_column: "GHI".to_string(),
            timestamp_column: "Timestamp".to_string(),
            correlation_columns: owned(&DEFAULT_CORRELATION_COLUMNS),
            histogram_columns: owned(&DEFAULT_HISTOGRAM_COLUMNS),
            histogram_bins: 30,
            wind_sectors: 16,
            wind_speed_bins: 6,
            preview_rows: 5,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.z_threshold.is_finite() || self.z_threshold <= 0.0 {
            return Err(ConfigValidationError::InvalidThreshold(self.z_threshold));
        }

        for (field, value) in [
            ("histogram_bins", self.histogram_bins),
            ("wind_sectors", self.wind_sectors),
            ("wind_speed_bins", self.wind_speed_bins),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::ZeroCount {
                    field: field.to_string(),
                });
            }
        }

        if self.anomaly_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyColumnName {
                field: "anomaly_column".to_string(),
            });
        }

        if self.timestamp_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyColumnName {
                field: "timestamp_column".to_string(),
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid z-score threshold: {0} (must be a positive finite number)")]
    InvalidThreshold(f64),

    #[error("Invalid value for '{field}': must be at least 1")]
    ZeroCount { field: String },

    #[error("Column name for '{field}' must not be empty")]
    EmptyColumnName { field: String },
}

/// Builder for [`DashboardConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    non_negative_columns: Option<Vec<String>>,
    missing_policy: Option<MissingPolicy>,
    z_threshold: Option<f64>,
    std_dev_kind: Option<StdDevKind>,
    anomaly_column: Option<String>,
    timestamp_column: Option<String>,
    correlation_columns: Option<Vec<String>>,
    histogram_columns: Option<Vec<String>>,
    histogram_bins: Option<usize>,
    wind_sectors: Option<usize>,
    wind_speed_bins: Option<usize>,
    preview_rows: Option<usize>,
    data_dir: Option<PathBuf>,
}

impl DashboardConfigBuilder {
    /// Set the columns that must be non-negative.
    ///
    /// Rows with a negative value in any of these columns are dropped.
    pub fn non_negative_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.non_negative_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set how missing values are judged by the non-negativity filter.
    pub fn missing_policy(mut self, policy: MissingPolicy) -> Self {
        self.missing_policy = Some(policy);
        self
    }

    /// Set the anomaly threshold on `|z|`.
    pub fn z_threshold(mut self, threshold: f64) -> Self {
        self.z_threshold = Some(threshold);
        self
    }

    /// Set the standard deviation used by the z-score.
    pub fn std_dev_kind(mut self, kind: StdDevKind) -> Self {
        self.std_dev_kind = Some(kind);
        self
    }

    /// Set the column scanned by the z-score analysis.
    pub fn anomaly_column(mut self, column: impl Into<String>) -> Self {
        self.anomaly_column = Some(column.into());
        self
    }

    /// Set the column holding the observation time.
    pub fn timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.timestamp_column = Some(column.into());
        self
    }

    /// Set the columns included in the correlation heatmap.
    pub fn correlation_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.correlation_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the columns binned by the histogram analysis.
    pub fn histogram_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.histogram_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the number of compass sectors in the wind rose.
    pub fn wind_sectors(mut self, sectors: usize) -> Self {
        self.wind_sectors = Some(sectors);
        self
    }

    /// Set the number of wind speed classes in the wind rose.
    pub fn wind_speed_bins(mut self, bins: usize) -> Self {
        self.wind_speed_bins = Some(bins);
        self
    }

    /// Set the number of rows in the dataset preview.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set the directory catalog file names are resolved against.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `DashboardConfig` or an error if validation fails.
    pub fn build(self) -> Result<DashboardConfig, ConfigValidationError> {
        let defaults = DashboardConfig::default();
        let config = DashboardConfig {
            non_negative_columns: self
                .non_negative_columns
                .unwrap_or(defaults.non_negative_columns),
            missing_policy: self.missing_policy.unwrap_or_default(),
            z_threshold: self.z_threshold.unwrap_or(defaults.z_threshold),
            std_dev_kind: self.std_dev_kind.unwrap_or_default(),
            anomaly_column: self.anomaly_column.unwrap_or(defaults.anomaly_column),
            timestamp_column: self.timestamp_column.unwrap_or(defaults.timestamp_column),
            correlation_columns: self
                .correlation_columns
                .unwrap_or(defaults.correlation_columns),
            histogram_columns: self.histogram_columns.unwrap_or(defaults.histogram_columns),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            wind_sectors: self.wind_sectors.unwrap_or(defaults.wind_sectors),
            wind_speed_bins: self.wind_speed_bins.unwrap_or(defaults.wind_speed_bins),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.non_negative_columns.len(), 8);
        assert!(config.non_negative_columns.contains(&"Precipitation".to_string()));
        assert_eq!(config.missing_policy, MissingPolicy::Exclude);
        assert_eq!(config.z_threshold, 3.0);
        assert_eq!(config.std_dev_kind, StdDevKind::Population);
        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.anomaly_column, "GHI");
    }

    #[test]
    fn test_builder_custom_values() {
        let config = DashboardConfig::builder()
            .non_negative_columns(["GHI", "DNI"])
            .missing_policy(MissingPolicy::Keep)
            .z_threshold(2.0)
            .std_dev_kind(StdDevKind::Sample)
            .histogram_bins(10)
            .data_dir("/tmp/solar")
            .build()
            .unwrap();

        assert_eq!(config.non_negative_columns, vec!["GHI", "DNI"]);
        assert_eq!(config.missing_policy, MissingPolicy::Keep);
        assert_eq!(config.z_threshold, 2.0);
        assert_eq!(config.std_dev_kind.ddof(), 1);
        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/solar"));
        // untouched fields keep their defaults
        assert_eq!(config.wind_sectors, 16);
    }

    #[test]
    fn test_validation_invalid_threshold() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = DashboardConfig::builder().z_threshold(bad).build();
            assert!(matches!(
                result.unwrap_err(),
                ConfigValidationError::InvalidThreshold(_)
            ));
        }
    }

    #[test]
    fn test_validation_zero_bins() {
        let result = DashboardConfig::builder().histogram_bins(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::ZeroCount { field } if field == "histogram_bins"
        ));

        let result = DashboardConfig::builder().wind_sectors(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_empty_anomaly_column() {
        let result = DashboardConfig::builder().anomaly_column("  ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyColumnName { .. }
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "non_negative_columns": ["GHI"],
            "missing_policy": "Keep",
            "z_threshold": 2.5,
            "std_dev_kind": "Sample",
            "anomaly_column": "DNI",
            "timestamp_column": "Time",
            "correlation_columns": ["GHI", "DNI"],
            "histogram_columns": ["GHI"],
            "histogram_bins": 12,
            "wind_sectors": 8,
            "wind_speed_bins": 4,
            "preview_rows": 10,
            "data_dir": "datasets"
        }"#;

        let config: DashboardConfig = serde_json::from_str(json).expect("valid config JSON");
        assert_eq!(config.missing_policy, MissingPolicy::Keep);
        assert_eq!(config.std_dev_kind, StdDevKind::Sample);
        assert_eq!(config.anomaly_column, "DNI");
        assert_eq!(config.wind_sectors, 8);
        assert!(config.validate().is_ok());
    }
}
