//! Dashboard session: one loaded, cleaned dataset plus its settings.
//!
//! The session replaces process-wide UI state. A front end keeps one
//! [`Dashboard`] per selected dataset and passes the menu choice into
//! [`Dashboard::run`].

use crate::analysis::{Analysis, AnalysisOutput, run_analysis};
use crate::cleaner::DataCleaner;
use crate::config::DashboardConfig;
use crate::error::{AnalysisError, Result, ResultExt};
use crate::loader::{DatasetCatalog, load_csv};
use crate::types::CleaningReport;
use crate::utils::dataframe_to_records;
use polars::prelude::*;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::info;

pub struct Dashboard {
    config: DashboardConfig,
    dataset_name: String,
    raw: DataFrame,
    cleaned: DataFrame,
    report: CleaningReport,
}

static_assertions::assert_impl_all!(Dashboard: Send);

impl Dashboard {
    /// Clean an in-memory frame and open a session over it.
    pub fn from_dataframe(
        dataset_name: impl Into<String>,
        raw: DataFrame,
        config: DashboardConfig,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;

        let dataset_name = dataset_name.into();
        let (cleaned, report) = DataCleaner::from_config(&config)
            .clean(&raw)
            .context(format!("Cleaning '{}'", dataset_name))?;

        info!(
            "Opened '{}': {} rows after cleaning",
            dataset_name,
            cleaned.height()
        );

        Ok(Self {
            config,
            dataset_name,
            raw,
            cleaned,
            report,
        })
    }

    /// Load and clean a CSV file.
    pub fn open(path: impl AsRef<Path>, config: DashboardConfig) -> Result<Self> {
        let path = path.as_ref();
        let raw = load_csv(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dataset")
            .to_string();
        Self::from_dataframe(name, raw, config)
    }

    /// Load and clean a dataset from the catalog, looked up in `config.data_dir`.
    pub fn open_named(
        catalog: &DatasetCatalog,
        name: &str,
        config: DashboardConfig,
    ) -> Result<Self> {
        let path = catalog.resolve(name, &config.data_dir)?;
        let raw = load_csv(&path)?;
        let display_name = catalog
            .find(name)
            .map(|entry| entry.name.clone())
            .unwrap_or_else(|| name.to_string());
        Self::from_dataframe(display_name, raw, config)
    }

    pub fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The frame as loaded, before cleaning.
    pub fn raw(&self) -> &DataFrame {
        &self.raw
    }

    pub fn cleaned(&self) -> &DataFrame {
        &self.cleaned
    }

    pub fn cleaning_report(&self) -> &CleaningReport {
        &self.report
    }

    /// First `preview_rows` rows of the cleaned frame.
    pub fn preview(&self) -> DataFrame {
        self.cleaned.head(Some(self.config.preview_rows))
    }

    /// Preview rows as JSON records.
    pub fn preview_records(&self) -> Result<Vec<Map<String, Value>>> {
        dataframe_to_records(&self.preview())
    }

    /// Run a menu entry over the cleaned frame.
    pub fn run(&self, analysis: Analysis) -> Result<AnalysisOutput> {
        run_analysis(&self.cleaned, analysis, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingPolicy;

    fn raw_frame() -> DataFrame {
        df![
            "Timestamp" => ["2021-08-09 00:01", "2021-08-09 00:02", "2021-08-09 00:03"],
            "GHI" => [Some(-5.0), Some(20.0), Some(18.0)],
            "DNI" => [Some(10.0), Some(15.0), None],
        ]
        .unwrap()
    }

    #[test]
    fn test_from_dataframe_cleans() {
        let config = DashboardConfig::builder()
            .non_negative_columns(["GHI", "DNI"])
            .missing_policy(MissingPolicy::Keep)
            .build()
            .unwrap();

        let dashboard = Dashboard::from_dataframe("station", raw_frame(), config).unwrap();

        assert_eq!(dashboard.raw().height(), 3);
        assert_eq!(dashboard.cleaned().height(), 2);
        assert_eq!(dashboard.cleaning_report().rows_dropped, 1);
        assert_eq!(dashboard.dataset_name(), "station");
    }

    #[test]
    fn test_preview_is_bounded() {
        let config = DashboardConfig::builder()
            .non_negative_columns(["GHI"])
            .preview_rows(1)
            .build()
            .unwrap();

        let dashboard = Dashboard::from_dataframe("station", raw_frame(), config).unwrap();
        assert_eq!(dashboard.preview().height(), 1);
        assert_eq!(dashboard.preview_records().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_default_column_is_schema_error() {
        // default config checks ModA, WSgust, ... which this frame lacks
        let err = Dashboard::from_dataframe("station", raw_frame(), DashboardConfig::default())
            .err()
            .unwrap();
        assert!(err.is_schema_error());
        assert!(err.to_string().contains("station"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = DashboardConfig::default();
        config.z_threshold = -1.0;

        let err = Dashboard::from_dataframe("station", raw_frame(), config)
            .err()
            .unwrap();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_open_named_unknown() {
        let err = Dashboard::open_named(&DatasetCatalog::default(), "Mars", DashboardConfig::default())
            .err()
            .unwrap();
        assert_eq!(err.error_code(), "UNKNOWN_DATASET");
    }
}
