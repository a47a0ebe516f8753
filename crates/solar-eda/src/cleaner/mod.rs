//! Data cleaning for sensor datasets.
//!
//! Cleaning runs two steps, in this order:
//! 1. Drop rows with a negative (or, by default, missing) reading in any of
//!    the designated non-negative columns
//! 2. Fill missing values in every numeric column with the median of the
//!    rows that survived step 1
//!
//! Non-numeric columns such as `Timestamp` or `Comments` are never touched.

mod filter;

use crate::config::{DashboardConfig, MissingPolicy};
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::types::CleaningReport;
use crate::utils::{missing_count, numeric_column_names, numeric_values};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Data cleaner for sensor datasets.
#[derive(Debug, Clone)]
pub struct DataCleaner {
    non_negative_columns: Vec<String>,
    missing_policy: MissingPolicy,
}

impl DataCleaner {
    /// Create a cleaner that checks `non_negative_columns`.
    pub fn new<I, S>(non_negative_columns: I, missing_policy: MissingPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            non_negative_columns: non_negative_columns.into_iter().map(Into::into).collect(),
            missing_policy,
        }
    }

    /// Create a cleaner from the dashboard configuration.
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.non_negative_columns.clone(), config.missing_policy)
    }

    /// Columns checked by the non-negativity filter.
    pub fn non_negative_columns(&self) -> &[String] {
        &self.non_negative_columns
    }

    /// Clean a dataset, returning a new frame and a report of what changed.
    ///
    /// The input frame is not modified. A result with zero rows is returned
    /// successfully.
    pub fn clean(&self, df: &DataFrame) -> Result<(DataFrame, CleaningReport)> {
        info!("Cleaning dataset with {} rows...", df.height());

        let mut report = CleaningReport {
            rows_before: df.height(),
            checked_columns: self.non_negative_columns.clone(),
            ..Default::default()
        };

        // 1. Filter rows with negative or missing readings
        let mask = filter::non_negative_mask(df, &self.non_negative_columns, self.missing_policy)?;
        let mut cleaned = df.filter(&mask)?;

        report.rows_after = cleaned.height();
        report.rows_dropped = report.rows_before - report.rows_after;

        if report.rows_dropped > 0 {
            let pct = (report.rows_dropped as f64 / report.rows_before as f64) * 100.0;
            report.steps.push(format!(
                "Removed {} rows with negative or invalid readings ({:.1}%)",
                report.rows_dropped, pct
            ));
            debug!("Removed {} rows failing the non-negative check", report.rows_dropped);
        } else {
            report
                .steps
                .push("No rows with negative or invalid readings found".to_string());
        }

        // 2. Median-impute numeric columns over the surviving rows
        for col_name in numeric_column_names(&cleaned) {
            match StatisticalImputer::apply_numeric_median(&mut cleaned, &col_name)? {
                Some(imputed) => {
                    report.steps.push(format!(
                        "Filled {} missing values in '{}' with median {:.2}",
                        imputed.filled, imputed.column, imputed.median
                    ));
                    report.imputed.push(imputed);
                }
                None => {
                    let values = numeric_values(&cleaned, &col_name)?;
                    if missing_count(&values) > 0 {
                        warn!(
                            "Column '{}' has no values to take a median of; left unimputed",
                            col_name
                        );
                        report.steps.push(format!(
                            "Could not impute '{}': no non-missing values",
                            col_name
                        ));
                        report.unimputable_columns.push(col_name);
                    }
                }
            }
        }

        info!(
            "Cleaning complete: {} -> {} rows, {} cells imputed",
            report.rows_before,
            report.rows_after,
            report.cells_imputed()
        );

        Ok((cleaned, report))
    }
}

/// Clean `df` with the default missing-value policy.
///
/// Convenience wrapper around [`DataCleaner::clean`] that discards the report.
pub fn clean(df: &DataFrame, non_negative_columns: &[&str]) -> Result<DataFrame> {
    let cleaner = DataCleaner::new(non_negative_columns.iter().copied(), MissingPolicy::default());
    cleaner.clean(df).map(|(cleaned, _)| cleaned)
}
