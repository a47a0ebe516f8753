//! Z-score anomaly detection.
//!
//! Contains the detector that annotates a numeric column with its z-score
//! and extracts the rows lying too many standard deviations from the mean.

use crate::config::{DashboardConfig, StdDevKind};
use crate::error::{AnalysisError, Result};
use crate::types::AnomalySummary;
use crate::utils::numeric_values;
use polars::prelude::*;
use tracing::{debug, info};

/// Default `|z|` above which a row is an anomaly.
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Name of the derived z-score column for `column`.
pub fn z_column_name(column: &str) -> String {
    format!("{}_Z", column)
}

/// Output of a z-score scan.
#[derive(Debug, Clone)]
pub struct AnomalyResult {
    /// Copy of the input with the `<column>_Z` column added.
    pub annotated: DataFrame,
    /// Rows of `annotated` whose `|z|` exceeds the threshold.
    pub anomalies: DataFrame,
    pub summary: AnomalySummary,
}

/// Flags rows whose z-score magnitude exceeds a threshold.
#[derive(Debug, Clone, Copy)]
pub struct AnomalyDetector {
    threshold: f64,
    std_dev_kind: StdDevKind,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_Z_THRESHOLD,
            std_dev_kind: StdDevKind::default(),
        }
    }
}

impl AnomalyDetector {
    /// Create a detector with an explicit threshold and deviation kind.
    pub fn new(threshold: f64, std_dev_kind: StdDevKind) -> Result<Self> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "z-score threshold must be a positive finite number, got {}",
                threshold
            )));
        }
        Ok(Self {
            threshold,
            std_dev_kind,
        })
    }

    /// Create a detector from the dashboard configuration.
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        Self::new(config.z_threshold, config.std_dev_kind)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compute the z-score of every entry; missing entries stay missing.
    ///
    /// Fails when fewer than two values are present or when they are all
    /// equal, since the score is undefined in both cases.
    pub fn z_scores(
        &self,
        column: &str,
        values: &[Option<f64>],
    ) -> Result<(Vec<Option<f64>>, f64, f64)> {
        let ca = Float64Chunked::new(column.into(), values);
        let present = ca.len() - ca.null_count();
        if present < 2 {
            return Err(AnalysisError::degenerate(
                column,
                format!("need at least 2 non-missing values, found {}", present),
            ));
        }

        // identical values can leave a rounding-sized std instead of exact zero
        if ca.min() == ca.max() {
            return Err(AnalysisError::degenerate(column, "all values are identical"));
        }

        let (Some(mean), Some(std_dev)) = (ca.mean(), ca.std(self.std_dev_kind.ddof())) else {
            return Err(AnalysisError::degenerate(column, "no spread to score against"));
        };
        if std_dev == 0.0 || !std_dev.is_finite() {
            return Err(AnalysisError::degenerate(column, "zero variance"));
        }

        let scores = values
            .iter()
            .map(|v| v.map(|x| (x - mean) / std_dev))
            .collect();
        Ok((scores, mean, std_dev))
    }

    /// Annotate `df` with `<column>_Z` and extract the anomalous rows.
    ///
    /// The input frame is not modified.
    pub fn detect(&self, df: &DataFrame, column: &str) -> Result<AnomalyResult> {
        let values = numeric_values(df, column)?;
        let (scores, mean, std_dev) = self.z_scores(column, &values)?;

        let z_name = z_column_name(column);
        let mut annotated = df.clone();
        annotated.with_column(Series::new(z_name.as_str().into(), scores.clone()))?;

        let flags: Vec<bool> = scores
            .iter()
            .map(|z| z.map(|z| z.abs() > self.threshold).unwrap_or(false))
            .collect();
        let mask = BooleanChunked::from_slice("anomaly".into(), &flags);
        let anomalies = annotated.filter(&mask)?;

        let summary = AnomalySummary {
            column: column.to_string(),
            z_column: z_name,
            threshold: self.threshold,
            mean,
            std_dev,
            evaluated: values.iter().filter(|v| v.is_some()).count(),
            anomaly_count: anomalies.height(),
        };

        debug!(
            "'{}': mean {:.3}, std {:.3} over {} values",
            column, mean, std_dev, summary.evaluated
        );
        info!(
            "Detected {} anomalies in '{}' (|z| > {})",
            summary.anomaly_count, column, self.threshold
        );

        Ok(AnomalyResult {
            annotated,
            anomalies,
            summary,
        })
    }
}

/// Detect anomalies in `column` with the default threshold of 3.
///
/// Returns the annotated frame and the anomalous subset.
pub fn detect_anomalies(df: &DataFrame, column: &str) -> Result<(DataFrame, DataFrame)> {
    let result = AnomalyDetector::default().detect(df, column)?;
    Ok((result.annotated, result.anomalies))
}
