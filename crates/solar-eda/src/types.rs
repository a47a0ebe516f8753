use serde::{Deserialize, Serialize};

/// Median imputation applied to one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputedColumn {
    pub column: String,
    pub filled: usize,
    pub median: f64,
}

/// What a cleaning pass did to a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_dropped: usize,
    /// Columns checked by the non-negativity filter.
    pub checked_columns: Vec<String>,
    pub imputed: Vec<ImputedColumn>,
    /// Numeric columns that still hold missing values because no value was
    /// left to take a median of.
    pub unimputable_columns: Vec<String>,
    /// Human-readable log of the steps taken, in order.
    pub steps: Vec<String>,
}

impl CleaningReport {
    /// Total number of cells filled across all columns.
    pub fn cells_imputed(&self) -> usize {
        self.imputed.iter().map(|c| c.filled).sum()
    }
}

/// Statistics behind one z-score scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalySummary {
    pub column: String,
    pub z_column: String,
    pub threshold: f64,
    pub mean: f64,
    pub std_dev: f64,
    /// Rows with a non-missing value in the scanned column.
    pub evaluated: usize,
    pub anomaly_count: usize,
}
