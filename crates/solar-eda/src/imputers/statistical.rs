//! Statistical imputation methods.

use crate::error::Result;
use crate::types::ImputedColumn;
use crate::utils::{fill_numeric_nulls, numeric_chunked};
use polars::prelude::*;
use tracing::debug;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Replace missing values of a numeric column with its median.
    ///
    /// Returns `None` when the column has nothing to fill, or nothing to
    /// take a median of. The column is left untouched in both cases.
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
    ) -> Result<Option<ImputedColumn>> {
        let values = numeric_chunked(df, col_name)?;
        let missing = values.null_count();
        if missing == 0 {
            return Ok(None);
        }

        let Some(median_val) = values.median() else {
            return Ok(None);
        };

        let filled = fill_numeric_nulls(df.column(col_name)?.as_materialized_series(), median_val)?;
        df.replace(col_name, filled)?;

        debug!(
            "Filled {} missing values in '{}' with median {:.2}",
            missing, col_name, median_val
        );

        Ok(Some(ImputedColumn {
            column: col_name.to_string(),
            filled: missing,
            median: median_val,
        }))
    }
}
