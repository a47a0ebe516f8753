//! Three-variable point clouds for scatter and bubble views.

use crate::error::Result;
use crate::utils::numeric_values;
use polars::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Third variable, drawn as colour (hue) or marker size.
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub x_column: String,
    pub y_column: String,
    pub z_column: String,
    pub points: Vec<ScatterPoint>,
}

/// Collect `(x, y, z)` triples, skipping rows where any of them is missing.
pub fn scatter_points(
    df: &DataFrame,
    x_column: &str,
    y_column: &str,
    z_column: &str,
) -> Result<ScatterSeries> {
    let xs = numeric_values(df, x_column)?;
    let ys = numeric_values(df, y_column)?;
    let zs = numeric_values(df, z_column)?;

    let points = xs
        .into_iter()
        .zip(ys)
        .zip(zs)
        .filter_map(|((x, y), z)| Some(ScatterPoint { x: x?, y: y?, z: z? }))
        .collect();

    Ok(ScatterSeries {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        z_column: z_column.to_string(),
        points,
    })
}
