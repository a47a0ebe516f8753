//! Wind rose frequency table: direction sectors by speed class.

use crate::error::Result;
use crate::utils::{float_chunked, numeric_values};
use polars::prelude::*;
use serde::Serialize;

/// One compass sector of the rose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindSector {
    /// Centre direction of the sector in degrees (0 = north).
    pub direction: f64,
    /// Share of all observations per speed class, in percent.
    pub frequencies: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindRose {
    /// Lower edge of each speed class; the last class is open-ended.
    pub speed_edges: Vec<f64>,
    pub sectors: Vec<WindSector>,
    /// Observations with both direction and speed present.
    pub observations: usize,
}

/// Index of the sector containing `direction`, sectors centred on north.
fn sector_index(direction: f64, sectors: usize) -> usize {
    let width = 360.0 / sectors as f64;
    let shifted = (direction + width / 2.0).rem_euclid(360.0);
    ((shifted / width) as usize).min(sectors - 1)
}

/// Evenly spaced speed class edges from the slowest to the fastest reading.
fn speed_edges(speeds: &[f64], classes: usize) -> Vec<f64> {
    let ca = float_chunked(speeds);
    let (Some(min), Some(max)) = (ca.min(), ca.max()) else {
        return Vec::new();
    };
    if classes == 1 {
        return vec![min];
    }
    let step = (max - min) / (classes - 1) as f64;
    (0..classes).map(|i| min + i as f64 * step).collect()
}

/// Index of the speed class for `speed` (last edge not above it).
fn speed_index(speed: f64, edges: &[f64]) -> usize {
    edges.iter().rposition(|&edge| speed >= edge).unwrap_or(0)
}

/// Build a normalised wind rose from direction and speed columns.
pub fn wind_rose(
    df: &DataFrame,
    direction_column: &str,
    speed_column: &str,
    sectors: usize,
    speed_classes: usize,
) -> Result<WindRose> {
    let directions = numeric_values(df, direction_column)?;
    let speeds = numeric_values(df, speed_column)?;
    let sectors = sectors.max(1);
    let speed_classes = speed_classes.max(1);

    let pairs: Vec<(f64, f64)> = directions
        .into_iter()
        .zip(speeds)
        .filter_map(|(d, s)| Some((d?, s?)))
        .collect();

    let observed_speeds: Vec<f64> = pairs.iter().map(|(_, s)| *s).collect();
    let edges = speed_edges(&observed_speeds, speed_classes);

    let mut counts = vec![vec![0usize; speed_classes]; sectors];
    for (direction, speed) in &pairs {
        counts[sector_index(*direction, sectors)][speed_index(*speed, &edges)] += 1;
    }

    let total = pairs.len();
    let width = 360.0 / sectors as f64;
    let sectors = counts
        .into_iter()
        .enumerate()
        .map(|(idx, row)| WindSector {
            direction: idx as f64 * width,
            frequencies: row
                .into_iter()
                .map(|c| {
                    if total == 0 {
                        0.0
                    } else {
                        c as f64 * 100.0 / total as f64
                    }
                })
                .collect(),
        })
        .collect();

    Ok(WindRose {
        speed_edges: edges,
        sectors,
        observations: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_index_wraps_around_north() {
        assert_eq!(sector_index(0.0, 16), 0);
        assert_eq!(sector_index(355.0, 16), 0);
        assert_eq!(sector_index(11.0, 16), 0);
        assert_eq!(sector_index(12.0, 16), 1);
        assert_eq!(sector_index(180.0, 4), 2);
        assert_eq!(sector_index(-90.0, 4), 3);
    }

    #[test]
    fn test_speed_edges_and_index() {
        let edges = speed_edges(&[0.0, 5.0, 10.0], 3);
        assert_eq!(edges, vec![0.0, 5.0, 10.0]);
        assert_eq!(speed_index(0.0, &edges), 0);
        assert_eq!(speed_index(4.9, &edges), 0);
        assert_eq!(speed_index(5.0, &edges), 1);
        assert_eq!(speed_index(10.0, &edges), 2);
    }

    #[test]
    fn test_wind_rose_frequencies_sum_to_hundred() {
        let df = df![
            "WD" => [Some(0.0), Some(90.0), Some(180.0), Some(270.0), None],
            "WS" => [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(9.0)],
        ]
        .unwrap();

        let rose = wind_rose(&df, "WD", "WS", 4, 2).unwrap();

        assert_eq!(rose.observations, 4);
        assert_eq!(rose.sectors.len(), 4);
        let total: f64 = rose
            .sectors
            .iter()
            .flat_map(|s| s.frequencies.iter())
            .sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(rose.sectors[1].direction, 90.0);
        assert_eq!(rose.sectors[3].frequencies, vec![0.0, 25.0]);
    }

    #[test]
    fn test_wind_rose_empty() {
        let df = df![
            "WD" => Vec::<f64>::new(),
            "WS" => Vec::<f64>::new(),
        ]
        .unwrap();

        let rose = wind_rose(&df, "WD", "WS", 16, 6).unwrap();
        assert_eq!(rose.observations, 0);
        assert!(rose.speed_edges.is_empty());
        assert!(rose.sectors.iter().all(|s| s.frequencies.iter().all(|f| *f == 0.0)));
    }
}
