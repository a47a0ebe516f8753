//! Chart-ready analyses offered by the dashboard menu.
//!
//! Every analysis turns a cleaned frame into plain data (points, bins,
//! matrices) that a front end can draw. Nothing here renders.

mod correlation;
mod histogram;
mod scatter;
mod timeseries;
mod wind;

pub use correlation::{CorrelationMatrix, correlation_matrix};
pub use histogram::{Histogram, HistogramBin, build_histogram, column_histogram};
pub use scatter::{ScatterPoint, ScatterSeries, scatter_points};
pub use timeseries::{TimePoint, TimeSeries, parse_timestamp, time_series};
pub use wind::{WindRose, WindSector, wind_rose};

use crate::anomaly::AnomalyDetector;
use crate::config::DashboardConfig;
use crate::error::{Result, ResultExt};
use crate::types::AnomalySummary;
use crate::utils::dataframe_to_records;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::info;

/// Irradiance column plotted over time and used as scatter hue.
pub const IRRADIANCE_COLUMN: &str = "GHI";
pub const AMBIENT_TEMPERATURE_COLUMN: &str = "Tamb";
pub const HUMIDITY_COLUMN: &str = "RH";
pub const WIND_DIRECTION_COLUMN: &str = "WD";
pub const WIND_SPEED_COLUMN: &str = "WS";

/// Entries of the analysis menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Analysis {
    TimeSeries,
    CorrelationHeatmap,
    WindAnalysis,
    TemperatureAnalysis,
    Histograms,
    ZScoreAnalysis,
    BubbleChart,
}

impl Analysis {
    /// Menu order.
    pub const ALL: [Analysis; 7] = [
        Analysis::TimeSeries,
        Analysis::CorrelationHeatmap,
        Analysis::WindAnalysis,
        Analysis::TemperatureAnalysis,
        Analysis::Histograms,
        Analysis::ZScoreAnalysis,
        Analysis::BubbleChart,
    ];

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Analysis::TimeSeries => "Time Series Plot",
            Analysis::CorrelationHeatmap => "Correlation Heatmap",
            Analysis::WindAnalysis => "Wind Analysis",
            Analysis::TemperatureAnalysis => "Temperature Analysis",
            Analysis::Histograms => "Histograms",
            Analysis::ZScoreAnalysis => "Z-Score Analysis",
            Analysis::BubbleChart => "Bubble Chart",
        }
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Anomaly scan result in a serialisable shape.
#[derive(Debug, Clone, Serialize)]
pub struct ZScoreReport {
    pub summary: AnomalySummary,
    pub anomalies: Vec<Map<String, Value>>,
}

/// Output of one menu entry.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "analysis", rename_all = "snake_case")]
pub enum AnalysisOutput {
    TimeSeries(TimeSeries),
    CorrelationHeatmap(CorrelationMatrix),
    WindRose(WindRose),
    TemperatureScatter(ScatterSeries),
    Histograms { histograms: Vec<Histogram> },
    ZScore(ZScoreReport),
    BubbleChart(ScatterSeries),
}

/// Run one analysis over an already cleaned frame.
pub fn run_analysis(
    df: &DataFrame,
    analysis: Analysis,
    config: &DashboardConfig,
) -> Result<AnalysisOutput> {
    info!("Running analysis: {}", analysis);

    let output = match analysis {
        Analysis::TimeSeries => AnalysisOutput::TimeSeries(time_series(
            df,
            &config.timestamp_column,
            IRRADIANCE_COLUMN,
        )?),
        Analysis::CorrelationHeatmap => {
            AnalysisOutput::CorrelationHeatmap(correlation_matrix(df, &config.correlation_columns)?)
        }
        Analysis::WindAnalysis => AnalysisOutput::WindRose(wind_rose(
            df,
            WIND_DIRECTION_COLUMN,
            WIND_SPEED_COLUMN,
            config.wind_sectors,
            config.wind_speed_bins,
        )?),
        Analysis::TemperatureAnalysis => AnalysisOutput::TemperatureScatter(scatter_points(
            df,
            HUMIDITY_COLUMN,
            AMBIENT_TEMPERATURE_COLUMN,
            IRRADIANCE_COLUMN,
        )?),
        Analysis::Histograms => {
            let histograms = config
                .histogram_columns
                .iter()
                .map(|column| column_histogram(df, column, config.histogram_bins))
                .collect::<Result<Vec<_>>>()?;
            AnalysisOutput::Histograms { histograms }
        }
        Analysis::ZScoreAnalysis => {
            let result = AnomalyDetector::from_config(config)?
                .detect(df, &config.anomaly_column)
                .context("Z-score analysis")?;
            AnalysisOutput::ZScore(ZScoreReport {
                anomalies: dataframe_to_records(&result.anomalies)?,
                summary: result.summary,
            })
        }
        Analysis::BubbleChart => AnalysisOutput::BubbleChart(scatter_points(
            df,
            AMBIENT_TEMPERATURE_COLUMN,
            IRRADIANCE_COLUMN,
            HUMIDITY_COLUMN,
        )?),
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        let n = 24;
        let ghi: Vec<f64> = (0..n).map(|i| if i == 12 { 2000.0 } else { 100.0 + i as f64 }).collect();
        let stamps: Vec<String> = (0..n).map(|i| format!("2021-08-09 {:02}:00", i)).collect();
        df![
            "Timestamp" => stamps,
            "GHI" => ghi,
            "DNI" => (0..n).map(|i| i as f64 * 2.0).collect::<Vec<_>>(),
            "DHI" => (0..n).map(|i| i as f64).collect::<Vec<_>>(),
            "Tamb" => (0..n).map(|i| 20.0 + i as f64 / 2.0).collect::<Vec<_>>(),
            "RH" => (0..n).map(|i| 90.0 - i as f64).collect::<Vec<_>>(),
            "WS" => (0..n).map(|i| (i % 5) as f64).collect::<Vec<_>>(),
            "WD" => (0..n).map(|i| (i * 15) as f64).collect::<Vec<_>>(),
            "TModA" => (0..n).map(|i| 25.0 + i as f64).collect::<Vec<_>>(),
            "TModB" => (0..n).map(|i| 24.0 + i as f64).collect::<Vec<_>>(),
        ]
        .unwrap()
    }

    #[test]
    fn test_every_menu_entry_runs() {
        let df = sample_frame();
        let config = DashboardConfig::default();

        for analysis in Analysis::ALL {
            let output = run_analysis(&df, analysis, &config);
            assert!(output.is_ok(), "{} failed: {:?}", analysis, output.err());
        }
    }

    #[test]
    fn test_zscore_analysis_reports_spike() {
        let df = sample_frame();
        let output = run_analysis(&df, Analysis::ZScoreAnalysis, &DashboardConfig::default()).unwrap();

        let AnalysisOutput::ZScore(report) = output else {
            panic!("expected z-score output");
        };
        assert_eq!(report.summary.anomaly_count, 1);
        assert_eq!(report.anomalies[0]["GHI"], Value::from(2000.0));
        assert!(report.anomalies[0].contains_key("GHI_Z"));
    }

    #[test]
    fn test_zscore_analysis_degenerate_keeps_code() {
        let df = df!["GHI" => [1.0, 1.0, 1.0]].unwrap();
        let err = run_analysis(&df, Analysis::ZScoreAnalysis, &DashboardConfig::default()).unwrap_err();
        assert!(err.is_degenerate());
    }

    #[test]
    fn test_histograms_use_configured_columns() {
        let df = sample_frame();
        let config = DashboardConfig::builder()
            .histogram_columns(["GHI", "WS"])
            .histogram_bins(4)
            .build()
            .unwrap();

        let AnalysisOutput::Histograms { histograms } =
            run_analysis(&df, Analysis::Histograms, &config).unwrap()
        else {
            panic!("expected histograms");
        };
        assert_eq!(histograms.len(), 2);
        assert_eq!(histograms[1].column, "WS");
        assert_eq!(histograms[1].bins.len(), 4);
    }

    #[test]
    fn test_output_serializes_with_tag() {
        let df = sample_frame();
        let output = run_analysis(&df, Analysis::BubbleChart, &DashboardConfig::default()).unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["analysis"], "bubble_chart");
        assert_eq!(json["x_column"], "Tamb");
    }

    #[test]
    fn test_labels_match_menu() {
        let labels: Vec<&str> = Analysis::ALL.iter().map(|a| a.label()).collect();
        assert_eq!(labels[0], "Time Series Plot");
        assert_eq!(labels[5], "Z-Score Analysis");
    }
}
