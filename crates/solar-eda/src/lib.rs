//! Solar Sensor Exploratory Data Analysis
//!
//! Cleaning, anomaly detection and chart-ready analyses for solar/weather
//! station exports (irradiance, module and ambient temperature, humidity,
//! wind), built with Rust and Polars.
//!
//! # Overview
//!
//! - **Data Cleaning**: drop rows with negative sensor readings, then fill
//!   missing numeric values with column medians
//! - **Anomaly Detection**: z-score a column and extract rows with `|z| > 3`
//! - **Analyses**: time series, correlation heatmap, wind rose, scatter and
//!   bubble point clouds, histograms, all as plain data for a front end
//! - **Dashboard Session**: one loaded and cleaned dataset with its settings,
//!   passed around explicitly instead of living in global state
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use solar_eda::{Analysis, Dashboard, DashboardConfig, DatasetCatalog};
//!
//! let config = DashboardConfig::builder().data_dir("data").build()?;
//! let dashboard = Dashboard::open_named(&DatasetCatalog::default(), "Benin - Malanville", config)?;
//!
//! println!("{}", dashboard.preview());
//! let output = dashboard.run(Analysis::ZScoreAnalysis)?;
//! ```
//!
//! The two core transformations are also usable on their own:
//!
//! ```rust,ignore
//! use solar_eda::{clean, detect_anomalies};
//!
//! let cleaned = clean(&df, &["GHI", "DNI", "DHI"])?;
//! let (annotated, anomalies) = detect_anomalies(&cleaned, "GHI")?;
//! ```

pub mod analysis;
pub mod anomaly;
pub mod cleaner;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analysis::{Analysis, AnalysisOutput, run_analysis};
pub use anomaly::{AnomalyDetector, AnomalyResult, detect_anomalies, z_column_name};
pub use cleaner::{DataCleaner, clean};
pub use config::{
    ConfigValidationError, DashboardConfig, DashboardConfigBuilder, MissingPolicy, StdDevKind,
};
pub use dashboard::Dashboard;
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use loader::{CatalogEntry, DatasetCatalog, load_csv, load_csv_str};
pub use types::{AnomalySummary, CleaningReport, ImputedColumn};
