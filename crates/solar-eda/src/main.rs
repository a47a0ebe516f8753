//! CLI entry point for the solar sensor dashboard.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use serde_json::json;
use solar_eda::analysis::{CorrelationMatrix, Histogram, ScatterSeries, TimeSeries, WindRose};
use solar_eda::{
    Analysis, AnalysisOutput, CleaningReport, Dashboard, DashboardConfig, DatasetCatalog,
    MissingPolicy, StdDevKind,
};
use std::path::PathBuf;
use tracing::{info, warn};

/// CLI-compatible analysis menu
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliAnalysis {
    /// GHI over time
    TimeSeries,
    /// Pearson correlation between sensor columns
    Correlation,
    /// Wind rose of direction by speed
    Wind,
    /// Relative humidity vs ambient temperature, GHI as hue
    Temperature,
    /// Histograms of irradiance, wind speed and temperature
    Histograms,
    /// Z-score anomaly detection
    Zscore,
    /// Ambient temperature vs GHI, RH as bubble size
    Bubble,
}

impl From<CliAnalysis> for Analysis {
    fn from(cli: CliAnalysis) -> Self {
        match cli {
            CliAnalysis::TimeSeries => Analysis::TimeSeries,
            CliAnalysis::Correlation => Analysis::CorrelationHeatmap,
            CliAnalysis::Wind => Analysis::WindAnalysis,
            CliAnalysis::Temperature => Analysis::TemperatureAnalysis,
            CliAnalysis::Histograms => Analysis::Histograms,
            CliAnalysis::Zscore => Analysis::ZScoreAnalysis,
            CliAnalysis::Bubble => Analysis::BubbleChart,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Solar Radiation Data Analysis Dashboard",
    long_about = "Cleans a solar/weather station CSV and prints chart-ready analyses.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  SOLAR_DATA_DIR    Directory holding the catalog datasets\n\n\
                  EXAMPLES:\n  \
                  # Preview a catalog dataset\n  \
                  solar-eda --dataset \"Benin - Malanville\"\n\n  \
                  # Z-score scan of DNI on any CSV\n  \
                  solar-eda -i station.csv -a zscore --column DNI\n\n  \
                  # Correlation matrix as JSON\n  \
                  solar-eda -d togo-daaong-qc -a correlation --json"
)]
struct Args {
    /// Path to a CSV file to analyse
    #[arg(short, long, conflicts_with = "dataset")]
    input: Option<PathBuf>,

    /// Name (or file slug) of a catalog dataset
    #[arg(short, long)]
    dataset: Option<String>,

    /// Directory the catalog datasets live in
    #[arg(long, env = "SOLAR_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// List the catalog datasets and exit
    #[arg(long)]
    list_datasets: bool,

    /// Analysis to run after cleaning
    #[arg(short, long, value_enum)]
    analysis: Option<CliAnalysis>,

    /// Column scanned by the z-score analysis
    #[arg(long, default_value = "GHI")]
    column: String,

    /// Anomaly threshold on |z|
    #[arg(long, default_value = "3.0")]
    threshold: f64,

    /// Use the sample standard deviation (ddof = 1) for z-scores
    #[arg(long)]
    sample_std: bool,

    /// Keep rows whose checked readings are missing (they get imputed)
    #[arg(long)]
    keep_missing: bool,

    /// Number of histogram bins
    #[arg(long, default_value = "30")]
    bins: usize,

    /// Rows shown in the dataset preview
    #[arg(long, default_value = "5")]
    preview_rows: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable tables
    ///
    /// Disables all logs; only the final JSON document is written.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // Load environment variables from .env file before clap reads them
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let catalog = DatasetCatalog::default();

    if args.list_datasets {
        for entry in catalog.entries() {
            println!("{:<28} {}", entry.name, args.data_dir.join(&entry.file_name).display());
        }
        return Ok(());
    }

    let config = DashboardConfig::builder()
        .data_dir(&args.data_dir)
        .anomaly_column(&args.column)
        .z_threshold(args.threshold)
        .std_dev_kind(if args.sample_std {
            StdDevKind::Sample
        } else {
            StdDevKind::Population
        })
        .missing_policy(if args.keep_missing {
            MissingPolicy::Keep
        } else {
            MissingPolicy::Exclude
        })
        .histogram_bins(args.bins)
        .preview_rows(args.preview_rows)
        .build()?;

    let dashboard = match (&args.input, &args.dataset) {
        (Some(path), _) => {
            if !path.exists() {
                return Err(anyhow!("Input file not found: {}", path.display()));
            }
            Dashboard::open(path, config)?
        }
        (None, Some(name)) => Dashboard::open_named(&catalog, name, config)?,
        (None, None) => {
            let first = catalog
                .entries()
                .first()
                .ok_or_else(|| anyhow!("Dataset catalog is empty"))?;
            info!("No dataset selected, defaulting to '{}'", first.name);
            Dashboard::open_named(&catalog, &first.name, config)?
        }
    };

    let analysis = args.analysis.map(Analysis::from);
    let output = match analysis {
        Some(analysis) => match dashboard.run(analysis) {
            Ok(output) => Some(output),
            // flat data has no outliers to report; say so instead of failing
            Err(e) if e.is_degenerate() => {
                warn!("{}", e);
                if !args.json {
                    println!("No anomalies: {}", e);
                }
                None
            }
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    if args.json {
        let document = json!({
            "dataset": dashboard.dataset_name(),
            "cleaning": dashboard.cleaning_report(),
            "preview": dashboard.preview_records()?,
            "analysis": output,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    print_overview(&dashboard);
    if let (Some(analysis), Some(output)) = (analysis, output.as_ref()) {
        print_analysis(analysis, output);
    }

    Ok(())
}

/// Print the dataset header, cleaning summary and preview.
///
/// Note: this uses `println!` intentionally; it is the program's output,
/// not logging.
fn print_overview(dashboard: &Dashboard) {
    println!();
    println!("{}", "=".repeat(80));
    println!("SOLAR RADIATION DATA ANALYSIS - {}", dashboard.dataset_name());
    println!("{}", "=".repeat(80));
    println!();

    print_cleaning_report(dashboard.cleaning_report());

    println!("Dataset Preview:");
    println!("{}", dashboard.preview());
    println!();
}

fn print_cleaning_report(report: &CleaningReport) {
    println!("Load and Clean Data:");
    println!(
        "  Rows: {} -> {} ({} removed)",
        report.rows_before, report.rows_after, report.rows_dropped
    );
    println!("  Checked columns: {}", report.checked_columns.join(", "));
    for imputed in &report.imputed {
        println!(
            "  - '{}': {} values filled with median {:.2}",
            imputed.column, imputed.filled, imputed.median
        );
    }
    for column in &report.unimputable_columns {
        println!("  ! '{}' has no values to impute from", column);
    }
    println!();
}

fn print_analysis(analysis: Analysis, output: &AnalysisOutput) {
    println!("{}", analysis.label().to_uppercase());
    println!("{}", "-".repeat(40));

    match output {
        AnalysisOutput::TimeSeries(series) => print_time_series(series),
        AnalysisOutput::CorrelationHeatmap(matrix) => print_correlation(matrix),
        AnalysisOutput::WindRose(rose) => print_wind_rose(rose),
        AnalysisOutput::TemperatureScatter(series) | AnalysisOutput::BubbleChart(series) => {
            print_scatter(series)
        }
        AnalysisOutput::Histograms { histograms } => {
            for histogram in histograms {
                print_histogram(histogram);
            }
        }
        AnalysisOutput::ZScore(report) => {
            let summary = &report.summary;
            println!(
                "Number of anomalies detected: {} of {} ('{}', |z| > {})",
                summary.anomaly_count, summary.evaluated, summary.column, summary.threshold
            );
            println!("  mean {:.3}, std dev {:.3}", summary.mean, summary.std_dev);
            for row in report.anomalies.iter().take(20) {
                println!(
                    "  {} = {}  ({} = {})",
                    summary.column,
                    row.get(&summary.column).unwrap_or(&serde_json::Value::Null),
                    summary.z_column,
                    row.get(&summary.z_column).unwrap_or(&serde_json::Value::Null)
                );
            }
            if report.anomalies.len() > 20 {
                println!("  ... and {} more", report.anomalies.len() - 20);
            }
        }
    }
    println!("{}", "=".repeat(80));
}

fn print_time_series(series: &TimeSeries) {
    println!("{} points of {}", series.points.len(), series.column);
    if let (Some(first), Some(last)) = (series.points.first(), series.points.last()) {
        println!("  from {} to {}", first.timestamp, last.timestamp);
    }
    for point in series.points.iter().take(10) {
        println!("  {}  {:>10.2}", point.timestamp, point.value);
    }
}

fn print_correlation(matrix: &CorrelationMatrix) {
    print!("{:<8}", "");
    for label in &matrix.labels {
        print!("{:>8}", truncate_str(label, 7));
    }
    println!();
    for (label, row) in matrix.labels.iter().zip(&matrix.values) {
        print!("{:<8}", truncate_str(label, 7));
        for cell in row {
            match cell {
                Some(v) => print!("{:>8.2}", v),
                None => print!("{:>8}", "-"),
            }
        }
        println!();
    }
}

fn print_wind_rose(rose: &WindRose) {
    println!("{} observations", rose.observations);
    let edges: Vec<String> = rose.speed_edges.iter().map(|e| format!(">={:.1}", e)).collect();
    println!("{:>8} {}", "dir", edges.join(" "));
    for sector in &rose.sectors {
        let cells: Vec<String> = sector
            .frequencies
            .iter()
            .map(|f| format!("{:>6.2}%", f))
            .collect();
        println!("{:>8.1} {}", sector.direction, cells.join(" "));
    }
}

fn print_scatter(series: &ScatterSeries) {
    println!(
        "{} points: x = {}, y = {}, z = {}",
        series.points.len(),
        series.x_column,
        series.y_column,
        series.z_column
    );
    for point in series.points.iter().take(10) {
        println!("  {:>10.2} {:>10.2} {:>10.2}", point.x, point.y, point.z);
    }
}

fn print_histogram(histogram: &Histogram) {
    println!(
        "Histogram of {} ({} values, {} missing)",
        histogram.column,
        histogram.total(),
        histogram.missing
    );
    let peak = histogram.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in &histogram.bins {
        let bar = "#".repeat(bin.count * 40 / peak);
        println!(
            "  [{:>9.2}, {:>9.2}) {:>7} {}",
            bin.start, bin.end, bin.count, bar
        );
    }
    println!();
}

/// Truncate a string to a maximum length
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}~", kept)
    }
}
