//! CSV loading and the catalog of bundled station datasets.

use crate::error::{AnalysisError, Result};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rows used to infer column types.
const INFER_SCHEMA_ROWS: usize = 100;

/// Load a CSV file with a header row.
///
/// Tries a standard quoted parse first, then an unquoted parse, then a
/// parse of the content with doubled quotes and blank lines removed.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    info!("Loading dataset from: {}", path.display());

    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(loaded(df)),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: Without quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(loaded(df)),
        Err(e) => debug!("Loading without quotes failed: {}", e),
    }

    // Strategy 3: Pre-clean content
    let content = std::fs::read_to_string(path)?;
    let df = load_csv_str(&clean_csv_content(&content))?;
    Ok(loaded(df))
}

/// Parse CSV text already held in memory.
pub fn load_csv_str(content: &str) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(content.as_bytes().to_vec()))
        .finish()?;
    Ok(df)
}

fn loaded(df: DataFrame) -> DataFrame {
    info!("Dataset loaded successfully: {:?}", df.shape());
    df
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Dataset catalog
// =============================================================================

/// A named station dataset and the file holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub file_name: String,
}

impl CatalogEntry {
    /// File name without extension, accepted as an alias for the name.
    pub fn slug(&self) -> &str {
        self.file_name
            .strip_suffix(".csv")
            .unwrap_or(&self.file_name)
    }
}

/// The datasets offered in the dataset selector.
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    entries: Vec<CatalogEntry>,
}

impl Default for DatasetCatalog {
    fn default() -> Self {
        Self::new([
            ("Benin - Malanville", "benin-malanville.csv"),
            ("Sierra Leone - Bumbuna", "sierraleone-bumbuna.csv"),
            ("Togo - Daaong-QC", "togo-daaong-qc.csv"),
        ])
    }
}

impl DatasetCatalog {
    pub fn new<I, N, F>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, F)>,
        N: Into<String>,
        F: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, file_name)| CatalogEntry {
                    name: name.into(),
                    file_name: file_name.into(),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Find an entry by display name or slug, ignoring case.
    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        let wanted = name.trim();
        self.entries.iter().find(|entry| {
            entry.name.eq_ignore_ascii_case(wanted) || entry.slug().eq_ignore_ascii_case(wanted)
        })
    }

    /// Path of the named dataset inside `data_dir`.
    pub fn resolve(&self, name: &str, data_dir: &Path) -> Result<PathBuf> {
        self.find(name)
            .map(|entry| data_dir.join(&entry.file_name))
            .ok_or_else(|| AnalysisError::UnknownDataset(name.to_string()))
    }
}
