//! Output writers for corpus analysis results
//!
//! Supports three output formats:
//! - `table` - Delimited table, one row per document
//! - `text` - Narrative report with summary and conclusions
//! - `json` - Machine-readable JSON of summary and records
//!
//! Every format renders to a `String` first; `write_output` then puts it on
//! disk in one write.

mod json;
mod table;
mod text;

pub use table::{natural_float, present_columns, Column};

use crate::error::{CorpusError, CorpusResult};
use crate::models::{CorpusSummary, EnrichedRecord};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "csv" => Ok(OutputFormat::Table),
            "text" | "txt" | "report" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: table, text, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Run details that are not part of the records themselves
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub corpus_dir: PathBuf,
    /// Documents discovered but not loaded
    pub skipped: usize,
    /// Column delimiter for the table
    pub delimiter: char,
    /// Decorate the narrative report with pictographs
    pub emoji: bool,
    pub generated_at: DateTime<Local>,
}

impl ReportContext {
    pub fn new(corpus_dir: impl Into<PathBuf>) -> Self {
        Self {
            corpus_dir: corpus_dir.into(),
            skipped: 0,
            delimiter: ',',
            emoji: true,
            generated_at: Local::now(),
        }
    }
}

/// Render results in the given format
pub fn render(
    format: OutputFormat,
    records: &[EnrichedRecord],
    summary: &CorpusSummary,
    ctx: &ReportContext,
) -> Result<String> {
    match format {
        OutputFormat::Table => table::render(records, ctx.delimiter),
        OutputFormat::Text => text::render(records, summary, ctx),
        OutputFormat::Json => json::render(records, summary),
    }
}

/// Write `contents` to `path`, creating missing parent directories.
/// An existing file is replaced.
pub fn write_output(path: &Path, contents: &str) -> CorpusResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CorpusError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, contents).map_err(|source| CorpusError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
