//! Core data models for corpuslens
//!
//! Everything here is created fresh for one run and lives only in memory.
//! The two output artifacts (table and report) are the only things that
//! outlast an invocation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A loaded text document. Identity is `filename`, unique within a corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub text: String,
}

impl Document {
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
        }
    }
}

/// How the part-of-speech densities of a record were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DensityMode {
    /// A real tagger classified the words
    #[default]
    Tagged,
    /// The tagger was unavailable or failed; densities are zero-filled
    Degraded,
    /// Density was switched off for the run; density fields are not reported
    Disabled,
}

impl std::fmt::Display for DensityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DensityMode::Tagged => write!(f, "tagged"),
            DensityMode::Degraded => write!(f, "degraded"),
            DensityMode::Disabled => write!(f, "disabled"),
        }
    }
}

/// Per-document metrics
///
/// `unique_words <= word_count`, `ttr = unique_words / word_count` (0 for an
/// empty document) and `lexical_density = noun + adj + verb` by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MetricRecord {
    pub filename: String,
    pub word_count: usize,
    pub unique_words: usize,
    pub ttr: f64,
    pub line_count: usize,
    pub avg_word_length: f64,
    pub lexical_density: f64,
    pub noun_density: f64,
    pub adj_density: f64,
    pub verb_density: f64,
    #[serde(default)]
    pub density_mode: DensityMode,
}

/// Bibliographic metadata for one file as it appears in the metadata table.
///
/// `None` means the table had no usable value. The sentinel is only filled
/// in at enrichment time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataRecord {
    pub filename: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<String>,
    pub genre: Option<String>,
}

/// A document's metrics merged with its (possibly default-filled) metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub title: String,
    pub author: String,
    pub year: String,
    pub genre: String,
    #[serde(flatten)]
    pub metrics: MetricRecord,
}

impl EnrichedRecord {
    pub fn filename(&self) -> &str {
        &self.metrics.filename
    }
}

/// Records sharing one `author` value, in first-appearance order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AuthorGroup {
    pub count: usize,
    pub files: Vec<String>,
}

/// Corpus-wide statistics derived from the enriched records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CorpusSummary {
    pub total_files: usize,
    pub total_words: usize,
    pub total_unique_words: usize,
    pub average_ttr: f64,
    /// Mean over tagged records; absent when no record has a non-zero density
    pub average_lexical_density: Option<f64>,
    pub file_with_max_word_count: Option<String>,
    pub file_with_max_ttr: Option<String>,
    pub file_with_max_lexical_density: Option<String>,
    pub per_author_counts: IndexMap<String, AuthorGroup>,
}

impl CorpusSummary {
    pub fn is_empty(&self) -> bool {
        self.total_files == 0
    }

    /// Mean words per file (0 for an empty corpus)
    pub fn average_words(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.total_words as f64 / self.total_files as f64
        }
    }
}
