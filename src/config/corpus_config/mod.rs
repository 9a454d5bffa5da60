//! Run configuration support
//!
//! Loads configuration from `corpuslens.toml` or `.corpuslensrc.json` in the
//! working directory, or from an explicit path.
//!
//! # Configuration Format
//!
//! ```toml
//! # corpuslens.toml
//!
//! [corpus]
//! dir = "corpus"
//! suffix = ".txt"
//!
//! [metadata]
//! path = "data/metadata.csv"
//!
//! [output]
//! table = "results/statistics.csv"
//! report = "results/report.txt"
//! # json = "results/statistics.json"
//!
//! [text]
//! delimiter = ","
//! missing_value_sentinel = "Неизвестно"
//! tokenization = "whitespace"   # or "strip-punctuation"
//! # stopwords = ["и", "в", "не"]
//!
//! [pos]
//! tagger = "mystem"             # or "suffix", "none"
//! mystem_path = "mystem"
//! timeout_secs = 60
//!
//! [report]
//! emoji = true
//! ```

use crate::error::CorpusError;
use crate::metrics::{default_stopwords, Tokenization};
use crate::pos::PosConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Value written for metadata the table does not provide
pub const DEFAULT_SENTINEL: &str = "Неизвестно";

/// Config file names searched in the working directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["corpuslens.toml", ".corpuslensrc.json"];

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CorpusConfig {
    #[serde(default)]
    pub corpus: CorpusSection,

    #[serde(default)]
    pub metadata: MetadataSection,

    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub text: TextOptions,

    #[serde(default)]
    pub pos: PosConfig,

    #[serde(default)]
    pub report: ReportSection,
}

/// Where the documents are
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSection {
    #[serde(default = "default_corpus_dir")]
    pub dir: PathBuf,

    /// Filename suffix a document must end with
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for CorpusSection {
    fn default() -> Self {
        Self {
            dir: default_corpus_dir(),
            suffix: default_suffix(),
        }
    }
}

fn default_corpus_dir() -> PathBuf {
    PathBuf::from("corpus")
}

fn default_suffix() -> String {
    ".txt".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSection {
    #[serde(default = "default_metadata_path")]
    pub path: PathBuf,
}

impl Default for MetadataSection {
    fn default() -> Self {
        Self {
            path: default_metadata_path(),
        }
    }
}

fn default_metadata_path() -> PathBuf {
    PathBuf::from("data/metadata.csv")
}

/// Output artifact paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default = "default_table_path")]
    pub table: PathBuf,

    #[serde(default = "default_report_path")]
    pub report: PathBuf,

    /// Optional JSON dump of records and summary
    #[serde(default)]
    pub json: Option<PathBuf>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            table: default_table_path(),
            report: default_report_path(),
            json: None,
        }
    }
}

fn default_table_path() -> PathBuf {
    PathBuf::from("results/statistics.csv")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("results/report.txt")
}

/// Text handling options shared by the metric calculator, metadata loader,
/// enrichment and table writer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOptions {
    /// Column delimiter for the metadata and output tables
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Words left out of frequency lists
    #[serde(default = "default_stopwords")]
    pub stopwords: HashSet<String>,

    /// Placeholder for metadata fields the table does not provide
    #[serde(default = "default_sentinel")]
    pub missing_value_sentinel: String,

    #[serde(default)]
    pub tokenization: Tokenization,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            stopwords: default_stopwords(),
            missing_value_sentinel: default_sentinel(),
            tokenization: Tokenization::default(),
        }
    }
}

fn default_delimiter() -> char {
    ','
}

fn default_sentinel() -> String {
    DEFAULT_SENTINEL.to_string()
}

/// Narrative report options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default = "default_emoji")]
    pub emoji: bool,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            emoji: default_emoji(),
        }
    }
}

fn default_emoji() -> bool {
    true
}

impl CorpusConfig {
    /// Reject settings the table format cannot work with
    pub fn validate(&self) -> Result<(), CorpusError> {
        let d = self.text.delimiter;
        if d == '\n' || d == '\r' {
            return Err(CorpusError::Config(
                "delimiter cannot be a line break".to_string(),
            ));
        }
        if self.text.missing_value_sentinel.trim().is_empty() {
            return Err(CorpusError::Config(
                "missing_value_sentinel cannot be empty".to_string(),
            ));
        }
        if self.text.missing_value_sentinel.contains(d) {
            return Err(CorpusError::Config(format!(
                "missing_value_sentinel cannot contain the delimiter '{}'",
                d
            )));
        }
        Ok(())
    }
}

/// Load configuration from `dir`.
///
/// Searches for `corpuslens.toml`, then `.corpuslensrc.json`. A file that
/// fails to parse is skipped with a warning. Returns defaults when nothing
/// usable is found.
pub fn load_corpus_config(dir: &Path) -> CorpusConfig {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {:#}", path.display(), e);
            }
        }
    }

    debug!("No config file found, using defaults");
    CorpusConfig::default()
}

/// Load one configuration file; JSON when the name ends in `.json`,
/// TOML otherwise
pub fn load_config_file(path: &Path) -> anyhow::Result<CorpusConfig> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".json"));
    let config: CorpusConfig = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };
    config.validate()?;
    Ok(config)
}

/// Commented starter file written by `corpuslens init`
pub const SAMPLE_CONFIG: &str = r#"# corpuslens configuration

[corpus]
# Folder with the texts to analyze
dir = "corpus"
# Only files ending with this suffix are read
suffix = ".txt"

[metadata]
# Comma-separated table: filename,title,author,year,genre
# Values must not contain the delimiter (no quoting is supported)
path = "data/metadata.csv"

[output]
table = "results/statistics.csv"
report = "results/report.txt"
# json = "results/statistics.json"

[text]
delimiter = ","
missing_value_sentinel = "Неизвестно"
# "whitespace" keeps punctuation attached ("слово," is one word)
# "strip-punctuation" removes ,.-—;:'?! before splitting
tokenization = "whitespace"

[pos]
# mystem (external analyzer), suffix (built-in heuristic) or none
tagger = "mystem"
mystem_path = "mystem"
timeout_secs = 60

[report]
emoji = true
"#;
