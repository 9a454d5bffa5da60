//! Error types for corpus analysis
//!
//! Per-document and per-row problems are values (`LoadFailure`, `RowIssue`)
//! that callers collect and log. Only the failures a run cannot recover
//! from are `CorpusError`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a pipeline step
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Corpus directory not found: {}", .0.display())]
    CorpusDirMissing(PathBuf),

    #[error("Failed to list corpus directory {}: {source}", path.display())]
    ListCorpus {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type CorpusResult<T> = Result<T, CorpusError>;

/// Why a discovered document could not be loaded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadFailureKind {
    #[error("file not found")]
    NotFound,

    #[error("file is not valid UTF-8")]
    InvalidUtf8,

    #[error("filename is not valid UTF-8")]
    InvalidName,

    #[error("{0}")]
    Io(String),
}

/// A document that was discovered but could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{filename}: {kind}")]
pub struct LoadFailure {
    pub filename: String,
    pub kind: LoadFailureKind,
}

impl LoadFailure {
    pub fn from_io(filename: impl Into<String>, err: &std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => LoadFailureKind::NotFound,
            std::io::ErrorKind::InvalidData => LoadFailureKind::InvalidUtf8,
            _ => LoadFailureKind::Io(err.to_string()),
        };
        Self {
            filename: filename.into(),
            kind,
        }
    }
}

/// Shape problem in a metadata table row
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowIssueKind {
    #[error("expected {expected} values, found {found}; padded with empty values")]
    Short { expected: usize, found: usize },

    #[error("expected {expected} values, found {found}; extra values dropped")]
    Long { expected: usize, found: usize },
}

/// A metadata row that did not match the header width (1-indexed file line)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct RowIssue {
    pub line: usize,
    pub kind: RowIssueKind,
}

/// Errors from a part-of-speech tagger
#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("{tagger} is unavailable: {reason}")]
    Unavailable { tagger: String, reason: String },

    #[error("Failed to run {tagger}: {source}")]
    Spawn {
        tagger: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tagger} timed out after {secs}s")]
    Timeout { tagger: String, secs: u64 },

    #[error("{tagger} exited with status {status}: {stderr}")]
    Failed {
        tagger: String,
        status: i32,
        stderr: String,
    },

    #[error("Unreadable output from {tagger}: {detail}")]
    BadOutput { tagger: String, detail: String },
}
