//! Document discovery and loading
//!
//! Only the top level of the corpus directory is read. Filenames are sorted
//! lexicographically so report order and tie-breaks do not depend on the
//! platform's directory listing.

use crate::error::{CorpusError, CorpusResult, LoadFailure, LoadFailureKind};
use crate::models::Document;
use ignore::WalkBuilder;
use std::path::Path;
use tracing::{debug, warn};

/// Result of loading a corpus directory
#[derive(Debug, Clone, Default)]
pub struct CorpusLoad {
    /// Files matching the suffix
    pub discovered: usize,
    /// Successfully read documents, in filename order
    pub documents: Vec<Document>,
    /// Files that were discovered but could not be read
    pub skipped: Vec<LoadFailure>,
}

impl CorpusLoad {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Files found in the corpus directory
#[derive(Debug, Clone, Default)]
struct Listing {
    names: Vec<String>,
    /// Matching files whose names cannot be represented as UTF-8
    unnamed: Vec<LoadFailure>,
}

fn scan(dir: &Path, suffix: &str) -> CorpusResult<Listing> {
    if !dir.is_dir() {
        return Err(CorpusError::CorpusDirMissing(dir.to_path_buf()));
    }

    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .standard_filters(false)
        .follow_links(true)
        .build();

    let mut listing = Listing::default();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == Some(0) => {
                return Err(CorpusError::ListCorpus {
                    path: dir.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        if entry.depth() == 0 || !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let raw = entry.file_name();
        if !raw.as_encoded_bytes().ends_with(suffix.as_bytes()) {
            continue;
        }
        match raw.to_str() {
            Some(name) => listing.names.push(name.to_string()),
            None => listing.unnamed.push(LoadFailure {
                filename: raw.to_string_lossy().into_owned(),
                kind: LoadFailureKind::InvalidName,
            }),
        }
    }

    listing.names.sort();
    listing.unnamed.sort_by(|a, b| a.filename.cmp(&b.filename));
    debug!(
        "Found {} '{}' files in {}",
        listing.names.len() + listing.unnamed.len(),
        suffix,
        dir.display()
    );
    Ok(listing)
}

/// List files in `dir` whose name ends with `suffix`, sorted by name.
///
/// Hidden files and ignore files get no special treatment: everything in
/// the directory is a candidate. Names that are not valid UTF-8 are left
/// out here; `load_corpus` reports them as skipped.
pub fn list_documents(dir: &Path, suffix: &str) -> CorpusResult<Vec<String>> {
    let listing = scan(dir, suffix)?;
    for failure in &listing.unnamed {
        warn!("Skipping {}", failure);
    }
    Ok(listing.names)
}

/// Read one document as UTF-8 text
pub fn load_document(dir: &Path, filename: &str) -> Result<Document, LoadFailure> {
    std::fs::read_to_string(dir.join(filename))
        .map(|text| Document::new(filename, text))
        .map_err(|e| LoadFailure::from_io(filename, &e))
}

/// Discover and read every document. Unreadable files are skipped with a
/// warning and reported in `skipped`.
pub fn load_corpus(dir: &Path, suffix: &str) -> CorpusResult<CorpusLoad> {
    let listing = scan(dir, suffix)?;
    let mut load = CorpusLoad {
        discovered: listing.names.len() + listing.unnamed.len(),
        ..Default::default()
    };
    for failure in listing.unnamed {
        warn!("Skipping {}", failure);
        load.skipped.push(failure);
    }

    for name in listing.names {
        match load_document(dir, &name) {
            Ok(doc) => load.documents.push(doc),
            Err(failure) => {
                warn!("Skipping {}", failure);
                load.skipped.push(failure);
            }
        }
    }

    Ok(load)
}
