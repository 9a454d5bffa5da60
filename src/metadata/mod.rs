//! Metadata table loading
//!
//! Reads a delimited table whose first line is the header row. Values map to
//! headers by position. There is no quoting: a value containing the
//! delimiter shifts every later column, so metadata must not contain it.
//!
//! Rows narrower than the header are padded with empty values and rows
//! wider than the header lose their extra values. Both are reported as a
//! `RowIssue` rather than failing the load.

use crate::error::{RowIssue, RowIssueKind};
use crate::models::MetadataRecord;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// One data row: column name to value, in header order
pub type TableRow = IndexMap<String, String>;

/// Column that identifies the document a metadata row belongs to
pub const FILENAME_COLUMN: &str = "filename";

/// A parsed table plus the shape problems found on the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
    pub issues: Vec<RowIssue>,
}

/// Parse table text. Blank lines are skipped; surrounding whitespace is
/// trimmed from every header and value.
pub fn parse_table(content: &str, delimiter: char) -> ParsedTable {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let Some((_, header_line)) = lines.next() else {
        return ParsedTable::default();
    };
    let headers: Vec<String> = header_line
        .split(delimiter)
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = ParsedTable {
        headers,
        ..Default::default()
    };

    for (line_no, line) in lines {
        let mut values: Vec<String> = line.split(delimiter).map(|v| v.trim().to_string()).collect();
        let expected = table.headers.len();
        let found = values.len();

        if found < expected {
            table.issues.push(RowIssue {
                line: line_no,
                kind: RowIssueKind::Short { expected, found },
            });
            values.resize(expected, String::new());
        } else if found > expected {
            table.issues.push(RowIssue {
                line: line_no,
                kind: RowIssueKind::Long { expected, found },
            });
            values.truncate(expected);
        }

        let row: TableRow = table.headers.iter().cloned().zip(values).collect();
        table.rows.push(row);
    }

    table
}

/// Read and parse a table file. A missing or unreadable file yields an
/// empty table and a warning.
pub fn read_table(path: &Path, delimiter: char) -> ParsedTable {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Metadata file not found: {}", path.display());
            return ParsedTable::default();
        }
        Err(e) => {
            warn!("Failed to read metadata file {}: {}", path.display(), e);
            return ParsedTable::default();
        }
    };

    let table = parse_table(&content, delimiter);
    for issue in &table.issues {
        warn!("{}: malformed row at {}", path.display(), issue);
    }
    debug!(
        "Read {} metadata rows from {}",
        table.rows.len(),
        path.display()
    );
    table
}

/// Metadata records keyed by filename
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    records: HashMap<String, MetadataRecord>,
    issues: Vec<RowIssue>,
}

impl MetadataIndex {
    /// Load the table at `path` and index it. Never fails.
    pub fn load(path: &Path, delimiter: char) -> Self {
        Self::from_table(read_table(path, delimiter))
    }

    /// Index parsed rows by their `filename` column. Rows without a
    /// filename are skipped; a later row for the same file replaces an
    /// earlier one. Empty values are stored as absent.
    pub fn from_table(table: ParsedTable) -> Self {
        if !table.headers.is_empty() && !table.headers.iter().any(|h| h == FILENAME_COLUMN) {
            warn!(
                "Metadata table has no '{}' column; metadata will be ignored",
                FILENAME_COLUMN
            );
        }

        let mut records = HashMap::new();
        for row in &table.rows {
            let Some(filename) = non_empty(row, FILENAME_COLUMN) else {
                debug!("Skipping metadata row without a filename");
                continue;
            };
            let record = MetadataRecord {
                filename: filename.clone(),
                title: non_empty(row, "title"),
                author: non_empty(row, "author"),
                year: non_empty(row, "year"),
                genre: non_empty(row, "genre"),
            };
            if records.insert(filename.clone(), record).is_some() {
                debug!("Duplicate metadata row for {}; keeping the last one", filename);
            }
        }

        Self {
            records,
            issues: table.issues,
        }
    }

    pub fn get(&self, filename: &str) -> Option<&MetadataRecord> {
        self.records.get(filename)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Shape problems found while parsing the table
    pub fn issues(&self) -> &[RowIssue] {
        &self.issues
    }
}

fn non_empty(row: &TableRow, column: &str) -> Option<String> {
    row.get(column).filter(|v| !v.is_empty()).cloned()
}
