//! Delimited table writer
//!
//! One header line, then one line per record. Columns follow a fixed order
//! and a column with no value in any record is left out entirely. Values
//! are not quoted, so a value containing the delimiter breaks the row
//! shape; this is logged, not repaired.

use crate::models::{DensityMode, EnrichedRecord};
use crate::pos::round4;
use anyhow::Result;
use tracing::warn;

/// Table columns in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Filename,
    Title,
    Author,
    Year,
    Genre,
    WordCount,
    UniqueWords,
    Ttr,
    LineCount,
    AvgWordLength,
    LexicalDensity,
    NounDensity,
    AdjDensity,
    VerbDensity,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::Filename,
        Column::Title,
        Column::Author,
        Column::Year,
        Column::Genre,
        Column::WordCount,
        Column::UniqueWords,
        Column::Ttr,
        Column::LineCount,
        Column::AvgWordLength,
        Column::LexicalDensity,
        Column::NounDensity,
        Column::AdjDensity,
        Column::VerbDensity,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Filename => "filename",
            Column::Title => "title",
            Column::Author => "author",
            Column::Year => "year",
            Column::Genre => "genre",
            Column::WordCount => "word_count",
            Column::UniqueWords => "unique_words",
            Column::Ttr => "ttr",
            Column::LineCount => "line_count",
            Column::AvgWordLength => "avg_word_length",
            Column::LexicalDensity => "lexical_density",
            Column::NounDensity => "noun_density",
            Column::AdjDensity => "adj_density",
            Column::VerbDensity => "verb_density",
        }
    }

    fn is_density(&self) -> bool {
        matches!(
            self,
            Column::LexicalDensity | Column::NounDensity | Column::AdjDensity | Column::VerbDensity
        )
    }

    /// Formatted cell value; `None` when the record does not carry this field
    pub fn value(&self, record: &EnrichedRecord) -> Option<String> {
        let m = &record.metrics;
        if self.is_density() && m.density_mode == DensityMode::Disabled {
            return None;
        }
        let value = match self {
            Column::Filename => m.filename.clone(),
            Column::Title => record.title.clone(),
            Column::Author => record.author.clone(),
            Column::Year => record.year.clone(),
            Column::Genre => record.genre.clone(),
            Column::WordCount => m.word_count.to_string(),
            Column::UniqueWords => m.unique_words.to_string(),
            Column::Ttr => natural_float(m.ttr),
            Column::LineCount => m.line_count.to_string(),
            Column::AvgWordLength => natural_float(m.avg_word_length),
            Column::LexicalDensity => natural_float(round4(m.lexical_density)),
            Column::NounDensity => natural_float(round4(m.noun_density)),
            Column::AdjDensity => natural_float(round4(m.adj_density)),
            Column::VerbDensity => natural_float(round4(m.verb_density)),
        };
        Some(value)
    }
}

/// Shortest plain decimal that reads back to the same value, keeping
/// `.0` on whole numbers (`1.0`, `0.8333333333333334`). Never uses
/// exponent notation, so tiny ratios stay `0.000005` rather than `5e-6`.
pub fn natural_float(value: f64) -> String {
    let mut out = value.to_string();
    if value.is_finite() && !out.contains('.') {
        out.push_str(".0");
    }
    out
}

/// Columns that have a value in at least one record
pub fn present_columns(records: &[EnrichedRecord]) -> Vec<Column> {
    Column::ALL
        .iter()
        .copied()
        .filter(|c| records.iter().any(|r| c.value(r).is_some()))
        .collect()
}

/// Render the table. No records gives an empty string.
pub fn render(records: &[EnrichedRecord], delimiter: char) -> Result<String> {
    let columns = present_columns(records);
    if columns.is_empty() {
        return Ok(String::new());
    }

    let sep = delimiter.to_string();
    let mut out = String::new();
    let headers: Vec<&str> = columns.iter().map(|c| c.header()).collect();
    out.push_str(&headers.join(&sep));
    out.push('\n');

    for record in records {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| {
                let cell = c.value(record).unwrap_or_default();
                if cell.contains(delimiter) {
                    warn!(
                        "{}: {} value contains the delimiter '{}'; the row will be misaligned",
                        record.filename(),
                        c.header(),
                        delimiter
                    );
                }
                cell
            })
            .collect();
        out.push_str(&cells.join(&sep));
        out.push('\n');
    }

    Ok(out)
}
