//! Enrichment and aggregation
//!
//! Turns documents into metric records, joins them with metadata and folds
//! the result into a `CorpusSummary`.

use crate::config::TextOptions;
use crate::metadata::MetadataIndex;
use crate::metrics;
use crate::models::{
    AuthorGroup, CorpusSummary, DensityMode, Document, EnrichedRecord, MetricRecord,
};
use crate::pos::{self, DensityProfile, PosTagger};
use indexmap::IndexMap;

/// Compute every metric for one document.
///
/// `tagger = None` means density is switched off for the run: the record
/// gets zero densities marked `DensityMode::Disabled`.
pub fn metric_record(
    doc: &Document,
    options: &TextOptions,
    tagger: Option<&dyn PosTagger>,
) -> MetricRecord {
    let mode = options.tokenization;
    let text = doc.text.as_str();

    let density = match tagger {
        Some(tagger) => pos::analyze_density(&doc.filename, text, tagger),
        None => DensityProfile::zeroed(DensityMode::Disabled),
    };

    MetricRecord {
        filename: doc.filename.clone(),
        word_count: metrics::word_count(text, mode),
        unique_words: metrics::unique_words(text, mode),
        ttr: metrics::type_token_ratio(text, mode),
        line_count: metrics::line_count(text),
        avg_word_length: metrics::average_word_length(text, mode),
        lexical_density: density.lexical,
        noun_density: density.noun,
        adj_density: density.adjective,
        verb_density: density.verb,
        density_mode: density.mode,
    }
}

/// Merge a metric record with its metadata. Fields the table does not
/// provide (no row, or an empty value) become `sentinel`.
pub fn enrich(metrics: MetricRecord, index: &MetadataIndex, sentinel: &str) -> EnrichedRecord {
    let meta = index.get(&metrics.filename);
    let field = |value: Option<&Option<String>>| {
        value
            .and_then(|v| v.as_deref())
            .unwrap_or(sentinel)
            .to_string()
    };

    EnrichedRecord {
        title: field(meta.map(|m| &m.title)),
        author: field(meta.map(|m| &m.author)),
        year: field(meta.map(|m| &m.year)),
        genre: field(meta.map(|m| &m.genre)),
        metrics,
    }
}

pub fn enrich_all(
    records: Vec<MetricRecord>,
    index: &MetadataIndex,
    sentinel: &str,
) -> Vec<EnrichedRecord> {
    records
        .into_iter()
        .map(|m| enrich(m, index, sentinel))
        .collect()
}

/// Group records by author in first-appearance order. The sentinel is a
/// group like any other.
pub fn group_by_author(records: &[EnrichedRecord]) -> IndexMap<String, AuthorGroup> {
    let mut groups: IndexMap<String, AuthorGroup> = IndexMap::new();
    for record in records {
        let group = groups.entry(record.author.clone()).or_default();
        group.count += 1;
        group.files.push(record.filename().to_string());
    }
    groups
}

/// Running maximum; the first record wins a tie
#[derive(Debug, Default)]
struct Extreme<T> {
    best: Option<(T, usize)>,
}

impl<T: PartialOrd + Copy> Extreme<T> {
    fn offer(mut self, value: T, index: usize) -> Self {
        match self.best {
            Some((best, _)) if value <= best => {}
            _ => self.best = Some((value, index)),
        }
        self
    }

    fn index(&self) -> Option<usize> {
        self.best.map(|(_, i)| i)
    }
}

#[derive(Debug, Default)]
struct Totals {
    files: usize,
    words: usize,
    unique_words: usize,
    ttr_sum: f64,
    tagged: usize,
    density_sum: f64,
    any_density: bool,
    max_words: Extreme<usize>,
    max_ttr: Extreme<f64>,
    max_density: Extreme<f64>,
}

impl Totals {
    fn add(self, (index, record): (usize, &EnrichedRecord)) -> Self {
        let m = &record.metrics;
        let tagged = m.density_mode == DensityMode::Tagged;
        Self {
            files: self.files + 1,
            words: self.words + m.word_count,
            unique_words: self.unique_words + m.unique_words,
            ttr_sum: self.ttr_sum + m.ttr,
            tagged: self.tagged + usize::from(tagged),
            density_sum: self.density_sum + if tagged { m.lexical_density } else { 0.0 },
            any_density: self.any_density || (tagged && m.lexical_density > 0.0),
            max_words: self.max_words.offer(m.word_count, index),
            max_ttr: self.max_ttr.offer(m.ttr, index),
            max_density: if tagged {
                self.max_density.offer(m.lexical_density, index)
            } else {
                self.max_density
            },
        }
    }
}

/// Corpus-wide statistics. An empty slice gives zero totals and no
/// extremal files.
pub fn summarize(records: &[EnrichedRecord]) -> CorpusSummary {
    let totals = records.iter().enumerate().fold(Totals::default(), Totals::add);
    let name = |index: Option<usize>| index.map(|i| records[i].filename().to_string());

    let average_ttr = if totals.files == 0 {
        0.0
    } else {
        totals.ttr_sum / totals.files as f64
    };
    // Averaging all-zero densities would report a misleading 0
    let average_lexical_density = (totals.any_density && totals.tagged > 0)
        .then(|| totals.density_sum / totals.tagged as f64);
    let file_with_max_lexical_density = if average_lexical_density.is_some() {
        name(totals.max_density.index())
    } else {
        None
    };

    CorpusSummary {
        total_files: totals.files,
        total_words: totals.words,
        total_unique_words: totals.unique_words,
        average_ttr,
        average_lexical_density,
        file_with_max_word_count: name(totals.max_words.index()),
        file_with_max_ttr: name(totals.max_ttr.index()),
        file_with_max_lexical_density,
        per_author_counts: group_by_author(records),
    }
}
