//! Corpus analysis pipeline
//!
//! Orchestrates one run:
//! 1. Discover and load documents
//! 2. Compute per-document metrics (parallel, order preserved)
//! 3. Join with the metadata table
//! 4. Aggregate the corpus summary
//! 5. Write the table, then the narrative report, then the optional JSON

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use crate::config::{CorpusConfig, TextOptions};
use crate::corpus;
use crate::enrich;
use crate::error::{LoadFailure, RowIssue};
use crate::metadata::MetadataIndex;
use crate::models::{CorpusSummary, Document, EnrichedRecord, MetricRecord};
use crate::pos::{self, PosConfig, PosTagger};
use crate::reporters::{self, OutputFormat, ReportContext};

/// Called after each document with (filename, done, total)
pub type ProgressCallback = Box<dyn Fn(&str, usize, usize) + Send + Sync>;

pub const DEFAULT_WORKERS: usize = 4;

/// Where lexical density comes from
enum DensitySource {
    /// Select a tagger from settings when the run starts
    Config(PosConfig),
    /// Use this tagger as is
    Tagger(Box<dyn PosTagger>),
    /// Density switched off
    Off,
}

/// Full corpus analysis pipeline.
pub struct Pipeline {
    corpus_dir: PathBuf,
    suffix: String,
    metadata_path: PathBuf,
    table_path: PathBuf,
    report_path: PathBuf,
    json_path: Option<PathBuf>,
    text: TextOptions,
    density: DensitySource,
    emoji: bool,
    workers: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Pipeline {
    /// Create a pipeline from loaded configuration.
    pub fn from_config(config: &CorpusConfig) -> Self {
        Self {
            corpus_dir: config.corpus.dir.clone(),
            suffix: config.corpus.suffix.clone(),
            metadata_path: config.metadata.path.clone(),
            table_path: config.output.table.clone(),
            report_path: config.output.report.clone(),
            json_path: config.output.json.clone(),
            text: config.text.clone(),
            density: DensitySource::Config(config.pos.clone()),
            emoji: config.report.emoji,
            workers: DEFAULT_WORKERS,
            progress_callback: None,
        }
    }

    pub fn with_corpus_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.corpus_dir = dir.into();
        self
    }

    pub fn with_metadata(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_path = path.into();
        self
    }

    pub fn with_table_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.table_path = path.into();
        self
    }

    pub fn with_report_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    pub fn with_json_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.json_path = Some(path.into());
        self
    }

    /// Use a specific tagger instead of selecting one from settings.
    pub fn with_tagger(mut self, tagger: Box<dyn PosTagger>) -> Self {
        self.density = DensitySource::Tagger(tagger);
        self
    }

    /// Skip lexical density entirely; density columns are left out.
    pub fn without_density(mut self) -> Self {
        self.density = DensitySource::Off;
        self
    }

    pub fn without_emoji(mut self) -> Self {
        self.emoji = false;
        self
    }

    /// Set the number of worker threads for metric computation.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Run the pipeline.
    ///
    /// Per-document and per-row problems are logged and collected in the
    /// result. Errors are a missing corpus directory and output write
    /// failures; a failed table write stops the run before the report.
    pub fn run(&self) -> Result<RunOutcome> {
        let load = corpus::load_corpus(&self.corpus_dir, &self.suffix)
            .with_context(|| format!("Failed to load corpus {}", self.corpus_dir.display()))?;

        if load.is_empty() {
            warn!(
                "No readable '{}' documents in {} ({} discovered, {} skipped)",
                self.suffix,
                self.corpus_dir.display(),
                load.discovered,
                load.skipped.len()
            );
            return Ok(RunOutcome::EmptyCorpus {
                discovered: load.discovered,
                skipped: load.skipped,
                summary: enrich::summarize(&[]),
            });
        }
        info!(
            "Loaded {} of {} documents from {}",
            load.documents.len(),
            load.discovered,
            self.corpus_dir.display()
        );

        let selected;
        let tagger: Option<&dyn PosTagger> = match &self.density {
            DensitySource::Config(pos_config) => {
                selected = pos::select_tagger(pos_config);
                Some(selected.as_ref())
            }
            DensitySource::Tagger(tagger) => Some(tagger.as_ref()),
            DensitySource::Off => None,
        };
        let tagger_name = tagger.map(|t| t.name()).unwrap_or("off");
        debug!("Lexical density via {}", tagger_name);

        let metrics = self.compute_metrics(&load.documents, tagger)?;

        let index = MetadataIndex::load(&self.metadata_path, self.text.delimiter);
        debug!("{} metadata rows indexed", index.len());
        let records = enrich::enrich_all(metrics, &index, &self.text.missing_value_sentinel);
        let summary = enrich::summarize(&records);

        let ctx = ReportContext {
            skipped: load.skipped.len(),
            delimiter: self.text.delimiter,
            emoji: self.emoji,
            ..ReportContext::new(&self.corpus_dir)
        };

        self.write(OutputFormat::Table, &self.table_path, &records, &summary, &ctx)?;
        self.write(OutputFormat::Text, &self.report_path, &records, &summary, &ctx)?;
        if let Some(json_path) = &self.json_path {
            self.write(OutputFormat::Json, json_path, &records, &summary, &ctx)?;
        }

        Ok(RunOutcome::Completed(RunReport {
            records,
            summary,
            skipped: load.skipped,
            metadata_issues: index.issues().to_vec(),
            tagger: tagger_name.to_string(),
            table_path: self.table_path.clone(),
            report_path: self.report_path.clone(),
            json_path: self.json_path.clone(),
        }))
    }

    /// Metrics for every document, in input order.
    fn compute_metrics(
        &self,
        documents: &[Document],
        tagger: Option<&dyn PosTagger>,
    ) -> Result<Vec<MetricRecord>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .context("Failed to build worker pool")?;

        let completed = AtomicUsize::new(0);
        let total = documents.len();
        let text = &self.text;
        let progress = self.progress_callback.as_ref();

        // par_iter().collect() keeps the discovery order
        let metrics = pool.install(|| {
            documents
                .par_iter()
                .map(|doc| {
                    let record = enrich::metric_record(doc, text, tagger);
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(callback) = progress {
                        callback(&doc.filename, done, total);
                    }
                    record
                })
                .collect()
        });
        Ok(metrics)
    }

    fn write(
        &self,
        format: OutputFormat,
        path: &Path,
        records: &[EnrichedRecord],
        summary: &CorpusSummary,
        ctx: &ReportContext,
    ) -> Result<()> {
        let contents = reporters::render(format, records, summary, ctx)
            .with_context(|| format!("Failed to render {} output", format))?;
        reporters::write_output(path, &contents)
            .with_context(|| format!("Failed to write {} output", format))?;
        info!("Wrote {} output to {}", format, path.display());
        Ok(())
    }
}

/// What a run produced
#[derive(Debug)]
pub enum RunOutcome {
    /// No document could be loaded; nothing was written
    EmptyCorpus {
        discovered: usize,
        skipped: Vec<LoadFailure>,
        /// Zero totals, no extremes
        summary: CorpusSummary,
    },
    Completed(RunReport),
}

/// Results of a completed run
#[derive(Debug)]
pub struct RunReport {
    pub records: Vec<EnrichedRecord>,
    pub summary: CorpusSummary,
    /// Documents that were discovered but could not be read
    pub skipped: Vec<LoadFailure>,
    pub metadata_issues: Vec<RowIssue>,
    /// Name of the tagger used, `off` when density was disabled
    pub tagger: String,
    pub table_path: PathBuf,
    pub report_path: PathBuf,
    pub json_path: Option<PathBuf>,
}

impl RunReport {
    /// One-line summary.
    pub fn summary_line(&self) -> String {
        let mut parts = vec![
            format!("{} files", self.summary.total_files),
            format!("{} words", self.summary.total_words),
            format!("{} unique", self.summary.total_unique_words),
        ];
        if !self.skipped.is_empty() {
            parts.push(format!("{} skipped", self.skipped.len()));
        }
        if !self.metadata_issues.is_empty() {
            parts.push(format!("{} malformed metadata rows", self.metadata_issues.len()));
        }
        parts.join(", ")
    }
}
