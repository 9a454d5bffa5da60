//! corpuslens - descriptive statistics for a folder of texts
//!
//! Computes per-document word, line and lexical-density metrics, joins them
//! with a bibliographic metadata table, and writes a delimited table and a
//! narrative report.
//!
//! ```no_run
//! use corpuslens::config::CorpusConfig;
//! use corpuslens::pipeline::{Pipeline, RunOutcome};
//!
//! let outcome = Pipeline::from_config(&CorpusConfig::default()).run()?;
//! if let RunOutcome::Completed(report) = outcome {
//!     println!("{}", report.summary_line());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod corpus;
pub mod enrich;
pub mod error;
pub mod metadata;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod pos;
pub mod reporters;
