//! Configuration module for corpuslens
//!
//! This module handles:
//! - Run configuration (corpuslens.toml / .corpuslensrc.json)
//! - Text handling options (delimiter, stopwords, missing-value sentinel)
//! - Part-of-speech tagger selection

mod corpus_config;

pub use corpus_config::{
    CorpusConfig,
    CorpusSection,
    MetadataSection,
    OutputSection,
    ReportSection,
    TextOptions,
    CONFIG_FILE_NAMES,
    DEFAULT_SENTINEL,
    SAMPLE_CONFIG,
    load_config_file,
    load_corpus_config,
};
