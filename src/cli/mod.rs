//! CLI command definitions and handlers

mod analyze;
mod doctor;
mod init;
mod words;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use corpuslens::config::{self, CorpusConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// corpuslens - descriptive statistics for a folder of texts
#[derive(Parser, Debug)]
#[command(name = "corpuslens")]
#[command(
    version,
    about = "Descriptive statistics for a corpus of plain-text documents",
    long_about = "corpuslens reads every text in a corpus folder, computes word counts, \
type-token ratio, line counts, average word length and part-of-speech lexical density, \
joins them with a metadata table (filename,title,author,year,genre) and writes a \
statistics table plus a narrative report.\n\n\
Run without a subcommand to analyze ./corpus with the settings from corpuslens.toml.",
    after_help = "\
Examples:
  corpuslens                                 Analyze ./corpus with defaults
  corpuslens analyze texts --tagger suffix   Built-in tagger, no mystem needed
  corpuslens analyze --json out/stats.json   Also write a JSON dump
  corpuslens words corpus/poem.txt --top 20  Most frequent words of one file
  corpuslens doctor                          Check tagger and paths"
)]
pub struct Cli {
    /// Config file (default: corpuslens.toml or .corpuslensrc.json in the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64)
    #[arg(long, global = true, default_value = "4", value_parser = parse_workers)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a corpus and write the statistics table and report
    #[command(after_help = "\
Examples:
  corpuslens analyze                              ./corpus, results/ outputs
  corpuslens analyze texts --metadata meta.csv    Custom corpus and metadata
  corpuslens analyze --tokenize strip-punctuation Strip ,.-—;:'?! before counting
  corpuslens analyze --no-density                 Skip part-of-speech density")]
    Analyze(AnalyzeArgs),

    /// Show the most frequent words of one file
    Words {
        /// Text file to count
        file: PathBuf,

        /// Number of words to show
        #[arg(long, short = 'n', default_value = "10")]
        top: usize,

        /// Count stopwords too
        #[arg(long)]
        keep_stopwords: bool,
    },

    /// Check environment setup (tagger, corpus and metadata paths)
    Doctor,

    /// Write a corpuslens.toml with the default settings
    Init {
        /// Directory to write the config into
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing corpuslens.toml
        #[arg(long)]
        force: bool,
    },

    /// Show version information
    Version,
}

/// Flags for `analyze`; each one overrides the config file
#[derive(Args, Debug, Default, Clone)]
pub struct AnalyzeArgs {
    /// Corpus folder (default: corpus)
    #[arg(value_name = "CORPUS_DIR")]
    pub corpus_dir: Option<PathBuf>,

    /// Metadata table (default: data/metadata.csv)
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Statistics table output (default: results/statistics.csv)
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Narrative report output (default: results/report.txt)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Also write records and summary as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Only read files ending with this suffix (default: .txt)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Part-of-speech tagger: mystem, suffix or none
    #[arg(long, value_parser = ["mystem", "suffix", "none"])]
    pub tagger: Option<String>,

    /// mystem executable
    #[arg(long)]
    pub mystem_path: Option<PathBuf>,

    /// Tokenization: whitespace or strip-punctuation
    #[arg(long, value_parser = ["whitespace", "strip-punctuation"])]
    pub tokenize: Option<String>,

    /// Skip lexical density; density columns are left out
    #[arg(long)]
    pub no_density: bool,

    /// Disable emoji in the report and console output
    #[arg(long)]
    pub no_emoji: bool,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Analyze(args)) => {
            let config = load_config(cli.config.as_deref())?;
            analyze::run(config, &args, cli.workers)
        }

        Some(Commands::Words {
            file,
            top,
            keep_stopwords,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            words::run(&config, &file, top, keep_stopwords)
        }

        Some(Commands::Doctor) => {
            let config = load_config(cli.config.as_deref())?;
            doctor::run(&config)
        }

        Some(Commands::Init { dir, force }) => init::run(&dir, force),

        Some(Commands::Version) => {
            println!("corpuslens {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }

        None => {
            let config = load_config(cli.config.as_deref())?;
            analyze::run(config, &AnalyzeArgs::default(), cli.workers)
        }
    }
}

/// An explicit `--config` must load; otherwise search the working directory
fn load_config(explicit: Option<&Path>) -> Result<CorpusConfig> {
    match explicit {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            config::load_config_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        }
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            Ok(config::load_corpus_config(&cwd))
        }
    }
}
