//! Analyze command - run the corpus pipeline and print a summary

use super::AnalyzeArgs;
use anyhow::Result;
use console::style;
use corpuslens::config::CorpusConfig;
use corpuslens::metrics::Tokenization;
use corpuslens::pipeline::{Pipeline, RunOutcome, RunReport};
use corpuslens::pos::TaggerKind;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// Fold command-line flags into the loaded configuration (flag > file)
pub(super) fn apply_overrides(config: &mut CorpusConfig, args: &AnalyzeArgs) -> Result<()> {
    if let Some(dir) = &args.corpus_dir {
        config.corpus.dir = dir.clone();
    }
    if let Some(path) = &args.metadata {
        config.metadata.path = path.clone();
    }
    if let Some(path) = &args.table {
        config.output.table = path.clone();
    }
    if let Some(path) = &args.report {
        config.output.report = path.clone();
    }
    if let Some(path) = &args.json {
        config.output.json = Some(path.clone());
    }
    if let Some(suffix) = &args.suffix {
        config.corpus.suffix = suffix.clone();
    }
    if let Some(tagger) = &args.tagger {
        config.pos.tagger = tagger.parse::<TaggerKind>()?;
    }
    if let Some(path) = &args.mystem_path {
        config.pos.mystem_path = path.clone();
    }
    if let Some(mode) = &args.tokenize {
        config.text.tokenization = mode.parse::<Tokenization>()?;
    }
    if args.no_emoji {
        config.report.emoji = false;
    }
    Ok(())
}

fn create_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░  ")
}

/// Run the analyze command
pub fn run(mut config: CorpusConfig, args: &AnalyzeArgs, workers: usize) -> Result<()> {
    apply_overrides(&mut config, args)?;
    config.validate()?;
    let emoji = config.report.emoji;
    let icon = |glyph: &'static str| if emoji { glyph } else { "" };

    println!(
        "\n{}Analyzing {}\n",
        icon("📚 "),
        style(config.corpus.dir.display()).cyan()
    );
    debug!(
        "tagger={} tokenization={} workers={}",
        config.pos.tagger, config.text.tokenization, workers
    );

    let bar = ProgressBar::new(0);
    bar.set_style(create_bar_style());
    let bar_for_callback = bar.clone();

    let mut pipeline = Pipeline::from_config(&config)
        .with_workers(workers)
        .with_progress(Box::new(move |name: &str, done: usize, total: usize| {
            bar_for_callback.set_length(total as u64);
            bar_for_callback.set_position(done as u64);
            bar_for_callback.set_message(name.to_string());
        }));
    if args.no_density {
        pipeline = pipeline.without_density();
    }

    let outcome = pipeline.run();
    bar.finish_and_clear();

    match outcome? {
        RunOutcome::EmptyCorpus {
            discovered,
            skipped,
            ..
        } => {
            eprintln!(
                "{}{} No readable '{}' documents in {} ({} found, {} unreadable). Nothing written.",
                icon("⚠️  "),
                style("Empty corpus:").yellow().bold(),
                config.corpus.suffix,
                config.corpus.dir.display(),
                discovered,
                skipped.len()
            );
            std::process::exit(1);
        }
        RunOutcome::Completed(report) => {
            print_summary(&report, emoji);
            Ok(())
        }
    }
}

fn print_summary(report: &RunReport, emoji: bool) {
    let icon = |glyph: &'static str| if emoji { glyph } else { "" };
    let summary = &report.summary;

    println!("{}", "=".repeat(60));
    println!("{}{}", icon("📊 "), style("Corpus summary").bold());
    println!("{}", "=".repeat(60));
    println!("  Files analyzed:     {}", summary.total_files);
    println!("  Total words:        {}", summary.total_words);
    println!("  Unique words:       {}", summary.total_unique_words);
    println!("  Words per file:     {:.2}", summary.average_words());
    match summary.average_lexical_density {
        Some(avg) => println!("  Lexical density:    {:.2}%", avg * 100.0),
        None => println!(
            "  Lexical density:    {} (tagger: {})",
            style("n/a").dim(),
            report.tagger
        ),
    }
    if !report.skipped.is_empty() {
        println!(
            "  {} {} unreadable file(s) skipped",
            style("!").yellow(),
            report.skipped.len()
        );
        for failure in &report.skipped {
            println!("    - {}", failure);
        }
    }
    if !report.metadata_issues.is_empty() {
        println!(
            "  {} {} malformed metadata row(s)",
            style("!").yellow(),
            report.metadata_issues.len()
        );
    }

    println!("\n{}Results written:", icon("📁 "));
    println!(
        "  {} {}",
        style("✓").green(),
        style(report.table_path.display()).cyan()
    );
    println!(
        "  {} {}",
        style("✓").green(),
        style(report.report_path.display()).cyan()
    );
    if let Some(json) = &report.json_path {
        println!("  {} {}", style("✓").green(), style(json.display()).cyan());
    }
    debug!("{}", report.summary_line());
}
