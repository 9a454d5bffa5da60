//! Words command - frequency list for a single document

use anyhow::{Context, Result};
use console::style;
use corpuslens::config::CorpusConfig;
use corpuslens::metrics;
use std::path::Path;

pub fn run(config: &CorpusConfig, file: &Path, top: usize, keep_stopwords: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let stopwords = (!keep_stopwords).then_some(&config.text.stopwords);
    let ranked = metrics::most_common_words(&text, top, config.text.tokenization, stopwords);

    println!(
        "\n{} {} ({} words)\n",
        style("Most frequent words in").bold(),
        style(file.display()).cyan(),
        metrics::word_count(&text, config.text.tokenization)
    );
    if ranked.is_empty() {
        println!("  {}", style("No words found").dim());
        return Ok(());
    }

    for line in ranking_lines(&ranked) {
        println!("{}", line);
    }
    Ok(())
}

/// Numbered lines with counts aligned in one column
fn ranking_lines(ranked: &[(String, usize)]) -> Vec<String> {
    let width = ranked
        .iter()
        .map(|(w, _)| w.chars().count())
        .max()
        .unwrap_or(0);
    ranked
        .iter()
        .enumerate()
        .map(|(i, (word, count))| {
            let pad = width - word.chars().count();
            format!(
                "  {:>3}. {}{}  {}",
                i + 1,
                word,
                " ".repeat(pad),
                style(count).green()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_lines_align_counts() {
        let ranked = vec![("кот".to_string(), 3), ("собака".to_string(), 1)];
        let lines: Vec<String> = ranking_lines(&ranked)
            .iter()
            .map(|l| console::strip_ansi_codes(l).into_owned())
            .collect();
        assert_eq!(lines, vec!["    1. кот     3", "    2. собака  1"]);
    }

    #[test]
    fn test_ranking_lines_empty() {
        assert!(ranking_lines(&[]).is_empty());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&CorpusConfig::default(), &dir.path().join("gone.txt"), 5, false).unwrap_err();
        assert!(err.to_string().contains("gone.txt"));
    }
}
