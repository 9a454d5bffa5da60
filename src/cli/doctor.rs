//! Doctor command - check environment

use anyhow::Result;
use console::style;
use corpuslens::config::CorpusConfig;
use corpuslens::corpus;
use corpuslens::pos::{self, PosConfig, TaggerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Note,
    Fail,
}

/// One line of doctor output
#[derive(Debug, Clone)]
struct Check {
    status: Status,
    message: String,
    /// Counts towards "need attention"
    problem: bool,
}

impl Check {
    fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            problem: status == Status::Fail,
        }
    }

    fn problem(mut self) -> Self {
        self.problem = true;
        self
    }

    fn mark(&self) -> &'static str {
        match self.status {
            Status::Ok => "✓",
            Status::Note => "○",
            Status::Fail => "✗",
        }
    }
}

fn corpus_check(config: &CorpusConfig) -> Check {
    let dir = config.corpus.dir.display();
    let suffix = &config.corpus.suffix;
    match corpus::list_documents(&config.corpus.dir, suffix) {
        Ok(names) if names.is_empty() => {
            Check::new(Status::Note, format!("Corpus: {} has no '{}' files", dir, suffix)).problem()
        }
        Ok(names) => Check::new(
            Status::Ok,
            format!("Corpus: {} ({} '{}' files)", dir, names.len(), suffix),
        ),
        Err(e) => Check::new(Status::Fail, format!("Corpus: {}", e)),
    }
}

fn metadata_check(config: &CorpusConfig) -> Check {
    if config.metadata.path.is_file() {
        Check::new(Status::Ok, format!("Metadata: {}", config.metadata.path.display()))
    } else {
        Check::new(
            Status::Note,
            format!(
                "Metadata: {} not found (all metadata fields will be '{}')",
                config.metadata.path.display(),
                config.text.missing_value_sentinel
            ),
        )
    }
}

fn tagger_checks(config: &PosConfig) -> Vec<Check> {
    let mut checks = Vec::new();
    for kind in [TaggerKind::Mystem, TaggerKind::Suffix] {
        let probe = PosConfig {
            tagger: kind,
            ..config.clone()
        };
        match pos::probe_tagger(&probe) {
            Ok(()) => checks.push(Check::new(Status::Ok, kind.to_string())),
            Err(e) if kind == config.tagger => checks.push(
                Check::new(
                    Status::Note,
                    format!("{}: {}\n    Densities will be reported as 0 (н/д in the report)", kind, e),
                )
                .problem(),
            ),
            Err(e) => checks.push(Check::new(Status::Note, format!("{}: {}", kind, e))),
        }
    }
    if config.tagger == TaggerKind::None {
        checks.push(Check::new(
            Status::Note,
            "tagging is turned off; densities will be reported as 0 (н/д in the report)",
        ));
    }
    checks
}

pub fn run(config: &CorpusConfig) -> Result<()> {
    println!("🩺 corpuslens doctor\n");

    let general = [corpus_check(config), metadata_check(config)];
    for check in &general {
        println!("{} {}", check.mark(), check.message);
    }

    println!("\nPart-of-speech taggers (configured: {}):", style(config.pos.tagger).bold());
    let taggers = tagger_checks(&config.pos);
    for check in &taggers {
        println!("  {} {}", check.mark(), check.message);
    }

    let problems = general.iter().chain(&taggers).filter(|c| c.problem).count();
    if problems == 0 {
        println!("\n✅ All checks passed!");
    } else {
        println!("\n{} {} check(s) need attention", style("!").yellow(), problems);
    }
    Ok(())
}
