//! Part-of-speech density
//!
//! Estimates how much of a document is content words (nouns, adjectives,
//! verbs). Classification is delegated to a `PosTagger` chosen once at
//! startup:
//! - `mystem` - the external Yandex morphological analyzer
//! - `suffix` - a built-in ending-based heuristic for Russian
//! - `none` / unavailable - `NullTagger`, every density is 0.0
//!
//! A missing or failing tagger never stops a run. The affected documents get
//! zero densities and `DensityMode::Degraded`.

mod mystem;
mod suffix;

pub use mystem::MystemTagger;
pub use suffix::SuffixTagger;

use crate::error::TaggerError;
use crate::models::DensityMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Coarse word class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    Noun,
    Adjective,
    Verb,
    Other,
}

impl PosTag {
    pub fn is_content(&self) -> bool {
        !matches!(self, PosTag::Other)
    }
}

/// Word classification capability
pub trait PosTagger: Send + Sync {
    /// Name of this tagger (for logging)
    fn name(&self) -> &'static str;

    /// Classify one lower-cased word
    fn classify(&self, word: &str) -> Result<PosTag, TaggerError>;

    /// Classify a document's words in order.
    ///
    /// A failure on a single word counts as `Other`. An `Err` means the
    /// tagger could not process the document at all.
    fn classify_all(&self, words: &[String]) -> Result<Vec<PosTag>, TaggerError> {
        Ok(words
            .iter()
            .map(|w| {
                self.classify(w).unwrap_or_else(|e| {
                    debug!("{}: '{}' unclassified: {}", self.name(), w, e);
                    PosTag::Other
                })
            })
            .collect())
    }

    /// True for stand-ins that produce no real classification
    fn is_degraded(&self) -> bool {
        false
    }
}

/// Tagger used when no real capability is available
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTagger;

impl PosTagger for NullTagger {
    fn name(&self) -> &'static str {
        "none"
    }

    fn classify(&self, _word: &str) -> Result<PosTag, TaggerError> {
        Ok(PosTag::Other)
    }

    fn is_degraded(&self) -> bool {
        true
    }
}

/// Which tagger to build at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaggerKind {
    #[default]
    Mystem,
    Suffix,
    None,
}

impl std::str::FromStr for TaggerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mystem" => Ok(TaggerKind::Mystem),
            "suffix" | "builtin" => Ok(TaggerKind::Suffix),
            "none" | "off" => Ok(TaggerKind::None),
            _ => Err(anyhow::anyhow!(
                "Unknown tagger '{}'. Valid taggers: mystem, suffix, none",
                s
            )),
        }
    }
}

impl std::fmt::Display for TaggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaggerKind::Mystem => write!(f, "mystem"),
            TaggerKind::Suffix => write!(f, "suffix"),
            TaggerKind::None => write!(f, "none"),
        }
    }
}

/// Tagger settings (`[pos]` in corpuslens.toml)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosConfig {
    #[serde(default)]
    pub tagger: TaggerKind,

    /// mystem executable, looked up on PATH when not absolute
    #[serde(default = "default_mystem_path")]
    pub mystem_path: PathBuf,

    /// Per-document timeout for the external tagger (0 = none)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PosConfig {
    fn default() -> Self {
        Self {
            tagger: TaggerKind::default(),
            mystem_path: default_mystem_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_mystem_path() -> PathBuf {
    PathBuf::from("mystem")
}

fn default_timeout_secs() -> u64 {
    60
}

/// Check whether the configured tagger can run
pub fn probe_tagger(config: &PosConfig) -> Result<(), TaggerError> {
    match config.tagger {
        TaggerKind::Mystem => {
            MystemTagger::new(&config.mystem_path, config.timeout_secs).probe()
        }
        TaggerKind::Suffix => Ok(()),
        TaggerKind::None => Err(TaggerError::Unavailable {
            tagger: "none".to_string(),
            reason: "part-of-speech tagging is turned off".to_string(),
        }),
    }
}

/// Build the tagger for this run. Falls back to `NullTagger` with a warning
/// when the configured capability cannot start.
pub fn select_tagger(config: &PosConfig) -> Box<dyn PosTagger> {
    match config.tagger {
        TaggerKind::Mystem => {
            let tagger = MystemTagger::new(&config.mystem_path, config.timeout_secs);
            match tagger.probe() {
                Ok(()) => {
                    debug!("Using mystem at {}", config.mystem_path.display());
                    Box::new(tagger)
                }
                Err(e) => {
                    warn!("{}; lexical density will be reported as 0", e);
                    Box::new(NullTagger)
                }
            }
        }
        TaggerKind::Suffix => Box::new(SuffixTagger::new()),
        TaggerKind::None => {
            debug!("Part-of-speech tagging turned off");
            Box::new(NullTagger)
        }
    }
}

/// Content-word proportions of one document
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DensityProfile {
    pub noun: f64,
    pub adjective: f64,
    pub verb: f64,
    pub lexical: f64,
    pub mode: DensityMode,
}

impl DensityProfile {
    pub fn zeroed(mode: DensityMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    fn from_tags(tags: &[PosTag]) -> Self {
        let total = tags.len();
        if total == 0 {
            return Self::zeroed(DensityMode::Tagged);
        }
        let count = |tag: PosTag| tags.iter().filter(|t| **t == tag).count();
        let nouns = count(PosTag::Noun);
        let adjectives = count(PosTag::Adjective);
        let verbs = count(PosTag::Verb);
        let content = tags.iter().filter(|t| t.is_content()).count();
        let total = total as f64;
        Self {
            noun: nouns as f64 / total,
            adjective: adjectives as f64 / total,
            verb: verbs as f64 / total,
            lexical: content as f64 / total,
            mode: DensityMode::Tagged,
        }
    }
}

/// Normalize text for tagging: lower-case, non-letters become spaces,
/// tokens shorter than two characters are dropped.
pub fn preprocess(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphabetic() { c } else { ' ' })
        .collect();
    cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Compute densities, surfacing a document-level tagger failure
pub fn lexical_density(text: &str, tagger: &dyn PosTagger) -> Result<DensityProfile, TaggerError> {
    if tagger.is_degraded() {
        return Ok(DensityProfile::zeroed(DensityMode::Degraded));
    }
    let words = preprocess(text);
    if words.is_empty() {
        return Ok(DensityProfile::zeroed(DensityMode::Tagged));
    }
    let tags = tagger.classify_all(&words)?;
    Ok(DensityProfile::from_tags(&tags))
}

/// Compute densities for a document, degrading to zeros on tagger failure
pub fn analyze_density(filename: &str, text: &str, tagger: &dyn PosTagger) -> DensityProfile {
    match lexical_density(text, tagger) {
        Ok(profile) => profile,
        Err(e) => {
            warn!("Lexical density unavailable for {}: {}", filename, e);
            DensityProfile::zeroed(DensityMode::Degraded)
        }
    }
}

/// Round to four decimal digits for reporting
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Tagger driven by a fixed word list
    struct MapTagger(HashMap<&'static str, PosTag>);

    impl PosTagger for MapTagger {
        fn name(&self) -> &'static str {
            "map"
        }

        fn classify(&self, word: &str) -> Result<PosTag, TaggerError> {
            self.0.get(word).copied().ok_or_else(|| TaggerError::BadOutput {
                tagger: "map".to_string(),
                detail: format!("no entry for {word}"),
            })
        }
    }

    struct BrokenTagger;

    impl PosTagger for BrokenTagger {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn classify(&self, _word: &str) -> Result<PosTag, TaggerError> {
            Ok(PosTag::Noun)
        }

        fn classify_all(&self, _words: &[String]) -> Result<Vec<PosTag>, TaggerError> {
            Err(TaggerError::Timeout {
                tagger: "broken".to_string(),
                secs: 1,
            })
        }
    }

    fn map_tagger() -> MapTagger {
        MapTagger(HashMap::from([
            ("кот", PosTag::Noun),
            ("рыжий", PosTag::Adjective),
            ("спит", PosTag::Verb),
            ("на", PosTag::Other),
        ]))
    }

    #[test]
    fn test_preprocess() {
        assert_eq!(
            preprocess("Рыжий кот, 2 раза в день!! спит..."),
            vec!["рыжий", "кот", "раза", "день", "спит"]
        );
        assert!(preprocess("a 1 - ?").is_empty());
        assert_eq!(preprocess("well-known"), vec!["well", "known"]);
    }

    #[test]
    fn test_densities_from_tagger() {
        let profile = lexical_density("Рыжий кот спит на окне", &map_tagger()).unwrap();
        // "окне" is unknown to the map and counts as Other
        assert_eq!(profile.mode, DensityMode::Tagged);
        assert!((profile.noun - 0.2).abs() < 1e-12);
        assert!((profile.adjective - 0.2).abs() < 1e-12);
        assert!((profile.verb - 0.2).abs() < 1e-12);
        assert!((profile.lexical - 0.6).abs() < 1e-12);
        assert!(
            (profile.lexical - (profile.noun + profile.adjective + profile.verb)).abs() < 1e-12
        );
    }

    #[test]
    fn test_empty_text_is_not_an_error() {
        let profile = lexical_density("!!! 1 2 3", &map_tagger()).unwrap();
        assert_eq!(profile, DensityProfile::zeroed(DensityMode::Tagged));
    }

    #[test]
    fn test_null_tagger_degrades() {
        let profile = analyze_density("a.txt", "Рыжий кот спит", &NullTagger);
        assert_eq!(profile.mode, DensityMode::Degraded);
        assert_eq!(profile.lexical, 0.0);
        assert_eq!(profile.noun, 0.0);
        assert_eq!(profile.adjective, 0.0);
        assert_eq!(profile.verb, 0.0);
    }

    #[test]
    fn test_document_failure_degrades() {
        assert!(lexical_density("кот спит", &BrokenTagger).is_err());
        let profile = analyze_density("a.txt", "кот спит", &BrokenTagger);
        assert_eq!(profile, DensityProfile::zeroed(DensityMode::Degraded));
    }

    #[test]
    fn test_missing_mystem_falls_back_to_null() {
        let config = PosConfig {
            tagger: TaggerKind::Mystem,
            mystem_path: PathBuf::from("/nonexistent/bin/mystem-corpuslens-test"),
            timeout_secs: 5,
        };
        assert!(probe_tagger(&config).is_err());
        let tagger = select_tagger(&config);
        assert!(tagger.is_degraded());
        assert_eq!(tagger.name(), "none");
    }

    #[test]
    fn test_select_builtin_taggers() {
        let suffix = select_tagger(&PosConfig {
            tagger: TaggerKind::Suffix,
            ..Default::default()
        });
        assert_eq!(suffix.name(), "suffix");
        assert!(!suffix.is_degraded());

        let none = select_tagger(&PosConfig {
            tagger: TaggerKind::None,
            ..Default::default()
        });
        assert!(none.is_degraded());
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(1.0 / 3.0), 0.3333);
        assert_eq!(round4(2.0 / 3.0), 0.6667);
        assert_eq!(round4(0.0), 0.0);
    }

    #[test]
    fn test_tagger_kind_parsing() {
        assert_eq!("MYSTEM".parse::<TaggerKind>().unwrap(), TaggerKind::Mystem);
        assert_eq!("suffix".parse::<TaggerKind>().unwrap(), TaggerKind::Suffix);
        assert_eq!("off".parse::<TaggerKind>().unwrap(), TaggerKind::None);
        assert!("spacy".parse::<TaggerKind>().is_err());
    }
}
