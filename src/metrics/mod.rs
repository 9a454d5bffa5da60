//! Text metrics over a single document
//!
//! Pure functions: word, unique-word and line counts, type-token ratio,
//! average word length and word frequencies. Tokens are whitespace runs.
//! Punctuation stays attached to tokens unless `Tokenization::StripPunctuation`
//! is selected, in which case the characters in `STRIP_CHARS` are removed
//! before splitting.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Characters removed by `Tokenization::StripPunctuation`
pub const STRIP_CHARS: &[char] = &[',', '.', '-', '—', ';', ':', '\'', '?', '!'];

/// Russian function words skipped by `most_common_words` when filtering is on
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "а", "без", "бы", "был", "была", "были", "было", "в", "вам", "вас", "во", "вот", "все",
    "всё", "вы", "где", "да", "для", "до", "его", "ее", "её", "если", "есть", "еще", "ещё",
    "же", "за", "и", "из", "или", "им", "их", "к", "как", "когда", "ко", "кто", "ли", "мне",
    "мы", "на", "над", "не", "него", "нее", "неё", "нет", "ни", "них", "но", "ну", "о", "об",
    "от", "по", "под", "при", "с", "со", "так", "там", "то", "тоже", "только", "ты", "у", "уж",
    "уже", "чем", "что", "чтобы", "это", "я",
];

/// How a document is split into word tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Tokenization {
    /// Split on whitespace only; `"word,"` is one token
    #[default]
    Whitespace,
    /// Remove `STRIP_CHARS` first, then split on whitespace
    StripPunctuation,
}

impl std::str::FromStr for Tokenization {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "whitespace" | "raw" => Ok(Tokenization::Whitespace),
            "strip-punctuation" | "strip" => Ok(Tokenization::StripPunctuation),
            _ => Err(anyhow::anyhow!(
                "Unknown tokenization '{}'. Valid modes: whitespace, strip-punctuation",
                s
            )),
        }
    }
}

impl std::fmt::Display for Tokenization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tokenization::Whitespace => write!(f, "whitespace"),
            Tokenization::StripPunctuation => write!(f, "strip-punctuation"),
        }
    }
}

/// Split `text` into case-preserving word tokens
pub fn tokenize(text: &str, mode: Tokenization) -> Vec<String> {
    match mode {
        Tokenization::Whitespace => text.split_whitespace().map(str::to_string).collect(),
        Tokenization::StripPunctuation => {
            let stripped: String = text.chars().filter(|c| !STRIP_CHARS.contains(c)).collect();
            stripped.split_whitespace().map(str::to_string).collect()
        }
    }
}

/// Lower-cased tokens, the basis for every case-insensitive metric
fn lower_tokens(text: &str, mode: Tokenization) -> Vec<String> {
    tokenize(text, mode)
        .into_iter()
        .map(|t| t.to_lowercase())
        .collect()
}

pub fn word_count(text: &str, mode: Tokenization) -> usize {
    tokenize(text, mode).len()
}

pub fn unique_words(text: &str, mode: Tokenization) -> usize {
    lower_tokens(text, mode).into_iter().collect::<HashSet<_>>().len()
}

/// Unique over total lower-cased tokens; 0 for a text without tokens
pub fn type_token_ratio(text: &str, mode: Tokenization) -> f64 {
    let tokens = lower_tokens(text, mode);
    if tokens.is_empty() {
        return 0.0;
    }
    let unique = tokens.iter().collect::<HashSet<_>>().len();
    unique as f64 / tokens.len() as f64
}

/// Number of lines, counting empty ones. An empty text is one (empty) line
/// and a trailing newline does not open a new line.
pub fn line_count(text: &str) -> usize {
    text.lines().count().max(1)
}

/// Mean length of the raw tokens in characters (not bytes)
pub fn average_word_length(text: &str, mode: Tokenization) -> f64 {
    let tokens = tokenize(text, mode);
    if tokens.is_empty() {
        return 0.0;
    }
    let chars: usize = tokens.iter().map(|t| t.chars().count()).sum();
    chars as f64 / tokens.len() as f64
}

/// The `n` most frequent lower-cased tokens, highest count first.
///
/// Ties keep the order in which the words first appear in the text.
pub fn most_common_words(
    text: &str,
    n: usize,
    mode: Tokenization,
    stopwords: Option<&HashSet<String>>,
) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for token in lower_tokens(text, mode) {
        if stopwords.is_some_and(|s| s.contains(&token)) {
            continue;
        }
        let count = counts.entry(token.clone()).or_insert(0);
        if *count == 0 {
            order.push(token);
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|word| {
            let count = counts.get(&word).copied().unwrap_or(0);
            (word, count)
        })
        .collect();
    // sort_by is stable, so equal counts stay in first-seen order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// The default stopword set as owned strings
pub fn default_stopwords() -> HashSet<String> {
    DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WS: Tokenization = Tokenization::Whitespace;
    const STRIP: Tokenization = Tokenization::StripPunctuation;

    #[test]
    fn test_word_count_keeps_punctuation_by_default() {
        assert_eq!(word_count("Hello, world!", WS), 2);
        assert_eq!(word_count("a — b", WS), 3);
        assert_eq!(word_count("a — b", STRIP), 2);
        assert_eq!(word_count("", WS), 0);
        assert_eq!(word_count("  \n\t ", WS), 0);
    }

    #[test]
    fn test_strip_mode_removes_fixed_set() {
        assert_eq!(
            tokenize("Кот, сидел; на-окне!", STRIP),
            vec!["Кот", "сидел", "наокне"]
        );
        // Characters outside the set survive
        assert_eq!(tokenize("«ёлка»", STRIP), vec!["«ёлка»"]);
    }

    #[test]
    fn test_unique_words_is_case_insensitive() {
        assert_eq!(unique_words("The the THE cat", WS), 2);
        assert_eq!(unique_words("Мама мыла раму мама", WS), 3);
    }

    #[test]
    fn test_ttr_scenarios() {
        assert_eq!(type_token_ratio("the cat sat", WS), 1.0);
        let ttr = type_token_ratio("the cat sat on the mat", WS);
        assert!((ttr - 5.0 / 6.0).abs() < 1e-12);
        assert_eq!(type_token_ratio("", WS), 0.0);
    }

    #[test]
    fn test_unique_never_exceeds_total() {
        let samples = [
            "",
            "a",
            "a a a",
            "Hello, hello. HELLO!",
            "в лесу родилась ёлочка, в лесу она росла",
            "tabs\tand\nnewlines  mixed",
        ];
        for text in samples {
            for mode in [WS, STRIP] {
                let total = word_count(text, mode);
                let unique = unique_words(text, mode);
                assert!(unique <= total, "{text:?}");
                let ttr = type_token_ratio(text, mode);
                if total > 0 {
                    assert!((ttr - unique as f64 / total as f64).abs() < 1e-12);
                } else {
                    assert_eq!(ttr, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(""), 1);
        assert_eq!(line_count("a\nb\n"), 2);
        assert_eq!(line_count("a\n\nb"), 3);
        assert_eq!(line_count("single line"), 1);
        assert_eq!(line_count("a\r\nb"), 2);
    }

    #[test]
    fn test_average_word_length_counts_chars() {
        assert_eq!(average_word_length("", WS), 0.0);
        assert_eq!(average_word_length("ab abcd", WS), 3.0);
        // Cyrillic letters are one character each, not two bytes
        assert_eq!(average_word_length("кот", WS), 3.0);
        // Raw tokens include attached punctuation
        assert_eq!(average_word_length("кот,", WS), 4.0);
        assert_eq!(average_word_length("кот,", STRIP), 3.0);
    }

    #[test]
    fn test_average_word_length_at_least_one() {
        for text in ["a", "x y z", " , . ! ", "один два"] {
            if word_count(text, WS) > 0 {
                assert!(average_word_length(text, WS) >= 1.0);
            }
        }
    }

    #[test]
    fn test_most_common_words_orders_by_count_then_first_seen() {
        let text = "b a c a b d";
        let top = most_common_words(text, 3, WS, None);
        assert_eq!(
            top,
            vec![
                ("b".to_string(), 2),
                ("a".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_most_common_words_with_stopwords() {
        let stop = default_stopwords();
        let text = "и кот и пёс и кот";
        let top = most_common_words(text, 5, WS, Some(&stop));
        assert_eq!(top, vec![("кот".to_string(), 2), ("пёс".to_string(), 1)]);

        let unfiltered = most_common_words(text, 1, WS, None);
        assert_eq!(unfiltered, vec![("и".to_string(), 3)]);
    }

    #[test]
    fn test_most_common_words_short_text() {
        assert!(most_common_words("", 10, WS, None).is_empty());
        assert_eq!(most_common_words("one", 10, WS, None).len(), 1);
        assert!(most_common_words("one two", 0, WS, None).is_empty());
    }

    #[test]
    fn test_tokenization_parsing() {
        assert_eq!("whitespace".parse::<Tokenization>().unwrap(), WS);
        assert_eq!("Strip-Punctuation".parse::<Tokenization>().unwrap(), STRIP);
        assert!("bogus".parse::<Tokenization>().is_err());
    }
}
