//! Ending-based part-of-speech heuristic for Russian
//!
//! No dictionary and no external process. Function words come from a fixed
//! list, then the longest matching inflectional ending decides the class,
//! and any other Cyrillic word of three or more letters is taken as a noun.
//! Expect errors on short words and homographs; mystem is the accurate
//! option.

use super::{PosTag, PosTagger};
use crate::error::TaggerError;
use std::collections::HashSet;

/// Pronouns, prepositions, conjunctions, particles and common adverbs
const FUNCTION_WORDS: &[&str] = &[
    "без", "был", "была", "были", "было", "быть", "вам", "вас", "весь", "вот", "все", "всё",
    "всегда", "всех", "где", "даже", "для", "его", "ее", "её", "если", "есть", "еще", "ещё",
    "же", "за", "здесь", "из", "или", "их", "как", "какой", "когда", "кого", "кому", "кто",
    "ли", "меня", "мне", "много", "мой", "моя", "над", "него", "нее", "неё", "нет", "никогда",
    "них", "но", "ну", "об", "он", "она", "они", "оно", "от", "очень", "перед", "по", "под",
    "потом", "при", "про", "сам", "себя", "сейчас", "так", "там", "тебя", "теперь", "то",
    "того", "тоже", "только", "том", "тому", "тот", "тут", "ты", "уже", "чем", "через", "что",
    "чтобы", "чуть", "эта", "эти", "это", "этот", "вы", "мы", "на", "не", "ни", "во", "со",
    "ко", "до", "да", "бы", "уж", "его", "ей", "им", "ему",
];

/// Endings checked longest first; the remaining stem must keep two letters
const ENDINGS: &[(&str, PosTag)] = &[
    ("ость", PosTag::Noun),
    ("ение", PosTag::Noun),
    ("ание", PosTag::Noun),
    ("ство", PosTag::Noun),
    ("тель", PosTag::Noun),
    ("ться", PosTag::Verb),
    ("ция", PosTag::Noun),
    ("изм", PosTag::Noun),
    ("ник", PosTag::Noun),
    ("ого", PosTag::Adjective),
    ("его", PosTag::Adjective),
    ("ому", PosTag::Adjective),
    ("ему", PosTag::Adjective),
    ("ыми", PosTag::Adjective),
    ("ими", PosTag::Adjective),
    ("тся", PosTag::Verb),
    ("ать", PosTag::Verb),
    ("ять", PosTag::Verb),
    ("еть", PosTag::Verb),
    ("ить", PosTag::Verb),
    ("уть", PosTag::Verb),
    ("ыть", PosTag::Verb),
    ("ешь", PosTag::Verb),
    ("ёшь", PosTag::Verb),
    ("ишь", PosTag::Verb),
    ("ете", PosTag::Verb),
    ("ёте", PosTag::Verb),
    ("ите", PosTag::Verb),
    ("ала", PosTag::Verb),
    ("яла", PosTag::Verb),
    ("ела", PosTag::Verb),
    ("ила", PosTag::Verb),
    ("ыла", PosTag::Verb),
    ("али", PosTag::Verb),
    ("яли", PosTag::Verb),
    ("ели", PosTag::Verb),
    ("или", PosTag::Verb),
    ("ыли", PosTag::Verb),
    ("ало", PosTag::Verb),
    ("ило", PosTag::Verb),
    ("ый", PosTag::Adjective),
    ("ий", PosTag::Adjective),
    ("ой", PosTag::Adjective),
    ("ая", PosTag::Adjective),
    ("яя", PosTag::Adjective),
    ("ое", PosTag::Adjective),
    ("ее", PosTag::Adjective),
    ("ые", PosTag::Adjective),
    ("ие", PosTag::Adjective),
    ("ых", PosTag::Adjective),
    ("их", PosTag::Adjective),
    ("ую", PosTag::Adjective),
    ("юю", PosTag::Adjective),
    ("ым", PosTag::Adjective),
    ("ть", PosTag::Verb),
    ("ут", PosTag::Verb),
    ("ют", PosTag::Verb),
    ("ат", PosTag::Verb),
    ("ят", PosTag::Verb),
    ("ет", PosTag::Verb),
    ("ёт", PosTag::Verb),
    ("ит", PosTag::Verb),
    ("ал", PosTag::Verb),
    ("ял", PosTag::Verb),
    ("ел", PosTag::Verb),
    ("ил", PosTag::Verb),
    ("ыл", PosTag::Verb),
];

const MIN_STEM_CHARS: usize = 2;
const MIN_NOUN_CHARS: usize = 3;

/// Built-in Russian tagger
#[derive(Debug, Clone)]
pub struct SuffixTagger {
    function_words: HashSet<&'static str>,
}

impl SuffixTagger {
    pub fn new() -> Self {
        Self {
            function_words: FUNCTION_WORDS.iter().copied().collect(),
        }
    }

    fn tag(&self, word: &str) -> PosTag {
        if !is_cyrillic(word) || self.function_words.contains(word) {
            return PosTag::Other;
        }

        let len = word.chars().count();
        for (ending, tag) in ENDINGS {
            if word.ends_with(ending) && len >= ending.chars().count() + MIN_STEM_CHARS {
                return *tag;
            }
        }

        if len >= MIN_NOUN_CHARS {
            PosTag::Noun
        } else {
            PosTag::Other
        }
    }
}

impl Default for SuffixTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl PosTagger for SuffixTagger {
    fn name(&self) -> &'static str {
        "suffix"
    }

    fn classify(&self, word: &str) -> Result<PosTag, TaggerError> {
        Ok(self.tag(word))
    }
}

fn is_cyrillic(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| matches!(c, 'а'..='я' | 'ё'))
}
