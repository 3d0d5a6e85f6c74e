//! "Does this look like language L": lingua confidence gated by a word-shape check.

use std::sync::OnceLock;

use layout_switcher_core::Lang;
use lingua::{Language, LanguageDetector, LanguageDetectorBuilder};

const MAX_CONSONANT_RUN: usize = 5;

fn language_detector() -> &'static LanguageDetector {
    static DETECTOR: OnceLock<LanguageDetector> = OnceLock::new();
    DETECTOR.get_or_init(|| {
        LanguageDetectorBuilder::from_languages(&[Language::English, Language::Russian]).build()
    })
}

fn language(lang: Lang) -> Language {
    match lang {
        Lang::En => Language::English,
        Lang::Ru => Language::Russian,
    }
}

#[derive(Clone, Copy)]
pub struct NgramAnalyzer {
    detector: &'static LanguageDetector,
}

impl Default for NgramAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl NgramAnalyzer {
    pub fn new() -> Self {
        Self {
            detector: language_detector(),
        }
    }

    /// Score of `word` as a `lang` word, in `0.0..=1.0`.
    ///
    /// Zero when the letters cannot form a pronounceable `lang` word, otherwise the
    /// detector's confidence that the text is `lang`.
    #[must_use]
    pub fn score(&self, word: &str, lang: Lang) -> f64 {
        if !is_plausible(word, lang) {
            return 0.0;
        }
        self.detector
            .compute_language_confidence(word, language(lang))
    }
}

fn is_vowel(ch: char, lang: Lang) -> bool {
    match lang {
        Lang::En => matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u' | 'y'),
        Lang::Ru => matches!(
            ch,
            'а' | 'е' | 'ё' | 'и' | 'о' | 'у' | 'ы' | 'э' | 'ю' | 'я'
        ),
    }
}

fn in_alphabet(ch: char, lang: Lang) -> bool {
    match lang {
        Lang::En => ch.is_ascii_alphabetic(),
        Lang::Ru => matches!(ch, 'а'..='я' | 'ё'),
    }
}

/// At least one vowel, every letter from `lang`'s alphabet, no long consonant clusters.
fn is_plausible(word: &str, lang: Lang) -> bool {
    let mut has_vowel = false;
    let mut run = 0usize;
    for ch in word.chars().flat_map(char::to_lowercase) {
        if !ch.is_alphabetic() {
            continue;
        }
        if !in_alphabet(ch, lang) {
            return false;
        }
        if is_vowel(ch, lang) {
            has_vowel = true;
            run = 0;
        } else {
            run += 1;
            if run > MAX_CONSONANT_RUN {
                return false;
            }
        }
    }
    has_vowel
}
