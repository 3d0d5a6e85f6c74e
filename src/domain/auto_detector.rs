//! Convert/skip decision for a single word typed before a space.

use layout_switcher_core::{
    Lang,
    text::{ConversionDirection, convert_text, is_letter_key},
};

use super::{
    dictionary::DictionaryService,
    ngram::NgramAnalyzer,
    user_dictionary::{UserDictionary, unix_now},
};
use crate::config::AutoSwitchConfig;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reason {
    EmptyWord,
    UnsupportedLayout,
    NotAWord,
    AlreadyCorrect,
    Protected,
    LearnedKeep,
    DictionaryHit,
    Learned,
    NgramMargin,
    Gibberish,
    NoEvidence,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Reason::EmptyWord => "empty_word",
            Reason::UnsupportedLayout => "unsupported_layout",
            Reason::NotAWord => "not_a_word",
            Reason::AlreadyCorrect => "already_correct",
            Reason::Protected => "protected",
            Reason::LearnedKeep => "learned_keep",
            Reason::DictionaryHit => "dictionary_hit",
            Reason::Learned => "learned",
            Reason::NgramMargin => "ngram_margin",
            Reason::Gibberish => "gibberish",
            Reason::NoEvidence => "no_evidence",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub convert: bool,
    pub reason: Reason,
}

impl Decision {
    const fn skip(reason: Reason) -> Self {
        Self {
            convert: false,
            reason,
        }
    }

    const fn convert(reason: Reason) -> Self {
        Self {
            convert: true,
            reason,
        }
    }
}

pub struct AutoDetector {
    dictionary: DictionaryService,
    ngrams: NgramAnalyzer,
    user: UserDictionary,
    margin: f64,
    min_gibberish_len: usize,
}

impl AutoDetector {
    pub fn new(dictionary: DictionaryService, user: UserDictionary, cfg: &AutoSwitchConfig) -> Self {
        Self {
            dictionary,
            ngrams: NgramAnalyzer::new(),
            user,
            margin: cfg.ngram_margin,
            min_gibberish_len: cfg.min_gibberish_len,
        }
    }

    pub fn apply_config(&mut self, cfg: &AutoSwitchConfig) {
        self.margin = cfg.ngram_margin;
        self.min_gibberish_len = cfg.min_gibberish_len;
    }

    pub fn dictionary(&self) -> &DictionaryService {
        &self.dictionary
    }

    pub fn user_dictionary(&self) -> &UserDictionary {
        &self.user
    }

    pub fn user_dictionary_mut(&mut self) -> &mut UserDictionary {
        &mut self.user
    }

    /// Decides for `word` typed while the layout tagged `layout` was active.
    #[must_use]
    pub fn should_convert(&self, word: &str, layout: &str) -> Decision {
        self.decide(word, layout, unix_now())
    }

    #[must_use]
    pub fn decide(&self, word: &str, layout: &str, now: f64) -> Decision {
        let decision = self.decide_inner(word, layout, now);
        tracing::trace!(
            word,
            layout,
            convert = decision.convert,
            reason = decision.reason.as_str(),
            "auto-switch decision"
        );
        decision
    }

    fn decide_inner(&self, word: &str, layout: &str, now: f64) -> Decision {
        if word.is_empty() {
            return Decision::skip(Reason::EmptyWord);
        }
        let Some(lang) = Lang::from_tag(layout) else {
            return Decision::skip(Reason::UnsupportedLayout);
        };
        if !word.chars().all(|ch| is_letter_key(ch, lang)) {
            return Decision::skip(Reason::NotAWord);
        }

        if self.dictionary.is_valid(word, lang) {
            return Decision::skip(Reason::AlreadyCorrect);
        }

        let target = lang.other();
        let converted = convert_text(word, Some(ConversionDirection::from_source(lang)));
        let dictionary_hit = self.dictionary.is_valid(&converted, target);

        let settings = self.user.settings();
        if self.user.is_protected(word, lang, now) {
            return Decision::skip(Reason::Protected);
        }
        let learned = self.user.weight(word, lang);
        if learned <= -settings.min_weight {
            return Decision::skip(Reason::LearnedKeep);
        }

        if dictionary_hit {
            return Decision::convert(Reason::DictionaryHit);
        }
        if learned >= settings.threshold {
            return Decision::convert(Reason::Learned);
        }

        // Punctuation-key runs such as ",." carry no letters to judge.
        if !word.chars().any(char::is_alphabetic) {
            return Decision::skip(Reason::NoEvidence);
        }
        let source_score = self.ngrams.score(word, lang);
        let target_score = self.ngrams.score(&converted, target);
        if target_score - source_score > self.margin {
            return Decision::convert(Reason::NgramMargin);
        }
        if source_score == 0.0 && word.chars().count() >= self.min_gibberish_len {
            return Decision::convert(Reason::Gibberish);
        }

        Decision::skip(Reason::NoEvidence)
    }
}
