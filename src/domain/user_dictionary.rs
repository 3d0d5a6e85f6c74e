//! Learned per-word weights, persisted as JSON.
//!
//! Both spellings of a word ("ghbdtn" typed in `en`, "привет" typed in `ru`) share one entry keyed
//! by the EN letterforms. The stored weight is positive when English was the intended form.
//! Callers never see the stored sign: [`UserDictionary::weight`] reports it from the point of view
//! of the layout the word was typed in, where a positive weight means "converting this word away
//! from that layout was right".

use std::{
    collections::BTreeMap,
    io::Write as _,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use layout_switcher_core::{
    Lang,
    text::{ConversionDirection, convert_text},
};
use serde::{Deserialize, Serialize};

use crate::{config::LearningConfig, error::Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub weight: i64,
    /// Unix seconds. Zero when the word was never corrected.
    #[serde(default)]
    pub protected_until: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningSettings {
    pub min_weight: i64,
    /// Seconds a corrected word stays protected from auto-conversion.
    pub correction_timeout: f64,
    pub threshold: i64,
}

impl Default for LearningSettings {
    fn default() -> Self {
        Self::from(&LearningConfig::default())
    }
}

impl From<&LearningConfig> for LearningSettings {
    fn from(cfg: &LearningConfig) -> Self {
        Self {
            min_weight: cfg.min_weight,
            correction_timeout: cfg.correction_timeout_secs,
            threshold: cfg.threshold,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Store {
    #[serde(default)]
    words: BTreeMap<String, Entry>,
    #[serde(default)]
    settings: LearningSettings,
}

#[derive(Debug, Clone, Default)]
pub struct UserDictionary {
    path: Option<PathBuf>,
    store: Store,
}

pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Key shared by both layout spellings of `word`.
pub fn canonical_key(word: &str, lang: Lang) -> String {
    let lower = word.to_lowercase();
    let en_form = match lang {
        Lang::En => lower,
        Lang::Ru => convert_text(&lower, Some(ConversionDirection::RuToEn)).to_lowercase(),
    };
    format!("{}:{en_form}", Lang::En.tag())
}

const fn perspective(lang: Lang) -> i64 {
    match lang {
        Lang::Ru => 1,
        Lang::En => -1,
    }
}

impl UserDictionary {
    /// Store that is never written to disk.
    pub fn in_memory(settings: LearningSettings) -> Self {
        Self {
            path: None,
            store: Store {
                words: BTreeMap::new(),
                settings,
            },
        }
    }

    /// Loads the store at `path`.
    ///
    /// A missing or unreadable file yields an empty store. `settings` always replaces whatever
    /// settings were persisted.
    pub fn load(path: &Path, settings: LearningSettings) -> Self {
        let words = match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<Store>(&text) {
                Ok(store) => store.words,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "user dictionary is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "user dictionary unreadable, starting empty");
                BTreeMap::new()
            }
        };
        tracing::debug!(path = %path.display(), entries = words.len(), "user dictionary loaded");

        Self {
            path: Some(path.to_path_buf()),
            store: Store { words, settings },
        }
    }

    /// Writes the store through a temporary file in the destination directory, then renames it
    /// over the destination.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &self.store)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;

        tracing::trace!(path = %path.display(), entries = self.len(), "user dictionary saved");
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn settings(&self) -> LearningSettings {
        self.store.settings
    }

    pub fn set_settings(&mut self, settings: LearningSettings) {
        self.store.settings = settings;
    }

    pub fn len(&self) -> usize {
        self.store.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.words.is_empty()
    }

    pub fn entry(&self, word: &str, lang: Lang) -> Option<Entry> {
        self.store.words.get(&canonical_key(word, lang)).copied()
    }

    /// Learned weight of `word` as typed in `lang`. Positive favours converting it.
    pub fn weight(&self, word: &str, lang: Lang) -> i64 {
        self.entry(word, lang)
            .map_or(0, |e| e.weight * perspective(lang))
    }

    pub fn is_protected(&self, word: &str, lang: Lang, now: f64) -> bool {
        self.entry(word, lang).is_some_and(|e| e.protected_until > now)
    }

    /// The user kept an automatic conversion of `word` typed in `lang`.
    pub fn add_confirmation(&mut self, word: &str, lang: Lang) {
        let entry = self.entry_mut(word, lang);
        entry.weight += perspective(lang);
        tracing::debug!(word, lang = %lang, weight = entry.weight, "confirmation learned");
    }

    /// The user undid an automatic conversion of `word` typed in `lang`.
    pub fn add_correction(&mut self, word: &str, lang: Lang, now: f64) {
        let timeout = self.store.settings.correction_timeout;
        let entry = self.entry_mut(word, lang);
        entry.weight -= perspective(lang);
        entry.protected_until = now + timeout;
        tracing::debug!(word, lang = %lang, weight = entry.weight, "correction learned");
    }

    fn entry_mut(&mut self, word: &str, lang: Lang) -> &mut Entry {
        self.store
            .words
            .entry(canonical_key(word, lang))
            .or_insert(Entry {
                weight: 0,
                protected_until: 0.0,
            })
    }
}
