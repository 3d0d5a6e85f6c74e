//! Static "is this a real word" lookups for both layouts.

use std::{collections::HashSet, path::Path};

use layout_switcher_core::Lang;

const BUILTIN_EN: &str = include_str!("../../data/en.txt");
const BUILTIN_RU: &str = include_str!("../../data/ru.txt");

#[derive(Debug, Clone, Default)]
pub struct DictionaryService {
    en: HashSet<String>,
    ru: HashSet<String>,
}

impl DictionaryService {
    /// Dictionary seeded with the word lists shipped in `data/`.
    pub fn builtin() -> Self {
        let mut dict = Self::default();
        dict.add_words(Lang::En, parse_word_list(BUILTIN_EN));
        dict.add_words(Lang::Ru, parse_word_list(BUILTIN_RU));
        tracing::debug!(
            en = dict.len(Lang::En),
            ru = dict.len(Lang::Ru),
            "builtin dictionaries loaded"
        );
        dict
    }

    pub fn add_words<I, S>(&mut self, lang: Lang, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = self.set_mut(lang);
        for word in words {
            let word = normalize(word.as_ref());
            if !word.is_empty() {
                set.insert(word);
            }
        }
    }

    /// Adds a user word list in the same one-word-per-line format as the builtin lists.
    ///
    /// Returns how many lines were read.
    pub fn load_words_file(&mut self, lang: Lang, path: &Path) -> crate::error::Result<usize> {
        let text = std::fs::read_to_string(path)?;
        let words: Vec<&str> = parse_word_list(&text).collect();
        let count = words.len();
        self.add_words(lang, words);
        tracing::debug!(lang = %lang, path = %path.display(), count, "word list loaded");
        Ok(count)
    }

    #[must_use]
    pub fn is_valid(&self, word: &str, lang: Lang) -> bool {
        let word = normalize(word);
        !word.is_empty() && self.set(lang).contains(&word)
    }

    pub fn words(&self, lang: Lang) -> impl Iterator<Item = &str> {
        self.set(lang).iter().map(String::as_str)
    }

    pub fn len(&self, lang: Lang) -> usize {
        self.set(lang).len()
    }

    fn set(&self, lang: Lang) -> &HashSet<String> {
        match lang {
            Lang::En => &self.en,
            Lang::Ru => &self.ru,
        }
    }

    fn set_mut(&mut self, lang: Lang) -> &mut HashSet<String> {
        match lang {
            Lang::En => &mut self.en,
            Lang::Ru => &mut self.ru,
        }
    }
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

fn parse_word_list(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn builtin_lists_contain_common_words() {
        let dict = DictionaryService::builtin();
        assert!(dict.is_valid("hello", Lang::En));
        assert!(dict.is_valid("Привет", Lang::Ru));
        assert!(!dict.is_valid("ghbdtn", Lang::En));
        assert!(!dict.is_valid("hello", Lang::Ru));
        assert!(!dict.is_valid("", Lang::En));
    }

    #[test]
    fn comment_lines_are_not_words() {
        let dict = DictionaryService::builtin();
        assert!(dict.words(Lang::En).all(|w| !w.starts_with('#')));
        assert!(dict.words(Lang::Ru).all(|w| !w.starts_with('#')));
    }

    #[test]
    fn loads_extra_words_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# project words\nrustacean\n\n  Tokio  ").unwrap();

        let mut dict = DictionaryService::default();
        let count = dict.load_words_file(Lang::En, file.path()).unwrap();

        assert_eq!(count, 2);
        assert!(dict.is_valid("rustacean", Lang::En));
        assert!(dict.is_valid("tokio", Lang::En));
    }

    #[test]
    fn missing_word_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut dict = DictionaryService::default();
        assert!(dict.load_words_file(Lang::Ru, &dir.path().join("nope.txt")).is_err());
    }
}
