use crate::Lang;

/// Direction of text conversion between Russian ЙЦУКЕН and English QWERTY layouts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ConversionDirection {
    RuToEn,
    EnToRu,
}

impl ConversionDirection {
    /// Direction that converts text typed in `source` into the other layout.
    pub const fn from_source(source: Lang) -> Self {
        match source {
            Lang::En => ConversionDirection::EnToRu,
            Lang::Ru => ConversionDirection::RuToEn,
        }
    }

    pub const fn source(self) -> Lang {
        match self {
            ConversionDirection::EnToRu => Lang::En,
            ConversionDirection::RuToEn => Lang::Ru,
        }
    }

    pub const fn target(self) -> Lang {
        self.source().other()
    }

    pub const fn reversed(self) -> Self {
        match self {
            ConversionDirection::EnToRu => ConversionDirection::RuToEn,
            ConversionDirection::RuToEn => ConversionDirection::EnToRu,
        }
    }
}

// Same physical keys, lowercase plane. Letters get their case re-applied after lookup.
const EN_LOWER: &str = "`qwertyuiop[]asdfghjkl;'zxcvbnm,./";
const RU_LOWER: &str = "ёйцукенгшщзхъфывапролджэячсмитьбю.";

// Shifted punctuation that sits on a letter key in the other layout.
const EN_SHIFT_PUNCT: &str = "~{}:\"<>?";
const RU_SHIFT_PUNCT: &str = "ЁХЪЖЭБЮ,";

// Digit row (Shift+2, 3, 4, 6, 7) differs on RU layout.
const EN_DIGIT_SHIFT: &str = "@#$^&";
const RU_DIGIT_SHIFT: &str = "\"№;:?";

fn map_by_table(ch: char, from: &str, to: &str) -> Option<char> {
    from.chars().zip(to.chars()).find_map(|(f, t)| (f == ch).then_some(t))
}

fn map_with_case(ch: char, from: &str, to: &str) -> Option<char> {
    if let Some(mapped) = map_by_table(ch, from, to) {
        return Some(mapped);
    }
    if !ch.is_uppercase() {
        return None;
    }
    let lower = ch.to_lowercase().next()?;
    let mapped = map_by_table(lower, from, to)?;
    Some(mapped.to_uppercase().next().unwrap_or(mapped))
}

fn map_en_to_ru(ch: char) -> char {
    // order matters: digit-shift first (contains '@', '#', '$', '^', '&')
    map_by_table(ch, EN_DIGIT_SHIFT, RU_DIGIT_SHIFT)
        .or_else(|| map_by_table(ch, EN_SHIFT_PUNCT, RU_SHIFT_PUNCT))
        .or_else(|| map_with_case(ch, EN_LOWER, RU_LOWER))
        .unwrap_or(ch)
}

fn map_ru_to_en(ch: char) -> char {
    map_by_table(ch, RU_DIGIT_SHIFT, EN_DIGIT_SHIFT)
        .or_else(|| map_by_table(ch, RU_SHIFT_PUNCT, EN_SHIFT_PUNCT))
        .or_else(|| map_with_case(ch, RU_LOWER, EN_LOWER))
        .unwrap_or(ch)
}

pub fn is_cyrillic(ch: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&ch)
}

/// Any Cyrillic code point means the text was typed in the Russian layout.
#[must_use]
pub fn detect_language(text: &str) -> Lang {
    if text.chars().any(is_cyrillic) {
        Lang::Ru
    } else {
        Lang::En
    }
}

#[must_use]
pub fn convert_char(ch: char, direction: ConversionDirection) -> char {
    match direction {
        ConversionDirection::RuToEn => map_ru_to_en(ch),
        ConversionDirection::EnToRu => map_en_to_ru(ch),
    }
}

/// Converts text between the EN and RU layouts.
///
/// Without an explicit direction the source language is detected from the input.
#[must_use]
pub fn convert_text(text: &str, direction: Option<ConversionDirection>) -> String {
    let direction = direction
        .unwrap_or_else(|| ConversionDirection::from_source(detect_language(text)));
    text.chars().map(|ch| convert_char(ch, direction)).collect()
}

/// True when `ch`, typed in `layout`, is a letter in either layout.
///
/// `,` typed in `en` is a letter key because the same physical key is `б` in `ru`.
#[must_use]
pub fn is_letter_key(ch: char, layout: Lang) -> bool {
    ch.is_alphabetic() || convert_char(ch, ConversionDirection::from_source(layout)).is_alphabetic()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_mistyped_russian_word() {
        assert_eq!(convert_text("ghbdtn", None), "привет");
        assert_eq!(convert_text("привет", None), "ghbdtn");
    }

    #[test]
    fn preserves_case() {
        assert_eq!(convert_text("Ghbdtn", None), "Привет");
        assert_eq!(convert_text("LiNuX", None), "ДшТгЧ");
        assert_eq!(convert_text("ДшТгЧ", None), "LiNuX");
    }

    #[test]
    fn unmapped_input_is_unchanged() {
        assert_eq!(convert_text("12345", None), "12345");
        assert_eq!(convert_text("", None), "");
    }

    #[test]
    fn letter_punctuation_keys_roundtrip() {
        assert_eq!(convert_text("[jhjij", None), "хорошо");
        assert_eq!(convert_text("Хорошо", None), "{jhjij");
        assert_eq!(convert_text("{jhjij", Some(ConversionDirection::EnToRu)), "Хорошо");
        assert_eq!(convert_text(";:'\"", None), "жЖэЭ");
        assert_eq!(convert_text("жЖэЭ", None), ";:'\"");
    }

    #[test]
    fn digit_row_shift_symbols() {
        assert_eq!(convert_text("@#$^&", Some(ConversionDirection::EnToRu)), "\"№;:?");
        assert_eq!(convert_text("\"№;:?", Some(ConversionDirection::RuToEn)), "@#$^&");
    }

    #[test]
    fn involution_on_mapped_letters() {
        let samples = [
            "qwertyuiopasdfghjklzxcvbnm",
            "QWERTYUIOPASDFGHJKLZXCVBNM",
            "йцукенгшщзхъфывапролджэячсмитьбюё",
            "ЙЦУКЕНГШЩЗХЪФЫВАПРОЛДЖЭЯЧСМИТЬБЮЁ",
        ];
        for s in samples {
            assert_eq!(convert_text(&convert_text(s, None), None), s);
        }
    }

    #[test]
    fn explicit_direction_overrides_detection() {
        assert_eq!(convert_text(".", Some(ConversionDirection::RuToEn)), "/");
        assert_eq!(convert_text(".", Some(ConversionDirection::EnToRu)), "ю");
    }

    #[test]
    fn letter_keys_include_punctuation_of_the_other_layout() {
        assert!(is_letter_key(',', Lang::En));
        assert!(is_letter_key('[', Lang::En));
        assert!(is_letter_key('a', Lang::En));
        assert!(!is_letter_key('1', Lang::En));
        assert!(!is_letter_key('/', Lang::En));
        assert!(!is_letter_key('.', Lang::Ru));
        assert!(is_letter_key('ж', Lang::Ru));
    }

    #[test]
    fn direction_helpers_are_consistent() {
        let d = ConversionDirection::from_source(Lang::Ru);
        assert_eq!(d, ConversionDirection::RuToEn);
        assert_eq!(d.target(), Lang::En);
        assert_eq!(d.reversed().source(), Lang::En);
    }
}
