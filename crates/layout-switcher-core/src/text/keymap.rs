//! Characters produced by physical keys under the US QWERTY and Russian ЙЦУКЕН layouts.

use crate::{Lang, keys::*};

struct KeyRow {
    code: KeyCode,
    en: char,
    en_shift: char,
    ru: char,
    ru_shift: char,
}

const fn row(code: KeyCode, en: char, en_shift: char, ru: char, ru_shift: char) -> KeyRow {
    KeyRow {
        code,
        en,
        en_shift,
        ru,
        ru_shift,
    }
}

const ROWS: &[KeyRow] = &[
    row(KEY_GRAVE, '`', '~', 'ё', 'Ё'),
    row(KEY_1, '1', '!', '1', '!'),
    row(KEY_2, '2', '@', '2', '"'),
    row(KEY_3, '3', '#', '3', '№'),
    row(KEY_4, '4', '$', '4', ';'),
    row(KEY_5, '5', '%', '5', '%'),
    row(KEY_6, '6', '^', '6', ':'),
    row(KEY_7, '7', '&', '7', '?'),
    row(KEY_8, '8', '*', '8', '*'),
    row(KEY_9, '9', '(', '9', '('),
    row(KEY_0, '0', ')', '0', ')'),
    row(KEY_MINUS, '-', '_', '-', '_'),
    row(KEY_EQUAL, '=', '+', '=', '+'),
    row(KEY_Q, 'q', 'Q', 'й', 'Й'),
    row(KEY_W, 'w', 'W', 'ц', 'Ц'),
    row(KEY_E, 'e', 'E', 'у', 'У'),
    row(KEY_R, 'r', 'R', 'к', 'К'),
    row(KEY_T, 't', 'T', 'е', 'Е'),
    row(KEY_Y, 'y', 'Y', 'н', 'Н'),
    row(KEY_U, 'u', 'U', 'г', 'Г'),
    row(KEY_I, 'i', 'I', 'ш', 'Ш'),
    row(KEY_O, 'o', 'O', 'щ', 'Щ'),
    row(KEY_P, 'p', 'P', 'з', 'З'),
    row(KEY_LEFTBRACE, '[', '{', 'х', 'Х'),
    row(KEY_RIGHTBRACE, ']', '}', 'ъ', 'Ъ'),
    row(KEY_A, 'a', 'A', 'ф', 'Ф'),
    row(KEY_S, 's', 'S', 'ы', 'Ы'),
    row(KEY_D, 'd', 'D', 'в', 'В'),
    row(KEY_F, 'f', 'F', 'а', 'А'),
    row(KEY_G, 'g', 'G', 'п', 'П'),
    row(KEY_H, 'h', 'H', 'р', 'Р'),
    row(KEY_J, 'j', 'J', 'о', 'О'),
    row(KEY_K, 'k', 'K', 'л', 'Л'),
    row(KEY_L, 'l', 'L', 'д', 'Д'),
    row(KEY_SEMICOLON, ';', ':', 'ж', 'Ж'),
    row(KEY_APOSTROPHE, '\'', '"', 'э', 'Э'),
    row(KEY_BACKSLASH, '\\', '|', '\\', '/'),
    row(KEY_Z, 'z', 'Z', 'я', 'Я'),
    row(KEY_X, 'x', 'X', 'ч', 'Ч'),
    row(KEY_C, 'c', 'C', 'с', 'С'),
    row(KEY_V, 'v', 'V', 'м', 'М'),
    row(KEY_B, 'b', 'B', 'и', 'И'),
    row(KEY_N, 'n', 'N', 'т', 'Т'),
    row(KEY_M, 'm', 'M', 'ь', 'Ь'),
    row(KEY_COMMA, ',', '<', 'б', 'Б'),
    row(KEY_DOT, '.', '>', 'ю', 'Ю'),
    row(KEY_SLASH, '/', '?', '.', ','),
    row(KEY_SPACE, ' ', ' ', ' ', ' '),
];

/// Character produced by `code` under `layout`, or `None` for keys that do not type text.
#[must_use]
pub fn keycode_to_char(code: KeyCode, layout: Lang, shift: bool) -> Option<char> {
    let row = ROWS.iter().find(|r| r.code == code)?;
    Some(match (layout, shift) {
        (Lang::En, false) => row.en,
        (Lang::En, true) => row.en_shift,
        (Lang::Ru, false) => row.ru,
        (Lang::Ru, true) => row.ru_shift,
    })
}

/// Physical key and Shift state that type `ch` under `layout`.
#[must_use]
pub fn char_to_keycode(ch: char, layout: Lang) -> Option<(KeyCode, bool)> {
    ROWS.iter().find_map(|r| {
        let (plain, shifted) = match layout {
            Lang::En => (r.en, r.en_shift),
            Lang::Ru => (r.ru, r.ru_shift),
        };
        if plain == ch {
            Some((r.code, false))
        } else if shifted == ch {
            Some((r.code, true))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::mapping::{ConversionDirection, convert_char};

    #[test]
    fn same_key_decodes_per_layout() {
        assert_eq!(keycode_to_char(KEY_G, Lang::En, false), Some('g'));
        assert_eq!(keycode_to_char(KEY_G, Lang::Ru, false), Some('п'));
        assert_eq!(keycode_to_char(KEY_COMMA, Lang::Ru, true), Some('Б'));
        assert_eq!(keycode_to_char(KEY_LEFTSHIFT, Lang::En, false), None);
    }

    #[test]
    fn keymap_agrees_with_text_converter_on_letter_keys() {
        for code in [KEY_Q, KEY_LEFTBRACE, KEY_SEMICOLON, KEY_COMMA, KEY_DOT, KEY_GRAVE] {
            for shift in [false, true] {
                let en = keycode_to_char(code, Lang::En, shift).unwrap_or_default();
                let ru = keycode_to_char(code, Lang::Ru, shift).unwrap_or_default();
                assert_eq!(convert_char(en, ConversionDirection::EnToRu), ru);
                assert_eq!(convert_char(ru, ConversionDirection::RuToEn), en);
            }
        }
    }

    #[test]
    fn char_to_keycode_finds_shift_state() {
        assert_eq!(char_to_keycode('П', Lang::Ru), Some((KEY_G, true)));
        assert_eq!(char_to_keycode('h', Lang::En), Some((KEY_H, false)));
        assert_eq!(char_to_keycode('€', Lang::En), None);
    }
}
