pub mod keymap;
pub mod mapping;

pub use mapping::{
    ConversionDirection, convert_char, convert_text, detect_language, is_cyrillic, is_letter_key,
};
