//! Layout-independent building blocks: key codes, the physical RU/EN keymap and
//! the text converter that maps characters between the two layouts.

pub mod keys;
pub mod lang;
pub mod text;

pub use keys::KeyCode;
pub use lang::Lang;
