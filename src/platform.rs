//! Contracts of the OS collaborators: layouts, selection, synthetic input, processes.

pub mod memory;

#[cfg(target_os = "linux")]
pub mod linux;

use std::{sync::Arc, time::Duration};

use layout_switcher_core::{KeyCode, Lang, text::keymap};

use crate::{
    error::Result,
    input::{KeyAction, KeyStroke},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutInfo {
    /// Short tag such as `en` or `ru`.
    pub name: String,
    pub index: usize,
    /// Identifier the platform uses, e.g. the xkb group symbol.
    pub native_name: String,
}

impl LayoutInfo {
    pub fn new(name: impl Into<String>, index: usize, native_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index,
            native_name: native_name.into(),
        }
    }

    pub fn lang(&self) -> Option<Lang> {
        Lang::from_tag(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionInfo {
    pub text: String,
    /// Opaque identity of the window holding the selection. Backends without access to
    /// the real selection owner report the focused window instead.
    pub owner_id: String,
    pub timestamp_ms: u64,
}

pub trait LayoutBackend: Send {
    fn layouts(&self) -> Result<Vec<LayoutInfo>>;

    fn current_layout(&self) -> Result<LayoutInfo>;

    /// Switches to `target`, or to the next layout when `None`. Returns the active layout.
    fn switch_layout(&self, target: Option<&LayoutInfo>) -> Result<LayoutInfo>;

    fn keycode_to_char(&self, code: KeyCode, layout: &LayoutInfo, shift: bool) -> Option<char> {
        keymap::keycode_to_char(code, layout.lang()?, shift)
    }

    /// First layout whose tag is `lang`.
    fn find_layout(&self, lang: Lang) -> Result<Option<LayoutInfo>> {
        Ok(self.layouts()?.into_iter().find(|l| l.name == lang.tag()))
    }
}

pub trait SelectionBackend: Send + Sync {
    fn selection(&self) -> Result<SelectionInfo>;

    /// True when the owner or text changed since the previous call.
    fn has_fresh_selection(&self) -> bool;

    /// Replaces the selected text, restoring any clipboard content used to do it.
    fn replace_selection(&self, text: &str) -> Result<bool>;

    fn expand_selection_to_word(&self) -> Result<SelectionInfo>;
}

pub trait VirtualKeyboard: Send {
    fn tap_key(&mut self, code: KeyCode, times: usize) -> Result<()>;

    /// Replays `strokes` in order. Presses without a later release get one right away.
    fn replay_events(&mut self, strokes: &[KeyStroke]) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

pub trait System: Send + Sync {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        stdin: Option<&str>,
        timeout: Duration,
    ) -> Result<CommandOutput>;
}

/// The collaborators the conversion code drives.
pub struct Platform {
    pub layouts: Box<dyn LayoutBackend>,
    pub selection: Arc<dyn SelectionBackend>,
    pub keyboard: Box<dyn VirtualKeyboard>,
}

/// Expands `strokes` into raw key transitions, pairing every unreleased press.
///
/// A press is left open when a release of the same key follows before that key is pressed again.
pub fn paired_transitions(strokes: &[KeyStroke]) -> Vec<(KeyCode, KeyAction)> {
    let mut out = Vec::with_capacity(strokes.len() * 2);
    for (i, stroke) in strokes.iter().enumerate() {
        out.push((stroke.code, stroke.action));
        if !stroke.is_press() {
            continue;
        }
        let released_later = strokes[i + 1..]
            .iter()
            .find(|s| s.code == stroke.code)
            .is_some_and(|s| !s.is_press());
        if !released_later {
            out.push((stroke.code, KeyAction::Release));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use layout_switcher_core::keys::{KEY_A, KEY_B, KEY_LEFTSHIFT};

    use super::*;

    #[test]
    fn unpaired_presses_are_released_immediately() {
        let strokes = [
            KeyStroke::press(KEY_LEFTSHIFT, false),
            KeyStroke::press(KEY_A, true),
            KeyStroke::release(KEY_LEFTSHIFT, true),
            KeyStroke::press(KEY_B, false),
            KeyStroke::press(KEY_B, false),
        ];
        assert_eq!(
            paired_transitions(&strokes),
            vec![
                (KEY_LEFTSHIFT, KeyAction::Press),
                (KEY_A, KeyAction::Press),
                (KEY_A, KeyAction::Release),
                (KEY_LEFTSHIFT, KeyAction::Release),
                (KEY_B, KeyAction::Press),
                (KEY_B, KeyAction::Release),
                (KEY_B, KeyAction::Press),
                (KEY_B, KeyAction::Release),
            ]
        );
    }

    #[test]
    fn default_keycode_to_char_uses_layout_tag() {
        struct Fixed;
        impl LayoutBackend for Fixed {
            fn layouts(&self) -> Result<Vec<LayoutInfo>> {
                Ok(vec![LayoutInfo::new("en", 0, "us"), LayoutInfo::new("ru", 1, "ru")])
            }
            fn current_layout(&self) -> Result<LayoutInfo> {
                Ok(LayoutInfo::new("en", 0, "us"))
            }
            fn switch_layout(&self, _: Option<&LayoutInfo>) -> Result<LayoutInfo> {
                self.current_layout()
            }
        }

        let ru = LayoutInfo::new("ru", 1, "ru");
        let de = LayoutInfo::new("de", 2, "de");
        assert_eq!(Fixed.keycode_to_char(KEY_A, &ru, false), Some('ф'));
        assert_eq!(Fixed.keycode_to_char(KEY_A, &de, false), None);
        assert_eq!(Fixed.find_layout(Lang::Ru).unwrap(), Some(ru));
    }
}
