//! Space-triggered conversion of the last typed word, and undoing it.

use std::time::Duration;

use layout_switcher_core::{
    Lang,
    keys::{KEY_BACKSPACE, KEY_SPACE},
    text::{ConversionDirection, convert_text, is_letter_key, keymap::keycode_to_char},
};

use super::replay_plan;
use crate::{
    domain::outcome::{ActionOutcome, Failure},
    input::KeyStroke,
    platform::{LayoutInfo, Platform},
};

/// The word right before the caret, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastWord {
    pub text: String,
    /// Strokes that produced `text`, in typed order. Shift strokes inside the word are kept.
    pub strokes: Vec<KeyStroke>,
}

impl LastWord {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Scans `strokes` backwards for the newest word typed under `layout`.
///
/// Stops at a space or at a key that is not a letter in either layout.
pub fn extract_last_word(strokes: &[KeyStroke], layout: Lang) -> Option<LastWord> {
    let mut chars = Vec::new();
    let mut taken = Vec::new();

    for stroke in strokes.iter().rev() {
        if stroke.code.is_modifier() {
            taken.push(*stroke);
            continue;
        }
        if stroke.code == KEY_SPACE {
            break;
        }
        let Some(ch) = keycode_to_char(stroke.code, layout, stroke.shift) else {
            break;
        };
        if !is_letter_key(ch, layout) {
            break;
        }
        chars.push(ch);
        taken.push(*stroke);
    }

    if chars.is_empty() {
        return None;
    }
    // Modifiers before the first letter belong to whatever came before the word.
    while taken.last().is_some_and(|s| s.code.is_modifier() && !s.is_press()) {
        taken.pop();
    }
    chars.reverse();
    taken.reverse();
    Some(LastWord {
        text: chars.into_iter().collect(),
        strokes: taken,
    })
}

/// Record of the last automatic conversion, kept until the user's next action.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoMarker {
    /// The word as typed, before conversion.
    pub word: String,
    /// Layout the word was typed in.
    pub lang: Lang,
    pub direction: ConversionDirection,
    pub time_ms: u64,
    pub strokes: Vec<KeyStroke>,
}

impl AutoMarker {
    pub fn converted(&self) -> String {
        convert_text(&self.word, Some(self.direction))
    }

    /// A double-tap at `now_ms` comes too late to undo this conversion.
    pub fn is_expired(&self, now_ms: u64, window: Duration) -> bool {
        u128::from(now_ms.saturating_sub(self.time_ms)) > window.as_millis()
    }
}

/// Replaces `word` and the space typed after it with the word retyped in `target`.
///
/// Returns the layout switched to.
pub fn convert_word(
    word: &LastWord,
    target: Lang,
    delay: Duration,
    platform: &mut Platform,
) -> (ActionOutcome, Option<LayoutInfo>) {
    retype_word(word.char_count(), &word.strokes, target, delay, platform)
}

/// Puts back the word recorded in `marker` in the layout it was typed in.
pub fn undo(
    marker: &AutoMarker,
    delay: Duration,
    platform: &mut Platform,
) -> (ActionOutcome, Option<LayoutInfo>) {
    let converted_len = marker.converted().chars().count();
    retype_word(converted_len, &marker.strokes, marker.lang, delay, platform)
}

fn retype_word(
    char_count: usize,
    strokes: &[KeyStroke],
    target: Lang,
    delay: Duration,
    platform: &mut Platform,
) -> (ActionOutcome, Option<LayoutInfo>) {
    let plan = replay_plan(strokes);

    // The host application already received the space.
    if let Err(e) = platform.keyboard.tap_key(KEY_BACKSPACE, char_count + 1) {
        tracing::warn!(error = %e, "auto: deleting word failed");
        return (ActionOutcome::Failed(Failure::InputError), None);
    }

    let switched = platform
        .layouts
        .find_layout(target)
        .and_then(|found| match found {
            Some(layout) => platform.layouts.switch_layout(Some(&layout)),
            None => Err(crate::error::Error::LayoutNotFound(target.tag().to_string())),
        });
    let layout = match switched {
        Ok(layout) => layout,
        Err(e) => {
            tracing::warn!(error = %e, target = %target, "auto: layout switch failed, restoring word");
            restore(&plan, platform);
            return (ActionOutcome::Failed(Failure::LayoutError), None);
        }
    };

    std::thread::sleep(delay);

    let replayed = platform
        .keyboard
        .replay_events(&plan)
        .and_then(|()| platform.keyboard.tap_key(KEY_SPACE, 1));
    if let Err(e) = replayed {
        tracing::warn!(error = %e, "auto: replay failed");
        return (ActionOutcome::Failed(Failure::InputError), Some(layout));
    }

    (ActionOutcome::Applied, Some(layout))
}

fn restore(plan: &[KeyStroke], platform: &mut Platform) {
    let restored = platform
        .keyboard
        .replay_events(plan)
        .and_then(|()| platform.keyboard.tap_key(KEY_SPACE, 1));
    if let Err(e) = restored {
        tracing::warn!(error = %e, "auto: restoring word failed");
    }
}
