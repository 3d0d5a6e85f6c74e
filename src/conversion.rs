//! Turning wrongly typed text into the other layout.

pub mod auto;
mod retype;
mod selection;

use std::time::Duration;

use layout_switcher_core::keys::KEY_LEFTSHIFT;
pub use retype::RetypeMode;
pub use selection::SelectionMode;

use crate::{
    domain::outcome::ActionOutcome,
    input::{KeyAction, KeyStroke},
    platform::{LayoutInfo, Platform},
    state::StateContext,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Retype,
    Selection,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Retype => "retype",
            Mode::Selection => "selection",
        }
    }
}

/// Picks how a double-tap should convert.
///
/// A held Backspace always means the selection. Otherwise typed text wins over a selection,
/// and with nothing typed a fresh selection is converted.
#[must_use]
pub fn choose_mode(ctx: &StateContext, selection_is_fresh: bool) -> Mode {
    match (
        ctx.backspace_hold_active(),
        ctx.chars_in_buffer() > 0,
        selection_is_fresh,
    ) {
        (true, _, _) => Mode::Selection,
        (false, true, _) => Mode::Retype,
        (false, false, true) => Mode::Selection,
        (false, false, false) => Mode::Retype,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub mode: Mode,
    pub outcome: ActionOutcome,
    /// Layout active afterwards, when the conversion switched it.
    pub layout: Option<LayoutInfo>,
}

#[derive(Debug, Clone)]
pub struct ConversionEngine {
    retype: RetypeMode,
    selection: SelectionMode,
}

impl ConversionEngine {
    pub fn new(retype_delay: Duration) -> Self {
        Self {
            retype: RetypeMode::new(retype_delay),
            selection: SelectionMode::new(),
        }
    }

    pub fn set_retype_delay(&mut self, delay: Duration) {
        self.retype = RetypeMode::new(delay);
    }

    pub fn convert(
        &self,
        ctx: &StateContext,
        selection_is_fresh: bool,
        platform: &mut Platform,
    ) -> Conversion {
        let mode = choose_mode(ctx, selection_is_fresh);
        let (outcome, layout) = match mode {
            Mode::Retype => self.retype.execute(ctx, platform),
            Mode::Selection => self.selection.execute(platform),
        };
        tracing::debug!(
            mode = mode.as_str(),
            outcome = ?outcome,
            chars = ctx.chars_in_buffer(),
            "conversion finished"
        );
        Conversion {
            mode,
            outcome,
            layout,
        }
    }
}

/// Strokes to replay so the recorded keys type the same text again.
///
/// Bare Shift taps are dropped so they cannot trigger a layout shortcut. A character recorded
/// with Shift held but without its Shift press in the buffer gets its own Shift pair. A Shift
/// release is appended only when a Shift press would otherwise stay down.
pub fn replay_plan(strokes: &[KeyStroke]) -> Vec<KeyStroke> {
    let mut plan = Vec::with_capacity(strokes.len());
    let mut shift_down = None;
    let mut i = 0;

    while i < strokes.len() {
        let stroke = strokes[i];
        if stroke.code.is_shift() {
            let bare_tap = stroke.is_press()
                && strokes
                    .get(i + 1)
                    .is_some_and(|next| next.code == stroke.code && !next.is_press());
            if bare_tap {
                i += 2;
                continue;
            }
            match stroke.action {
                KeyAction::Press => {
                    shift_down = Some(stroke.code);
                    plan.push(stroke);
                }
                KeyAction::Release if shift_down == Some(stroke.code) => {
                    shift_down = None;
                    plan.push(stroke);
                }
                KeyAction::Release => {}
            }
        } else if stroke.code.is_modifier() {
            // Ctrl/Alt/Meta are never recorded; CapsLock would flip case twice.
        } else if stroke.shift && shift_down.is_none() {
            plan.push(KeyStroke::press(KEY_LEFTSHIFT, true));
            plan.push(stroke);
            plan.push(KeyStroke::release(KEY_LEFTSHIFT, true));
        } else {
            plan.push(stroke);
        }
        i += 1;
    }

    if let Some(code) = shift_down {
        plan.push(KeyStroke::release(code, true));
    }
    plan
}
