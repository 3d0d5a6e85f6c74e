use layout_switcher_core::{
    KeyCode, Lang,
    keys::{
        KEY_BACKSPACE, KEY_LEFTALT, KEY_LEFTCTRL, KEY_LEFTMETA, KEY_LEFTSHIFT, KEY_RIGHTALT,
        KEY_RIGHTCTRL, KEY_RIGHTMETA, KEY_RIGHTSHIFT,
    },
    text::keymap::keycode_to_char,
};

use super::{State, StateContext};
use crate::input::KeyAction;

/// Consecutive autorepeats of Backspace that count as holding it.
const BACKSPACE_HOLD_REPEATS: u32 = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Trigger {
    KeyPress,
    ShiftDown,
    ShiftUpSingle,
    ShiftUpDouble,
    BackspaceHold,
    Navigation,
    MouseClick,
    Enter,
    Complete,
    Cancelled,
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::KeyPress => "key_press",
            Trigger::ShiftDown => "shift_down",
            Trigger::ShiftUpSingle => "shift_up_single",
            Trigger::ShiftUpDouble => "shift_up_double",
            Trigger::BackspaceHold => "backspace_hold",
            Trigger::Navigation => "navigation",
            Trigger::MouseClick => "mouse_click",
            Trigger::Enter => "enter",
            Trigger::Complete => "complete",
            Trigger::Cancelled => "cancelled",
        }
    }
}

/// Transition table. `None` means the trigger is ignored in `state`.
#[must_use]
pub const fn next_state(state: State, trigger: Trigger) -> Option<State> {
    use State::*;
    use Trigger as T;

    match (state, trigger) {
        (Idle, T::KeyPress) => Some(Typing),

        (Typing, T::ShiftDown) => Some(ShiftPressed),
        (Typing, T::BackspaceHold) => Some(BackspaceHold),
        (Typing, T::Navigation | T::MouseClick | T::Enter) => Some(Idle),

        (ShiftPressed, T::ShiftUpSingle | T::KeyPress) => Some(Typing),
        (ShiftPressed, T::ShiftUpDouble) => Some(Converting),

        (BackspaceHold, T::KeyPress) => Some(Typing),
        (BackspaceHold, T::ShiftUpDouble) => Some(Converting),
        (BackspaceHold, T::Navigation | T::MouseClick) => Some(Idle),

        (Converting, T::Complete | T::Cancelled) => Some(Idle),

        _ => None,
    }
}

/// What a key or pointer event meant for the buffer and gestures.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Modifier,
    /// A character was appended to the buffer.
    Buffered,
    /// Backspace removed a character.
    Deleted,
    /// The buffer was cleared: caret moved, focus changed or a shortcut was used.
    Boundary,
    ShiftTap,
    BackspaceHold,
    ConvertRequested,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct HeldModifiers(u8);

impl HeldModifiers {
    const fn bit(code: KeyCode) -> u8 {
        match code {
            KEY_LEFTSHIFT => 1,
            KEY_RIGHTSHIFT => 1 << 1,
            KEY_LEFTCTRL => 1 << 2,
            KEY_RIGHTCTRL => 1 << 3,
            KEY_LEFTALT => 1 << 4,
            KEY_RIGHTALT => 1 << 5,
            KEY_LEFTMETA => 1 << 6,
            KEY_RIGHTMETA => 1 << 7,
            _ => 0,
        }
    }

    fn set(&mut self, code: KeyCode, down: bool) {
        if down {
            self.0 |= Self::bit(code);
        } else {
            self.0 &= !Self::bit(code);
        }
    }

    const fn shift(self) -> bool {
        self.0 & 0b11 != 0
    }

    const fn command(self) -> bool {
        self.0 & !0b11 != 0
    }
}

/// Owns the [`StateContext`] and applies key and pointer events to it.
#[derive(Debug)]
pub struct StateManager {
    ctx: StateContext,
    double_click_timeout_ms: u64,
    held: HeldModifiers,
    /// Shift went down with nothing else pressed since.
    bare_shift: bool,
}

impl StateManager {
    pub fn new(current_layout: impl Into<String>, double_click_timeout_ms: u64) -> Self {
        Self {
            ctx: StateContext::new(current_layout),
            double_click_timeout_ms,
            held: HeldModifiers::default(),
            bare_shift: false,
        }
    }

    pub fn state(&self) -> State {
        self.ctx.state()
    }

    pub fn context(&self) -> &StateContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut StateContext {
        &mut self.ctx
    }

    /// Ctrl, Alt or Meta is physically down.
    pub fn command_held(&self) -> bool {
        self.held.command()
    }

    pub fn set_double_click_timeout_ms(&mut self, timeout_ms: u64) {
        self.double_click_timeout_ms = timeout_ms;
    }

    /// Applies `trigger`. Returns whether the table had a row for it.
    pub fn fire(&mut self, trigger: Trigger) -> bool {
        let from = self.ctx.state();
        let Some(to) = next_state(from, trigger) else {
            tracing::trace!(
                state = from.as_str(),
                trigger = trigger.as_str(),
                "transition ignored"
            );
            return false;
        };
        self.ctx.set_state(to);
        tracing::trace!(
            from = from.as_str(),
            to = to.as_str(),
            trigger = trigger.as_str(),
            "state transition"
        );
        true
    }

    pub fn on_key_press(&mut self, code: KeyCode, _now_ms: u64) -> KeyOutcome {
        if code.is_shift() {
            self.held.set(code, true);
            self.ctx.set_shift_pressed(true);
            self.ctx.push_modifier(code, KeyAction::Press);
            self.bare_shift = !self.held.command();
            if self.ctx.state() == State::Idle {
                self.fire(Trigger::KeyPress);
            }
            self.fire(Trigger::ShiftDown);
            return KeyOutcome::Modifier;
        }
        if code.is_command_modifier() {
            self.held.set(code, true);
            self.bare_shift = false;
            return KeyOutcome::Modifier;
        }
        if code.is_modifier() {
            return KeyOutcome::Modifier;
        }

        self.bare_shift = false;
        self.ctx.set_last_shift_time(None);
        self.ctx.set_backspace_repeats(0);

        if code.is_enter() {
            return self.boundary(Trigger::Enter);
        }
        if code.is_navigation() || self.held.command() {
            return self.boundary(Trigger::Navigation);
        }
        if code == KEY_BACKSPACE {
            self.ctx.pop_char();
            self.fire(Trigger::KeyPress);
            return KeyOutcome::Deleted;
        }
        if !produces_text(code) {
            return self.boundary(Trigger::Navigation);
        }

        self.ctx.push_char(code, self.held.shift());
        self.fire(Trigger::KeyPress);
        KeyOutcome::Buffered
    }

    pub fn on_key_release(&mut self, code: KeyCode, now_ms: u64) -> KeyOutcome {
        if code.is_shift() {
            self.held.set(code, false);
            self.ctx.set_shift_pressed(self.held.shift());
            self.ctx.push_modifier(code, KeyAction::Release);
            return self.on_shift_up(now_ms);
        }
        if code.is_command_modifier() {
            self.held.set(code, false);
            return KeyOutcome::Modifier;
        }
        if code == KEY_BACKSPACE {
            self.ctx.set_backspace_repeats(0);
        }
        KeyOutcome::Ignored
    }

    pub fn on_key_repeat(&mut self, code: KeyCode, _now_ms: u64) -> KeyOutcome {
        if code == KEY_BACKSPACE {
            self.ctx.pop_char();
            let repeats = self.ctx.backspace_repeats() + 1;
            self.ctx.set_backspace_repeats(repeats);
            if repeats == BACKSPACE_HOLD_REPEATS {
                self.ctx.set_backspace_hold_active(true);
                self.fire(Trigger::BackspaceHold);
                return KeyOutcome::BackspaceHold;
            }
            return KeyOutcome::Deleted;
        }
        if code.is_modifier() {
            return KeyOutcome::Ignored;
        }
        if code.is_navigation() || code.is_enter() || self.held.command() || !produces_text(code) {
            return self.boundary(Trigger::Navigation);
        }
        self.ctx.push_char(code, self.held.shift());
        KeyOutcome::Buffered
    }

    pub fn on_mouse_click(&mut self) -> KeyOutcome {
        self.boundary(Trigger::MouseClick)
    }

    /// Leaves `Converting` and clears the buffer.
    pub fn finish_conversion(&mut self, applied: bool) {
        self.fire(if applied {
            Trigger::Complete
        } else {
            Trigger::Cancelled
        });
        self.ctx.reset();
    }

    /// Clears the buffer and returns to `Idle` from any state.
    pub fn reset_to_idle(&mut self) {
        self.ctx.reset();
        self.ctx.set_state(State::Idle);
    }

    fn on_shift_up(&mut self, now_ms: u64) -> KeyOutcome {
        if !std::mem::take(&mut self.bare_shift) {
            self.ctx.set_last_shift_time(None);
            self.fire(Trigger::ShiftUpSingle);
            return KeyOutcome::Modifier;
        }

        let second_tap = self
            .ctx
            .last_shift_time()
            .is_some_and(|prev| now_ms.saturating_sub(prev) < self.double_click_timeout_ms);

        if second_tap {
            self.ctx.set_last_shift_time(None);
            if self.fire(Trigger::ShiftUpDouble) {
                return KeyOutcome::ConvertRequested;
            }
            return KeyOutcome::ShiftTap;
        }

        self.ctx.set_last_shift_time(Some(now_ms));
        self.fire(Trigger::ShiftUpSingle);
        KeyOutcome::ShiftTap
    }

    fn boundary(&mut self, trigger: Trigger) -> KeyOutcome {
        self.fire(trigger);
        self.ctx.reset();
        KeyOutcome::Boundary
    }
}

fn produces_text(code: KeyCode) -> bool {
    keycode_to_char(code, Lang::En, false).is_some()
}
