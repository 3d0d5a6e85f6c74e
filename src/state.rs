//! Gesture state and the keystroke buffer it owns.

mod manager;

pub use manager::{KeyOutcome, StateManager, Trigger, next_state};

use layout_switcher_core::KeyCode;

use crate::input::{KeyAction, KeyStroke};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Idle,
    Typing,
    ShiftPressed,
    Converting,
    BackspaceHold,
}

impl State {
    pub fn as_str(self) -> &'static str {
        match self {
            State::Idle => "idle",
            State::Typing => "typing",
            State::ShiftPressed => "shift_pressed",
            State::Converting => "converting",
            State::BackspaceHold => "backspace_hold",
        }
    }
}

/// Everything typed since the last word boundary that matters, plus gesture timers.
///
/// `chars_in_buffer` always equals the number of non-modifier strokes in the buffer.
#[derive(Debug, Clone, Default)]
pub struct StateContext {
    state: State,
    buffer: Vec<KeyStroke>,
    chars_in_buffer: usize,
    last_shift_time: Option<u64>,
    shift_pressed: bool,
    backspace_repeats: u32,
    backspace_hold_active: bool,
    current_layout: String,
}

impl StateContext {
    pub fn new(current_layout: impl Into<String>) -> Self {
        Self {
            current_layout: current_layout.into(),
            ..Self::default()
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: State) {
        self.state = state;
    }

    pub fn strokes(&self) -> &[KeyStroke] {
        &self.buffer
    }

    pub fn chars_in_buffer(&self) -> usize {
        self.chars_in_buffer
    }

    pub fn last_shift_time(&self) -> Option<u64> {
        self.last_shift_time
    }

    pub(crate) fn set_last_shift_time(&mut self, time: Option<u64>) {
        self.last_shift_time = time;
    }

    pub fn shift_pressed(&self) -> bool {
        self.shift_pressed
    }

    pub(crate) fn set_shift_pressed(&mut self, pressed: bool) {
        self.shift_pressed = pressed;
    }

    pub fn backspace_repeats(&self) -> u32 {
        self.backspace_repeats
    }

    pub(crate) fn set_backspace_repeats(&mut self, repeats: u32) {
        self.backspace_repeats = repeats;
    }

    pub fn backspace_hold_active(&self) -> bool {
        self.backspace_hold_active
    }

    pub(crate) fn set_backspace_hold_active(&mut self, active: bool) {
        self.backspace_hold_active = active;
    }

    pub fn current_layout(&self) -> &str {
        &self.current_layout
    }

    pub fn set_current_layout(&mut self, layout: impl Into<String>) {
        self.current_layout = layout.into();
    }

    /// Records a text-producing key.
    pub fn push_char(&mut self, code: KeyCode, shift: bool) {
        debug_assert!(!code.is_modifier());
        self.buffer.push(KeyStroke::press(code, shift));
        self.chars_in_buffer += 1;
    }

    /// Records a modifier transition. Does not count as a character.
    pub fn push_modifier(&mut self, code: KeyCode, action: KeyAction) {
        debug_assert!(code.is_modifier());
        self.buffer.push(KeyStroke {
            code,
            action,
            shift: self.shift_pressed,
        });
    }

    /// Forgets the newest character, as the host application just deleted it.
    pub fn pop_char(&mut self) -> Option<KeyStroke> {
        let idx = self.buffer.iter().rposition(|s| !s.code.is_modifier())?;
        self.chars_in_buffer -= 1;
        Some(self.buffer.remove(idx))
    }

    /// Clears buffers, counters and timers. The state itself is left to the transition table.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.chars_in_buffer = 0;
        self.last_shift_time = None;
        self.shift_pressed = false;
        self.backspace_repeats = 0;
        self.backspace_hold_active = false;
    }
}
