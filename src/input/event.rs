use std::sync::Arc;

use layout_switcher_core::KeyCode;

/// `EV_KEY` from `linux/input-event-codes.h`. Pointer buttons use it too.
pub const EV_KEY: u16 = 0x01;

/// A hardware event as read from an input device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: u16,
    pub code: u16,
    pub value: i32,
    pub time_ms: u64,
}

impl RawEvent {
    pub const fn key(code: KeyCode, value: i32, time_ms: u64) -> Self {
        Self {
            kind: EV_KEY,
            code: code.0,
            value,
            time_ms,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    KeyPress,
    KeyRelease,
    KeyRepeat,
    MouseClick,
    MouseRelease,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::KeyPress => "key_press",
            EventType::KeyRelease => "key_release",
            EventType::KeyRepeat => "key_repeat",
            EventType::MouseClick => "mouse_click",
            EventType::MouseRelease => "mouse_release",
        }
    }
}

/// A classified input event published on the bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: EventType,
    pub code: KeyCode,
    pub time_ms: u64,
    pub device: Arc<str>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
}

/// One recorded keystroke, replayable on the virtual keyboard.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyStroke {
    pub code: KeyCode,
    pub action: KeyAction,
    /// Shift was held when the key went down.
    pub shift: bool,
}

impl KeyStroke {
    pub const fn press(code: KeyCode, shift: bool) -> Self {
        Self {
            code,
            action: KeyAction::Press,
            shift,
        }
    }

    pub const fn release(code: KeyCode, shift: bool) -> Self {
        Self {
            code,
            action: KeyAction::Release,
            shift,
        }
    }

    pub const fn is_press(&self) -> bool {
        matches!(self.action, KeyAction::Press)
    }
}
