//! Synthetic keyboard backed by a uinput device.

use std::{thread, time::Duration};

use evdev::{AttributeSet, EventType, InputEvent, Key, uinput::VirtualDevice};
use layout_switcher_core::KeyCode;

use crate::{
    error::{Error, Result},
    input::{KeyAction, KeyStroke},
    platform::{VirtualKeyboard, paired_transitions},
};

/// Name of the device we create. Device readers skip it so our own output is never re-read.
pub const DEVICE_NAME: &str = "layout-switcher virtual keyboard";

/// Pause between synthetic key transitions so slow clients keep up.
const KEY_GAP: Duration = Duration::from_millis(2);
/// Main block, modifiers and navigation keys.
const MAX_KEY_CODE: u16 = 127;

pub struct UinputKeyboard {
    device: Option<VirtualDevice>,
}

impl UinputKeyboard {
    pub fn create() -> Result<Self> {
        let mut keys = AttributeSet::<Key>::new();
        for code in 1..=MAX_KEY_CODE {
            keys.insert(Key::new(code));
        }

        let device = evdev::uinput::VirtualDeviceBuilder::new()
            .and_then(|b| b.name(DEVICE_NAME).with_keys(&keys))
            .and_then(|b| b.build())
            .map_err(|e| Error::PlatformUnavailable(format!("uinput: {e}")))?;

        tracing::debug!(name = DEVICE_NAME, "virtual keyboard created");
        Ok(Self {
            device: Some(device),
        })
    }

    fn emit(&mut self, code: KeyCode, action: KeyAction) -> Result<()> {
        let Some(device) = self.device.as_mut() else {
            return Err(Error::PlatformUnavailable("virtual keyboard closed".into()));
        };
        let value = match action {
            KeyAction::Press => 1,
            KeyAction::Release => 0,
        };
        device.emit(&[InputEvent::new(EventType::KEY, code.0, value)])?;
        thread::sleep(KEY_GAP);
        Ok(())
    }
}

impl VirtualKeyboard for UinputKeyboard {
    fn tap_key(&mut self, code: KeyCode, times: usize) -> Result<()> {
        for _ in 0..times {
            self.emit(code, KeyAction::Press)?;
            self.emit(code, KeyAction::Release)?;
        }
        Ok(())
    }

    fn replay_events(&mut self, strokes: &[KeyStroke]) -> Result<()> {
        for (code, action) in paired_transitions(strokes) {
            self.emit(code, action)?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.device.take().is_some() {
            tracing::debug!("virtual keyboard closed");
        }
        Ok(())
    }
}
