//! X11 desktop collaborators: evdev input, uinput output, `xkb-switch`, `xsel` and `xdotool`.

mod command;
pub mod devices;
mod uinput;
mod xkb;
mod xsel;

use std::sync::Arc;

pub use command::ProcessRunner;
pub use uinput::{DEVICE_NAME, UinputKeyboard};
pub use xkb::{XkbSwitch, tag_for_symbol};
pub use xsel::XselSelection;

use super::{Platform, System};
use crate::error::Result;

/// Builds the production collaborators. Fails when layouts or uinput are unavailable.
pub fn platform() -> Result<Platform> {
    let system: Arc<dyn System> = Arc::new(ProcessRunner::new());
    Ok(Platform {
        layouts: Box::new(XkbSwitch::probe(Arc::clone(&system))?),
        selection: Arc::new(XselSelection::new(system)),
        keyboard: Box::new(UinputKeyboard::create()?),
    })
}
