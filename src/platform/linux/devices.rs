//! Discovery of keyboards and pointers, and reader threads feeding one channel.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, mpsc::Sender},
    thread::JoinHandle,
    time::UNIX_EPOCH,
};

use evdev::{Device, InputEvent, Key};

use super::uinput::DEVICE_NAME;
use crate::{
    config::Config,
    error::{Error, Result},
    input::RawEvent,
};

const INPUT_DIR: &str = "/dev/input";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDevice {
    pub path: PathBuf,
    pub name: Arc<str>,
}

fn is_keyboard(device: &Device) -> bool {
    device.supported_keys().is_some_and(|keys| {
        keys.contains(Key::KEY_A) && keys.contains(Key::KEY_Z) && keys.contains(Key::KEY_SPACE)
    })
}

fn is_pointer(device: &Device) -> bool {
    device
        .supported_keys()
        .is_some_and(|keys| keys.contains(Key::BTN_LEFT))
}

/// Keyboards and pointers under `/dev/input` accepted by `config`.
pub fn discover(config: &Config) -> Result<Vec<InputDevice>> {
    let entries = std::fs::read_dir(INPUT_DIR).map_err(|e| {
        Error::PlatformUnavailable(format!(
            "cannot read {INPUT_DIR}: {e}; is the user in the 'input' group?"
        ))
    })?;

    let mut found = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let is_event_node = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("event"));
        if !is_event_node {
            continue;
        }

        let device = match Device::open(&path) {
            Ok(device) => device,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "cannot open input device");
                continue;
            }
        };
        let name = device.name().unwrap_or("unknown").to_string();
        if name == DEVICE_NAME || !config.accepts_device(&name) {
            continue;
        }
        if is_keyboard(&device) || is_pointer(&device) {
            tracing::info!(path = %path.display(), name = %name, "input device found");
            found.push(InputDevice {
                path,
                name: Arc::from(name),
            });
        }
    }

    if found.is_empty() {
        return Err(Error::PlatformUnavailable("no readable keyboard found".into()));
    }
    Ok(found)
}

fn to_raw(event: &InputEvent) -> RawEvent {
    let time_ms = event
        .timestamp()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0);
    RawEvent {
        kind: event.event_type().0,
        code: event.code(),
        value: event.value(),
        time_ms,
    }
}

fn read_loop(path: &Path, name: &Arc<str>, tx: &Sender<(RawEvent, Arc<str>)>) -> Result<()> {
    let mut device = Device::open(path)?;
    loop {
        for event in device.fetch_events()? {
            if tx.send((to_raw(&event), Arc::clone(name))).is_err() {
                return Ok(());
            }
        }
    }
}

/// Spawns one reader thread per device. Threads end when the receiver is dropped or the
/// device disappears.
pub fn spawn_readers(
    devices: Vec<InputDevice>,
    tx: &Sender<(RawEvent, Arc<str>)>,
) -> Result<Vec<JoinHandle<()>>> {
    devices
        .into_iter()
        .map(|device| {
            let tx = tx.clone();
            std::thread::Builder::new()
                .name(format!("input-{}", device.name))
                .spawn(move || {
                    if let Err(e) = read_loop(&device.path, &device.name, &tx) {
                        tracing::warn!(device = %device.name, error = %e, "input reader stopped");
                    }
                })
                .map_err(Error::from)
        })
        .collect()
}
