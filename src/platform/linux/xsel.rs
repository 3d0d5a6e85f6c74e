//! Selection backend on top of `xsel` and `xdotool`.

use std::{
    sync::{Arc, Mutex},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use super::command::checked;
use crate::{
    error::Result,
    platform::{SelectionBackend, SelectionInfo, System},
};

const TIMEOUT: Duration = Duration::from_millis(500);
/// Time the focused application gets to read the clipboard after the paste shortcut.
const PASTE_SETTLE: Duration = Duration::from_millis(120);

pub struct XselSelection {
    system: Arc<dyn System>,
    last_seen: Mutex<Option<(String, String)>>,
}

/// Puts the saved clipboard text back when dropped.
struct ClipboardRestore<'a> {
    system: &'a dyn System,
    saved: String,
}

impl ClipboardRestore<'_> {
    fn capture(system: &dyn System) -> ClipboardRestore<'_> {
        let saved = checked(system, "xsel", &["-o", "-b"], None, TIMEOUT).unwrap_or_default();
        ClipboardRestore { system, saved }
    }
}

impl Drop for ClipboardRestore<'_> {
    fn drop(&mut self) {
        let restored = if self.saved.is_empty() {
            checked(self.system, "xsel", &["-c", "-b"], None, TIMEOUT)
        } else {
            checked(self.system, "xsel", &["-i", "-b"], Some(&self.saved), TIMEOUT)
        };
        if let Err(e) = restored {
            tracing::warn!(error = %e, "clipboard restore failed");
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

impl XselSelection {
    pub fn new(system: Arc<dyn System>) -> Self {
        Self {
            system,
            last_seen: Mutex::new(None),
        }
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        checked(self.system.as_ref(), program, args, None, TIMEOUT)
    }

    /// Id of the focused window, used in place of the X selection owner.
    ///
    /// `xsel` cannot report which client owns PRIMARY, and the owner is almost always
    /// the window the user just selected in. Empty when the query fails.
    fn focused_window_id(&self) -> String {
        self.run("xdotool", &["getactivewindow"])
            .map(|id| id.trim().to_string())
            .unwrap_or_default()
    }
}

impl SelectionBackend for XselSelection {
    fn selection(&self) -> Result<SelectionInfo> {
        let text = self.run("xsel", &["-o", "-p"])?;
        Ok(SelectionInfo {
            text,
            owner_id: self.focused_window_id(),
            timestamp_ms: now_ms(),
        })
    }

    fn has_fresh_selection(&self) -> bool {
        let Ok(info) = self.selection() else {
            return false;
        };
        if info.text.is_empty() {
            return false;
        }
        let seen = (info.owner_id, info.text);
        let mut last = self
            .last_seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let fresh = last.as_ref() != Some(&seen);
        *last = Some(seen);
        fresh
    }

    fn replace_selection(&self, text: &str) -> Result<bool> {
        let system = self.system.as_ref();
        let _restore = ClipboardRestore::capture(system);

        checked(system, "xsel", &["-i", "-b"], Some(text), TIMEOUT)?;
        checked(
            system,
            "xdotool",
            &["key", "--clearmodifiers", "ctrl+v"],
            None,
            TIMEOUT,
        )?;
        std::thread::sleep(PASTE_SETTLE);
        Ok(true)
    }

    fn expand_selection_to_word(&self) -> Result<SelectionInfo> {
        self.run("xdotool", &["key", "--clearmodifiers", "ctrl+shift+Left"])?;
        self.selection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::MemorySystem;

    #[test]
    fn paste_goes_through_clipboard_and_restores_it() {
        let sys = MemorySystem::new();
        sys.respond("xsel -o -b", "saved clip");
        let sel = XselSelection::new(Arc::new(sys.clone()));

        assert!(sel.replace_selection("привет").unwrap());

        let calls = sys.calls();
        let lines: Vec<&str> = calls.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(
            lines,
            vec![
                "xsel -o -b",
                "xsel -i -b",
                "xdotool key --clearmodifiers ctrl+v",
                "xsel -i -b",
            ]
        );
        assert_eq!(calls[1].1.as_deref(), Some("привет"));
        assert_eq!(calls[3].1.as_deref(), Some("saved clip"));
    }

    #[test]
    fn clipboard_is_restored_when_paste_fails() {
        let sys = MemorySystem::new();
        sys.respond("xsel -o -b", "keep me");
        sys.fail("xdotool key --clearmodifiers ctrl+v", "no display");
        let sel = XselSelection::new(Arc::new(sys.clone()));

        assert!(sel.replace_selection("text").is_err());
        assert_eq!(
            sys.calls().last().map(|(l, stdin)| (l.clone(), stdin.clone())),
            Some(("xsel -i -b".to_string(), Some("keep me".to_string())))
        );
    }

    #[test]
    fn same_text_from_another_window_is_fresh() {
        let sys = MemorySystem::new();
        sys.respond("xsel -o -p", "word");
        sys.respond("xdotool getactivewindow", "100\n");
        let sel = XselSelection::new(Arc::new(sys.clone()));

        assert!(sel.has_fresh_selection());
        assert!(!sel.has_fresh_selection());

        sys.respond("xdotool getactivewindow", "200\n");
        assert!(sel.has_fresh_selection());
    }

    #[test]
    fn owner_falls_back_to_empty_without_a_focused_window() {
        let sys = MemorySystem::new();
        sys.respond("xsel -o -p", "word");
        sys.fail("xdotool getactivewindow", "no window");
        let sel = XselSelection::new(Arc::new(sys.clone()));

        let info = sel.selection().unwrap();
        assert_eq!(info.text, "word");
        assert_eq!(info.owner_id, "");

        assert!(sel.has_fresh_selection());
        sys.respond("xsel -o -p", "other");
        assert!(sel.has_fresh_selection());
    }

        #[test]
    fn empty_selection_is_never_fresh() {
        let sys = MemorySystem::new();
        let sel = XselSelection::new(Arc::new(sys));
        assert!(!sel.has_fresh_selection());
    }
}
