//! In-process collaborators. Clones share state so a test can keep a handle and inspect calls.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use layout_switcher_core::{KeyCode, keys::KEY_BACKSPACE};

use super::{
    CommandOutput, LayoutBackend, LayoutInfo, SelectionBackend, SelectionInfo, System,
    VirtualKeyboard, paired_transitions,
};
use crate::{
    error::{Error, Result},
    input::{KeyAction, KeyStroke},
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct LayoutState {
    layouts: Vec<LayoutInfo>,
    current: usize,
    switches: Vec<Option<String>>,
    fail_switch: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryLayouts {
    inner: Arc<Mutex<LayoutState>>,
}

impl MemoryLayouts {
    pub fn new(layouts: Vec<LayoutInfo>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LayoutState {
                layouts,
                ..LayoutState::default()
            })),
        }
    }

    /// `en` at index 0, `ru` at index 1.
    pub fn en_ru() -> Self {
        Self::new(vec![
            LayoutInfo::new("en", 0, "us"),
            LayoutInfo::new("ru", 1, "ru"),
        ])
    }

    pub fn set_current(&self, index: usize) {
        lock(&self.inner).current = index;
    }

    pub fn set_fail_switch(&self, fail: bool) {
        lock(&self.inner).fail_switch = fail;
    }

    /// Every `switch_layout` call: the requested tag, or `None` for a cycle.
    pub fn switches(&self) -> Vec<Option<String>> {
        lock(&self.inner).switches.clone()
    }
}

impl LayoutBackend for MemoryLayouts {
    fn layouts(&self) -> Result<Vec<LayoutInfo>> {
        Ok(lock(&self.inner).layouts.clone())
    }

    fn current_layout(&self) -> Result<LayoutInfo> {
        let state = lock(&self.inner);
        state
            .layouts
            .get(state.current)
            .cloned()
            .ok_or_else(|| Error::PlatformUnavailable("no layouts configured".into()))
    }

    fn switch_layout(&self, target: Option<&LayoutInfo>) -> Result<LayoutInfo> {
        let mut state = lock(&self.inner);
        state.switches.push(target.map(|t| t.name.clone()));
        if state.fail_switch {
            return Err(Error::Command {
                program: "memory".into(),
                message: "switch refused".into(),
            });
        }
        if state.layouts.is_empty() {
            return Err(Error::PlatformUnavailable("no layouts configured".into()));
        }
        let next = match target {
            Some(t) => state
                .layouts
                .iter()
                .position(|l| l.index == t.index)
                .ok_or_else(|| Error::LayoutNotFound(t.name.clone()))?,
            None => (state.current + 1) % state.layouts.len(),
        };
        state.current = next;
        Ok(state.layouts[state.current].clone())
    }
}

#[derive(Debug, Default)]
struct SelectionState {
    selection: SelectionInfo,
    last_seen: Option<(String, String)>,
    replaced: Vec<String>,
    clipboard: String,
    fail_replace: bool,
    expand_calls: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySelection {
    inner: Arc<Mutex<SelectionState>>,
}

impl MemorySelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, text: &str, owner_id: &str) {
        let mut state = lock(&self.inner);
        state.selection = SelectionInfo {
            text: text.to_string(),
            owner_id: owner_id.to_string(),
            timestamp_ms: state.selection.timestamp_ms + 1,
        };
    }

    pub fn set_clipboard(&self, text: &str) {
        lock(&self.inner).clipboard = text.to_string();
    }

    pub fn clipboard(&self) -> String {
        lock(&self.inner).clipboard.clone()
    }

    pub fn set_fail_replace(&self, fail: bool) {
        lock(&self.inner).fail_replace = fail;
    }

    pub fn replaced(&self) -> Vec<String> {
        lock(&self.inner).replaced.clone()
    }

    pub fn expand_calls(&self) -> usize {
        lock(&self.inner).expand_calls
    }
}

impl SelectionBackend for MemorySelection {
    fn selection(&self) -> Result<SelectionInfo> {
        Ok(lock(&self.inner).selection.clone())
    }

    fn has_fresh_selection(&self) -> bool {
        let mut state = lock(&self.inner);
        if state.selection.text.is_empty() {
            return false;
        }
        let seen = (
            state.selection.owner_id.clone(),
            state.selection.text.clone(),
        );
        let fresh = state.last_seen.as_ref() != Some(&seen);
        state.last_seen = Some(seen);
        fresh
    }

    fn replace_selection(&self, text: &str) -> Result<bool> {
        let mut state = lock(&self.inner);
        if state.fail_replace {
            return Ok(false);
        }
        // The clipboard is only a transport here, so it ends up unchanged.
        state.replaced.push(text.to_string());
        state.selection.text = text.to_string();
        Ok(true)
    }

    fn expand_selection_to_word(&self) -> Result<SelectionInfo> {
        let mut state = lock(&self.inner);
        state.expand_calls += 1;
        Ok(state.selection.clone())
    }
}

#[derive(Debug, Default)]
struct KeyboardState {
    transitions: Vec<(KeyCode, KeyAction)>,
    taps: Vec<(KeyCode, usize)>,
    replays: Vec<Vec<KeyStroke>>,
    closed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryKeyboard {
    inner: Arc<Mutex<KeyboardState>>,
}

impl MemoryKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every key transition emitted, taps and replays interleaved in call order.
    pub fn transitions(&self) -> Vec<(KeyCode, KeyAction)> {
        lock(&self.inner).transitions.clone()
    }

    pub fn taps(&self) -> Vec<(KeyCode, usize)> {
        lock(&self.inner).taps.clone()
    }

    pub fn replays(&self) -> Vec<Vec<KeyStroke>> {
        lock(&self.inner).replays.clone()
    }

    pub fn backspaces(&self) -> usize {
        lock(&self.inner)
            .taps
            .iter()
            .filter(|(code, _)| *code == KEY_BACKSPACE)
            .map(|(_, times)| times)
            .sum()
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner).closed
    }
}

impl VirtualKeyboard for MemoryKeyboard {
    fn tap_key(&mut self, code: KeyCode, times: usize) -> Result<()> {
        let mut state = lock(&self.inner);
        state.taps.push((code, times));
        for _ in 0..times {
            state.transitions.push((code, KeyAction::Press));
            state.transitions.push((code, KeyAction::Release));
        }
        Ok(())
    }

    fn replay_events(&mut self, strokes: &[KeyStroke]) -> Result<()> {
        let mut state = lock(&self.inner);
        state.replays.push(strokes.to_vec());
        state.transitions.extend(paired_transitions(strokes));
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        lock(&self.inner).closed = true;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SystemState {
    responses: HashMap<String, CommandOutput>,
    calls: Vec<(String, Vec<String>, Option<String>)>,
}

/// Answers commands from a table keyed by `"program arg1 arg2"`.
#[derive(Debug, Clone, Default)]
pub struct MemorySystem {
    inner: Arc<Mutex<SystemState>>,
}

impl MemorySystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, command_line: &str, stdout: &str) {
        lock(&self.inner).responses.insert(
            command_line.to_string(),
            CommandOutput {
                status: Some(0),
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
    }

    pub fn fail(&self, command_line: &str, stderr: &str) {
        lock(&self.inner).responses.insert(
            command_line.to_string(),
            CommandOutput {
                status: Some(1),
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        );
    }

    /// Command lines run so far, with their stdin.
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        lock(&self.inner)
            .calls
            .iter()
            .map(|(program, args, stdin)| (command_line(program, args), stdin.clone()))
            .collect()
    }
}

fn command_line<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(AsRef::as_ref))
        .collect::<Vec<_>>()
        .join(" ")
}

impl System for MemorySystem {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        stdin: Option<&str>,
        _timeout: Duration,
    ) -> Result<CommandOutput> {
        let mut state = lock(&self.inner);
        state.calls.push((
            program.to_string(),
            args.iter().map(ToString::to_string).collect(),
            stdin.map(ToString::to_string),
        ));
        // Unscripted commands succeed silently.
        Ok(state
            .responses
            .get(&command_line(program, args))
            .cloned()
            .unwrap_or(CommandOutput {
                status: Some(0),
                ..CommandOutput::default()
            }))
    }
}
