//! Wires the event pipeline, the gesture state machine and the conversion engine together.

mod watcher;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use layout_switcher_core::{keys::KEY_SPACE, text::ConversionDirection};
pub use watcher::SelectionWatcher;

use crate::{
    config::Config,
    conversion::{
        Conversion, ConversionEngine,
        auto::{self, AutoMarker, extract_last_word},
    },
    domain::{
        auto_detector::AutoDetector, outcome::ActionOutcome, user_dictionary::unix_now,
    },
    error::{Error, Result},
    input::{Event, EventBus, EventManager, EventType, RawEvent},
    platform::{LayoutInfo, Platform},
    state::{KeyOutcome, State, StateContext, StateManager},
};

/// State the bus handlers operate on.
pub struct Core {
    config: Config,
    enabled: bool,
    state: StateManager,
    engine: ConversionEngine,
    detector: AutoDetector,
    platform: Platform,
    selection_fresh: Arc<AtomicBool>,
    marker: Option<AutoMarker>,
    last_conversion: Option<Conversion>,
}

impl Core {
    fn on_key_press(&mut self, event: &Event) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if event.code == KEY_SPACE && !self.state.command_held() {
            self.confirm_marker();
            if self.try_auto_convert(event.time_ms) {
                return Ok(());
            }
        }
        let outcome = self.state.on_key_press(event.code, event.time_ms);
        self.settle_marker(outcome);
        Ok(())
    }

    fn on_key_release(&mut self, event: &Event) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.state.on_key_release(event.code, event.time_ms) == KeyOutcome::ConvertRequested {
            self.run_conversion(event.time_ms);
        }
        Ok(())
    }

    fn on_key_repeat(&mut self, event: &Event) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let outcome = self.state.on_key_repeat(event.code, event.time_ms);
        self.settle_marker(outcome);
        Ok(())
    }

    fn on_mouse_click(&mut self, _event: &Event) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let outcome = self.state.on_mouse_click();
        self.settle_marker(outcome);
        Ok(())
    }

    /// Converts the word before the space just typed when the detector says so.
    ///
    /// Returns `true` when the space was consumed by a conversion attempt.
    fn try_auto_convert(&mut self, now_ms: u64) -> bool {
        if !self.config.auto_switch.enabled {
            return false;
        }
        let layout = match self.platform.layouts.current_layout() {
            Ok(layout) => layout,
            Err(e) => {
                tracing::warn!(error = %e, "auto: current layout unavailable");
                return false;
            }
        };
        self.state.context_mut().set_current_layout(&layout.name);
        let Some(lang) = layout.lang() else {
            return false;
        };
        let Some(word) = extract_last_word(self.state.context().strokes(), lang) else {
            return false;
        };

        let decision = self.detector.should_convert(&word.text, &layout.name);
        if !decision.convert {
            return false;
        }

        let direction = ConversionDirection::from_source(lang);
        let (outcome, switched) = auto::convert_word(
            &word,
            direction.target(),
            self.config.retype_delay(),
            &mut self.platform,
        );
        self.track_layout(switched);
        self.state.reset_to_idle();

        tracing::debug!(
            word = %word.text,
            reason = decision.reason.as_str(),
            outcome = ?outcome,
            "auto-converted word"
        );
        if outcome.is_applied() {
            self.marker = Some(AutoMarker {
                word: word.text,
                lang,
                direction,
                time_ms: now_ms,
                strokes: word.strokes,
            });
        }
        true
    }

    fn run_conversion(&mut self, now_ms: u64) {
        if let Some(marker) = self.marker.take() {
            if !marker.is_expired(now_ms, self.config.undo_window()) {
                self.undo_auto_conversion(&marker);
                return;
            }
            // Left standing long enough to count as accepted.
            tracing::trace!(word = %marker.word, "auto marker expired");
            self.learn_confirmation(&marker);
        }

        let fresh = self.selection_fresh.swap(false, Ordering::AcqRel);
        let conversion = self
            .engine
            .convert(self.state.context(), fresh, &mut self.platform);
        self.track_layout(conversion.layout.clone());
        self.state
            .finish_conversion(conversion.outcome.is_applied());
        self.last_conversion = Some(conversion);
    }

    fn undo_auto_conversion(&mut self, marker: &AutoMarker) {
        self.detector
            .user_dictionary_mut()
            .add_correction(&marker.word, marker.lang, unix_now());
        self.save_user_dictionary();

        let (outcome, switched) = auto::undo(marker, self.config.retype_delay(), &mut self.platform);
        self.track_layout(switched);
        tracing::debug!(word = %marker.word, outcome = ?outcome, "auto-conversion undone");
        self.state.finish_conversion(outcome.is_applied());
    }

    fn settle_marker(&mut self, outcome: KeyOutcome) {
        match outcome {
            KeyOutcome::Buffered => self.confirm_marker(),
            KeyOutcome::Deleted | KeyOutcome::Boundary | KeyOutcome::BackspaceHold => {
                if let Some(marker) = self.marker.take() {
                    tracing::trace!(word = %marker.word, "auto marker dropped");
                }
            }
            KeyOutcome::Ignored
            | KeyOutcome::Modifier
            | KeyOutcome::ShiftTap
            | KeyOutcome::ConvertRequested => {}
        }
    }

    fn confirm_marker(&mut self) {
        if let Some(marker) = self.marker.take() {
            self.learn_confirmation(&marker);
        }
    }

    fn learn_confirmation(&mut self, marker: &AutoMarker) {
        self.detector
            .user_dictionary_mut()
            .add_confirmation(&marker.word, marker.lang);
        self.save_user_dictionary();
    }

    fn save_user_dictionary(&self) {
        if let Err(e) = self.detector.user_dictionary().save() {
            tracing::warn!(error = %e, "saving user dictionary failed");
        }
    }

    fn track_layout(&mut self, layout: Option<LayoutInfo>) {
        if let Some(layout) = layout {
            self.state.context_mut().set_current_layout(layout.name);
        }
    }
}

pub struct App {
    events: EventManager,
    bus: EventBus<Core>,
    core: Core,
    watcher: Option<SelectionWatcher>,
}

impl App {
    /// Fails with [`Error::PlatformUnavailable`] when no keyboard layout can be read.
    pub fn new(config: Config, platform: Platform, detector: AutoDetector) -> Result<Self> {
        let layouts = platform
            .layouts
            .layouts()
            .map_err(|e| Error::PlatformUnavailable(format!("layouts: {e}")))?;
        if layouts.is_empty() {
            return Err(Error::PlatformUnavailable("no keyboard layouts".into()));
        }
        let current = platform
            .layouts
            .current_layout()
            .map_err(|e| Error::PlatformUnavailable(format!("current layout: {e}")))?;
        tracing::info!(
            layouts = layouts.len(),
            current = %current.name,
            "layout switcher ready"
        );

        let core = Core {
            state: StateManager::new(current.name, config.double_click_timeout_ms),
            engine: ConversionEngine::new(config.retype_delay()),
            enabled: true,
            detector,
            platform,
            selection_fresh: Arc::new(AtomicBool::new(false)),
            marker: None,
            last_conversion: None,
            config,
        };

        let mut bus = EventBus::new();
        bus.subscribe(EventType::KeyPress, |e, core: &mut Core| core.on_key_press(e));
        bus.subscribe(EventType::KeyRelease, |e, core: &mut Core| core.on_key_release(e));
        bus.subscribe(EventType::KeyRepeat, |e, core: &mut Core| core.on_key_repeat(e));
        bus.subscribe(EventType::MouseClick, |e, core: &mut Core| core.on_mouse_click(e));

        Ok(Self {
            events: EventManager::new(),
            bus,
            core,
            watcher: None,
        })
    }

    pub fn handle_raw_event(&mut self, raw: &RawEvent, device: &Arc<str>) {
        self.events
            .handle_raw_event(raw, device, &mut self.bus, &mut self.core);
    }

    /// Starts polling the selection source every `selection_poll_ms`.
    pub fn start_selection_watcher(&mut self) -> Result<()> {
        if self.watcher.is_some() {
            return Ok(());
        }
        let watcher = SelectionWatcher::spawn(
            Arc::clone(&self.core.platform.selection),
            Arc::clone(&self.core.selection_fresh),
            self.core.config.selection_poll_interval(),
        )?;
        self.watcher = Some(watcher);
        Ok(())
    }

    /// Flag the selection watcher raises. Cleared when a conversion reads it.
    pub fn selection_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.core.selection_fresh)
    }

    /// Applies timeouts and thresholds from `config` without rebuilding collaborators.
    ///
    /// A running selection watcher is restarted so the new poll interval takes effect.
    pub fn reload_config(&mut self, config: Config) -> Result<()> {
        config.validate().map_err(Error::Config)?;

        let core = &mut self.core;
        core.state
            .set_double_click_timeout_ms(config.double_click_timeout_ms);
        core.engine.set_retype_delay(config.retype_delay());
        core.detector.apply_config(&config.auto_switch);
        core.detector
            .user_dictionary_mut()
            .set_settings((&config.learning).into());
        core.config = config;
        tracing::info!("configuration reloaded");

        if self.watcher.take().is_some() {
            self.start_selection_watcher()?;
        }
        Ok(())
    }

    /// While disabled every input event is ignored.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.core.enabled == enabled {
            return;
        }
        self.core.enabled = enabled;
        self.core.state.reset_to_idle();
        self.core.marker = None;
        tracing::info!(enabled, "layout switcher toggled");
    }

    pub fn is_enabled(&self) -> bool {
        self.core.enabled
    }

    pub fn config(&self) -> &Config {
        &self.core.config
    }

    pub fn state(&self) -> State {
        self.core.state.state()
    }

    pub fn context(&self) -> &StateContext {
        self.core.state.context()
    }

    pub fn marker(&self) -> Option<&AutoMarker> {
        self.core.marker.as_ref()
    }

    pub fn last_outcome(&self) -> Option<&ActionOutcome> {
        self.core.last_conversion.as_ref().map(|c| &c.outcome)
    }

    pub fn last_conversion(&self) -> Option<&Conversion> {
        self.core.last_conversion.as_ref()
    }

    pub fn detector(&self) -> &AutoDetector {
        &self.core.detector
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.watcher = None;
        if let Err(e) = self.core.platform.keyboard.close() {
            tracing::warn!(error = %e, "closing virtual keyboard failed");
        }
    }
}
