//! Turns raw device events into typed bus events.

use std::sync::Arc;

use layout_switcher_core::KeyCode;

use super::{
    event::{EV_KEY, Event, EventType, RawEvent},
    event_bus::EventBus,
};

const VALUE_UP: i32 = 0;
const VALUE_DOWN: i32 = 1;
const VALUE_REPEAT: i32 = 2;

#[derive(Debug, Default)]
pub struct EventManager;

impl EventManager {
    pub fn new() -> Self {
        Self
    }

    /// Typed event for `raw`, or `None` when it is not a key or pointer button transition.
    #[must_use]
    pub fn classify(raw: &RawEvent) -> Option<EventType> {
        if raw.kind != EV_KEY {
            return None;
        }
        let code = KeyCode(raw.code);
        if code.is_pointer_button() {
            return match raw.value {
                VALUE_DOWN => Some(EventType::MouseClick),
                VALUE_UP => Some(EventType::MouseRelease),
                _ => None,
            };
        }
        match raw.value {
            VALUE_DOWN => Some(EventType::KeyPress),
            VALUE_UP => Some(EventType::KeyRelease),
            VALUE_REPEAT => Some(EventType::KeyRepeat),
            _ => None,
        }
    }

    /// Publishes at most one typed event for `raw`.
    pub fn handle_raw_event<C>(
        &self,
        raw: &RawEvent,
        device: &Arc<str>,
        bus: &mut EventBus<C>,
        ctx: &mut C,
    ) {
        let Some(kind) = Self::classify(raw) else {
            return;
        };
        let event = Event {
            kind,
            code: KeyCode(raw.code),
            time_ms: raw.time_ms,
            device: Arc::clone(device),
        };
        bus.publish(&event, ctx);
    }
}
