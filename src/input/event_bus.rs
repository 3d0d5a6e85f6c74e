//! Synchronous publish/subscribe dispatch for typed input events.
//!
//! Handlers run on the publishing thread in registration order and receive the shared context
//! mutably. A failing handler is logged and does not stop the remaining handlers.

use super::event::{Event, EventType};
use crate::error::Result;

type Handler<C> = Box<dyn FnMut(&Event, &mut C) -> Result<()> + Send>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription<C> {
    id: SubscriptionId,
    kind: EventType,
    handler: Handler<C>,
}

pub struct EventBus<C> {
    subscriptions: Vec<Subscription<C>>,
    next_id: u64,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe<F>(&mut self, kind: EventType, handler: F) -> SubscriptionId
    where
        F: FnMut(&Event, &mut C) -> Result<()> + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn handler_count(&self, kind: EventType) -> usize {
        self.subscriptions.iter().filter(|s| s.kind == kind).count()
    }

    /// Runs every handler subscribed to `event.kind`. Returns how many ran.
    pub fn publish(&mut self, event: &Event, ctx: &mut C) -> usize {
        let mut ran = 0;
        for sub in self.subscriptions.iter_mut().filter(|s| s.kind == event.kind) {
            ran += 1;
            if let Err(e) = (sub.handler)(event, ctx) {
                tracing::warn!(
                    event = event.kind.as_str(),
                    code = event.code.0,
                    error = %e,
                    "event handler failed"
                );
            }
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use layout_switcher_core::keys::KEY_A;
    use tracing_test::traced_test;

    use super::*;
    use crate::error::Error;

    fn event(kind: EventType) -> Event {
        Event {
            kind,
            code: KEY_A,
            time_ms: 0,
            device: Arc::from("kbd"),
        }
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let mut bus: EventBus<Vec<u8>> = EventBus::new();
        bus.subscribe(EventType::KeyPress, |_, log: &mut Vec<u8>| {
            log.push(1);
            Ok(())
        });
        bus.subscribe(EventType::KeyPress, |_, log: &mut Vec<u8>| {
            log.push(2);
            Ok(())
        });
        bus.subscribe(EventType::KeyRelease, |_, log: &mut Vec<u8>| {
            log.push(3);
            Ok(())
        });

        let mut log = Vec::new();
        assert_eq!(bus.publish(&event(EventType::KeyPress), &mut log), 2);
        assert_eq!(log, vec![1, 2]);
    }

    #[test]
    #[traced_test]
    fn failing_handler_does_not_stop_the_rest() {
        let mut bus: EventBus<Vec<u8>> = EventBus::new();
        bus.subscribe(EventType::KeyPress, |_, _: &mut Vec<u8>| {
            Err(Error::Config("boom".into()))
        });
        bus.subscribe(EventType::KeyPress, |_, log: &mut Vec<u8>| {
            log.push(7);
            Ok(())
        });

        let mut log = Vec::new();
        bus.publish(&event(EventType::KeyPress), &mut log);

        assert_eq!(log, vec![7]);
        assert!(logs_contain("event handler failed"));
    }

    #[test]
    fn unsubscribe_removes_only_that_handler() {
        let mut bus: EventBus<u32> = EventBus::new();
        let first = bus.subscribe(EventType::MouseClick, |_, n: &mut u32| {
            *n += 1;
            Ok(())
        });
        bus.subscribe(EventType::MouseClick, |_, n: &mut u32| {
            *n += 10;
            Ok(())
        });

        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        assert_eq!(bus.handler_count(EventType::MouseClick), 1);

        let mut n = 0;
        bus.publish(&event(EventType::MouseClick), &mut n);
        assert_eq!(n, 10);
    }

    #[test]
    fn event_without_handlers_is_a_no_op() {
        let mut bus: EventBus<u32> = EventBus::new();
        let mut n = 0;
        assert_eq!(bus.publish(&event(EventType::KeyRepeat), &mut n), 0);
    }
}
