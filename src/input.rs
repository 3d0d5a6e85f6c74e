pub mod event;
pub mod event_bus;
pub mod event_manager;

pub use event::{Event, EventType, KeyAction, KeyStroke, RawEvent};
pub use event_bus::{EventBus, SubscriptionId};
pub use event_manager::EventManager;
