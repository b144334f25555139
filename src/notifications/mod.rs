//! Booking notifications
//!
//! The booking service publishes an [`Event`] whenever a slot is taken or
//! freed. UI clients follow them over `/api/notifications/ws`, optionally
//! filtered with `court_id` and a comma-separated `event_types` list.

pub mod event_bus;
pub mod events;
pub mod websocket;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::*;
pub use websocket::{create_notification_state, ws_notifications_handler, EventFilter, NotificationState};
