//! # Court booking
//!
//! Booking time reconciliation for sports courts: closing-time aware
//! duration clamping, availability lookup with a stale-response guard, and
//! a submission gate that re-checks the chosen slot before handing it to
//! payment. Includes the booking API those clients talk to.
//!
//! ## Architecture
//!
//! - **domain**: clock arithmetic, booking policy, courts, slots, drafts, bookings
//! - **application**: availability lookup, submission gate, session, booking service
//! - **infrastructure**: in-memory storage and the reqwest availability client
//! - **api**: REST routes with the `{success, data, error}` envelope
//! - **notifications**: booking events over WebSocket
//! - **server**: runtime lifecycle and tracing setup
//! - **shared**: errors, retry and shutdown helpers

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod notifications;
pub mod server;
pub mod shared;

pub use api::create_api_router;
pub use config::{default_config_path, AppConfig};
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
pub use server::ServerHandle;
