//! Availability of a court's time slots on a date

pub mod model;
pub mod provider;

pub use model::{resolve_closing_time, AvailabilityPayload, AvailabilityReport, AvailabilitySlot};
pub use provider::AvailabilityProvider;
