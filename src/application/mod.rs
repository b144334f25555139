pub mod booking_service;
pub mod gate;
pub mod lookup;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use booking_service::{BookingService, NewBooking};
pub use gate::{GateState, SubmissionGate, SubmitOutcome};
pub use lookup::{AvailabilityLookup, FetchOutcome};
pub use session::BookingSession;
