pub mod availability;
pub mod booking;
pub mod clock;
pub mod court;

// Re-export commonly used types
pub use availability::{AvailabilityPayload, AvailabilityProvider, AvailabilityReport, AvailabilitySlot};
pub use booking::{Booking, BookingDraft, BookingHandoff, BookingRepository, BookingStatus};
pub use clock::{compute_actual_duration, compute_end_time, to_minutes, BookingPolicy};
pub use court::{Court, CourtRepository, OperatingHours};

pub use crate::shared::errors::{DomainError, DomainResult};
