//! Booking aggregate
//!
//! Client-side drafts and handoff objects, the persisted server-side
//! booking, and its repository interface.

pub mod draft;
pub mod model;
pub mod repository;

pub use draft::{BookingDraft, BookingHandoff};
pub use model::{Booking, BookingStatus};
pub use repository::BookingRepository;
