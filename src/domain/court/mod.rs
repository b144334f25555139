//! Court aggregate
//!
//! Contains the Court entity, its operating hours, and repository interface.

pub mod model;
pub mod repository;

pub use model::{Court, OperatingHours};
pub use repository::CourtRepository;
