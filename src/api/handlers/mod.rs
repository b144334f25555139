//! HTTP handlers

pub mod bookings;
pub mod courts;
pub mod health;

use std::sync::Arc;
use std::time::Instant;

use crate::application::BookingService;

/// State shared by the REST handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BookingService>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: Arc<BookingService>) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}
