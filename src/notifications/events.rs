//! Notification events
//!
//! Booking changes broadcast to WebSocket clients so open availability
//! views can refresh.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Booking;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// A slot range was booked
    BookingCreated(BookingCreatedEvent),
    /// A booking was cancelled and its slots freed
    BookingCancelled(BookingCancelledEvent),
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::BookingCreated(_) => "booking_created",
            Event::BookingCancelled(_) => "booking_cancelled",
        }
    }

    pub fn court_id(&self) -> &str {
        match self {
            Event::BookingCreated(e) => &e.court_id,
            Event::BookingCancelled(e) => &e.court_id,
        }
    }

    pub fn booking_created(booking: &Booking) -> Self {
        Event::BookingCreated(BookingCreatedEvent {
            booking_id: booking.id,
            court_id: booking.court_id.clone(),
            booking_date: booking.booking_date,
            start_time: booking.start_time.clone(),
            end_time: booking.end_time.clone(),
            duration: booking.duration,
            timestamp: Utc::now(),
        })
    }

    pub fn booking_cancelled(booking: &Booking) -> Self {
        Event::BookingCancelled(BookingCancelledEvent {
            booking_id: booking.id,
            court_id: booking.court_id.clone(),
            booking_date: booking.booking_date,
            start_time: booking.start_time.clone(),
            end_time: booking.end_time.clone(),
            timestamp: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreatedEvent {
    pub booking_id: Uuid,
    pub court_id: String,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCancelledEvent {
    pub booking_id: Uuid,
    pub court_id: String,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}
