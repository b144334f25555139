//! Persisted booking entity (server side)

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::clock::to_minutes;
use crate::shared::errors::DomainResult;

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BookingStatus {
    /// Slot is held for the customer
    Confirmed,
    /// Cancelled by the customer or an operator; the slot is free again
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub court_id: String,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    start_minute: u32,
    #[serde(skip)]
    end_minute: u32,
}

impl Booking {
    pub fn new(
        court_id: impl Into<String>,
        booking_date: NaiveDate,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        duration: u32,
        total_amount: Decimal,
    ) -> DomainResult<Self> {
        let start_time = start_time.into();
        let end_time = end_time.into();
        let start_minute = to_minutes(&start_time)?;
        let end_minute = to_minutes(&end_time)?;

        Ok(Self {
            id: Uuid::new_v4(),
            court_id: court_id.into(),
            booking_date,
            start_time,
            end_time,
            duration,
            total_amount,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
            start_minute,
            end_minute,
        })
    }

    pub fn cancel(&mut self) {
        self.status = BookingStatus::Cancelled;
    }

    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    /// Whether this booking holds any minute of `[start_minute, end_minute)`
    pub fn overlaps(&self, start_minute: u32, end_minute: u32) -> bool {
        self.is_active() && self.start_minute < end_minute && start_minute < self.end_minute
    }

    /// Whether two bookings on the same court and date collide
    pub fn conflicts_with(&self, other: &Booking) -> bool {
        self.court_id == other.court_id
            && self.booking_date == other.booking_date
            && self.overlaps(other.start_minute, other.end_minute)
            && other.is_active()
    }
}
