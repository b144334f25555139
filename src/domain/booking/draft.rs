//! Client-held booking selection prior to payment

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::clock::{compute_end_time, BookingPolicy};
use crate::domain::court::Court;
use crate::shared::errors::DomainResult;

/// An unpersisted reservation derived from the user's selection.
///
/// Always satisfies `actual_hours <= requested_hours`,
/// `end_time <= closing_time` and `total_amount = price_per_hour * actual_hours`.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub court_id: String,
    pub court_name: String,
    pub court_location: String,
    pub sport: String,
    pub price_per_hour: Decimal,
    pub date: NaiveDate,
    pub start_time: String,
    pub requested_hours: u32,
    pub actual_hours: u32,
    pub end_time: String,
    pub closing_time: String,
    pub total_amount: Decimal,
}

impl BookingDraft {
    /// Build a draft, clamping the requested duration to `closing_time`.
    pub fn reconcile(
        court: &Court,
        date: NaiveDate,
        start_time: &str,
        requested_hours: u32,
        closing_time: &str,
        policy: &BookingPolicy,
    ) -> DomainResult<Self> {
        policy.check_requested(requested_hours)?;
        let actual_hours = policy.actual_duration(start_time, requested_hours, closing_time)?;
        let end_time = compute_end_time(start_time, actual_hours, closing_time)?;

        Ok(Self {
            court_id: court.id.clone(),
            court_name: court.name.clone(),
            court_location: court.location.clone(),
            sport: court.sport.clone(),
            price_per_hour: court.price_per_hour,
            date,
            start_time: start_time.to_string(),
            requested_hours,
            actual_hours,
            end_time,
            closing_time: closing_time.to_string(),
            total_amount: court.price_per_hour * Decimal::from(actual_hours),
        })
    }

    /// Whether the duration was shortened to fit before closing
    pub fn was_clamped(&self) -> bool {
        self.actual_hours < self.requested_hours
    }

    pub fn to_handoff(&self) -> BookingHandoff {
        BookingHandoff {
            court_id: self.court_id.clone(),
            court_name: self.court_name.clone(),
            court_location: self.court_location.clone(),
            sport: self.sport.clone(),
            court_price: self.price_per_hour,
            booking_date: self.date,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            duration: self.actual_hours,
            total_amount: self.total_amount,
        }
    }
}

/// Plain data object handed to the payment step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingHandoff {
    pub court_id: String,
    pub court_name: String,
    pub court_location: String,
    pub sport: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub court_price: Decimal,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}
