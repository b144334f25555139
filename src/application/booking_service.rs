//! Server-side booking operations
//!
//! Re-applies the same [`BookingPolicy`] the client uses, so a booking that
//! runs past closing or overlaps another one is refused regardless of what
//! the client checked.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::clock::{format_minutes, DEFAULT_OPENING_TIME, MINUTES_PER_HOUR};
use crate::domain::{
    compute_end_time, to_minutes, AvailabilityPayload, AvailabilitySlot, Booking,
    BookingPolicy, BookingRepository, Court, CourtRepository,
};
use crate::notifications::{Event, SharedEventBus};
use crate::shared::errors::{DomainError, DomainResult};

/// Validated input for a new booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub court_id: String,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub duration: u32,
}

pub struct BookingService {
    courts: Arc<dyn CourtRepository>,
    bookings: Arc<dyn BookingRepository>,
    events: SharedEventBus,
    policy: BookingPolicy,
}

impl BookingService {
    pub fn new(
        courts: Arc<dyn CourtRepository>,
        bookings: Arc<dyn BookingRepository>,
        events: SharedEventBus,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            courts,
            bookings,
            events,
            policy,
        }
    }

    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    pub async fn list_courts(&self) -> DomainResult<Vec<Court>> {
        self.courts.find_all().await
    }

    pub async fn get_court(&self, court_id: &str) -> DomainResult<Court> {
        self.courts
            .find_by_id(court_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Court",
                field: "id",
                value: court_id.to_string(),
            })
    }

    pub async fn get_booking(&self, id: Uuid) -> DomainResult<Booking> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: id.to_string(),
            })
    }

    /// Hour slots from opening to closing, flagged by whether any active
    /// booking overlaps them. The closing time is always reported.
    ///
    /// A trailing slot shorter than the grace window is left out since it
    /// could never be booked.
    pub async fn availability(
        &self,
        court_id: &str,
        date: NaiveDate,
    ) -> DomainResult<AvailabilityPayload> {
        let court = self.get_court(court_id).await?;
        let (open, close) = self.opening_window(&court)?;
        let booked = self.bookings.find_active_for_court(court_id, date).await?;

        let mut slots = Vec::new();
        let mut start = open;
        while start + self.policy.grace_minutes <= close {
            let end = (start + MINUTES_PER_HOUR).min(close);
            let taken = booked.iter().any(|b| b.overlaps(start, end));
            slots.push(AvailabilitySlot::new(
                format_minutes(start),
                format_minutes(end),
                !taken,
            ));
            start += MINUTES_PER_HOUR;
        }

        Ok(AvailabilityPayload {
            available_slots: slots,
            closing_time: Some(format_minutes(close)),
        })
    }

    /// Clamp, price and store a booking.
    ///
    /// Fails with `SlotUnavailable` when any part of the clamped range is
    /// already held.
    pub async fn create_booking(&self, request: NewBooking) -> DomainResult<Booking> {
        let court = self.get_court(&request.court_id).await?;
        let (open, close) = self.opening_window(&court)?;
        let closing_time = format_minutes(close);

        self.policy.check_requested(request.duration)?;
        let start = to_minutes(&request.start_time)?;
        if start < open {
            return Err(DomainError::Validation(format!(
                "start {} is before opening at {}",
                request.start_time,
                format_minutes(open)
            )));
        }

        let actual = self
            .policy
            .actual_duration(&request.start_time, request.duration, &closing_time)?;
        let end_time = compute_end_time(&request.start_time, actual, &closing_time)?;
        let total = court.price_per_hour * Decimal::from(actual);

        let booking = Booking::new(
            &court.id,
            request.booking_date,
            &request.start_time,
            end_time,
            actual,
            total,
        )?;

        let booking = match self.bookings.insert_if_free(booking).await {
            Ok(booking) => booking,
            Err(e) => {
                warn!(
                    court_id = %court.id,
                    date = %request.booking_date,
                    start = %request.start_time,
                    error = %e,
                    "Booking refused"
                );
                return Err(e);
            }
        };

        info!(
            booking_id = %booking.id,
            court_id = %booking.court_id,
            date = %booking.booking_date,
            start = %booking.start_time,
            end = %booking.end_time,
            requested = request.duration,
            duration = booking.duration,
            total = %booking.total_amount,
            "Booking created"
        );
        self.events.publish(Event::booking_created(&booking));
        Ok(booking)
    }

    pub async fn cancel_booking(&self, id: Uuid) -> DomainResult<Booking> {
        let booking = self.bookings.cancel(id).await?;
        info!(booking_id = %id, court_id = %booking.court_id, "Booking cancelled");
        self.events.publish(Event::booking_cancelled(&booking));
        Ok(booking)
    }

    fn opening_window(&self, court: &Court) -> DomainResult<(u32, u32)> {
        let open = to_minutes(court.opening_time().unwrap_or(DEFAULT_OPENING_TIME))?;
        let close = to_minutes(
            court
                .closing_time()
                .unwrap_or(&self.policy.default_closing_time),
        )?;
        Ok((open, close))
    }
}
