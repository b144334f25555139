//! Booking repository interface

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::model::Booking;
use crate::shared::errors::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Store `booking` unless an active booking on the same court and date
    /// overlaps it. The check and the insert are atomic.
    async fn insert_if_free(&self, booking: Booking) -> DomainResult<Booking>;

    /// Find booking by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>>;

    /// Active bookings for a court on a date, ordered by start time
    async fn find_active_for_court(
        &self,
        court_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Vec<Booking>>;

    /// Cancel a booking by ID and return its final state
    async fn cancel(&self, id: Uuid) -> DomainResult<Booking>;
}
