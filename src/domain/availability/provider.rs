//! Port for fetching availability from the booking backend

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::AvailabilityPayload;
use crate::shared::errors::AppResult;

#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    /// Slots for `court_id` on `date`, as reported by the backend
    async fn fetch_availability(
        &self,
        court_id: &str,
        date: NaiveDate,
        auth_token: Option<&str>,
    ) -> AppResult<AvailabilityPayload>;
}
