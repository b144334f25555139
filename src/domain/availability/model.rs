//! Availability slots for one court on one date

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::clock::BookingPolicy;
use crate::domain::court::Court;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub start_time: String,
    pub end_time: String,
    pub available: bool,
}

impl AvailabilitySlot {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>, available: bool) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
            available,
        }
    }
}

/// `data` member of the availability response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPayload {
    #[serde(default)]
    pub available_slots: Vec<AvailabilitySlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_time: Option<String>,
}

/// Result of one availability fetch with the closing time already resolved
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityReport {
    pub court_id: String,
    pub date: NaiveDate,
    pub slots: Vec<AvailabilitySlot>,
    pub closing_time: String,
    pub fetched_at: DateTime<Utc>,
}

impl AvailabilityReport {
    pub fn from_payload(
        court: &Court,
        date: NaiveDate,
        payload: AvailabilityPayload,
        policy: &BookingPolicy,
    ) -> Self {
        let closing_time = resolve_closing_time(payload.closing_time.as_deref(), court, policy);
        Self {
            court_id: court.id.clone(),
            date,
            slots: payload.available_slots,
            closing_time,
            fetched_at: Utc::now(),
        }
    }

    pub fn slot_at(&self, start_time: &str) -> Option<&AvailabilitySlot> {
        self.slots.iter().find(|s| s.start_time == start_time)
    }

    /// Whether a slot starting at `start_time` exists and is flagged available
    pub fn is_available(&self, start_time: &str) -> bool {
        self.slot_at(start_time).is_some_and(|s| s.available)
    }

    pub fn open_slots(&self) -> impl Iterator<Item = &AvailabilitySlot> {
        self.slots.iter().filter(|s| s.available)
    }
}

/// Response value first, then the court's own hours, then the policy default.
pub fn resolve_closing_time(
    reported: Option<&str>,
    court: &Court,
    policy: &BookingPolicy,
) -> String {
    reported
        .filter(|c| !c.is_empty())
        .or_else(|| court.closing_time())
        .unwrap_or(&policy.default_closing_time)
        .to_string()
}
