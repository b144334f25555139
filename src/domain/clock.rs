//! Time-of-day arithmetic for bookings
//!
//! Times travel as zero-padded 24-hour `HH:MM` strings, the same form the
//! availability endpoint and the handoff object use. Internally everything
//! is minutes since midnight.

use serde::{Deserialize, Serialize};

use crate::shared::errors::{DomainError, DomainResult};

pub const MINUTES_PER_HOUR: u32 = 60;
pub const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

/// Closing time used when neither the availability response nor the court
/// carries one.
pub const DEFAULT_CLOSING_TIME: &str = "22:00";

/// First bookable slot for courts without operating hours.
pub const DEFAULT_OPENING_TIME: &str = "08:00";

/// Remaining minutes that still count as a bookable hour.
pub const GRACE_MINUTES: u32 = 59;

/// Parse `HH:MM` into minutes since midnight.
///
/// `24:00` is accepted and maps to [`MINUTES_PER_DAY`].
pub fn to_minutes(hhmm: &str) -> DomainResult<u32> {
    let invalid = || DomainError::InvalidClockTime(hhmm.to_string());

    let (hours, minutes) = hhmm.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;

    match (hours, minutes) {
        (24, 0) => Ok(MINUTES_PER_DAY),
        (h, m) if h < 24 && m < 60 => Ok(h * MINUTES_PER_HOUR + m),
        _ => Err(invalid()),
    }
}

/// Format minutes since midnight as `HH:MM`.
///
/// Midnight at the end of the day renders as `23:59` so an end time never
/// reads as earlier than its start.
pub fn format_minutes(minutes: u32) -> String {
    let minutes = minutes.min(MINUTES_PER_DAY - 1);
    format!(
        "{:02}:{:02}",
        minutes / MINUTES_PER_HOUR,
        minutes % MINUTES_PER_HOUR
    )
}

/// End of a booking starting at `start` for `duration_hours`, clamped to
/// `closing`.
pub fn compute_end_time(start: &str, duration_hours: u32, closing: &str) -> DomainResult<String> {
    let start = to_minutes(start)?;
    let closing = to_minutes(closing)?;
    let end = start.saturating_add(duration_hours.saturating_mul(MINUTES_PER_HOUR));
    Ok(format_minutes(end.min(closing)))
}

/// Whole hours actually bookable, using the default [`BookingPolicy`].
pub fn compute_actual_duration(
    start: &str,
    requested_hours: u32,
    closing: &str,
) -> DomainResult<u32> {
    BookingPolicy::default().actual_duration(start, requested_hours, closing)
}

/// Business rules for turning a requested duration into a bookable one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingPolicy {
    /// Closing time applied when nothing more specific is known.
    pub default_closing_time: String,
    /// Minimum remaining window, in minutes, that still counts as one hour.
    pub grace_minutes: u32,
    pub min_duration_hours: u32,
    pub max_duration_hours: u32,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            default_closing_time: DEFAULT_CLOSING_TIME.to_string(),
            grace_minutes: GRACE_MINUTES,
            min_duration_hours: 1,
            max_duration_hours: 8,
        }
    }
}

impl BookingPolicy {
    /// Reject requested durations outside the configured range.
    pub fn check_requested(&self, requested_hours: u32) -> DomainResult<()> {
        if requested_hours < self.min_duration_hours || requested_hours > self.max_duration_hours {
            return Err(DomainError::Validation(format!(
                "duration must be between {} and {} hours, got {}",
                self.min_duration_hours, self.max_duration_hours, requested_hours
            )));
        }
        Ok(())
    }

    /// Whole hours bookable from `start` before `closing`.
    ///
    /// A request that fits is returned unchanged. Otherwise the remaining
    /// window is rounded to the nearest hour (half up, at least one, never
    /// more than requested), provided it is at least `grace_minutes` long.
    pub fn actual_duration(
        &self,
        start: &str,
        requested_hours: u32,
        closing: &str,
    ) -> DomainResult<u32> {
        let start_min = to_minutes(start)?;
        let closing_min = to_minutes(closing)?;

        let requested_end =
            start_min.saturating_add(requested_hours.saturating_mul(MINUTES_PER_HOUR));
        if requested_end <= closing_min {
            return Ok(requested_hours);
        }

        let remaining = closing_min.saturating_sub(start_min);
        if remaining < self.grace_minutes {
            return Err(DomainError::DurationExceedsClosing {
                start: start.to_string(),
                closing: closing.to_string(),
                remaining_minutes: remaining,
            });
        }

        let rounded = (remaining + MINUTES_PER_HOUR / 2) / MINUTES_PER_HOUR;
        Ok(rounded.max(1).min(requested_hours))
    }

    pub fn check(&self) -> DomainResult<()> {
        to_minutes(&self.default_closing_time)?;
        if self.min_duration_hours == 0 || self.min_duration_hours > self.max_duration_hours {
            return Err(DomainError::Validation(format!(
                "invalid duration range {}..={}",
                self.min_duration_hours, self.max_duration_hours
            )));
        }
        if self.grace_minutes == 0 || self.grace_minutes > MINUTES_PER_HOUR {
            return Err(DomainError::Validation(format!(
                "grace_minutes must be within 1..=60, got {}",
                self.grace_minutes
            )));
        }
        Ok(())
    }
}
