//! Booking submission gate
//!
//! Drives one court's booking flow from date selection to the payment
//! handoff. A draft only reaches the session's pending slot after a fresh
//! availability check confirms the chosen slot is still open.
//!
//! ```text
//! Idle -> Selecting -> Validating -> ConfirmedForPayment
//!                          |-> Rejected  (slot taken, fresh slots loaded)
//!                          '-> Error     (network failure, draft kept)
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::application::lookup::{AvailabilityLookup, FetchOutcome};
use crate::application::session::BookingSession;
use crate::domain::{AvailabilityReport, BookingDraft, BookingHandoff, Court};
use crate::shared::errors::{AppError, AppResult, DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Selecting,
    Validating,
    ConfirmedForPayment,
    Rejected,
    Error,
}

impl GateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Selecting => "selecting",
            Self::Validating => "validating",
            Self::ConfirmedForPayment => "confirmed for payment",
            Self::Rejected => "rejected",
            Self::Error => "in error",
        }
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Draft passed the re-check and is waiting in the session
    Confirmed(BookingHandoff),
    /// The slot was taken in the meantime; fresh slots are loaded
    Rejected { start_time: String },
}

pub struct SubmissionGate {
    lookup: Arc<AvailabilityLookup>,
    court: Court,
    state: GateState,
    date: Option<NaiveDate>,
    report: Option<AvailabilityReport>,
    draft: Option<BookingDraft>,
    last_error: Option<String>,
}

impl SubmissionGate {
    pub fn new(court: Court, lookup: Arc<AvailabilityLookup>) -> Self {
        Self {
            lookup,
            court,
            state: GateState::Idle,
            date: None,
            report: None,
            draft: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn court(&self) -> &Court {
        &self.court
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn report(&self) -> Option<&AvailabilityReport> {
        self.report.as_ref()
    }

    pub fn draft(&self) -> Option<&BookingDraft> {
        self.draft.as_ref()
    }

    /// Message of the last failure, for display
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Change the date. Always fetches, and drops any time selection.
    pub async fn select_date(
        &mut self,
        session: &BookingSession,
        date: NaiveDate,
    ) -> AppResult<&AvailabilityReport> {
        self.ensure_not_validating("select a date")?;
        self.date = Some(date);
        self.report = None;
        self.draft = None;
        self.load(session, date).await
    }

    /// Manual retry of the current date's fetch.
    ///
    /// A draft survives only if its slot is still open.
    pub async fn refresh(&mut self, session: &BookingSession) -> AppResult<&AvailabilityReport> {
        self.ensure_not_validating("refresh")?;
        let date = self.date.ok_or(DomainError::InvalidTransition {
            from: "no date is selected",
            action: "refresh",
        })?;
        self.load(session, date).await
    }

    /// Pick a start time and nominal duration on the loaded date.
    pub fn select_time(&mut self, start_time: &str, requested_hours: u32) -> DomainResult<&BookingDraft> {
        self.ensure_not_validating("select a time")?;
        let report = self.report.as_ref().ok_or(DomainError::InvalidTransition {
            from: "no availability is loaded",
            action: "select a time",
        })?;

        self.draft = None;
        self.state = GateState::Selecting;

        if !report.is_available(start_time) {
            return Err(DomainError::SlotUnavailable {
                date: report.date,
                start: start_time.to_string(),
            });
        }

        let draft = BookingDraft::reconcile(
            &self.court,
            report.date,
            start_time,
            requested_hours,
            &report.closing_time,
            self.lookup.policy(),
        )?;

        if draft.was_clamped() {
            info!(
                court_id = %self.court.id,
                start = %draft.start_time,
                requested = draft.requested_hours,
                actual = draft.actual_hours,
                closing = %draft.closing_time,
                "Duration shortened to fit before closing"
            );
        }

        Ok(self.draft.insert(draft))
    }

    /// Re-validate the draft against fresh availability and hand it off.
    pub async fn submit(&mut self, session: &mut BookingSession) -> AppResult<SubmitOutcome> {
        match self.state {
            GateState::Selecting | GateState::Error => {}
            other => {
                return Err(DomainError::InvalidTransition {
                    from: other.as_str(),
                    action: "submit",
                }
                .into())
            }
        }
        let draft = self.draft.clone().ok_or(DomainError::InvalidTransition {
            from: "no time is selected",
            action: "submit",
        })?;

        self.state = GateState::Validating;
        self.last_error = None;

        let fetched = self.lookup.fetch(&self.court, draft.date, session).await;
        let report = match fetched {
            Ok(FetchOutcome::Current(report)) => report,
            Ok(FetchOutcome::Superseded { .. }) => {
                return Err(self.fail(
                    DomainError::Superseded {
                        court_id: self.court.id.clone(),
                    }
                    .into(),
                ))
            }
            Err(e) => return Err(self.fail(e)),
        };

        let still_open = report.is_available(&draft.start_time);
        let report = &*self.report.insert(report);

        if !still_open {
            warn!(
                court_id = %self.court.id,
                date = %draft.date,
                start = %draft.start_time,
                "Selected slot was taken before submission"
            );
            self.draft = None;
            self.state = GateState::Rejected;
            return Ok(SubmitOutcome::Rejected {
                start_time: draft.start_time,
            });
        }

        let confirmed = match BookingDraft::reconcile(
            &self.court,
            draft.date,
            &draft.start_time,
            draft.requested_hours,
            &report.closing_time,
            self.lookup.policy(),
        ) {
            Ok(confirmed) => confirmed,
            Err(e) => {
                self.draft = None;
                self.state = GateState::Rejected;
                self.last_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        let handoff = confirmed.to_handoff();
        session.stash_pending(handoff.clone());
        self.draft = None;
        self.state = GateState::ConfirmedForPayment;

        info!(
            court_id = %handoff.court_id,
            date = %handoff.booking_date,
            start = %handoff.start_time,
            end = %handoff.end_time,
            duration = handoff.duration,
            total = %handoff.total_amount,
            "Booking draft confirmed for payment"
        );
        Ok(SubmitOutcome::Confirmed(handoff))
    }

    async fn load(
        &mut self,
        session: &BookingSession,
        date: NaiveDate,
    ) -> AppResult<&AvailabilityReport> {
        let fetched = self.lookup.fetch(&self.court, date, session).await;
        let report = match fetched {
            Ok(FetchOutcome::Current(report)) => report,
            Ok(FetchOutcome::Superseded { .. }) => {
                return Err(self.fail(
                    DomainError::Superseded {
                        court_id: self.court.id.clone(),
                    }
                    .into(),
                ))
            }
            Err(e) => return Err(self.fail(e)),
        };

        if let Some(draft) = &self.draft {
            if draft.date != date || !report.is_available(&draft.start_time) {
                self.draft = None;
            }
        }

        self.last_error = None;
        self.state = GateState::Selecting;
        Ok(self.report.insert(report))
    }

    fn fail(&mut self, err: AppError) -> AppError {
        warn!(court_id = %self.court.id, error = %err, "Availability check failed");
        self.state = GateState::Error;
        self.last_error = Some(err.to_string());
        err
    }

    fn ensure_not_validating(&self, action: &'static str) -> DomainResult<()> {
        if self.state == GateState::Validating {
            return Err(DomainError::InvalidTransition {
                from: GateState::Validating.as_str(),
                action,
            });
        }
        Ok(())
    }
}
