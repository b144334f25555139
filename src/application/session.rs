//! Per-user booking session
//!
//! Holds what a browser client would keep in ambient storage: the bearer
//! token and the draft waiting for the payment step. The session is passed
//! explicitly through the booking flow.

use tracing::debug;

use crate::domain::BookingHandoff;

#[derive(Debug, Default)]
pub struct BookingSession {
    auth_token: Option<String>,
    pending: Option<BookingHandoff>,
}

impl BookingSession {
    pub fn new(auth_token: Option<String>) -> Self {
        Self {
            auth_token,
            pending: None,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn sign_in(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
    }

    /// Drop the token and any pending draft
    pub fn sign_out(&mut self) {
        self.auth_token = None;
        if self.pending.take().is_some() {
            debug!("Pending booking draft discarded on sign-out");
        }
    }

    /// Store a confirmed draft for the payment step, replacing any earlier one
    pub fn stash_pending(&mut self, handoff: BookingHandoff) {
        if let Some(previous) = self.pending.replace(handoff) {
            debug!(
                court_id = %previous.court_id,
                start = %previous.start_time,
                "Replaced pending booking draft"
            );
        }
    }

    /// Hand the pending draft to the payment step. Yields it once.
    pub fn take_pending(&mut self) -> Option<BookingHandoff> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&BookingHandoff> {
        self.pending.as_ref()
    }
}
