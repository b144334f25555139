//! Availability lookup
//!
//! Fetches slots for a court and date, resolves the closing time once per
//! fetch, and discards responses that were overtaken by a newer request
//! for the same court.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::application::session::BookingSession;
use crate::domain::{AvailabilityProvider, AvailabilityReport, BookingPolicy, Court};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

/// Result of a fetch that completed
#[derive(Debug)]
pub enum FetchOutcome {
    /// The response belongs to the most recent request
    Current(AvailabilityReport),
    /// A later request for the same court was issued while this one was in flight
    Superseded { ticket: u64, latest: u64 },
}

pub struct AvailabilityLookup {
    provider: Arc<dyn AvailabilityProvider>,
    policy: BookingPolicy,
    retry: RetryConfig,
    sequence: AtomicU64,
    /// Most recent ticket per court id
    latest: DashMap<String, u64>,
}

impl AvailabilityLookup {
    pub fn new(provider: Arc<dyn AvailabilityProvider>, policy: BookingPolicy) -> Self {
        Self {
            provider,
            policy,
            retry: RetryConfig::single_attempt(),
            sequence: AtomicU64::new(0),
            latest: DashMap::new(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    /// Ticket of the most recent request for `court_id`
    pub fn latest_ticket(&self, court_id: &str) -> Option<u64> {
        self.latest.get(court_id).map(|entry| *entry)
    }

    /// Fetch availability for `court` on `date`.
    ///
    /// Errors from a request that has since been superseded by another
    /// request for the same court are discarded along with its data.
    /// Requests for other courts never supersede each other.
    pub async fn fetch(
        &self,
        court: &Court,
        date: NaiveDate,
        session: &BookingSession,
    ) -> AppResult<FetchOutcome> {
        let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest.insert(court.id.clone(), ticket);
        debug!(court_id = %court.id, %date, ticket, "Fetching availability");

        let result = retry_with_backoff(
            &self.retry,
            move || {
                self.provider
                    .fetch_availability(&court.id, date, session.auth_token())
            },
            AppError::is_transient,
            "fetch_availability",
        )
        .await;

        let latest = self.latest_ticket(&court.id).unwrap_or(ticket);
        if latest != ticket {
            debug!(
                court_id = %court.id,
                %date,
                ticket,
                latest,
                "Discarding superseded availability response"
            );
            return Ok(FetchOutcome::Superseded { ticket, latest });
        }

        let report = AvailabilityReport::from_payload(court, date, result?, &self.policy);
        info!(
            court_id = %court.id,
            %date,
            slots = report.slots.len(),
            open = report.open_slots().count(),
            closing = %report.closing_time,
            "Availability loaded"
        );
        Ok(FetchOutcome::Current(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{court, payload, ScriptedProvider};
    use crate::domain::AvailabilityPayload;
    use crate::shared::errors::InfraError;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    /// Holds responses for `slow_date` until a request for another date completes.
    struct GatedProvider {
        gate: Notify,
        slow_date: NaiveDate,
    }

    #[async_trait]
    impl AvailabilityProvider for GatedProvider {
        async fn fetch_availability(
            &self,
            _court_id: &str,
            date: NaiveDate,
            _auth_token: Option<&str>,
        ) -> AppResult<AvailabilityPayload> {
            if date == self.slow_date {
                self.gate.notified().await;
            } else {
                self.gate.notify_one();
            }
            Ok(payload(&[("17:00", true)], None))
        }
    }

    #[tokio::test]
    async fn resolves_closing_time_from_court_when_response_omits_it() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(payload(&[("17:00", true)], None))]));
        let lookup = AvailabilityLookup::new(provider, BookingPolicy::default());

        let outcome = lookup
            .fetch(&court(), day(20), &BookingSession::anonymous())
            .await
            .unwrap();

        match outcome {
            FetchOutcome::Current(report) => {
                assert_eq!(report.closing_time, "18:00");
                assert!(report.is_available("17:00"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn passes_session_token_to_provider() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(payload(&[], Some("20:00")))]));
        let lookup = AvailabilityLookup::new(provider.clone(), BookingPolicy::default());
        let session = BookingSession::new(Some("secret".into()));

        lookup.fetch(&court(), day(20), &session).await.unwrap();

        assert_eq!(provider.tokens(), vec![Some("secret".to_string())]);
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let provider = Arc::new(GatedProvider {
            gate: Notify::new(),
            slow_date: day(20),
        });
        let lookup = AvailabilityLookup::new(provider, BookingPolicy::default());
        let session = BookingSession::anonymous();
        let court = court();

        let (older, newer) = tokio::join!(
            lookup.fetch(&court, day(20), &session),
            lookup.fetch(&court, day(21), &session),
        );

        assert!(matches!(
            older.unwrap(),
            FetchOutcome::Superseded { ticket: 1, latest: 2 }
        ));
        match newer.unwrap() {
            FetchOutcome::Current(report) => assert_eq!(report.date, day(21)),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_courts_do_not_supersede() {
        let provider = Arc::new(GatedProvider {
            gate: Notify::new(),
            slow_date: day(20),
        });
        let lookup = AvailabilityLookup::new(provider, BookingPolicy::default());
        let session = BookingSession::anonymous();
        let centre = court();
        let mut annex = court();
        annex.id = "court-9".into();

        let (first, second) = tokio::join!(
            lookup.fetch(&centre, day(20), &session),
            lookup.fetch(&annex, day(21), &session),
        );

        assert!(matches!(first.unwrap(), FetchOutcome::Current(_)));
        assert!(matches!(second.unwrap(), FetchOutcome::Current(_)));
        assert_eq!(lookup.latest_ticket(&centre.id), Some(1));
        assert_eq!(lookup.latest_ticket(&annex.id), Some(2));
        assert_eq!(lookup.latest_ticket("court-404"), None);
    }

    #[tokio::test]
    async fn failure_surfaces_without_automatic_retry() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(InfraError::UnexpectedStatus {
                status: 503,
                body: "maintenance".into(),
            }
            .into()),
            Ok(payload(&[("17:00", true)], None)),
        ]));
        let lookup = AvailabilityLookup::new(provider.clone(), BookingPolicy::default());

        let err = lookup
            .fetch(&court(), day(20), &BookingSession::anonymous())
            .await
            .unwrap_err();

        assert!(err.is_transient());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn configured_retry_recovers_transient_failure() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(InfraError::UnexpectedStatus {
                status: 502,
                body: String::new(),
            }
            .into()),
            Ok(payload(&[("17:00", true)], None)),
        ]));
        let lookup = AvailabilityLookup::new(provider.clone(), BookingPolicy::default()).with_retry(
            RetryConfig {
                max_attempts: 2,
                initial_delay: Duration::from_millis(1),
                ..RetryConfig::default()
            },
        );

        let outcome = lookup
            .fetch(&court(), day(20), &BookingSession::anonymous())
            .await
            .unwrap();

        assert!(matches!(outcome, FetchOutcome::Current(_)));
        assert_eq!(provider.calls(), 2);
    }
}
