//! Fakes shared by application tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::clock::{format_minutes, to_minutes};
use crate::domain::{AvailabilityPayload, AvailabilityProvider, AvailabilitySlot, Court};
use crate::shared::errors::{AppResult, InfraError};

pub fn court() -> Court {
    Court::new("court-1", "Centre Court", "Riverside", "tennis", Decimal::from(30))
        .with_hours("08:00", "18:00")
}

/// Hour-long slots starting at the given times
pub fn payload(slots: &[(&str, bool)], closing: Option<&str>) -> AvailabilityPayload {
    AvailabilityPayload {
        available_slots: slots
            .iter()
            .map(|(start, available)| {
                let end = format_minutes(to_minutes(start).unwrap() + 60);
                AvailabilitySlot::new(*start, end, *available)
            })
            .collect(),
        closing_time: closing.map(String::from),
    }
}

/// Replays a fixed sequence of responses
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<AppResult<AvailabilityPayload>>>,
    tokens: Mutex<Vec<Option<String>>>,
    dates: Mutex<Vec<NaiveDate>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<AppResult<AvailabilityPayload>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            tokens: Mutex::new(Vec::new()),
            dates: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.dates.lock().unwrap().len()
    }

    pub fn tokens(&self) -> Vec<Option<String>> {
        self.tokens.lock().unwrap().clone()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.dates.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvailabilityProvider for ScriptedProvider {
    async fn fetch_availability(
        &self,
        _court_id: &str,
        date: NaiveDate,
        auth_token: Option<&str>,
    ) -> AppResult<AvailabilityPayload> {
        self.dates.lock().unwrap().push(date);
        self.tokens.lock().unwrap().push(auth_token.map(String::from));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(InfraError::Envelope("script exhausted".into()).into()))
    }
}
