//! HTTP client for the booking API

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

use crate::domain::{AvailabilityPayload, AvailabilityProvider, Court};
use crate::shared::errors::{AppResult, InfraError};

/// `{success, data, error}` as returned by every endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

pub struct HttpAvailabilityClient {
    client: Client,
    base_url: String,
}

impl HttpAvailabilityClient {
    /// `base_url` points at the API root, e.g. `http://127.0.0.1:8080/api`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_courts(&self, auth_token: Option<&str>) -> AppResult<Vec<Court>> {
        let url = format!("{}/courts", self.base_url);
        self.get_json(&url, auth_token).await
    }

    pub async fn fetch_court(&self, court_id: &str, auth_token: Option<&str>) -> AppResult<Court> {
        let url = format!("{}/courts/{}", self.base_url, court_id);
        self.get_json(&url, auth_token).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, auth_token: Option<&str>) -> AppResult<T> {
        debug!(%url, "GET");
        let request = authorize(self.client.get(url), auth_token);

        let res = request.send().await.map_err(|e| {
            error!(%url, error = %e, "Booking API connection error");
            InfraError::Http(e)
        })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(%url, status = status.as_u16(), %body, "Booking API request failed");
            return Err(InfraError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let bytes = res.bytes().await.map_err(InfraError::Http)?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes).map_err(InfraError::Serialization)?;
        unwrap_envelope(envelope)
    }
}

#[async_trait]
impl AvailabilityProvider for HttpAvailabilityClient {
    async fn fetch_availability(
        &self,
        court_id: &str,
        date: NaiveDate,
        auth_token: Option<&str>,
    ) -> AppResult<AvailabilityPayload> {
        let url = format!(
            "{}/bookings/availability/{}?date={}",
            self.base_url,
            court_id,
            date.format("%Y-%m-%d")
        );
        self.get_json(&url, auth_token).await
    }
}

fn authorize(request: RequestBuilder, auth_token: Option<&str>) -> RequestBuilder {
    match auth_token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

fn unwrap_envelope<T>(envelope: Envelope<T>) -> AppResult<T> {
    if !envelope.success {
        let message = envelope.error.unwrap_or_else(|| "request unsuccessful".to_string());
        return Err(InfraError::Envelope(message).into());
    }
    envelope
        .data
        .ok_or_else(|| InfraError::Envelope("response carried no data".to_string()).into())
}
