//! Request and response bodies

use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::application::NewBooking;
use crate::domain::to_minutes;
use crate::shared::errors::DomainError;

/// Standard response envelope.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_)
        | DomainError::SlotUnavailable { .. }
        | DomainError::Superseded { .. } => StatusCode::CONFLICT,
        DomainError::Validation(_)
        | DomainError::InvalidClockTime(_)
        | DomainError::DurationExceedsClosing { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
    }
}

pub fn domain_error(err: DomainError) -> ApiError {
    (status_for(&err), Json(ApiResponse::error(err.to_string())))
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, max = 64))]
    pub court_id: String,
    pub booking_date: NaiveDate,
    #[validate(custom(function = "validate_clock_time"))]
    pub start_time: String,
    #[validate(range(min = 1, max = 24))]
    pub duration: u32,
}

impl From<CreateBookingRequest> for NewBooking {
    fn from(req: CreateBookingRequest) -> Self {
        NewBooking {
            court_id: req.court_id,
            booking_date: req.booking_date,
            start_time: req.start_time,
            duration: req.duration,
        }
    }
}

fn validate_clock_time(value: &str) -> Result<(), ValidationError> {
    to_minutes(value).map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("clock_time");
        err.message = Some("expected HH:MM".into());
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_missing_error() {
        let json = serde_json::to_value(ApiResponse::success(5)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 5}));
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        let slot = DomainError::SlotUnavailable {
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            start: "17:00".into(),
        };
        assert_eq!(status_for(&slot), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&DomainError::Superseded {
                court_id: "court-1".into()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&DomainError::InvalidClockTime("7pm".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&DomainError::NotFound {
                entity: "Court",
                field: "id",
                value: "x".into()
            }),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn booking_request_validation() {
        let mut req = CreateBookingRequest {
            court_id: "court-1".into(),
            booking_date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            start_time: "17:00".into(),
            duration: 2,
        };
        assert!(req.validate().is_ok());

        req.start_time = "5pm".into();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("start_time"));
    }
}
