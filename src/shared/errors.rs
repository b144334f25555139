use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid clock time '{0}', expected HH:MM")]
    InvalidClockTime(String),

    #[error(
        "Booking from {start} does not fit before closing at {closing} \
         ({remaining_minutes} minutes remain)"
    )]
    DurationExceedsClosing {
        start: String,
        closing: String,
        remaining_minutes: u32,
    },

    #[error("Slot {start} on {date} is no longer available")]
    SlotUnavailable { date: NaiveDate, start: String },

    #[error("Cannot {action} while {from}")]
    InvalidTransition { from: &'static str, action: &'static str },

    #[error("Availability for court {court_id} was reloaded while this check was in flight")]
    Superseded { court_id: String },
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Service reported failure: {0}")]
    Envelope(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

impl AppError {
    /// Whether the operation may succeed if the user retries it.
    /// Only network-level failures and 5xx responses qualify.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Infra(InfraError::Http(_)) => true,
            AppError::Infra(InfraError::UnexpectedStatus { status, .. }) => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Infra(InfraError::Http(err))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type for anything that may touch the network or the filesystem
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        let err = AppError::from(InfraError::UnexpectedStatus {
            status: 503,
            body: "busy".into(),
        });
        assert!(err.is_transient());
    }

    #[test]
    fn client_errors_are_not_transient() {
        let err = AppError::from(InfraError::UnexpectedStatus {
            status: 404,
            body: String::new(),
        });
        assert!(!err.is_transient());

        let err = AppError::from(DomainError::SlotUnavailable {
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            start: "17:00".into(),
        });
        assert!(!err.is_transient());
    }

    #[test]
    fn duration_error_message_names_the_window() {
        let err = DomainError::DurationExceedsClosing {
            start: "21:30".into(),
            closing: "22:00".into(),
            remaining_minutes: 30,
        };
        assert_eq!(
            err.to_string(),
            "Booking from 21:30 does not fit before closing at 22:00 (30 minutes remain)"
        );
    }
}
