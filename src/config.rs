//! Configuration module
//!
//! Reads a TOML file (`~/.config/court-booking/config.toml` by default).
//! Every section and field is optional; missing values fall back to the
//! defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{to_minutes, BookingPolicy, Court};
use crate::shared::errors::{AppResult, DomainError, InfraError};
use crate::shared::retry::RetryConfig;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "COURT_BOOKING_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub booking: BookingPolicy,
    pub logging: LoggingConfig,
    /// Seed catalog for the in-memory store
    pub courts: Vec<Court>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            client: ClientConfig::default(),
            booking: BookingPolicy::default(),
            logging: LoggingConfig::default(),
            courts: default_courts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
    /// Accepted bearer tokens; empty disables auth
    pub api_tokens: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 10,
            api_tokens: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub timeout_secs: u64,
    /// Total attempts per availability fetch; 1 means no automatic retry
    pub retry_attempts: u32,
    pub retry_initial_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api".to_string(),
            auth_token: None,
            timeout_secs: 10,
            retry_attempts: 1,
            retry_initial_delay_ms: 200,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.retry_attempts,
            initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
            ..RetryConfig::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn default_courts() -> Vec<Court> {
    let mut centre = Court::new(
        "court-1",
        "Centre Court",
        "Riverside Club",
        "tennis",
        Decimal::from(30),
    )
    .with_hours("08:00", "22:00");
    centre.capacity = 4;
    centre.rating = 4.6;
    centre.facilities = vec!["lights".to_string(), "showers".to_string()];

    let mut late = Court::new(
        "court-2",
        "Night Padel",
        "Harbour Sports Hall",
        "padel",
        Decimal::new(225, 1),
    )
    .with_hours("10:00", "23:59");
    late.capacity = 4;
    late.rating = 4.2;
    late.facilities = vec!["indoor".to_string()];

    vec![centre, late]
}

/// `<config dir>/court-booking/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("court-booking")
        .join("config.toml")
}

/// `COURT_BOOKING_CONFIG` when set, otherwise [`default_config_path`]
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

impl AppConfig {
    /// Load and validate. A missing file yields the defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(InfraError::Io)?;
            Self::from_toml(&raw)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> AppResult<Self> {
        Ok(toml::from_str::<Self>(raw).map_err(InfraError::Config)?)
    }

    /// Check clock strings, duration bounds and the seed catalog.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.booking.check()?;

        if self.client.retry_attempts == 0 {
            return Err(DomainError::Validation(
                "client.retry_attempts must be at least 1".to_string(),
            ));
        }

        for court in &self.courts {
            if let Some(hours) = &court.operating_hours {
                let open = to_minutes(&hours.open)?;
                let close = to_minutes(&hours.close)?;
                if open >= close {
                    return Err(DomainError::Validation(format!(
                        "court {} opens at {} but closes at {}",
                        court.id, hours.open, hours.close
                    )));
                }
            }
            if court.price_per_hour.is_sign_negative() {
                return Err(DomainError::Validation(format!(
                    "court {} has a negative price",
                    court.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.client.retry_attempts, 1);
        assert_eq!(config.booking.default_closing_time, "22:00");
        assert_eq!(config.courts.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_all_sections() {
        let raw = r#"
            [server]
            port = 9090
            api_tokens = ["abc"]

            [client]
            base_url = "http://booking.local/api"
            auth_token = "abc"
            retry_attempts = 3

            [booking]
            default_closing_time = "21:00"
            max_duration_hours = 4

            [logging]
            level = "debug"
            json = true

            [[courts]]
            id = "c9"
            name = "Clay 9"
            location = "East"
            sport = "tennis"
            pricePerHour = 18.5
            operatingHours = { open = "07:00", close = "20:00" }
        "#;
        let config = AppConfig::from_toml(raw).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.client.auth_token.as_deref(), Some("abc"));
        assert_eq!(config.client.retry().max_attempts, 3);
        assert_eq!(config.booking.default_closing_time, "21:00");
        assert_eq!(config.booking.min_duration_hours, 1);
        assert_eq!(config.booking.max_duration_hours, 4);
        assert!(config.logging.json);
        assert_eq!(config.courts.len(), 1);
        assert_eq!(config.courts[0].price_per_hour, Decimal::new(185, 1));
        assert_eq!(config.courts[0].closing_time(), Some("20:00"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_closing_time() {
        let config = AppConfig::from_toml("[booking]\ndefault_closing_time = \"25:00\"").unwrap();
        assert!(matches!(config.validate(), Err(DomainError::InvalidClockTime(_))));
    }

    #[test]
    fn rejects_inverted_court_hours() {
        let raw = r#"
            [[courts]]
            id = "x"
            name = "X"
            location = "Y"
            sport = "tennis"
            pricePerHour = 10.0
            operatingHours = { open = "20:00", close = "08:00" }
        "#;
        let config = AppConfig::from_toml(raw).unwrap();
        assert!(matches!(config.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/court-booking.toml")).unwrap();
        assert_eq!(config.server.shutdown_timeout, 10);
    }

    #[test]
    fn explicit_path_wins() {
        let path = resolve_config_path(Some(PathBuf::from("/tmp/x.toml")));
        assert_eq!(path, PathBuf::from("/tmp/x.toml"));
        assert!(default_config_path().ends_with("court-booking/config.toml"));
    }
}
