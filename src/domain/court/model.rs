//! Court catalog entity

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Daily opening window, `HH:MM` 24-hour strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    pub open: String,
    pub close: String,
}

impl OperatingHours {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

/// Bookable court as served by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: String,
    pub name: String,
    pub location: String,
    pub sport: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_hour: Decimal,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub operating_hours: Option<OperatingHours>,
}

impl Court {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        sport: impl Into<String>,
        price_per_hour: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            sport: sport.into(),
            price_per_hour,
            capacity: 0,
            rating: 0.0,
            facilities: Vec::new(),
            operating_hours: None,
        }
    }

    pub fn with_hours(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.operating_hours = Some(OperatingHours::new(open, close));
        self
    }

    /// Closing time from the court's own operating hours, if configured
    pub fn closing_time(&self) -> Option<&str> {
        self.operating_hours.as_ref().map(|h| h.close.as_str())
    }

    pub fn opening_time(&self) -> Option<&str> {
        self.operating_hours.as_ref().map(|h| h.open.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_catalog_shape() {
        let json = r#"{
            "id": "c1",
            "name": "Centre Court",
            "location": "Riverside",
            "sport": "tennis",
            "pricePerHour": 40.5,
            "capacity": 4,
            "rating": 4.7,
            "facilities": ["lights", "showers"],
            "operatingHours": { "open": "08:00", "close": "23:59" }
        }"#;

        let court: Court = serde_json::from_str(json).unwrap();
        assert_eq!(court.price_per_hour, Decimal::new(405, 1));
        assert_eq!(court.closing_time(), Some("23:59"));
        assert_eq!(court.facilities.len(), 2);
    }

    #[test]
    fn hours_are_optional() {
        let court = Court::new("c2", "Annex", "North", "padel", Decimal::from(20));
        assert_eq!(court.closing_time(), None);
        assert_eq!(court.with_hours("09:00", "18:00").opening_time(), Some("09:00"));
    }
}
