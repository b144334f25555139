//! In-memory storage for courts and bookings

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Booking, BookingRepository, Court, CourtRepository};
use crate::shared::errors::{DomainError, DomainResult};

type DayKey = (String, NaiveDate);

/// Process-local store. Bookings are grouped per court and date so the
/// overlap check and the insert happen under one map entry lock.
///
/// Nothing is ever removed. Cancelled bookings keep their record so that
/// lookups by id still report them and a second cancel is a conflict,
/// which means memory grows with every booking for the life of the process.
#[derive(Default)]
pub struct InMemoryStorage {
    courts: DashMap<String, Court>,
    bookings: DashMap<DayKey, Vec<Booking>>,
    booking_index: DashMap<Uuid, DayKey>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_courts(courts: impl IntoIterator<Item = Court>) -> Self {
        let storage = Self::new();
        for court in courts {
            storage.courts.insert(court.id.clone(), court);
        }
        storage
    }
}

#[async_trait]
impl CourtRepository for InMemoryStorage {
    async fn save(&self, court: Court) -> DomainResult<()> {
        self.courts.insert(court.id.clone(), court);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Court>> {
        Ok(self.courts.get(id).map(|c| c.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Court>> {
        let mut courts: Vec<Court> = self.courts.iter().map(|e| e.value().clone()).collect();
        courts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(courts)
    }
}

#[async_trait]
impl BookingRepository for InMemoryStorage {
    async fn insert_if_free(&self, booking: Booking) -> DomainResult<Booking> {
        let key = (booking.court_id.clone(), booking.booking_date);
        let mut day = self.bookings.entry(key.clone()).or_default();

        if let Some(existing) = day.iter().find(|b| b.conflicts_with(&booking)) {
            debug!(
                court_id = %booking.court_id,
                existing = %existing.id,
                "Booking overlaps an existing one"
            );
            return Err(DomainError::SlotUnavailable {
                date: booking.booking_date,
                start: booking.start_time.clone(),
            });
        }

        day.push(booking.clone());
        day.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        drop(day);

        self.booking_index.insert(booking.id, key);
        Ok(booking)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        let Some(key) = self.booking_index.get(&id).map(|k| k.clone()) else {
            return Ok(None);
        };
        Ok(self
            .bookings
            .get(&key)
            .and_then(|day| day.iter().find(|b| b.id == id).cloned()))
    }

    async fn find_active_for_court(
        &self,
        court_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Vec<Booking>> {
        let key = (court_id.to_string(), date);
        Ok(self
            .bookings
            .get(&key)
            .map(|day| day.iter().filter(|b| b.is_active()).cloned().collect())
            .unwrap_or_default())
    }

    async fn cancel(&self, id: Uuid) -> DomainResult<Booking> {
        let not_found = || DomainError::NotFound {
            entity: "Booking",
            field: "id",
            value: id.to_string(),
        };

        let key = self.booking_index.get(&id).map(|k| k.clone()).ok_or_else(not_found)?;
        let mut day = self.bookings.get_mut(&key).ok_or_else(not_found)?;
        let booking = day.iter_mut().find(|b| b.id == id).ok_or_else(not_found)?;

        if !booking.is_active() {
            return Err(DomainError::Conflict(format!("booking {id} is already cancelled")));
        }
        booking.cancel();
        Ok(booking.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
    }

    fn booking(court: &str, start: &str, end: &str) -> Booking {
        Booking::new(court, date(), start, end, 1, Decimal::from(30)).unwrap()
    }

    #[tokio::test]
    async fn overlapping_insert_is_refused() {
        let storage = InMemoryStorage::new();
        storage.insert_if_free(booking("c1", "10:00", "12:00")).await.unwrap();

        let err = storage
            .insert_if_free(booking("c1", "11:00", "12:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotUnavailable { .. }));

        // other court, and back-to-back on the same court, are fine
        storage.insert_if_free(booking("c2", "11:00", "12:00")).await.unwrap();
        storage.insert_if_free(booking("c1", "12:00", "13:00")).await.unwrap();

        let active = storage.find_active_for_court("c1", date()).await.unwrap();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].start_time, "10:00");
    }

    #[tokio::test]
    async fn cancelled_booking_frees_the_slot() {
        let storage = InMemoryStorage::new();
        let first = storage.insert_if_free(booking("c1", "10:00", "11:00")).await.unwrap();

        let cancelled = storage.cancel(first.id).await.unwrap();
        assert!(!cancelled.is_active());
        assert!(matches!(
            storage.cancel(first.id).await,
            Err(DomainError::Conflict(_))
        ));

        storage.insert_if_free(booking("c1", "10:00", "11:00")).await.unwrap();
        let stored = BookingRepository::find_by_id(&storage, first.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.is_active());
    }

    #[tokio::test]
    async fn cancelled_records_are_retained() {
        let storage = InMemoryStorage::new();
        let first = storage.insert_if_free(booking("c1", "10:00", "11:00")).await.unwrap();
        storage.cancel(first.id).await.unwrap();
        storage.insert_if_free(booking("c1", "10:00", "11:00")).await.unwrap();

        let key = ("c1".to_string(), date());
        assert_eq!(storage.bookings.get(&key).unwrap().len(), 2);
        assert_eq!(storage.booking_index.len(), 2);
        assert_eq!(storage.find_active_for_court("c1", date()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancel_unknown_booking_is_not_found() {
        let storage = InMemoryStorage::new();
        assert!(matches!(
            storage.cancel(Uuid::new_v4()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn courts_are_listed_by_id() {
        let storage = InMemoryStorage::with_courts([
            Court::new("b", "B", "x", "tennis", Decimal::from(10)),
            Court::new("a", "A", "x", "padel", Decimal::from(10)),
        ]);
        let ids: Vec<_> = storage
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(CourtRepository::find_by_id(&storage, "a").await.unwrap().is_some());
    }
}
