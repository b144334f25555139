//! Court catalog repository interface

use async_trait::async_trait;

use super::model::Court;
use crate::shared::errors::DomainResult;

#[async_trait]
pub trait CourtRepository: Send + Sync {
    /// Insert or replace a court
    async fn save(&self, court: Court) -> DomainResult<()>;

    /// Find court by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Court>>;

    /// All courts, ordered by ID
    async fn find_all(&self) -> DomainResult<Vec<Court>>;
}
