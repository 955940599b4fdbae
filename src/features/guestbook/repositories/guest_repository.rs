use async_trait::async_trait;
use thiserror::Error;

use crate::features::guestbook::models::{GuestEntry, GuestEntryChanges, NewGuestEntry};
use crate::shared::types::ListQuery;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Guest entry {0} not found")]
    NotFound(i32),

    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        RepositoryError::Unavailable(e.to_string())
    }
}

/// One page of guest entries plus the unpaged match count
#[derive(Debug, Clone)]
pub struct GuestPage {
    pub records: Vec<GuestEntry>,
    pub total: i64,
}

/// Access to stored guest entries.
///
/// Listing is ordered newest first (`created_at DESC, id DESC`). Search is a
/// case-insensitive substring match over `nama`, `nik`, `desa_kelurahan` and
/// `keperluan` where user-typed wildcards match literally.
#[async_trait]
pub trait GuestRepository: Send + Sync {
    /// Inserts a row; `id` and `created_at` are assigned by the store
    async fn create(&self, entry: NewGuestEntry) -> Result<GuestEntry, RepositoryError>;

    async fn find_many(&self, query: &ListQuery) -> Result<GuestPage, RepositoryError>;

    async fn find_by_id(&self, id: i32) -> Result<GuestEntry, RepositoryError>;

    async fn update(
        &self,
        id: i32,
        changes: GuestEntryChanges,
    ) -> Result<GuestEntry, RepositoryError>;

    async fn delete(&self, id: i32) -> Result<(), RepositoryError>;

    /// Cheap round trip used by the health check
    async fn ping(&self) -> Result<(), RepositoryError>;
}
