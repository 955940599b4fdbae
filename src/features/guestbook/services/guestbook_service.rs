use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::guestbook::dtos::{CreateGuestEntryDto, UpdateGuestEntryDto};
use crate::features::guestbook::models::{GuestEntry, NewGuestEntry};
use crate::features::guestbook::repositories::{GuestRepository, RepositoryError};
use crate::shared::types::{ListQuery, ListResponse, MessageResponse, PageMeta};
use crate::shared::validation::collect_field_errors;

const INVALID_ID: &str = "ID tidak valid";
const NOT_FOUND: &str = "Data tamu tidak ditemukan";

/// User-facing messages for repository failures, per operation
#[derive(Debug, Clone, Copy)]
enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    fn failure_message(self) -> &'static str {
        match self {
            Operation::Create => "Terjadi kesalahan saat menyimpan data",
            Operation::Read => "Terjadi kesalahan saat mengambil data",
            Operation::Update => "Terjadi kesalahan saat mengupdate data",
            Operation::Delete => "Terjadi kesalahan saat menghapus data",
        }
    }

    fn into_app_error(self, err: RepositoryError) -> AppError {
        match err {
            RepositoryError::NotFound(_) => AppError::NotFound(NOT_FOUND.to_string()),
            RepositoryError::Unavailable(detail) => {
                AppError::persistence(self.failure_message(), detail)
            }
        }
    }
}

/// Path ids are validated before any lookup
pub fn parse_id(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest(INVALID_ID.to_string()))
}

/// Service for guest entry CRUD
pub struct GuestbookService {
    repository: Arc<dyn GuestRepository>,
}

impl GuestbookService {
    pub fn new(repository: Arc<dyn GuestRepository>) -> Self {
        Self { repository }
    }

    /// Validate and store a visit submitted as JSON
    pub async fn create(&self, dto: CreateGuestEntryDto) -> Result<GuestEntry> {
        let dto = dto.normalized();
        dto.validate()
            .map_err(|e| AppError::Validation(collect_field_errors(&e)))?;

        self.insert(dto.into_new_entry()).await
    }

    /// Store an already validated entry
    pub async fn insert(&self, entry: NewGuestEntry) -> Result<GuestEntry> {
        let created = self
            .repository
            .create(entry)
            .await
            .map_err(|e| Operation::Create.into_app_error(e))?;

        tracing::info!(
            "Guest entry {} created for {}",
            created.id,
            created.desa_kelurahan
        );
        Ok(created)
    }

    pub async fn list(&self, query: &ListQuery) -> Result<ListResponse<GuestEntry>> {
        let page = self
            .repository
            .find_many(query)
            .await
            .map_err(|e| Operation::Read.into_app_error(e))?;

        Ok(ListResponse {
            data: page.records,
            total: page.total,
            meta: PageMeta::new(query.page(), query.limit(), page.total),
        })
    }

    pub async fn get(&self, raw_id: &str) -> Result<GuestEntry> {
        let id = parse_id(raw_id)?;
        self.repository
            .find_by_id(id)
            .await
            .map_err(|e| Operation::Read.into_app_error(e))
    }

    pub async fn update(&self, raw_id: &str, dto: UpdateGuestEntryDto) -> Result<GuestEntry> {
        let id = parse_id(raw_id)?;
        let dto = dto.normalized();
        dto.validate()
            .map_err(|e| AppError::Validation(collect_field_errors(&e)))?;

        let updated = self
            .repository
            .update(id, dto.into_changes())
            .await
            .map_err(|e| Operation::Update.into_app_error(e))?;

        tracing::info!("Guest entry {} updated", id);
        Ok(updated)
    }

    pub async fn delete(&self, raw_id: &str) -> Result<MessageResponse> {
        let id = parse_id(raw_id)?;
        self.repository
            .delete(id)
            .await
            .map_err(|e| Operation::Delete.into_app_error(e))?;

        tracing::info!("Guest entry {} deleted", id);
        Ok(MessageResponse {
            message: "Data tamu berhasil dihapus".to_string(),
        })
    }

    /// Whether the database answers
    pub async fn is_reachable(&self) -> bool {
        match self.repository.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Database ping failed: {}", e);
                false
            }
        }
    }
}
