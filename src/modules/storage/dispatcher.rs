//! Ordered fallback across storage backends.
//!
//! Backends are tried one after another, never concurrently. The first
//! success wins, so a file is stored on at most one backend per call.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::modules::storage::backend::{
    Durability, StorageBackend, StorageError, StoredFile, UploadFile,
};
use crate::shared::constants::MAX_UPLOAD_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("File kosong")]
    Empty,

    #[error("Ukuran file melebihi batas {max} byte")]
    TooLarge { size: usize, max: usize },

    #[error("Hanya dapat mengupload file gambar (diterima: {0})")]
    UnsupportedType(String),

    #[error("Semua penyimpanan gagal: {}", format_failures(.0))]
    AllBackendsFailed(Vec<StorageError>),

    #[error("Backend penyimpanan '{0}' tidak tersedia")]
    UnknownBackend(String),
}

fn format_failures(failures: &[StorageError]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Successful dispatch, with the failures that preceded it
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub stored: StoredFile,
    pub failures: Vec<StorageError>,
}

impl UploadReceipt {
    /// Stored somewhere other than the first choice
    pub fn used_fallback(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        self.stored.durability == Durability::Reduced
    }

    pub fn warning(&self) -> Option<String> {
        self.is_degraded().then(|| {
            "File disimpan secara lokal karena upload ke penyimpanan utama tidak berhasil"
                .to_string()
        })
    }
}

/// Rejects files that must never reach a backend
pub fn check_upload(file: &UploadFile) -> Result<(), UploadError> {
    if file.data.is_empty() {
        return Err(UploadError::Empty);
    }
    if file.data.len() > MAX_UPLOAD_SIZE {
        return Err(UploadError::TooLarge {
            size: file.data.len(),
            max: MAX_UPLOAD_SIZE,
        });
    }
    if !file.is_image() {
        return Err(UploadError::UnsupportedType(file.content_type.clone()));
    }
    Ok(())
}

pub struct UploadDispatcher {
    backends: Vec<Arc<dyn StorageBackend>>,
}

impl UploadDispatcher {
    /// Backends in preference order
    pub fn new(backends: Vec<Arc<dyn StorageBackend>>) -> Self {
        Self { backends }
    }

    pub fn backends(&self) -> &[Arc<dyn StorageBackend>] {
        &self.backends
    }

    pub fn backend(&self, tag: &str) -> Option<&Arc<dyn StorageBackend>> {
        self.backends.iter().find(|b| b.backend_tag() == tag)
    }

    /// Primary first, then each fallback in order
    pub async fn upload(&self, file: &UploadFile) -> Result<UploadReceipt, UploadError> {
        check_upload(file)?;

        let mut failures = Vec::new();
        for backend in &self.backends {
            match backend.store(file).await {
                Ok(stored) => {
                    if failures.is_empty() {
                        info!("Stored '{}' on {}", stored.path, stored.backend);
                    } else {
                        warn!(
                            "Stored '{}' on fallback {} after {} failed attempt(s)",
                            stored.path,
                            stored.backend,
                            failures.len()
                        );
                    }
                    return Ok(UploadReceipt { stored, failures });
                }
                Err(e) => {
                    warn!("Upload to {} failed: {}", backend.backend_tag(), e.message);
                    failures.push(e);
                }
            }
        }

        Err(UploadError::AllBackendsFailed(failures))
    }

    /// Single named backend, no fallback
    pub async fn upload_to(&self, tag: &str, file: &UploadFile) -> Result<StoredFile, UploadError> {
        check_upload(file)?;

        let backend = self
            .backend(tag)
            .ok_or_else(|| UploadError::UnknownBackend(tag.to_string()))?;

        backend.store(file).await.map_err(|e| {
            warn!("Direct upload to {} failed: {}", tag, e.message);
            UploadError::AllBackendsFailed(vec![e])
        })
    }

    /// Whether the preferred backend is currently usable
    pub async fn primary_reachable(&self) -> bool {
        match self.backends.first() {
            Some(primary) => primary.is_reachable().await,
            None => false,
        }
    }
}
