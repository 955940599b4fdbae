use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::uploads::dtos::UploadResponseDto;
use crate::modules::storage::{UploadDispatcher, UploadError, UploadFile};

/// Which backend a direct upload targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    /// Object storage
    Primary,
    /// Local fallback directory
    Local,
}

impl UploadTarget {
    fn position(self) -> usize {
        match self {
            UploadTarget::Primary => 0,
            UploadTarget::Local => 1,
        }
    }
}

/// Direct single-backend uploads, without fallback
pub struct UploadService {
    dispatcher: Arc<UploadDispatcher>,
}

impl UploadService {
    pub fn new(dispatcher: Arc<UploadDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub async fn upload(
        &self,
        target: UploadTarget,
        file: Option<UploadFile>,
    ) -> Result<UploadResponseDto> {
        let file =
            file.ok_or_else(|| AppError::BadRequest("File tidak ditemukan".to_string()))?;

        let tag = self
            .dispatcher
            .backends()
            .get(target.position())
            .map(|backend| backend.backend_tag())
            .ok_or_else(|| AppError::Storage("Penyimpanan tidak tersedia".to_string()))?;

        match self.dispatcher.upload_to(tag, &file).await {
            Ok(stored) => Ok(UploadResponseDto {
                url: stored.url,
                path: stored.path,
            }),
            Err(UploadError::AllBackendsFailed(failures)) => {
                let reason = failures
                    .first()
                    .map(|f| f.message.clone())
                    .unwrap_or_default();
                Err(AppError::Storage(format!("Gagal mengupload file: {}", reason)))
            }
            Err(UploadError::UnknownBackend(tag)) => Err(AppError::Storage(format!(
                "Penyimpanan '{}' tidak tersedia",
                tag
            ))),
            Err(e) => Err(AppError::BadRequest(e.to_string())),
        }
    }
}
