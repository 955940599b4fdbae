use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::guestbook::dtos::{
    CreateGuestEntryDto, DocumentationDto, DocumentationStatus, SubmissionResponseDto,
};
use crate::features::guestbook::services::GuestbookService;
use crate::modules::storage::{check_upload, UploadDispatcher, UploadError, UploadFile};
use crate::shared::types::FieldErrors;
use crate::shared::validation::collect_field_errors;

/// Field that receives attachment errors
const DOCUMENTATION_FIELD: &str = "dokumentasiPelayanan";

const UPLOAD_FAILED_WARNING: &str =
    "File tidak dapat diunggah. Form tetap disimpan tanpa dokumentasi";

/// A visitor's form submission
#[derive(Debug, Clone, Default)]
pub struct GuestEntryForm {
    pub fields: CreateGuestEntryDto,
    pub file: Option<UploadFile>,
}

/// Runs the public form flow: validate, upload the photo, then create the entry.
///
/// Nothing leaves the process until every field and the attachment pass
/// validation. The photo URL is resolved before the entry is inserted, so a
/// valid submission creates exactly one row.
pub struct EntryFormService {
    guestbook: Arc<GuestbookService>,
    dispatcher: Arc<UploadDispatcher>,
}

impl EntryFormService {
    pub fn new(guestbook: Arc<GuestbookService>, dispatcher: Arc<UploadDispatcher>) -> Self {
        Self {
            guestbook,
            dispatcher,
        }
    }

    pub async fn submit(&self, form: GuestEntryForm) -> Result<SubmissionResponseDto> {
        let mut fields = form.fields.normalized();
        // Only an upload may set the photo URL on this path
        fields.dokumentasi_pelayanan = None;

        let mut errors = match fields.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => collect_field_errors(&e),
        };
        if let Some(file) = &form.file {
            if let Err(e) = check_upload(file) {
                errors
                    .entry(DOCUMENTATION_FIELD.to_string())
                    .or_default()
                    .push(e.to_string());
            }
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let mut warnings = Vec::new();
        let documentation = match &form.file {
            None => DocumentationDto::none(),
            Some(file) => match self.dispatcher.upload(file).await {
                Ok(receipt) => {
                    if let Some(warning) = receipt.warning() {
                        warnings.push(warning);
                    }
                    fields.dokumentasi_pelayanan = Some(receipt.stored.url.clone());
                    DocumentationDto {
                        status: if receipt.used_fallback() {
                            DocumentationStatus::Fallback
                        } else {
                            DocumentationStatus::Primary
                        },
                        url: Some(receipt.stored.url),
                        backend: Some(receipt.stored.backend.to_string()),
                        durability: Some(receipt.stored.durability),
                    }
                }
                Err(UploadError::AllBackendsFailed(failures)) => {
                    tracing::warn!(
                        "Documentation upload failed on every backend ({} attempts), saving entry without it",
                        failures.len()
                    );
                    warnings.push(UPLOAD_FAILED_WARNING.to_string());
                    DocumentationDto::failed()
                }
                Err(e) => {
                    let mut errors = FieldErrors::new();
                    errors.insert(DOCUMENTATION_FIELD.to_string(), vec![e.to_string()]);
                    return Err(AppError::Validation(errors));
                }
            },
        };

        let data = self.guestbook.insert(fields.into_new_entry()).await?;

        Ok(SubmissionResponseDto {
            data,
            documentation,
            warnings,
        })
    }
}
