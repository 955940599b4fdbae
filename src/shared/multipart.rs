use std::collections::HashMap;

use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
};
use tracing::debug;

use crate::core::error::AppError;
use crate::modules::storage::UploadFile;

/// Name of the multipart part carrying the photo
pub const FILE_FIELD: &str = "file";

/// Text fields and the optional file of a multipart form
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadFile>,
}

impl MultipartForm {
    /// Owned text value, empty when the field was not sent
    pub fn take(&mut self, name: &str) -> String {
        self.fields.remove(name).unwrap_or_default()
    }
}

fn read_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Ukuran file maksimal 10MB".to_string())
    } else {
        AppError::BadRequest(format!("Gagal membaca data form: {}", e.body_text()))
    }
}

/// Reads every part of the request.
///
/// A file part without bytes counts as no file: browsers send one when the
/// file input is left empty.
pub async fn read_form(mut multipart: Multipart) -> Result<MultipartForm, AppError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        let name = field.name().unwrap_or("").to_string();

        if name == FILE_FIELD {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let file_name = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unnamed".to_string());
            let data = field.bytes().await.map_err(read_error)?;

            form.file = (!data.is_empty())
                .then(|| UploadFile::new(data.to_vec(), content_type, file_name));
        } else if !name.is_empty() {
            let text = field.text().await.map_err(read_error)?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}
