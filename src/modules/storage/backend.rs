//! Storage backend contract shared by every upload target

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::shared::constants::UPLOAD_FILE_PREFIX;

/// How safely a backend keeps stored files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Durability {
    /// Replicated object storage
    Durable,
    /// Single-host storage that does not survive redeploys
    Reduced,
}

/// An uploaded file held in memory
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub data: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

impl UploadFile {
    pub fn new(
        data: Vec<u8>,
        content_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            data,
            content_type: content_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Only content types with a known image extension are accepted
    pub fn is_image(&self) -> bool {
        self.extension().is_some()
    }

    /// Extension for the stored name, `None` for non-image content types.
    ///
    /// The original extension is kept only when it is an image extension
    /// that agrees with the content type; otherwise the content type decides.
    pub fn extension(&self) -> Option<&'static str> {
        let expected = extension_from_content_type(&self.content_type)?;

        let original = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .and_then(|ext| IMAGE_EXTENSIONS.iter().copied().find(|known| *known == ext))
            .filter(|ext| canonical_extension(ext) == expected);

        Some(original.unwrap_or(expected))
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic", "bmp"];

fn canonical_extension(ext: &str) -> &str {
    match ext {
        "jpeg" => "jpg",
        other => other,
    }
}

/// Get file extension from content type
fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "image/bmp" => Some("bmp"),
        _ => None,
    }
}

/// `dokumentasi_<epoch-ms>[_<suffix>].<ext>`
pub fn timestamped_name(suffix: Option<&str>, extension: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    match suffix {
        Some(suffix) => format!("{UPLOAD_FILE_PREFIX}_{millis}_{suffix}.{extension}"),
        None => format!("{UPLOAD_FILE_PREFIX}_{millis}.{extension}"),
    }
}

/// Where a file ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// URL clients use to fetch the file
    pub url: String,
    /// Backend-relative path or object key
    pub path: String,
    pub backend: &'static str,
    pub durability: Durability,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{backend}: {message}")]
pub struct StorageError {
    pub backend: &'static str,
    pub message: String,
}

impl StorageError {
    pub fn new(backend: &'static str, message: impl Into<String>) -> Self {
        Self {
            backend,
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Stable short name used in logs and responses
    fn backend_tag(&self) -> &'static str;

    async fn store(&self, file: &UploadFile) -> Result<StoredFile, StorageError>;

    async fn is_reachable(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_keeps_matching_original_name() {
        let file = UploadFile::new(vec![1], "image/jpeg", "Foto Pelayanan.JPEG");
        assert_eq!(file.extension(), Some("jpeg"));
    }

    #[test]
    fn test_extension_falls_back_to_content_type() {
        assert_eq!(UploadFile::new(vec![1], "image/png", "foto").extension(), Some("png"));
        assert_eq!(
            UploadFile::new(vec![1], "image/webp", "foto.").extension(),
            Some("webp")
        );
        assert_eq!(
            UploadFile::new(vec![1], "image/jpeg", "../../etc/passwd.j/pg").extension(),
            Some("jpg")
        );
        assert_eq!(
            UploadFile::new(vec![1], "image/jpeg", "foto.png").extension(),
            Some("jpg")
        );
        assert_eq!(UploadFile::new(vec![1], "image/x-unknown", "foto.png").extension(), None);
    }

    #[test]
    fn test_extension_never_takes_markup_from_file_name() {
        let html = UploadFile::new(b"<script>".to_vec(), "image/png", "x.html");
        assert_eq!(html.extension(), Some("png"));

        let svg = UploadFile::new(b"<svg/>".to_vec(), "image/svg+xml", "x.svg");
        assert_eq!(svg.extension(), None);
        assert!(!svg.is_image());
    }

    #[test]
    fn test_is_image() {
        assert!(UploadFile::new(vec![1], "image/jpeg", "a.jpg").is_image());
        assert!(UploadFile::new(vec![1], "IMAGE/PNG", "a").is_image());
        assert!(!UploadFile::new(vec![1], "application/pdf", "a.pdf").is_image());
        assert!(!UploadFile::new(vec![1], "", "a.jpg").is_image());
    }

    #[test]
    fn test_timestamped_name_shape() {
        let with_suffix = timestamped_name(Some("ab12cd"), "jpg");
        assert!(with_suffix.starts_with("dokumentasi_"));
        assert!(with_suffix.ends_with("_ab12cd.jpg"));

        let plain = timestamped_name(None, "png");
        let stamp = plain
            .strip_prefix("dokumentasi_")
            .and_then(|rest| rest.strip_suffix(".png"))
            .unwrap();
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }
}
