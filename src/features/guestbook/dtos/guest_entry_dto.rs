use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::guestbook::models::{GuestEntry, GuestEntryChanges, NewGuestEntry};
use crate::modules::storage::Durability;

fn trimmed(value: String) -> String {
    value.trim().to_string()
}

/// Request DTO for registering a visit
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuestEntryDto {
    #[validate(length(min = 2, message = "Nama harus diisi minimal 2 karakter"))]
    #[serde(default)]
    #[schema(example = "Budi Santoso")]
    pub nama: String,

    #[validate(
        length(equal = 16, message = "NIK harus terdiri dari 16 digit"),
        regex(
            path = "*crate::shared::validation::DIGITS_REGEX",
            message = "NIK hanya boleh berisi angka"
        )
    )]
    #[serde(default)]
    #[schema(example = "3510123456780001")]
    pub nik: String,

    #[validate(
        length(min = 1, message = "Desa/Kelurahan harus diisi"),
        custom(function = "crate::shared::validation::validate_desa_kelurahan")
    )]
    #[serde(default)]
    #[schema(example = "Desa Kelir")]
    pub desa_kelurahan: String,

    #[validate(length(min = 5, message = "Alamat lengkap harus diisi"))]
    #[serde(default)]
    #[schema(example = "Jl. Raya Kalipuro No. 12")]
    pub alamat: String,

    #[validate(
        length(min = 10, max = 15, message = "No telepon harus terdiri dari 10-15 digit"),
        regex(
            path = "*crate::shared::validation::DIGITS_REGEX",
            message = "No telepon hanya boleh berisi angka"
        )
    )]
    #[serde(default)]
    #[schema(example = "081234567890")]
    pub no_telepon: String,

    #[validate(length(min = 5, message = "Keperluan harus diisi minimal 5 karakter"))]
    #[serde(default)]
    #[schema(example = "Pengurusan KTP")]
    pub keperluan: String,

    /// URL of an already uploaded photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dokumentasi_pelayanan: Option<String>,
}

impl CreateGuestEntryDto {
    /// Trims every text field; a blank photo URL becomes `None`
    pub fn normalized(self) -> Self {
        Self {
            nama: trimmed(self.nama),
            nik: trimmed(self.nik),
            desa_kelurahan: trimmed(self.desa_kelurahan),
            alamat: trimmed(self.alamat),
            no_telepon: trimmed(self.no_telepon),
            keperluan: trimmed(self.keperluan),
            dokumentasi_pelayanan: self
                .dokumentasi_pelayanan
                .map(trimmed)
                .filter(|url| !url.is_empty()),
        }
    }

    pub fn into_new_entry(self) -> NewGuestEntry {
        NewGuestEntry {
            nama: self.nama,
            nik: self.nik,
            desa_kelurahan: self.desa_kelurahan,
            alamat: self.alamat,
            no_telepon: self.no_telepon,
            keperluan: self.keperluan,
            dokumentasi_pelayanan: self.dokumentasi_pelayanan,
        }
    }
}

/// Request DTO for correcting a visit; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGuestEntryDto {
    #[validate(length(min = 2, message = "Nama harus diisi minimal 2 karakter"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nama: Option<String>,

    #[validate(
        length(equal = 16, message = "NIK harus terdiri dari 16 digit"),
        regex(
            path = "*crate::shared::validation::DIGITS_REGEX",
            message = "NIK hanya boleh berisi angka"
        )
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nik: Option<String>,

    #[validate(
        length(min = 1, message = "Desa/Kelurahan harus diisi"),
        custom(function = "crate::shared::validation::validate_desa_kelurahan")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desa_kelurahan: Option<String>,

    #[validate(length(min = 5, message = "Alamat lengkap harus diisi"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alamat: Option<String>,

    #[validate(
        length(min = 10, max = 15, message = "No telepon harus terdiri dari 10-15 digit"),
        regex(
            path = "*crate::shared::validation::DIGITS_REGEX",
            message = "No telepon hanya boleh berisi angka"
        )
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_telepon: Option<String>,

    #[validate(length(min = 5, message = "Keperluan harus diisi minimal 5 karakter"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keperluan: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dokumentasi_pelayanan: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tanggal_pelayanan: Option<DateTime<Utc>>,
}

impl UpdateGuestEntryDto {
    pub fn normalized(self) -> Self {
        Self {
            nama: self.nama.map(trimmed),
            nik: self.nik.map(trimmed),
            desa_kelurahan: self.desa_kelurahan.map(trimmed),
            alamat: self.alamat.map(trimmed),
            no_telepon: self.no_telepon.map(trimmed),
            keperluan: self.keperluan.map(trimmed),
            dokumentasi_pelayanan: self
                .dokumentasi_pelayanan
                .map(trimmed)
                .filter(|url| !url.is_empty()),
            tanggal_pelayanan: self.tanggal_pelayanan,
        }
    }

    pub fn into_changes(self) -> GuestEntryChanges {
        GuestEntryChanges {
            nama: self.nama,
            nik: self.nik,
            desa_kelurahan: self.desa_kelurahan,
            alamat: self.alamat,
            no_telepon: self.no_telepon,
            keperluan: self.keperluan,
            dokumentasi_pelayanan: self.dokumentasi_pelayanan,
            tanggal_pelayanan: self.tanggal_pelayanan,
        }
    }
}

/// Multipart form accepted by `/guestbook/submit`
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct SubmitGuestEntryForm {
    pub nama: String,
    pub nik: String,
    pub desa_kelurahan: String,
    pub alamat: String,
    pub no_telepon: String,
    pub keperluan: String,
    /// Optional documentation photo (images only, max 10MB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: Option<String>,
}

/// What happened to the attached photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentationStatus {
    /// No file was attached
    None,
    /// Stored on object storage
    Primary,
    /// Stored on the local fallback
    Fallback,
    /// Every backend failed; the entry was saved without a photo
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationDto {
    pub status: DocumentationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durability: Option<Durability>,
}

impl DocumentationDto {
    pub fn none() -> Self {
        Self {
            status: DocumentationStatus::None,
            url: None,
            backend: None,
            durability: None,
        }
    }

    pub fn failed() -> Self {
        Self {
            status: DocumentationStatus::Failed,
            ..Self::none()
        }
    }
}

/// Response DTO for a submitted form
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponseDto {
    pub data: GuestEntry,
    pub documentation: DocumentationDto,
    /// Non-fatal problems the visitor should know about
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LocationsResponseDto {
    pub data: Vec<String>,
}
