use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One visit registered at the office
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestEntry {
    pub id: i32,
    #[schema(example = "Budi Santoso")]
    pub nama: String,
    #[schema(example = "3510123456780001")]
    pub nik: String,
    #[schema(example = "Desa Kelir")]
    pub desa_kelurahan: String,
    pub alamat: String,
    #[schema(example = "081234567890")]
    pub no_telepon: String,
    pub keperluan: String,
    /// Photo URL, null when nothing was uploaded
    pub dokumentasi_pelayanan: Option<String>,
    pub tanggal_pelayanan: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when a visit is registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuestEntry {
    pub nama: String,
    pub nik: String,
    pub desa_kelurahan: String,
    pub alamat: String,
    pub no_telepon: String,
    pub keperluan: String,
    pub dokumentasi_pelayanan: Option<String>,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestEntryChanges {
    pub nama: Option<String>,
    pub nik: Option<String>,
    pub desa_kelurahan: Option<String>,
    pub alamat: Option<String>,
    pub no_telepon: Option<String>,
    pub keperluan: Option<String>,
    pub dokumentasi_pelayanan: Option<String>,
    pub tanggal_pelayanan: Option<DateTime<Utc>>,
}
