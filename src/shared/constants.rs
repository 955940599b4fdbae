/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// LOCATIONS
// =============================================================================

/// Desa and kelurahan served by Kantor Kecamatan Kalipuro
pub const DESA_KELURAHAN: [&str; 9] = [
    "Desa Bulusari",
    "Desa Kelir",
    "Desa Ketapang",
    "Desa Pesucen",
    "Desa Telemung",
    "Kelurahan Bulusan",
    "Kelurahan Gombengsari",
    "Kelurahan Kalipuro",
    "Kelurahan Klatak",
];

// =============================================================================
// UPLOADS
// =============================================================================

/// Maximum documentation photo size in bytes (10MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Filename prefix for stored documentation photos
pub const UPLOAD_FILE_PREFIX: &str = "dokumentasi";

/// Request body limit for multipart uploads (file plus form overhead)
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_SIZE + 1024 * 1024;
