use sha2::{Digest, Sha256};

use crate::core::error::AppError;

/// How admin routes are protected
#[derive(Debug, Clone)]
pub enum AdminAccess {
    /// No token configured; every caller is treated as admin
    Open,
    /// Callers must send `Authorization: Bearer <token>`
    Token(String),
}

impl AdminAccess {
    /// Blank tokens count as unset
    pub fn from_token(token: Option<String>) -> Self {
        match token.map(|t| t.trim().to_string()) {
            Some(t) if !t.is_empty() => AdminAccess::Token(t),
            _ => AdminAccess::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, AdminAccess::Open)
    }

    /// Checks an `Authorization` header value
    pub fn authorize(&self, header: Option<&str>) -> Result<AdminSession, AppError> {
        let expected = match self {
            AdminAccess::Open => return Ok(AdminSession { open_mode: true }),
            AdminAccess::Token(token) => token,
        };

        let header = header
            .ok_or_else(|| AppError::Unauthorized("Token admin diperlukan".to_string()))?;
        let presented = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or_else(|| {
                AppError::Unauthorized("Format header Authorization tidak valid".to_string())
            })?;

        // Compare fixed-length digests so timing does not depend on the prefix
        if Sha256::digest(presented.as_bytes()) != Sha256::digest(expected.as_bytes()) {
            return Err(AppError::Unauthorized("Token admin tidak valid".to_string()));
        }

        Ok(AdminSession { open_mode: false })
    }
}

/// Proof that the request passed the admin access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminSession {
    pub open_mode: bool,
}
