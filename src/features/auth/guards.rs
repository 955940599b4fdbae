//! Admin authorization guard.
//!
//! The admin access middleware inserts an [`AdminSession`] into request
//! extensions once the bearer token checks out. Handlers that must only run
//! for admins take [`RequireAdmin`] as an argument.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::core::error::AppError;
use crate::features::auth::model::AdminSession;

/// Guard for admin-only handlers.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(session): RequireAdmin) { ... }
/// ```
#[allow(dead_code)]
pub struct RequireAdmin(pub AdminSession);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<AdminSession>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized("Akses admin diperlukan".to_string()))?;

        Ok(RequireAdmin(session))
    }
}
