use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::features::uploads::handlers;
use crate::features::uploads::services::UploadService;
use crate::shared::constants::UPLOAD_BODY_LIMIT;

/// Create routes for direct uploads
///
/// Note: This feature is public (no authentication required)
pub fn routes(service: Arc<UploadService>) -> Router {
    Router::new()
        .route("/upload", post(handlers::upload_file))
        .route("/local-upload", post(handlers::upload_local_file))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(service)
}
