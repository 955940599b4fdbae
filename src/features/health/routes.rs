use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::health::handlers;
use crate::features::health::services::HealthService;

pub fn routes(service: Arc<HealthService>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(service)
}
