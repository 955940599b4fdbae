use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::features::health::dtos::{HealthResponseDto, HealthStatus};
use crate::features::health::services::HealthService;

/// Report database and storage reachability
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Everything reachable", body = HealthResponseDto),
        (status = 503, description = "Database or storage unreachable", body = HealthResponseDto)
    ),
    tag = "health"
)]
pub async fn health_check(
    State(service): State<Arc<HealthService>>,
) -> (StatusCode, Json<HealthResponseDto>) {
    let report = service.check().await;
    let status = match report.status {
        HealthStatus::Ok => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(report))
}
