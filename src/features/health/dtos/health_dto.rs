use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponseDto {
    pub status: HealthStatus,
    pub database_reachable: bool,
    pub storage_reachable: bool,
}

impl HealthResponseDto {
    pub fn new(database_reachable: bool, storage_reachable: bool) -> Self {
        let status = if database_reachable && storage_reachable {
            HealthStatus::Ok
        } else {
            HealthStatus::Degraded
        };
        Self {
            status,
            database_reachable,
            storage_reachable,
        }
    }
}
