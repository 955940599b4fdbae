mod health_dto;

pub use health_dto::{HealthResponseDto, HealthStatus};
