use std::sync::Arc;

use crate::features::guestbook::GuestbookService;
use crate::features::health::dtos::HealthResponseDto;
use crate::modules::storage::UploadDispatcher;

/// Checks the database and the primary storage backend
pub struct HealthService {
    guestbook: Arc<GuestbookService>,
    dispatcher: Arc<UploadDispatcher>,
}

impl HealthService {
    pub fn new(guestbook: Arc<GuestbookService>, dispatcher: Arc<UploadDispatcher>) -> Self {
        Self {
            guestbook,
            dispatcher,
        }
    }

    pub async fn check(&self) -> HealthResponseDto {
        let (database_reachable, storage_reachable) = tokio::join!(
            self.guestbook.is_reachable(),
            self.dispatcher.primary_reachable()
        );
        HealthResponseDto::new(database_reachable, storage_reachable)
    }
}
