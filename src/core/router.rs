use std::sync::Arc;

use axum::Router;
use tower_http::services::ServeDir;

use crate::core::config::LocalUploadConfig;
use crate::core::middleware::no_cache;
use crate::features::auth::AdminAccess;
use crate::features::guestbook::{
    routes as guestbook_routes, EntryFormService, GuestRepository, GuestbookService,
    GuestbookState,
};
use crate::features::health::{routes as health_routes, HealthService};
use crate::features::uploads::{routes as uploads_routes, UploadService};
use crate::modules::storage::UploadDispatcher;

/// Services shared by the HTTP layer
pub struct AppServices {
    pub guestbook: Arc<GuestbookService>,
    pub entry_form: Arc<EntryFormService>,
    pub uploads: Arc<UploadService>,
    pub health: Arc<HealthService>,
    pub admin_access: Arc<AdminAccess>,
}

impl AppServices {
    pub fn new(
        repository: Arc<dyn GuestRepository>,
        dispatcher: Arc<UploadDispatcher>,
        admin_access: AdminAccess,
    ) -> Self {
        let guestbook = Arc::new(GuestbookService::new(repository));
        let entry_form = Arc::new(EntryFormService::new(
            Arc::clone(&guestbook),
            Arc::clone(&dispatcher),
        ));
        let uploads = Arc::new(UploadService::new(Arc::clone(&dispatcher)));
        let health = Arc::new(HealthService::new(Arc::clone(&guestbook), dispatcher));

        Self {
            guestbook,
            entry_form,
            uploads,
            health,
            admin_access: Arc::new(admin_access),
        }
    }
}

/// Application routes without the outer tracing/CORS layers.
///
/// API responses are marked uncacheable; files in the local uploads
/// directory are served as-is under its URL prefix.
pub fn build_router(services: &AppServices, local_upload: &LocalUploadConfig) -> Router {
    let guestbook_state = GuestbookState {
        guestbook: Arc::clone(&services.guestbook),
        entry_form: Arc::clone(&services.entry_form),
    };

    let api_routes = Router::new()
        .merge(guestbook_routes::routes(
            guestbook_state,
            Arc::clone(&services.admin_access),
        ))
        .merge(uploads_routes::routes(Arc::clone(&services.uploads)))
        .merge(health_routes::routes(Arc::clone(&services.health)));

    Router::new().merge(no_cache(api_routes)).nest_service(
        &local_upload.url_prefix,
        ServeDir::new(&local_upload.directory),
    )
}
