use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::core::middleware::admin_access_middleware;
use crate::features::auth::AdminAccess;
use crate::features::guestbook::handlers::{self, GuestbookState};
use crate::shared::constants::UPLOAD_BODY_LIMIT;

/// Create routes for the guestbook feature
///
/// Registering a visit and the location list are public. Listing, detail,
/// update and delete pass through the admin access middleware.
pub fn routes(state: GuestbookState, admin_access: Arc<AdminAccess>) -> Router {
    let public_routes = Router::new()
        .route("/guestbook", post(handlers::create_guest_entry))
        .route(
            "/guestbook/submit",
            post(handlers::submit_guest_entry).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/locations", get(handlers::list_locations));

    let admin_routes = Router::new()
        .route("/guestbook", get(handlers::list_guest_entries))
        .route(
            "/guestbook/{id}",
            get(handlers::get_guest_entry)
                .put(handlers::update_guest_entry)
                .delete(handlers::delete_guest_entry),
        )
        .route_layer(from_fn_with_state(admin_access, admin_access_middleware));

    public_routes.merge(admin_routes).with_state(state)
}
