use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::guestbook::{
    dtos as guestbook_dtos, handlers as guestbook_handlers, models as guestbook_models,
};
use crate::features::health::{dtos as health_dtos, handlers as health_handlers};
use crate::features::uploads::{dtos as uploads_dtos, handlers as uploads_handlers};
use crate::modules::storage::Durability;
use crate::shared::types::{ErrorBody, ListResponse, MessageResponse, PageMeta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Guestbook (public)
        guestbook_handlers::create_guest_entry,
        guestbook_handlers::submit_guest_entry,
        guestbook_handlers::list_locations,
        // Guestbook (admin)
        guestbook_handlers::list_guest_entries,
        guestbook_handlers::get_guest_entry,
        guestbook_handlers::update_guest_entry,
        guestbook_handlers::delete_guest_entry,
        // Uploads
        uploads_handlers::upload_file,
        uploads_handlers::upload_local_file,
        // Health
        health_handlers::health_check,
    ),
    components(
        schemas(
            ErrorBody,
            MessageResponse,
            PageMeta,
            Durability,
            guestbook_models::GuestEntry,
            guestbook_dtos::CreateGuestEntryDto,
            guestbook_dtos::UpdateGuestEntryDto,
            guestbook_dtos::SubmitGuestEntryForm,
            guestbook_dtos::SubmissionResponseDto,
            guestbook_dtos::DocumentationDto,
            guestbook_dtos::DocumentationStatus,
            guestbook_dtos::LocationsResponseDto,
            ListResponse<guestbook_models::GuestEntry>,
            uploads_dtos::UploadFileDto,
            uploads_dtos::UploadResponseDto,
            health_dtos::HealthResponseDto,
            health_dtos::HealthStatus,
        )
    ),
    tags(
        (name = "guestbook", description = "Visitor registration and admin records"),
        (name = "uploads", description = "Direct documentation photo uploads"),
        (name = "health", description = "Database and storage reachability"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Buku Tamu API",
        version = "0.1.0",
        description = "API buku tamu Kantor Kecamatan Kalipuro",
    )
)]
pub struct ApiDoc;

/// Adds the admin bearer token scheme to the OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
