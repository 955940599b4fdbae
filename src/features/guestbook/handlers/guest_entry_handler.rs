use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::RequireAdmin;
use crate::features::guestbook::dtos::{
    CreateGuestEntryDto, LocationsResponseDto, SubmissionResponseDto, SubmitGuestEntryForm,
    UpdateGuestEntryDto,
};
use crate::features::guestbook::models::GuestEntry;
use crate::features::guestbook::services::{EntryFormService, GuestEntryForm, GuestbookService};
use crate::shared::constants::DESA_KELURAHAN;
use crate::shared::multipart::read_form;
use crate::shared::types::{ErrorBody, ListQuery, ListResponse, MessageResponse};

#[derive(Clone)]
pub struct GuestbookState {
    pub guestbook: Arc<GuestbookService>,
    pub entry_form: Arc<EntryFormService>,
}

/// Register a visit (JSON)
#[utoipa::path(
    post,
    path = "/guestbook",
    request_body = CreateGuestEntryDto,
    responses(
        (status = 201, description = "Guest entry created", body = GuestEntry),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 500, description = "Persistence failure", body = ErrorBody)
    ),
    tag = "guestbook"
)]
pub async fn create_guest_entry(
    State(state): State<GuestbookState>,
    AppJson(dto): AppJson<CreateGuestEntryDto>,
) -> Result<(StatusCode, Json<GuestEntry>)> {
    let entry = state.guestbook.create(dto).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Submit the visitor form
///
/// Accepts multipart/form-data with the six text fields and an optional
/// `file` photo. The photo goes to object storage, falling back to local
/// storage; the entry is saved even when every upload fails.
#[utoipa::path(
    post,
    path = "/guestbook/submit",
    request_body(
        content = SubmitGuestEntryForm,
        content_type = "multipart/form-data",
        description = "Visitor form with optional documentation photo",
    ),
    responses(
        (status = 201, description = "Guest entry created", body = SubmissionResponseDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 413, description = "File too large", body = ErrorBody),
        (status = 500, description = "Persistence failure", body = ErrorBody)
    ),
    tag = "guestbook"
)]
pub async fn submit_guest_entry(
    State(state): State<GuestbookState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionResponseDto>)> {
    let mut form = read_form(multipart).await?;

    let fields = CreateGuestEntryDto {
        nama: form.take("nama"),
        nik: form.take("nik"),
        desa_kelurahan: form.take("desaKelurahan"),
        alamat: form.take("alamat"),
        no_telepon: form.take("noTelepon"),
        keperluan: form.take("keperluan"),
        dokumentasi_pelayanan: None,
    };

    let response = state
        .entry_form
        .submit(GuestEntryForm {
            fields,
            file: form.file,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// List guest entries
///
/// Newest first. `search` matches nama, NIK, desa/kelurahan and keperluan.
#[utoipa::path(
    get,
    path = "/guestbook",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of guest entries", body = ListResponse<GuestEntry>),
        (status = 401, description = "Admin token required", body = ErrorBody),
        (status = 500, description = "Persistence failure", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "guestbook"
)]
pub async fn list_guest_entries(
    _admin: RequireAdmin,
    State(state): State<GuestbookState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<ListResponse<GuestEntry>>> {
    let page = state.guestbook.list(&query).await?;
    Ok(Json(page))
}

/// Get a guest entry by ID
#[utoipa::path(
    get,
    path = "/guestbook/{id}",
    params(("id" = i32, Path, description = "Guest entry ID")),
    responses(
        (status = 200, description = "Guest entry", body = GuestEntry),
        (status = 400, description = "Invalid ID", body = ErrorBody),
        (status = 401, description = "Admin token required", body = ErrorBody),
        (status = 404, description = "Guest entry not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "guestbook"
)]
pub async fn get_guest_entry(
    _admin: RequireAdmin,
    State(state): State<GuestbookState>,
    Path(id): Path<String>,
) -> Result<Json<GuestEntry>> {
    let entry = state.guestbook.get(&id).await?;
    Ok(Json(entry))
}

/// Update a guest entry
#[utoipa::path(
    put,
    path = "/guestbook/{id}",
    params(("id" = i32, Path, description = "Guest entry ID")),
    request_body = UpdateGuestEntryDto,
    responses(
        (status = 200, description = "Guest entry updated", body = GuestEntry),
        (status = 400, description = "Invalid ID or validation error", body = ErrorBody),
        (status = 401, description = "Admin token required", body = ErrorBody),
        (status = 404, description = "Guest entry not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "guestbook"
)]
pub async fn update_guest_entry(
    _admin: RequireAdmin,
    State(state): State<GuestbookState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateGuestEntryDto>,
) -> Result<Json<GuestEntry>> {
    let entry = state.guestbook.update(&id, dto).await?;
    Ok(Json(entry))
}

/// Delete a guest entry
#[utoipa::path(
    delete,
    path = "/guestbook/{id}",
    params(("id" = i32, Path, description = "Guest entry ID")),
    responses(
        (status = 200, description = "Guest entry deleted", body = MessageResponse),
        (status = 400, description = "Invalid ID", body = ErrorBody),
        (status = 401, description = "Admin token required", body = ErrorBody),
        (status = 404, description = "Guest entry not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "guestbook"
)]
pub async fn delete_guest_entry(
    _admin: RequireAdmin,
    State(state): State<GuestbookState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let message = state.guestbook.delete(&id).await?;
    Ok(Json(message))
}

/// Desa and kelurahan offered on the form
#[utoipa::path(
    get,
    path = "/locations",
    responses(
        (status = 200, description = "Fixed location list", body = LocationsResponseDto)
    ),
    tag = "guestbook"
)]
pub async fn list_locations() -> Json<LocationsResponseDto> {
    Json(LocationsResponseDto {
        data: DESA_KELURAHAN.iter().map(|s| s.to_string()).collect(),
    })
}
