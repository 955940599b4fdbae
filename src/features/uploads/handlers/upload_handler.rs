use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::core::error::Result;
use crate::features::uploads::dtos::{UploadFileDto, UploadResponseDto};
use crate::features::uploads::services::{UploadService, UploadTarget};
use crate::shared::multipart::read_form;
use crate::shared::types::ErrorBody;

/// Upload a photo to object storage
#[utoipa::path(
    post,
    path = "/upload",
    tag = "uploads",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, description = "File stored on object storage", body = UploadResponseDto),
        (status = 400, description = "Missing or non-image file", body = ErrorBody),
        (status = 413, description = "File too large", body = ErrorBody),
        (status = 502, description = "Object storage failed", body = ErrorBody)
    )
)]
pub async fn upload_file(
    State(service): State<Arc<UploadService>>,
    multipart: Multipart,
) -> Result<Json<UploadResponseDto>> {
    let form = read_form(multipart).await?;
    let stored = service.upload(UploadTarget::Primary, form.file).await?;
    Ok(Json(stored))
}

/// Upload a photo to the local uploads directory
#[utoipa::path(
    post,
    path = "/local-upload",
    tag = "uploads",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, description = "File stored locally", body = UploadResponseDto),
        (status = 400, description = "Missing or non-image file", body = ErrorBody),
        (status = 413, description = "File too large", body = ErrorBody),
        (status = 502, description = "Local storage failed", body = ErrorBody)
    )
)]
pub async fn upload_local_file(
    State(service): State<Arc<UploadService>>,
    multipart: Multipart,
) -> Result<Json<UploadResponseDto>> {
    let form = read_form(multipart).await?;
    let stored = service.upload(UploadTarget::Local, form.file).await?;
    Ok(Json(stored))
}
