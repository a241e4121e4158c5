//! Chunked upload handlers.
//!
//! Resumable uploads: init declares filename/size/mime and receives an
//! opaque upload handle; chunks are appended as raw request bodies bound
//! to `(project_id, upload_id)`; completion promotes the assembled temp
//! file into a permanent asset.

use crate::auth::models::AuthedMember;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::projects::fetch_owned_project;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use bytes::Bytes;
use cutroom_core::models::AssetResponse;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Request to start a chunked upload
#[derive(Debug, Deserialize, ToSchema)]
pub struct InitUploadRequest {
    /// Original filename; must carry the accepted container extension
    pub filename: String,
    /// Declared total file size in bytes
    pub size: i64,
    /// Content type; must equal the accepted media type
    pub mime: String,
}

/// Response for starting a chunked upload
#[derive(Debug, Serialize, ToSchema)]
pub struct InitUploadResponse {
    /// Resumable upload handle
    pub upload_id: Uuid,
    /// Advisory chunk size in bytes; clients are not required to honor it
    pub chunk_size: u64,
}

/// Response for a chunk append
#[derive(Debug, Serialize, ToSchema)]
pub struct AppendChunkResponse {
    /// Bytes received so far
    pub received_size: i64,
    /// True once every declared byte has been received
    pub done: bool,
}

/// Start a chunked upload session.
#[utoipa::path(
    post,
    path = "/api/projects/{project_id}/assets/chunked/init",
    tag = "uploads",
    params(("project_id" = i64, Path, description = "Project ID")),
    request_body = InitUploadRequest,
    responses(
        (status = 200, description = "Upload session created", body = InitUploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 413, description = "Declared size too large", body = ErrorResponse)
    )
)]
pub async fn init_chunked_upload(
    member: AuthedMember,
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<i64>,
    Json(request): Json<InitUploadRequest>,
) -> Result<Json<InitUploadResponse>, HttpAppError> {
    fetch_owned_project(&state, &member, project_id).await?;

    let (session, chunk_size) = state
        .uploads
        .init(project_id, &request.filename, request.size, &request.mime)
        .await?;

    Ok(Json(InitUploadResponse {
        upload_id: session.id,
        chunk_size,
    }))
}

/// Append one binary chunk to an upload session.
#[utoipa::path(
    put,
    path = "/api/projects/{project_id}/assets/chunked/{upload_id}",
    tag = "uploads",
    params(
        ("project_id" = i64, Path, description = "Project ID"),
        ("upload_id" = Uuid, Path, description = "Upload session ID")
    ),
    request_body(content = Vec<u8>, description = "Raw chunk bytes", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Chunk appended", body = AppendChunkResponse),
        (status = 400, description = "Empty or overflowing chunk", body = ErrorResponse),
        (status = 404, description = "Unknown upload session", body = ErrorResponse)
    )
)]
pub async fn append_chunk(
    member: AuthedMember,
    State(state): State<Arc<AppState>>,
    Path((project_id, upload_id)): Path<(i64, Uuid)>,
    body: Bytes,
) -> Result<Json<AppendChunkResponse>, HttpAppError> {
    fetch_owned_project(&state, &member, project_id).await?;

    let progress = state.uploads.append(upload_id, project_id, &body).await?;

    Ok(Json(AppendChunkResponse {
        received_size: progress.received_size,
        done: progress.done,
    }))
}

/// Complete an upload session and promote it to a permanent asset.
#[utoipa::path(
    post,
    path = "/api/projects/{project_id}/assets/chunked/{upload_id}/complete",
    tag = "uploads",
    params(
        ("project_id" = i64, Path, description = "Project ID"),
        ("upload_id" = Uuid, Path, description = "Upload session ID")
    ),
    responses(
        (status = 200, description = "Upload promoted to an asset", body = AssetResponse),
        (status = 400, description = "Upload incomplete", body = ErrorResponse),
        (status = 404, description = "Unknown upload session", body = ErrorResponse),
        (status = 413, description = "Stale size violation", body = ErrorResponse)
    )
)]
pub async fn complete_chunked_upload(
    member: AuthedMember,
    State(state): State<Arc<AppState>>,
    Path((project_id, upload_id)): Path<(i64, Uuid)>,
) -> Result<Json<AssetResponse>, HttpAppError> {
    fetch_owned_project(&state, &member, project_id).await?;

    let asset = state.uploads.complete(upload_id, project_id).await?;
    let file_reference = state.storage.url_for(&asset.storage_key);

    Ok(Json(AssetResponse::new(asset, file_reference)))
}
