//! Asset listing and single-shot upload.
//!
//! The single-shot path applies the same filename/mime/size validation as
//! chunked init, writes the whole body to permanent storage and records
//! the asset in one request.

use crate::auth::models::AuthedMember;
use crate::error::{storage_error, ErrorResponse, HttpAppError};
use crate::handlers::projects::fetch_owned_project;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cutroom_core::models::AssetResponse;
use cutroom_core::AppError;
use cutroom_db::{AssetStore, NewAsset};
use cutroom_storage::keys;
use std::sync::Arc;

/// List a project's assets.
#[utoipa::path(
    get,
    path = "/api/projects/{project_id}/assets",
    tag = "assets",
    params(("project_id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Assets in the project", body = Vec<AssetResponse>),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
pub async fn list_assets(
    member: AuthedMember,
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<i64>,
) -> Result<Json<Vec<AssetResponse>>, HttpAppError> {
    fetch_owned_project(&state, &member, project_id).await?;

    let assets = state.db.assets.list_for_project(project_id).await?;
    let responses = assets
        .into_iter()
        .map(|asset| {
            let file_reference = state.storage.url_for(&asset.storage_key);
            AssetResponse::new(asset, file_reference)
        })
        .collect();

    Ok(Json(responses))
}

/// Upload a whole video file in one request (multipart `file` field).
#[utoipa::path(
    post,
    path = "/api/projects/{project_id}/assets",
    tag = "assets",
    params(("project_id" = i64, Path, description = "Project ID")),
    responses(
        (status = 201, description = "Asset created", body = AssetResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
pub async fn upload_asset(
    member: AuthedMember,
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    fetch_owned_project(&state, &member, project_id).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().map(str::to_string).ok_or_else(|| {
                AppError::InvalidInput("file field must carry a filename".to_string())
            })?;
            let mime = field.content_type().map(str::to_string).unwrap_or_default();
            let data = field.bytes().await.map_err(|e| {
                AppError::InvalidInput(format!("failed to read file field: {}", e))
            })?;
            upload = Some((filename, mime, data));
            break;
        }
    }

    let Some((filename, mime, data)) = upload else {
        return Err(AppError::InvalidInput("missing file field".to_string()).into());
    };

    let limits = state.uploads.limits();
    limits.validate_request(&filename, &mime)?;
    if data.is_empty() {
        return Err(AppError::InvalidInput("File is empty".to_string()).into());
    }
    let size = data.len() as i64;
    limits.validate_size(size)?;

    let storage_key = keys::asset_key(&limits.accepted_extension);
    state
        .storage
        .put(&storage_key, data.to_vec())
        .await
        .map_err(storage_error)?;

    let asset = state
        .db
        .assets
        .create(NewAsset {
            project_id,
            original_name: filename,
            size,
            mime: limits.accepted_mime.clone(),
            storage_key,
        })
        .await?;

    let file_reference = state.storage.url_for(&asset.storage_key);

    tracing::info!(
        asset_id = asset.id,
        project_id = project_id,
        size = size,
        "Asset uploaded"
    );

    Ok((StatusCode::CREATED, Json(AssetResponse::new(asset, file_reference))))
}
