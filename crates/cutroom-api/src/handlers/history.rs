//! Project edit history.

use crate::auth::models::AuthedMember;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::projects::fetch_owned_project;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cutroom_core::models::{EditAction, EditHistoryResponse};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct HistoryRequest {
    pub action: EditAction,
    #[serde(default = "default_params")]
    pub params: serde_json::Value,
}

fn default_params() -> serde_json::Value {
    serde_json::json!({})
}

/// List a project's edit history.
#[utoipa::path(
    get,
    path = "/api/projects/{project_id}/history",
    tag = "history",
    params(("project_id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Edit history entries", body = Vec<EditHistoryResponse>),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
pub async fn list_history(
    member: AuthedMember,
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<i64>,
) -> Result<Json<Vec<EditHistoryResponse>>, HttpAppError> {
    fetch_owned_project(&state, &member, project_id).await?;

    let entries = state.db.history.list_for_project(project_id).await?;

    Ok(Json(
        entries.into_iter().map(EditHistoryResponse::from).collect(),
    ))
}

/// Record an editing operation.
#[utoipa::path(
    post,
    path = "/api/projects/{project_id}/history",
    tag = "history",
    params(("project_id" = i64, Path, description = "Project ID")),
    request_body = HistoryRequest,
    responses(
        (status = 201, description = "History entry recorded", body = EditHistoryResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
pub async fn record_history(
    member: AuthedMember,
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<i64>,
    Json(request): Json<HistoryRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    fetch_owned_project(&state, &member, project_id).await?;

    let entry = state
        .db
        .history
        .create(project_id, &request.action.to_string(), request.params)
        .await?;

    Ok((StatusCode::CREATED, Json(EditHistoryResponse::from(entry))))
}
