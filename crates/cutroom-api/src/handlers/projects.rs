//! Owner-scoped project CRUD.

use crate::auth::access;
use crate::auth::models::AuthedMember;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cutroom_core::models::Project;
use cutroom_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
}

/// Load a project and gate it on ownership. A denial surfaces as the same
/// 404 a nonexistent project produces.
pub(crate) async fn fetch_owned_project(
    state: &AppState,
    member: &AuthedMember,
    project_id: i64,
) -> Result<Project, AppError> {
    let project = state
        .db
        .projects
        .get(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project not found: {}", project_id)))?;

    access::require_project_access(member, &project)?;

    Ok(project)
}

/// List the authenticated member's projects.
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "projects",
    responses(
        (status = 200, description = "Projects owned by the member", body = Vec<Project>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn list_projects(
    member: AuthedMember,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Project>>, HttpAppError> {
    let projects = state.db.projects.list_for_owner(member.id).await?;
    Ok(Json(projects))
}

/// Create a project owned by the authenticated member.
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "projects",
    request_body = ProjectRequest,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_project(
    member: AuthedMember,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProjectRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let project = state.db.projects.create(member.id, &request.title).await?;

    tracing::info!(project_id = project.id, owner_id = member.id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// Get one project.
#[utoipa::path(
    get,
    path = "/api/projects/{project_id}",
    tag = "projects",
    params(("project_id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project", body = Project),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
pub async fn get_project(
    member: AuthedMember,
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<i64>,
) -> Result<Json<Project>, HttpAppError> {
    let project = fetch_owned_project(&state, &member, project_id).await?;
    Ok(Json(project))
}

/// Rename a project.
#[utoipa::path(
    put,
    path = "/api/projects/{project_id}",
    tag = "projects",
    params(("project_id" = i64, Path, description = "Project ID")),
    request_body = ProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
pub async fn update_project(
    member: AuthedMember,
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<i64>,
    Json(request): Json<ProjectRequest>,
) -> Result<Json<Project>, HttpAppError> {
    request.validate().map_err(AppError::from)?;
    fetch_owned_project(&state, &member, project_id).await?;

    let project = state
        .db
        .projects
        .update_title(project_id, &request.title)
        .await?;

    Ok(Json(project))
}

/// Delete a project and everything under it.
#[utoipa::path(
    delete,
    path = "/api/projects/{project_id}",
    tag = "projects",
    params(("project_id" = i64, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
pub async fn delete_project(
    member: AuthedMember,
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<i64>,
) -> Result<StatusCode, HttpAppError> {
    fetch_owned_project(&state, &member, project_id).await?;

    state.db.projects.delete(project_id).await?;

    tracing::info!(project_id = project_id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}
