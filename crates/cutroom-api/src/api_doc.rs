//! OpenAPI document assembly.

use crate::error::ErrorResponse;
use crate::handlers;
use crate::handlers::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::handlers::chunked_upload::{
    AppendChunkResponse, InitUploadRequest, InitUploadResponse,
};
use crate::handlers::health::HealthResponse;
use crate::handlers::history::HistoryRequest;
use crate::handlers::projects::ProjectRequest;
use cutroom_core::models::{
    AssetResponse, EditAction, EditHistoryResponse, MemberResponse, Project,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::profile,
        handlers::projects::list_projects,
        handlers::projects::create_project,
        handlers::projects::get_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,
        handlers::assets::list_assets,
        handlers::assets::upload_asset,
        handlers::history::list_history,
        handlers::history::record_history,
        handlers::chunked_upload::init_chunked_upload,
        handlers::chunked_upload::append_chunk,
        handlers::chunked_upload::complete_chunked_upload,
    ),
    components(schemas(
        ErrorResponse,
        HealthResponse,
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        MemberResponse,
        ProjectRequest,
        Project,
        AssetResponse,
        EditAction,
        EditHistoryResponse,
        HistoryRequest,
        InitUploadRequest,
        InitUploadResponse,
        AppendChunkResponse,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Registration, login and profile"),
        (name = "projects", description = "Owner-scoped project management"),
        (name = "assets", description = "Video assets"),
        (name = "history", description = "Project edit history"),
        (name = "uploads", description = "Resumable chunked uploads")
    )
)]
pub struct ApiDoc;
