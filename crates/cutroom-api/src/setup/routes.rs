//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::auth::middleware::{auth_gate, AuthState};
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Json, Router,
};
use cutroom_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let auth_state = Arc::new(AuthState {
        tokens: state.auth.tokens.clone(),
        members: Arc::new(state.db.members.clone()),
    });

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/openapi.json", get(openapi_json))
        .with_state(state.clone());

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .route("/api/auth/profile", get(handlers::auth::profile))
        .route(
            "/api/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/api/projects/{project_id}",
            get(handlers::projects::get_project)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route(
            "/api/projects/{project_id}/assets",
            get(handlers::assets::list_assets).post(handlers::assets::upload_asset),
        )
        .route(
            "/api/projects/{project_id}/history",
            get(handlers::history::list_history).post(handlers::history::record_history),
        )
        .route(
            "/api/projects/{project_id}/assets/chunked/init",
            post(handlers::chunked_upload::init_chunked_upload),
        )
        .route(
            "/api/projects/{project_id}/assets/chunked/{upload_id}",
            put(handlers::chunked_upload::append_chunk),
        )
        .route(
            "/api/projects/{project_id}/assets/chunked/{upload_id}/complete",
            post(handlers::chunked_upload::complete_chunked_upload),
        )
        .layer(axum::middleware::from_fn_with_state(auth_state, auth_gate))
        .with_state(state.clone());

    // Chunk and multipart bodies ride on top of the asset ceiling; allow a
    // little slack for multipart framing.
    let body_limit = (config.max_asset_size_bytes as usize).saturating_add(1024 * 1024);

    // Server-level concurrency limit to protect against resource
    // exhaustion under extreme load.
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);

    let app = public_routes
        .merge(protected_routes)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(app)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let layer = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    };

    Ok(layer)
}
