//! Registration, login and profile handlers.

use crate::auth::models::AuthedMember;
use crate::auth::token::Claims;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use cutroom_core::models::MemberResponse;
use cutroom_core::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub member: MemberResponse,
}

/// Both unknown-email and wrong-password take this path so the response
/// does not reveal which one failed.
fn invalid_credentials() -> HttpAppError {
    AppError::Unauthorized("invalid credentials".to_string()).into()
}

/// Register a new member.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Member registered", body = MemberResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    if state.db.members.email_exists(&request.email).await? {
        return Err(AppError::InvalidInput("email is already registered".to_string()).into());
    }

    let digest = state.auth.password.hash(&request.password)?;
    let member = state
        .db
        .members
        .create(&request.email, &request.name, &digest)
        .await?;

    tracing::info!(member_id = member.id, "Member registered");

    Ok((StatusCode::CREATED, Json(MemberResponse::from(member))))
}

/// Login and obtain a signed bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let member = state.db.members.get_by_email(&request.email).await?;
    let verified = member
        .as_ref()
        .map(|m| state.auth.password.verify(&request.password, &m.password_digest))
        .unwrap_or(false);
    let Some(member) = member else {
        return Err(invalid_credentials());
    };
    if !verified {
        return Err(invalid_credentials());
    }

    let mut claims = Claims::new();
    claims.insert("id".to_string(), Value::from(member.id));
    claims.insert("email".to_string(), Value::from(member.email.clone()));
    let token = state
        .auth
        .tokens
        .issue(claims, state.config.token_ttl_minutes);

    tracing::info!(member_id = member.id, "Member logged in");

    Ok(Json(LoginResponse {
        token,
        member: MemberResponse::from(member),
    }))
}

/// Get the authenticated member's profile.
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "auth",
    responses(
        (status = 200, description = "Authenticated member profile", body = MemberResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn profile(
    member: AuthedMember,
    State(state): State<Arc<AppState>>,
) -> Result<Json<MemberResponse>, HttpAppError> {
    let member = state
        .db
        .members
        .get_by_id(member.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;

    Ok(Json(MemberResponse::from(member)))
}
