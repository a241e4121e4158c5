//! Request authentication middleware.
//!
//! A missing or non-bearer Authorization header is not an error: the
//! request proceeds without an identity, and handlers that require
//! `AuthedMember` reject it as unauthenticated. A bearer credential that is
//! present but fails verification short-circuits with one generic
//! "Invalid token" response; the concrete reason (malformed, bad signature,
//! expired, unknown member) is only ever logged.

use crate::auth::models::AuthedMember;
use crate::auth::token::TokenService;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use cutroom_core::AppError;
use cutroom_db::MemberDirectory;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: TokenService,
    pub members: Arc<dyn MemberDirectory>,
}

fn invalid_token() -> Response {
    HttpAppError(AppError::Unauthorized("Invalid token".to_string())).into_response()
}

pub async fn auth_gate(
    State(auth): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let Some(header) = header else {
        return next.run(request).await;
    };

    let mut parts = header.split_whitespace();
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        // Malformed scheme: treated the same as no credential at all.
        return next.run(request).await;
    };
    if !scheme.eq_ignore_ascii_case("bearer") {
        return next.run(request).await;
    }

    let claims = match auth.tokens.verify(token) {
        Ok(claims) => claims,
        Err(reason) => {
            tracing::debug!(reason = %reason, "Bearer token rejected");
            return invalid_token();
        }
    };

    let Some(member_id) = claims.get("id").and_then(Value::as_i64) else {
        tracing::debug!("Bearer token carries no member id claim");
        return invalid_token();
    };

    match auth.members.member_by_id(member_id).await {
        Ok(Some(member)) => {
            request.extensions_mut().insert(AuthedMember {
                id: member.id,
                email: member.email,
                name: member.name,
            });
            next.run(request).await
        }
        Ok(None) => {
            tracing::debug!(member_id = member_id, "Bearer token resolves to no member");
            invalid_token()
        }
        Err(err) => HttpAppError(err).into_response(),
    }
}
