use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;

/// Authenticated member identity, resolved by the auth gate and stored in
/// request extensions for downstream authorization checks.
#[derive(Debug, Clone)]
pub struct AuthedMember {
    pub id: i64,
    pub email: String,
    pub name: String,
}

// Handlers extract AuthedMember directly from request parts; a protected
// handler reached without an identity (no credential was presented) is the
// "not authenticated" case, distinct from a rejected credential.
impl<S> FromRequestParts<S> for AuthedMember
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthedMember>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        error: "Authentication required".to_string(),
                        details: None,
                        error_type: None,
                        code: "UNAUTHENTICATED".to_string(),
                        recoverable: false,
                        suggested_action: Some(
                            "Provide an Authorization: Bearer token".to_string(),
                        ),
                    }),
                )
            })
    }
}
