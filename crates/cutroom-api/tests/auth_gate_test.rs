//! Router-level tests for the bearer-token auth gate.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use cutroom_api::auth::middleware::{auth_gate, AuthState};
use cutroom_api::auth::models::AuthedMember;
use cutroom_api::auth::token::{Claims, TokenService};
use helpers::{test_member, MockMemberDirectory};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &[u8] = b"test-secret-key-of-sufficient-length";
const MEMBER_ID: i64 = 42;

async fn whoami(member: AuthedMember) -> String {
    member.id.to_string()
}

fn protected_router() -> Router {
    let auth_state = Arc::new(AuthState {
        tokens: TokenService::new(SECRET),
        members: Arc::new(MockMemberDirectory::with_member(test_member(MEMBER_ID))),
    });

    Router::new()
        .route("/whoami", get(whoami))
        .layer(axum::middleware::from_fn_with_state(auth_state, auth_gate))
}

fn member_token(id: i64, ttl_minutes: u64) -> String {
    let mut claims = Claims::new();
    claims.insert("id".to_string(), Value::from(id));
    TokenService::new(SECRET).issue(claims, ttl_minutes)
}

async fn send(router: Router, authorization: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri("/whoami");
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    let response = router
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));
    (status, body)
}

#[tokio::test]
async fn test_valid_token_resolves_member() {
    let token = member_token(MEMBER_ID, 60);
    let (status, body) = send(
        protected_router(),
        Some(&format!("Bearer {}", token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::from(MEMBER_ID));
}

#[tokio::test]
async fn test_missing_header_is_unauthenticated_not_invalid() {
    let (status, body) = send(protected_router(), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthenticated() {
    let (status, body) = send(protected_router(), Some("Basic dXNlcjpwYXNz")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn test_garbage_token_rejected_generically() {
    let (status, body) = send(protected_router(), Some("Bearer not-a-token")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    // One generic message for every verification failure.
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_tampered_signature_rejected_generically() {
    let token = member_token(MEMBER_ID, 60);
    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let (status, body) = send(
        protected_router(),
        Some(&format!("Bearer {}", tampered)),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_expired_token_rejected_generically() {
    // ttl 0 puts exp at issuance time, which is already invalid.
    let token = member_token(MEMBER_ID, 0);
    let (status, body) = send(
        protected_router(),
        Some(&format!("Bearer {}", token)),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_token_for_unknown_member_rejected() {
    let token = member_token(9_999, 60);
    let (status, body) = send(
        protected_router(),
        Some(&format!("Bearer {}", token)),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_token_without_id_claim_rejected() {
    let mut claims = Claims::new();
    claims.insert("email".to_string(), Value::from("a@example.com"));
    let token = TokenService::new(SECRET).issue(claims, 60);

    let (status, body) = send(
        protected_router(),
        Some(&format!("Bearer {}", token)),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}
