//! Collaborator traits consumed by the API layer.
//!
//! The auth gate resolves members through `MemberDirectory`; the upload
//! coordinator mutates sessions through `SessionStore` and emits permanent
//! records through `AssetStore`. Keeping these as traits lets tests drive
//! the full upload state machine against in-memory stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cutroom_core::models::{Asset, Member, UploadSession};
use cutroom_core::AppError;
use uuid::Uuid;

/// Member lookup used by the auth gate to resolve token claims.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn member_by_id(&self, id: i64) -> Result<Option<Member>, AppError>;
}

/// Persistence seam for chunked upload sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: &UploadSession) -> Result<(), AppError>;

    /// Fetch a session bound to its owning project. Both values must match;
    /// a session id alone is not enough to touch a session.
    async fn get(&self, id: Uuid, project_id: i64) -> Result<Option<UploadSession>, AppError>;

    /// Persist a new received size. Only called after the corresponding
    /// bytes have been durably appended to the temp file.
    async fn advance(&self, id: Uuid, received_size: i64) -> Result<(), AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Sessions created before the cutoff, for the stale-session sweep.
    async fn stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<UploadSession>, AppError>;
}

/// Fields required to create a permanent asset record.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub project_id: i64,
    pub original_name: String,
    pub size: i64,
    pub mime: String,
    pub storage_key: String,
}

/// Persistence seam for promoted assets.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn create(&self, asset: NewAsset) -> Result<Asset, AppError>;
}
