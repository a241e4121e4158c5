//! Video asset model.
//!
//! An asset is created only when a whole file (single-shot upload) or a
//! fully received chunked upload session is promoted into permanent
//! storage; it is immutable afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Asset stored in the database. `storage_key` is the internal permanent
/// storage reference; it never appears in responses.
#[derive(Debug, Clone, FromRow)]
pub struct Asset {
    pub id: i64,
    pub project_id: i64,
    pub original_name: String,
    pub size: i64,
    pub mime: String,
    pub storage_key: String,
    pub created_at: DateTime<Utc>,
}

/// Public representation of an asset. `file_reference` is the resolved
/// URL of the permanent copy.
#[derive(Debug, Serialize, ToSchema)]
pub struct AssetResponse {
    pub id: i64,
    pub project_id: i64,
    pub original_name: String,
    pub size: i64,
    pub mime: String,
    pub file_reference: String,
    pub created_at: DateTime<Utc>,
}

impl AssetResponse {
    pub fn new(asset: Asset, file_reference: String) -> Self {
        Self {
            id: asset.id,
            project_id: asset.project_id,
            original_name: asset.original_name,
            size: asset.size,
            mime: asset.mime,
            file_reference,
            created_at: asset.created_at,
        }
    }
}
