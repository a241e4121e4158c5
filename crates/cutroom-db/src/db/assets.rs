use crate::traits::{AssetStore, NewAsset};
use async_trait::async_trait;
use cutroom_core::models::Asset;
use cutroom_core::AppError;
use sqlx::PgPool;

/// Repository for promoted video assets.
#[derive(Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_project(&self, project_id: i64) -> Result<Vec<Asset>, AppError> {
        let assets = sqlx::query_as::<_, Asset>(
            r#"
            SELECT id, project_id, original_name, size, mime, storage_key, created_at
            FROM assets
            WHERE project_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assets)
    }
}

#[async_trait]
impl AssetStore for AssetRepository {
    async fn create(&self, asset: NewAsset) -> Result<Asset, AppError> {
        let asset = sqlx::query_as::<_, Asset>(
            r#"
            INSERT INTO assets (project_id, original_name, size, mime, storage_key)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, project_id, original_name, size, mime, storage_key, created_at
            "#,
        )
        .bind(asset.project_id)
        .bind(asset.original_name)
        .bind(asset.size)
        .bind(asset.mime)
        .bind(asset.storage_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(asset)
    }
}
