use crate::traits::SessionStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cutroom_core::models::UploadSession;
use cutroom_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for chunked upload sessions.
#[derive(Clone)]
pub struct UploadSessionRepository {
    pool: PgPool,
}

impl UploadSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for UploadSessionRepository {
    async fn create(&self, session: &UploadSession) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO upload_sessions
                (id, project_id, filename, mime, total_size, received_size, temp_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(session.id)
        .bind(session.project_id)
        .bind(&session.filename)
        .bind(&session.mime)
        .bind(session.total_size)
        .bind(session.received_size)
        .bind(&session.temp_key)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid, project_id: i64) -> Result<Option<UploadSession>, AppError> {
        let session = sqlx::query_as::<_, UploadSession>(
            r#"
            SELECT id, project_id, filename, mime, total_size, received_size,
                   temp_key, created_at, updated_at
            FROM upload_sessions
            WHERE id = $1 AND project_id = $2
            "#,
        )
        .bind(id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn advance(&self, id: Uuid, received_size: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE upload_sessions
            SET received_size = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(received_size)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(r#"DELETE FROM upload_sessions WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<UploadSession>, AppError> {
        let sessions = sqlx::query_as::<_, UploadSession>(
            r#"
            SELECT id, project_id, filename, mime, total_size, received_size,
                   temp_key, created_at, updated_at
            FROM upload_sessions
            WHERE created_at < $1
            ORDER BY created_at
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }
}
