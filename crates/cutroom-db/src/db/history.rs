use cutroom_core::models::EditHistory;
use cutroom_core::AppError;
use sqlx::PgPool;

/// Repository for project edit history entries.
#[derive(Clone)]
pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        project_id: i64,
        action: &str,
        params: serde_json::Value,
    ) -> Result<EditHistory, AppError> {
        let entry = sqlx::query_as::<_, EditHistory>(
            r#"
            INSERT INTO edit_history (project_id, action, params)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, action, params, created_at
            "#,
        )
        .bind(project_id)
        .bind(action)
        .bind(params)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn list_for_project(&self, project_id: i64) -> Result<Vec<EditHistory>, AppError> {
        let entries = sqlx::query_as::<_, EditHistory>(
            r#"
            SELECT id, project_id, action, params, created_at
            FROM edit_history
            WHERE project_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
