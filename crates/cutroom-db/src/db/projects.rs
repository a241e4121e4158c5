use cutroom_core::models::Project;
use cutroom_core::AppError;
use sqlx::PgPool;

/// Repository for projects. List reads are pre-filtered by owner so the
/// existence of other members' projects never leaks.
#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: i64, title: &str) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (owner_id, title)
            VALUES ($1, $2)
            RETURNING id, owner_id, title, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, owner_id, title, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    pub async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, owner_id, title, created_at, updated_at
            FROM projects
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    pub async fn update_title(&self, id: i64, title: &str) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET title = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, title, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    /// Delete a project. Assets, history and upload sessions cascade at
    /// the schema level.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(r#"DELETE FROM projects WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
