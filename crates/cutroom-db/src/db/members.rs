use crate::traits::MemberDirectory;
use async_trait::async_trait;
use cutroom_core::models::Member;
use cutroom_core::AppError;
use sqlx::PgPool;

/// Repository for member accounts.
#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new member. The caller is responsible for checking email
    /// uniqueness first so the conflict surfaces as a validation error,
    /// not a database error.
    pub async fn create(
        &self,
        email: &str,
        name: &str,
        password_digest: &str,
    ) -> Result<Member, AppError> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (email, name, password_digest)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_digest, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(password_digest)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Member>, AppError> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, email, name, password_digest, created_at, updated_at
            FROM members
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Member>, AppError> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, email, name, password_digest, created_at, updated_at
            FROM members
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists: (bool,) =
            sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM members WHERE email = $1)"#)
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }
}

#[async_trait]
impl MemberDirectory for MemberRepository {
    async fn member_by_id(&self, id: i64) -> Result<Option<Member>, AppError> {
        self.get_by_id(id).await
    }
}
