//! Member account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Member stored in the database.
///
/// The password digest is intentionally not serializable; only
/// `MemberResponse` crosses the API boundary.
#[derive(Debug, Clone, FromRow)]
pub struct Member {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Member information returned by the API (without the password digest).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            email: member.email,
            name: member.name,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}
