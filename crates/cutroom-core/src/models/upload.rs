//! Chunked upload session model.
//!
//! A session tracks one in-progress resumable upload: the declared
//! filename/mime/size fixed at creation, the bytes received so far, and
//! the temp storage location exclusively owned by the session. The record
//! is removed on successful completion or by the stale-session sweep.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UploadSession {
    /// Resumable upload handle.
    pub id: Uuid,
    /// Owning project; every chunk append is bound to this pair.
    pub project_id: i64,
    pub filename: String,
    pub mime: String,
    /// Declared total size in bytes, immutable after creation.
    pub total_size: i64,
    /// Bytes received so far; monotonically non-decreasing,
    /// `0 <= received_size <= total_size`.
    pub received_size: i64,
    /// Temp storage key, derived from the session id.
    pub temp_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UploadSession {
    /// Whether every declared byte has been received.
    pub fn done(&self) -> bool {
        self.received_size == self.total_size
    }

    /// Session age relative to `now`, used by the stale-session sweep.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(total_size: i64, received_size: i64) -> UploadSession {
        let now = Utc::now();
        UploadSession {
            id: Uuid::new_v4(),
            project_id: 7,
            filename: "clip.mp4".to_string(),
            mime: "video/mp4".to_string(),
            total_size,
            received_size,
            temp_key: "tmp/uploads/x.part".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_done_only_when_fully_received() {
        assert!(!session(1_500_000, 0).done());
        assert!(!session(1_500_000, 1_000_000).done());
        assert!(session(1_500_000, 1_500_000).done());
    }

    #[test]
    fn test_age() {
        let s = session(10, 0);
        let later = s.created_at + chrono::Duration::hours(25);
        assert_eq!(s.age(later), chrono::Duration::hours(25));
    }
}
