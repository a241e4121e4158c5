//! In-memory collaborator stores for driving the upload pipeline and the
//! auth gate without a database.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use cutroom_api::services::upload::{UploadCoordinator, UploadLimits};
use cutroom_core::models::{Asset, Member, UploadSession};
use cutroom_core::AppError;
use cutroom_db::{AssetStore, MemberDirectory, NewAsset, SessionStore};
use cutroom_storage::LocalStorage;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use uuid::Uuid;

/// In-memory session store.
#[derive(Default)]
pub struct MockSessionStore {
    sessions: Mutex<HashMap<Uuid, UploadSession>>,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a session regardless of project binding.
    pub fn snapshot(&self, id: Uuid) -> Option<UploadSession> {
        self.sessions.lock().unwrap().get(&id).cloned()
    }

    pub fn count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Shift a session's creation time into the past (for sweep tests).
    pub fn backdate(&self, id: Uuid, by: Duration) {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.get_mut(&id) {
            session.created_at = session.created_at - by;
        }
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn create(&self, session: &UploadSession) -> Result<(), AppError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid, project_id: i64) -> Result<Option<UploadSession>, AppError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(&id)
            .filter(|s| s.project_id == project_id)
            .cloned())
    }

    async fn advance(&self, id: Uuid, received_size: i64) -> Result<(), AppError> {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.get_mut(&id) {
            session.received_size = received_size;
            session.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<UploadSession>, AppError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.created_at < cutoff)
            .cloned()
            .collect())
    }
}

/// In-memory asset store with a sequential id counter.
#[derive(Default)]
pub struct MockAssetStore {
    assets: Mutex<Vec<Asset>>,
    next_id: AtomicI64,
}

impl MockAssetStore {
    pub fn new() -> Self {
        Self {
            assets: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn all(&self) -> Vec<Asset> {
        self.assets.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetStore for MockAssetStore {
    async fn create(&self, asset: NewAsset) -> Result<Asset, AppError> {
        let asset = Asset {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            project_id: asset.project_id,
            original_name: asset.original_name,
            size: asset.size,
            mime: asset.mime,
            storage_key: asset.storage_key,
            created_at: Utc::now(),
        };
        self.assets.lock().unwrap().push(asset.clone());
        Ok(asset)
    }
}

/// In-memory member directory.
#[derive(Default)]
pub struct MockMemberDirectory {
    members: Mutex<HashMap<i64, Member>>,
}

impl MockMemberDirectory {
    pub fn with_member(member: Member) -> Self {
        let directory = Self::default();
        directory
            .members
            .lock()
            .unwrap()
            .insert(member.id, member);
        directory
    }
}

#[async_trait]
impl MemberDirectory for MockMemberDirectory {
    async fn member_by_id(&self, id: i64) -> Result<Option<Member>, AppError> {
        Ok(self.members.lock().unwrap().get(&id).cloned())
    }
}

pub fn test_member(id: i64) -> Member {
    let now = Utc::now();
    Member {
        id,
        email: format!("member{}@example.com", id),
        name: "Test Member".to_string(),
        password_digest: "pbkdf2_sha256$1000$c2FsdA$aGFzaA".to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn test_limits() -> UploadLimits {
    UploadLimits {
        max_size_bytes: 50 * 1024 * 1024,
        accepted_extension: "mp4".to_string(),
        accepted_mime: "video/mp4".to_string(),
        chunk_size_bytes: 1024 * 1024,
    }
}

/// Everything the upload tests need, backed by a tempdir that must stay
/// alive for the duration of the test.
pub struct UploadFixture {
    pub coordinator: Arc<UploadCoordinator>,
    pub sessions: Arc<MockSessionStore>,
    pub assets: Arc<MockAssetStore>,
    pub storage: Arc<LocalStorage>,
    pub _dir: TempDir,
}

pub async fn upload_fixture() -> UploadFixture {
    upload_fixture_with_limits(test_limits()).await
}

pub async fn upload_fixture_with_limits(limits: UploadLimits) -> UploadFixture {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(
        LocalStorage::new(dir.path(), "http://localhost:4000/media".to_string())
            .await
            .unwrap(),
    );
    let sessions = Arc::new(MockSessionStore::new());
    let assets = Arc::new(MockAssetStore::new());
    let coordinator = Arc::new(UploadCoordinator::new(
        sessions.clone(),
        assets.clone(),
        storage.clone(),
        limits,
    ));

    UploadFixture {
        coordinator,
        sessions,
        assets,
        storage,
        _dir: dir,
    }
}
