//! Chunked upload coordinator.
//!
//! Orchestrates the session state machine: init (validate, allocate
//! session + temp file), append (bound lookup, overflow pre-check,
//! append-then-persist), complete (re-validate, reconcile against the
//! actual temp length, promote, record the asset, drop the session) and
//! the stale-session sweep. Calls against the same session are serialized
//! through `SessionLocks`; different sessions proceed concurrently.

use super::locks::SessionLocks;
use crate::error::storage_error;
use chrono::{Duration, Utc};
use cutroom_core::models::{Asset, UploadSession};
use cutroom_core::{AppError, Config};
use cutroom_db::{AssetStore, NewAsset, SessionStore};
use cutroom_storage::{keys, Storage};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Size/type limits and the advisory chunk size, fixed at startup.
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub max_size_bytes: u64,
    pub accepted_extension: String,
    pub accepted_mime: String,
    pub chunk_size_bytes: u64,
}

impl UploadLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_size_bytes: config.max_asset_size_bytes,
            accepted_extension: config.accepted_extension.clone(),
            accepted_mime: config.accepted_mime.clone(),
            chunk_size_bytes: config.chunk_size_bytes,
        }
    }

    /// Validate a declared filename and mime against the single accepted
    /// container format.
    pub fn validate_request(&self, filename: &str, mime: &str) -> Result<(), AppError> {
        if filename.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "filename must not be empty".to_string(),
            ));
        }

        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        if extension.as_deref() != Some(self.accepted_extension.as_str()) {
            return Err(AppError::InvalidInput(format!(
                "filename must have a .{} extension",
                self.accepted_extension
            )));
        }

        if !mime.eq_ignore_ascii_case(&self.accepted_mime) {
            return Err(AppError::InvalidInput(format!(
                "mime must be {}",
                self.accepted_mime
            )));
        }

        Ok(())
    }

    /// Validate a declared size against the configured ceiling.
    pub fn validate_size(&self, declared_size: i64) -> Result<(), AppError> {
        if declared_size <= 0 {
            return Err(AppError::PayloadTooLarge(
                "size must be a positive number of bytes".to_string(),
            ));
        }
        if declared_size as u64 > self.max_size_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "{} bytes exceeds maximum {} bytes",
                declared_size, self.max_size_bytes
            )));
        }
        Ok(())
    }
}

/// Progress report returned by a chunk append.
#[derive(Debug, Clone, Copy)]
pub struct ChunkProgress {
    pub received_size: i64,
    pub done: bool,
}

pub struct UploadCoordinator {
    sessions: Arc<dyn SessionStore>,
    assets: Arc<dyn AssetStore>,
    storage: Arc<dyn Storage>,
    limits: UploadLimits,
    locks: SessionLocks,
}

impl UploadCoordinator {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        assets: Arc<dyn AssetStore>,
        storage: Arc<dyn Storage>,
        limits: UploadLimits,
    ) -> Self {
        Self {
            sessions,
            assets,
            storage,
            limits,
            locks: SessionLocks::default(),
        }
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// Start a new upload session. Returns the persisted session and the
    /// advisory chunk size for the client (the server does not require
    /// clients to honor it).
    pub async fn init(
        &self,
        project_id: i64,
        filename: &str,
        declared_size: i64,
        declared_mime: &str,
    ) -> Result<(UploadSession, u64), AppError> {
        self.limits.validate_request(filename, declared_mime)?;
        self.limits.validate_size(declared_size)?;

        let id = Uuid::new_v4();
        let now = Utc::now();
        let session = UploadSession {
            id,
            project_id,
            filename: filename.to_string(),
            mime: self.limits.accepted_mime.clone(),
            total_size: declared_size,
            received_size: 0,
            temp_key: keys::temp_upload_key(id),
            created_at: now,
            updated_at: now,
        };

        self.storage
            .create_empty(&session.temp_key)
            .await
            .map_err(storage_error)?;

        if let Err(err) = self.sessions.create(&session).await {
            // Best-effort temp cleanup; the sweep would reclaim it anyway.
            if let Err(cleanup) = self.storage.remove(&session.temp_key).await {
                tracing::warn!(
                    error = %cleanup,
                    session_id = %session.id,
                    "Failed to remove temp file after session create failure"
                );
            }
            return Err(err);
        }

        tracing::info!(
            session_id = %session.id,
            project_id = project_id,
            filename = %session.filename,
            total_size = declared_size,
            "Created upload session"
        );

        Ok((session, self.limits.chunk_size_bytes))
    }

    /// Append a chunk to a session. The overflow check happens before any
    /// bytes are written, so a rejected chunk never advances stored state.
    pub async fn append(
        &self,
        session_id: Uuid,
        project_id: i64,
        chunk: &[u8],
    ) -> Result<ChunkProgress, AppError> {
        let _guard = self.locks.acquire(session_id).await;

        let session = self
            .sessions
            .get(session_id, project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Upload session not found".to_string()))?;

        if chunk.is_empty() {
            return Err(AppError::InvalidInput(
                "chunk payload must not be empty".to_string(),
            ));
        }

        let new_received = session.received_size + chunk.len() as i64;
        if new_received > session.total_size {
            return Err(AppError::InvalidInput(format!(
                "chunk overflows declared size: {} of {} bytes",
                new_received, session.total_size
            )));
        }

        self.storage
            .append(&session.temp_key, chunk)
            .await
            .map_err(storage_error)?;
        // The bytes are durable; only now does the counter advance. A crash
        // in between is caught by the length cross-check at completion.
        self.sessions.advance(session_id, new_received).await?;

        tracing::debug!(
            session_id = %session_id,
            received_size = new_received,
            total_size = session.total_size,
            "Chunk appended"
        );

        Ok(ChunkProgress {
            received_size: new_received,
            done: new_received == session.total_size,
        })
    }

    /// Promote a fully received session into a permanent asset.
    pub async fn complete(&self, session_id: Uuid, project_id: i64) -> Result<Asset, AppError> {
        let _guard = self.locks.acquire(session_id).await;

        let session = self
            .sessions
            .get(session_id, project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Upload session not found".to_string()))?;

        if !session.done() {
            return Err(AppError::UploadIncomplete(format!(
                "received {} of {} bytes",
                session.received_size, session.total_size
            )));
        }

        // Re-validate against the current configuration: limits may have
        // tightened between init and completion.
        self.limits.validate_request(&session.filename, &session.mime)?;
        self.limits.validate_size(session.total_size)?;

        // Reconcile the persisted counter with the actual temp length
        // before trusting `done`.
        let actual = self
            .storage
            .content_length(&session.temp_key)
            .await
            .map_err(|err| {
                AppError::Integrity(format!(
                    "temp file unreadable for session {}: {}",
                    session_id, err
                ))
            })?;
        if actual != session.total_size as u64 {
            return Err(AppError::Integrity(format!(
                "temp file length {} does not match declared size {} for session {}",
                actual, session.total_size, session_id
            )));
        }

        let storage_key = keys::asset_key(&self.limits.accepted_extension);
        self.storage
            .promote(&session.temp_key, &storage_key)
            .await
            .map_err(storage_error)?;

        let asset = self
            .assets
            .create(NewAsset {
                project_id,
                original_name: session.filename.clone(),
                size: session.total_size,
                mime: session.mime.clone(),
                storage_key,
            })
            .await?;

        // The asset record is durable; everything after this point is
        // cleanup and must not fail the call.
        if let Err(err) = self.sessions.delete(session_id).await {
            tracing::warn!(
                error = %err,
                session_id = %session_id,
                "Failed to delete session record after promotion"
            );
        }
        if let Err(err) = self.storage.remove(&session.temp_key).await {
            tracing::warn!(
                error = %err,
                session_id = %session_id,
                "Failed to delete temp file during cleanup"
            );
        }

        drop(_guard);
        self.locks.discard(session_id).await;

        tracing::info!(
            session_id = %session_id,
            asset_id = asset.id,
            project_id = project_id,
            size = asset.size,
            "Chunked upload completed"
        );

        Ok(asset)
    }

    /// Delete sessions older than the retention threshold together with
    /// their temp files. Returns the number of sessions removed.
    pub async fn sweep_stale(&self, retention: Duration) -> Result<usize, AppError> {
        let now = Utc::now();
        let cutoff = now - retention;
        let stale = self.sessions.stale(cutoff).await?;

        let mut removed = 0;
        for session in stale {
            let guard = self.locks.acquire(session.id).await;
            self.sessions.delete(session.id).await?;
            if let Err(err) = self.storage.remove(&session.temp_key).await {
                tracing::warn!(
                    error = %err,
                    session_id = %session.id,
                    "Failed to delete temp file for stale session"
                );
            }
            drop(guard);
            self.locks.discard(session.id).await;

            tracing::debug!(
                session_id = %session.id,
                age_hours = session.age(now).num_hours(),
                "Removed stale upload session"
            );
            removed += 1;
        }

        if removed > 0 {
            tracing::info!(count = removed, "Swept stale upload sessions");
        }

        Ok(removed)
    }
}
