//! Per-session mutual exclusion.
//!
//! Chunk appends read-modify-write the received counter and append to the
//! temp file; calls touching the same session must be serialized, while
//! different sessions must not block each other. Locks are keyed by
//! session id and discarded when the session goes away.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Default)]
pub struct SessionLocks {
    inner: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    /// Acquire the lock for a session, creating it on first use.
    pub async fn acquire(&self, session_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(session_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Drop the lock entry for a removed session.
    pub async fn discard(&self, session_id: Uuid) {
        self.inner.lock().await.remove(&session_id);
    }
}
