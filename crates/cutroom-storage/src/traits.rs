//! Storage abstraction trait
//!
//! This module defines the Storage trait that storage backends must
//! implement. The upload coordinator only ever talks to this trait, so a
//! different backend can be swapped in without touching the pipeline.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Temp files underlying upload sessions are written through `create_empty`
/// and `append` (append-only, never rewritten in place); completed uploads
/// are moved into permanent storage with `promote`. `content_length` reports
/// the actual on-disk byte count and is the reconciliation primitive for
/// the upload pipeline.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create an empty file at the given key, creating parent directories.
    async fn create_empty(&self, storage_key: &str) -> StorageResult<()>;

    /// Append bytes to the file at the given key and return its new length.
    async fn append(&self, storage_key: &str, data: &[u8]) -> StorageResult<u64>;

    /// Write a whole file at the given key (single-shot uploads).
    async fn put(&self, storage_key: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Read the whole file at the given key.
    async fn read(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Copy the bytes at `from_key` into permanent storage at `to_key`.
    /// The source is left in place; callers remove it separately so a
    /// failure between the two steps never loses data.
    async fn promote(&self, from_key: &str, to_key: &str) -> StorageResult<()>;

    /// Delete a file. Deleting a missing file is not an error.
    async fn remove(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the size in bytes of a file, if it exists.
    async fn content_length(&self, storage_key: &str) -> StorageResult<u64>;

    /// Public URL for the file at the given key.
    fn url_for(&self, storage_key: &str) -> String;
}
