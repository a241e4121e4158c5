//! Storage abstraction for Cutroom.
//!
//! The `Storage` trait is the seam between the upload pipeline and the
//! filesystem; `LocalStorage` is the local-disk backend. Keys are
//! forward-slash separated relative paths (`tmp/uploads/...`,
//! `videos/...`); see `keys` for the derivation rules.

pub mod keys;
mod local;
mod traits;

pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
