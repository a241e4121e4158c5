//! Postgres persistence for Cutroom.
//!
//! Concrete repositories run dynamic (non-macro) queries so builds do not
//! require a live DATABASE_URL. The collaborator traits in `traits` are
//! the seams the auth gate and the upload coordinator depend on; the
//! concrete repositories implement them, and tests substitute in-memory
//! stores.

pub mod db;
pub mod traits;

pub use db::{
    AssetRepository, HistoryRepository, MemberRepository, ProjectRepository,
    UploadSessionRepository,
};
pub use traits::{AssetStore, MemberDirectory, NewAsset, SessionStore};

/// Embedded schema migrations, applied at startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
