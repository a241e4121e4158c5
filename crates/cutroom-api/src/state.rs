//! Application state shared across handlers.

use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenService;
use crate::services::upload::UploadCoordinator;
use cutroom_core::Config;
use cutroom_db::{AssetRepository, HistoryRepository, MemberRepository, ProjectRepository};
use cutroom_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Database pool and repositories.
pub struct DbState {
    pub pool: PgPool,
    pub members: MemberRepository,
    pub projects: ProjectRepository,
    pub assets: AssetRepository,
    pub history: HistoryRepository,
}

/// Authentication services: password stretching and token signing. The
/// signing secret lives inside `TokenService` and is injected once at
/// startup.
pub struct AuthServices {
    pub password: PasswordHasher,
    pub tokens: TokenService,
}

/// Main application state, handed to handlers as `Arc<AppState>`.
pub struct AppState {
    pub config: Config,
    pub db: DbState,
    pub auth: AuthServices,
    pub storage: Arc<dyn Storage>,
    pub uploads: Arc<UploadCoordinator>,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
