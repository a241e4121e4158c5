//! Application assembly: database, storage, services, background sweep
//! and the router.

pub mod database;
pub mod routes;

use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenService;
use crate::services::upload::{UploadCoordinator, UploadLimits};
use crate::state::{AppState, AuthServices, DbState};
use axum::Router;
use cutroom_core::Config;
use cutroom_db::{
    AssetRepository, HistoryRepository, MemberRepository, ProjectRepository,
    UploadSessionRepository,
};
use cutroom_storage::{LocalStorage, Storage};
use std::sync::Arc;

pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    let pool = database::connect(&config).await?;
    cutroom_db::MIGRATOR.run(&pool).await?;
    tracing::info!("Database migrations applied");

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(config.storage_path.clone(), config.storage_base_url.clone())
            .await
            .map_err(|e| anyhow::anyhow!("failed to initialize storage: {}", e))?,
    );

    let members = MemberRepository::new(pool.clone());
    let projects = ProjectRepository::new(pool.clone());
    let assets = AssetRepository::new(pool.clone());
    let history = HistoryRepository::new(pool.clone());
    let sessions = UploadSessionRepository::new(pool.clone());

    let coordinator = Arc::new(UploadCoordinator::new(
        Arc::new(sessions),
        Arc::new(assets.clone()),
        storage.clone(),
        UploadLimits::from_config(&config),
    ));

    spawn_stale_session_sweep(coordinator.clone(), &config);

    let state = Arc::new(AppState {
        db: DbState {
            pool,
            members,
            projects,
            assets,
            history,
        },
        auth: AuthServices {
            password: PasswordHasher::new(config.password_iterations),
            tokens: TokenService::new(config.secret_key.clone().into_bytes()),
        },
        storage,
        uploads: coordinator,
        config,
    });

    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}

/// Background reclamation of abandoned upload sessions and their temp
/// files.
fn spawn_stale_session_sweep(coordinator: Arc<UploadCoordinator>, config: &Config) {
    let interval_secs = config.upload_sweep_interval_secs.max(1);
    let retention = chrono::Duration::hours(config.upload_retention_hours);

    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(interval_secs));
        loop {
            interval.tick().await;
            if let Err(err) = coordinator.sweep_stale(retention).await {
                tracing::warn!(error = %err, "Stale upload session sweep failed");
            }
        }
    });
}
