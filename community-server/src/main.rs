use anyhow::{Context, Result};
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::seed::seed_defaults;
use data::repositories::Repositories;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::settings::{Settings, StorageBackend};
use presentation::{AppState, RuntimeInfo};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let repos = match settings.storage_backend {
        StorageBackend::Memory => Repositories::memory(),
        StorageBackend::Sqlite => {
            let pool = create_pool(&settings.database_url).await?;
            run_migrations(&pool).await?;
            Repositories::sqlite(pool)
        }
    };
    info!("storage backend: {}", settings.storage_backend);

    let state = AppState::new(
        repos,
        RuntimeInfo {
            environment: settings.environment.clone(),
            storage: settings.storage_backend,
        },
    );

    if let Some(admin_id) = settings.admin_telegram_id {
        seed_defaults(&*state.post_service, &*state.user_service, admin_id)
            .await
            .context("failed to seed default data")?;
        info!("admin telegram id: {admin_id}");
    }

    server::run_http(&settings, state).await
}
