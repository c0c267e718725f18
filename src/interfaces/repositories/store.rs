use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::{
    db::postgres::{create_pool, run_migrations},
    errors::AppError,
    repositories::{
        contact::ContactRepository, memory::MemoryStore, project::ProjectRepository,
        sqlx_repo::SqlxRepo,
    },
    settings::{AppConfig, StorageBackend},
};

/// The persistence boundary for every resource the API serves.
#[async_trait]
pub trait DataStore: ProjectRepository + ContactRepository {
    fn backend(&self) -> StorageBackend;
    async fn check_connection(&self) -> Result<(), AppError>;
}

pub type SharedStore = Arc<dyn DataStore>;

#[async_trait]
impl DataStore for SqlxRepo {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Postgres
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Memory
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Opens the configured store once at start-up.
///
/// Returns `None` when the store is unconfigured or unreachable; the API
/// then answers 503 on every store-backed endpoint instead of exiting.
pub async fn connect_store(config: &AppConfig) -> Option<SharedStore> {
    match config.storage_backend {
        StorageBackend::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            Some(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let Some(url) = config.database_url.as_deref() else {
                warn!("APP_DATABASE_URL is not set; project and contact endpoints are unavailable");
                return None;
            };

            match open_postgres(url, config).await {
                Ok(repo) => {
                    info!("PostgreSQL store ready");
                    Some(Arc::new(repo))
                }
                Err(e) => {
                    error!("PostgreSQL store unavailable: {:#}", e);
                    None
                }
            }
        }
    }
}

async fn open_postgres(url: &str, config: &AppConfig) -> anyhow::Result<SqlxRepo> {
    let pool = create_pool(url, config.database_max_connections).await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
    }
    Ok(SqlxRepo::new(pool))
}
