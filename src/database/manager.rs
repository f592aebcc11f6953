use std::sync::Arc;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::{AppConfig, StorageBackend};
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::store::{Store, StoreError};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Builds the storage handle injected into the router
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open the configured store. Postgres pools connect lazily so the
    /// process can start (and report degraded health) without a database.
    pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn Store>, StoreError> {
        match config.database.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage backend");
                Ok(Arc::new(MemoryStore::new()))
            }
            StorageBackend::Postgres => {
                let pool = Self::connect(config)?;
                if config.database.run_migrations {
                    Self::migrate(&pool).await?;
                }
                Ok(Arc::new(PgStore::new(pool)))
            }
        }
    }

    /// Create the Postgres pool from DATABASE_URL
    pub fn connect(config: &AppConfig) -> Result<PgPool, StoreError> {
        let connection_string = Self::connection_string(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout))
            .connect_lazy(&connection_string)?;

        info!(
            "Created database pool for: {}",
            config.redacted_database_url().unwrap_or_default()
        );
        Ok(pool)
    }

    /// Apply pending migrations from ./migrations
    pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
        MIGRATOR.run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    fn connection_string(config: &AppConfig) -> Result<String, StoreError> {
        let raw = config
            .database
            .url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        let url = url::Url::parse(raw).map_err(|e| StoreError::InvalidDatabaseUrl(e.to_string()))?;
        match url.scheme() {
            "postgres" | "postgresql" => Ok(url.into()),
            other => Err(StoreError::InvalidDatabaseUrl(format!(
                "unsupported scheme '{}'",
                other
            ))),
        }
    }
}
