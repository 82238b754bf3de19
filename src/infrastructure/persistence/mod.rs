//! Mapping store implementations and their construction.
//!
//! - [`PgMappingStore`] - PostgreSQL via SQLx, migrations embedded at build time
//! - [`MemoryMappingStore`] - in-process store for development and tests

pub mod memory_mapping_store;
pub mod pg_mapping_store;

pub use memory_mapping_store::MemoryMappingStore;
pub use pg_mapping_store::PgMappingStore;

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, StoreBackend};
use crate::domain::repositories::MappingStore;

/// Opens the PostgreSQL pool configured in `config` and applies migrations.
///
/// Connection establishment is bounded by `db_connect_timeout`.
pub async fn connect_pg_pool(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres store backend")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}

/// Builds the process-wide store handle selected by `config.store_backend`.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn MappingStore>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let pool = connect_pg_pool(config).await?;
            Ok(Arc::new(PgMappingStore::new(Arc::new(pool))))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; mappings are lost on restart");
            Ok(Arc::new(MemoryMappingStore::new()))
        }
    }
}
