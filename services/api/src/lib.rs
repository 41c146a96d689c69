//! Marketplace API service
//!
//! JSON REST API over accounts, the service catalog, bookings, portfolios,
//! messaging and job postings. [`build_state`] wires the configured storage
//! and session backends; [`routes::create_router`] serves them.

use anyhow::Result;
use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool},
};
use std::sync::Arc;
use tracing::info;

pub mod config;
pub mod error;
pub mod password;
pub mod routes;
pub mod seed;
pub mod session;
pub mod state;
pub mod storage;
pub mod validation;

use crate::{
    config::{AppConfig, SessionBackend, StorageBackend},
    session::{MemorySessionStore, RedisSessionStore, SessionStore},
    state::AppState,
    storage::{MemoryStorage, PostgresStorage, Storage},
};

async fn build_storage(config: &AppConfig) -> Result<Arc<dyn Storage>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Ok(Arc::new(MemoryStorage::new()))
        }
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;
            if !health_check(&pool).await? {
                anyhow::bail!("Failed to connect to database");
            }
            info!("Database connection successful");

            let storage = PostgresStorage::new(pool);
            storage.migrate().await?;
            Ok(Arc::new(storage))
        }
    }
}

async fn build_sessions(config: &AppConfig) -> Result<Arc<dyn SessionStore>> {
    let ttl = config.session.ttl_seconds;
    match config.session.backend {
        SessionBackend::Memory => Ok(Arc::new(MemorySessionStore::new(ttl))),
        SessionBackend::Redis => {
            let redis_pool = RedisPool::new(&RedisConfig::from_env()?).await?;
            if !redis_pool.health_check().await? {
                anyhow::bail!("Failed to connect to Redis");
            }
            info!("Redis connection successful");
            Ok(Arc::new(RedisSessionStore::new(redis_pool, ttl)))
        }
    }
}

/// Connect the configured backends and seed defaults when enabled
pub async fn build_state(config: AppConfig) -> Result<AppState> {
    let storage = build_storage(&config).await?;
    let sessions = build_sessions(&config).await?;

    if config.storage.seed {
        seed::seed_defaults(storage.as_ref()).await?;
    }

    Ok(AppState::new(storage, sessions, config))
}
