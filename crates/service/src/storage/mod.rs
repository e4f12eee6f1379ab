//! Storage backends for heroes.
//!
//! Every backend implements [`HeroStore`]; [`connect`] picks one from config.

use std::sync::Arc;

use async_trait::async_trait;
use configs::{AppConfig, StorageBackend};
use models::{Hero, HeroPatch};
use tracing::info;

use crate::errors::ServiceError;

pub mod memory;
pub mod redis_store;
pub mod seaorm;

pub use memory::MemoryHeroStore;
pub use redis_store::RedisHeroStore;
pub use seaorm::SeaOrmHeroStore;

/// Uniform CRUD contract over heroes keyed by `user_id`.
///
/// Implementations can be in-memory, Redis, or relational. Lists are ordered by
/// `user_id` so every backend enumerates the same way.
#[async_trait]
pub trait HeroStore: Send + Sync {
    /// Which backend this is, for logs and metrics.
    fn backend(&self) -> StorageBackend;

    async fn list_all(&self) -> Result<Vec<Hero>, ServiceError>;

    async fn get(&self, user_id: &str) -> Result<Option<Hero>, ServiceError>;

    /// Insert or fully replace the record stored under `hero.user_id`.
    async fn put(&self, hero: Hero) -> Result<(), ServiceError>;

    /// Overwrite the supplied fields of an existing record and return the result.
    /// Fails with [`ServiceError::NotFound`] when nothing is stored under `user_id`.
    async fn patch(&self, user_id: &str, patch: HeroPatch) -> Result<Hero, ServiceError>;

    /// Remove the record; returns whether it existed. Absent keys are not an error.
    async fn delete(&self, user_id: &str) -> Result<bool, ServiceError>;
}

/// Build the backend selected by `cfg.storage.backend`.
pub async fn connect(cfg: &AppConfig) -> Result<Arc<dyn HeroStore>, ServiceError> {
    let backend = cfg.storage.backend;
    let store: Arc<dyn HeroStore> = match backend {
        StorageBackend::Memory => Arc::new(MemoryHeroStore::new()),
        StorageBackend::Redis => {
            if cfg.redis.url.trim().is_empty() {
                return Err(ServiceError::Config("redis.url is empty".into()));
            }
            Arc::new(RedisHeroStore::connect(&cfg.redis.url, cfg.redis.key_prefix.clone()).await?)
        }
        StorageBackend::Database => {
            if cfg.database.url.trim().is_empty() {
                return Err(ServiceError::Config("database.url is empty".into()));
            }
            let db_cfg = models::db::DatabaseConfig::from(&cfg.database);
            Arc::new(SeaOrmHeroStore::connect(&db_cfg).await?)
        }
    };
    info!(%backend, "hero store ready");
    Ok(store)
}

fn sort_by_id(heroes: &mut [Hero]) {
    heroes.sort_by(|a, b| a.user_id.cmp(&b.user_id));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_defaults_to_memory() -> Result<(), ServiceError> {
        let store = connect(&AppConfig::default()).await?;
        assert_eq!(store.backend(), StorageBackend::Memory);
        assert!(store.list_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn connect_rejects_missing_urls() {
        let mut cfg = AppConfig::default();
        cfg.storage.backend = StorageBackend::Redis;
        assert!(matches!(connect(&cfg).await, Err(ServiceError::Config(_))));
        cfg.storage.backend = StorageBackend::Database;
        assert!(matches!(connect(&cfg).await, Err(ServiceError::Config(_))));
    }

    #[tokio::test]
    async fn connect_database_on_sqlite() -> Result<(), ServiceError> {
        let mut cfg = AppConfig::default();
        cfg.storage.backend = StorageBackend::Database;
        cfg.database.url = "sqlite::memory:".into();
        cfg.database.max_connections = 1;
        cfg.database.min_connections = 1;
        let store = connect(&cfg).await?;
        assert_eq!(store.backend(), StorageBackend::Database);
        Ok(())
    }
}
