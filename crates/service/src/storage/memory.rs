use std::collections::HashMap;

use async_trait::async_trait;
use configs::StorageBackend;
use models::{Hero, HeroPatch};
use tokio::sync::RwLock;

use super::{sort_by_id, HeroStore};
use crate::errors::ServiceError;

/// Process-local hero map guarded by an async `RwLock`.
///
/// Nothing survives a restart. Writers to the same id still race at the HTTP
/// level (last write wins), but each single operation is atomic.
#[derive(Default)]
pub struct MemoryHeroStore {
    inner: RwLock<HashMap<String, Hero>>,
}

impl MemoryHeroStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, e.g. for tests or demos.
    pub fn with_heroes(heroes: impl IntoIterator<Item = Hero>) -> Self {
        let map = heroes.into_iter().map(|h| (h.user_id.clone(), h)).collect();
        Self { inner: RwLock::new(map) }
    }
}

#[async_trait]
impl HeroStore for MemoryHeroStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Memory
    }

    async fn list_all(&self) -> Result<Vec<Hero>, ServiceError> {
        let map = self.inner.read().await;
        let mut heroes: Vec<Hero> = map.values().cloned().collect();
        drop(map);
        sort_by_id(&mut heroes);
        Ok(heroes)
    }

    async fn get(&self, user_id: &str) -> Result<Option<Hero>, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.get(user_id).cloned())
    }

    async fn put(&self, hero: Hero) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        map.insert(hero.user_id.clone(), hero);
        Ok(())
    }

    async fn patch(&self, user_id: &str, patch: HeroPatch) -> Result<Hero, ServiceError> {
        let mut map = self.inner.write().await;
        let hero = map.get_mut(user_id).ok_or_else(|| ServiceError::not_found("hero"))?;
        hero.apply(&patch);
        Ok(hero.clone())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        Ok(map.remove(user_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::contract;

    #[tokio::test]
    async fn memory_store_contract() -> Result<(), anyhow::Error> {
        contract::put_then_list_keeps_all_fields(&MemoryHeroStore::new()).await?;
        contract::put_overwrites(&MemoryHeroStore::new()).await?;
        contract::patch_keeps_omitted_fields(&MemoryHeroStore::new()).await?;
        contract::patch_missing_is_not_found(&MemoryHeroStore::new()).await?;
        contract::delete_is_idempotent(&MemoryHeroStore::new()).await?;
        Ok(())
    }

    #[tokio::test]
    async fn list_is_sorted_by_id() -> Result<(), anyhow::Error> {
        let store = MemoryHeroStore::with_heroes([
            Hero::new("thor", "Thor Odinson", "Thor", "Asgard"),
            Hero::new("bruceb", "Bruce Banner", "Hulk", "Culver University"),
            Hero::new("steve", "Steve Rogers", "Captain America", "SHIELD"),
        ]);
        let ids: Vec<String> = store.list_all().await?.into_iter().map(|h| h.user_id).collect();
        assert_eq!(ids, ["bruceb", "steve", "thor"]);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_puts_on_distinct_ids_all_land() -> Result<(), anyhow::Error> {
        let store = std::sync::Arc::new(MemoryHeroStore::new());
        let mut tasks = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.put(Hero::new(format!("hero-{i}"), "name", "alias", "company")).await
            }));
        }
        for t in tasks {
            t.await??;
        }
        assert_eq!(store.list_all().await?.len(), 32);
        Ok(())
    }
}
