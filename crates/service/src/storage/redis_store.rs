use std::collections::HashMap;

use async_trait::async_trait;
use configs::StorageBackend;
use models::{Hero, HeroPatch};
use redis::{aio::ConnectionManager, AsyncCommands};
use tracing::{debug, warn};

use super::{sort_by_id, HeroStore};
use crate::errors::ServiceError;

const FIELD_USER_ID: &str = "userId";
const FIELD_USER_NAME: &str = "userName";
const FIELD_NAME_ALIAS: &str = "nameAlias";
const FIELD_COMPANY: &str = "company";

/// Redis-backed store: one hash per hero at `<prefix>:<user_id>`.
///
/// The `ConnectionManager` is a single multiplexed connection that reconnects on
/// failure; clones share it, so every call just clones the handle.
#[derive(Clone)]
pub struct RedisHeroStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisHeroStore {
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, ServiceError> {
        let client = redis::Client::open(url).map_err(ServiceError::db)?;
        let conn = ConnectionManager::new(client).await.map_err(ServiceError::db)?;
        Ok(Self { conn, prefix: prefix.into() })
    }

    fn key(&self, user_id: &str) -> String {
        format!("{}:{}", self.prefix, user_id)
    }

    fn pattern(&self) -> String {
        format!("{}:*", self.prefix)
    }

    /// Strip the namespace off a stored key.
    fn id_from_key<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(&self.prefix)
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(key)
    }

    async fn load(&self, key: &str) -> Result<Option<Hero>, ServiceError> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> = conn.hgetall(key).await.map_err(ServiceError::db)?;
        Ok(hero_from_fields(self.id_from_key(key), fields))
    }
}

/// An empty hash means the key does not exist.
fn hero_from_fields(fallback_id: &str, mut fields: HashMap<String, String>) -> Option<Hero> {
    if fields.is_empty() {
        return None;
    }
    let user_id = fields.remove(FIELD_USER_ID).unwrap_or_else(|| fallback_id.to_string());
    Some(Hero {
        user_id,
        user_name: fields.remove(FIELD_USER_NAME).unwrap_or_default(),
        name_alias: fields.remove(FIELD_NAME_ALIAS).unwrap_or_default(),
        company: fields.remove(FIELD_COMPANY).unwrap_or_default(),
    })
}

#[async_trait]
impl HeroStore for RedisHeroStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Redis
    }

    async fn list_all(&self) -> Result<Vec<Hero>, ServiceError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn.keys(self.pattern()).await.map_err(ServiceError::db)?;
        let mut heroes = Vec::with_capacity(keys.len());
        for key in &keys {
            // deleted between KEYS and HGETALL
            match self.load(key).await? {
                Some(hero) => heroes.push(hero),
                None => debug!(%key, "hero vanished during list"),
            }
        }
        sort_by_id(&mut heroes);
        Ok(heroes)
    }

    async fn get(&self, user_id: &str) -> Result<Option<Hero>, ServiceError> {
        self.load(&self.key(user_id)).await
    }

    async fn put(&self, hero: Hero) -> Result<(), ServiceError> {
        let mut conn = self.conn.clone();
        let key = self.key(&hero.user_id);
        let items = [
            (FIELD_USER_ID, hero.user_id),
            (FIELD_USER_NAME, hero.user_name),
            (FIELD_NAME_ALIAS, hero.name_alias),
            (FIELD_COMPANY, hero.company),
        ];
        let _: () = conn.hset_multiple(&key, items.as_slice()).await.map_err(ServiceError::db)?;
        Ok(())
    }

    async fn patch(&self, user_id: &str, patch: HeroPatch) -> Result<Hero, ServiceError> {
        let mut conn = self.conn.clone();
        let key = self.key(user_id);
        let exists: bool = conn.exists(&key).await.map_err(ServiceError::db)?;
        if !exists {
            return Err(ServiceError::not_found("hero"));
        }

        let mut items = patch.fields();
        items.push((FIELD_USER_ID, user_id.to_string()));
        let _: () = conn.hset_multiple(&key, items.as_slice()).await.map_err(ServiceError::db)?;

        // A concurrent DEL can slip in between EXISTS and HSET; the HSET then
        // recreates a partial hash, which is the documented last-write-wins race.
        self.load(&key).await?.ok_or_else(|| {
            warn!(%key, "hero disappeared right after patch");
            ServiceError::not_found("hero")
        })
    }

    async fn delete(&self, user_id: &str) -> Result<bool, ServiceError> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(self.key(user_id)).await.map_err(ServiceError::db)?;
        Ok(removed > 0)
    }
}
