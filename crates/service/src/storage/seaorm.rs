use async_trait::async_trait;
use configs::StorageBackend;
use models::{
    db::{connect_and_migrate, DatabaseConfig},
    hero, Hero, HeroPatch,
};
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};

use super::HeroStore;
use crate::errors::ServiceError;

/// SeaORM-backed store: one row per hero in table `hero`.
///
/// Holds the pooled `DatabaseConnection`; handlers never see pool mechanics.
pub struct SeaOrmHeroStore {
    pub db: DatabaseConnection,
}

impl SeaOrmHeroStore {
    /// Connect with the given pool settings and create the table if needed.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, ServiceError> {
        let db = connect_and_migrate(cfg).await?;
        Ok(Self { db })
    }
}

#[async_trait]
impl HeroStore for SeaOrmHeroStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Database
    }

    async fn list_all(&self) -> Result<Vec<Hero>, ServiceError> {
        hero::Entity::find()
            .order_by_asc(hero::Column::UserId)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)
    }

    async fn get(&self, user_id: &str) -> Result<Option<Hero>, ServiceError> {
        hero::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await
            .map_err(ServiceError::db)
    }

    async fn put(&self, hero: Hero) -> Result<(), ServiceError> {
        let am = hero::ActiveModel {
            user_id: Set(hero.user_id),
            user_name: Set(hero.user_name),
            name_alias: Set(hero.name_alias),
            company: Set(hero.company),
        };
        hero::Entity::insert(am)
            .on_conflict(
                OnConflict::column(hero::Column::UserId)
                    .update_columns([
                        hero::Column::UserName,
                        hero::Column::NameAlias,
                        hero::Column::Company,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(())
    }

    async fn patch(&self, user_id: &str, patch: HeroPatch) -> Result<Hero, ServiceError> {
        let found = self.get(user_id).await?.ok_or_else(|| ServiceError::not_found("hero"))?;
        if patch.is_empty() {
            return Ok(found);
        }
        match patch.into_active_model(user_id).update(&self.db).await {
            Ok(updated) => Ok(updated),
            // deleted between the lookup and the UPDATE
            Err(DbErr::RecordNotUpdated) => Err(ServiceError::not_found("hero")),
            Err(e) => Err(ServiceError::db(e)),
        }
    }

    async fn delete(&self, user_id: &str) -> Result<bool, ServiceError> {
        let res = hero::Entity::delete_by_id(user_id.to_string())
            .exec(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(res.rows_affected > 0)
    }
}
