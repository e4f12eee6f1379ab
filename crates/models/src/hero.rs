//! The hero record: the only resource this service manages.
//!
//! `Model` doubles as the domain type for every storage backend; the SeaORM
//! derive only matters to the database backend. Serialized with the camelCase
//! names clients see (`userId`, `userName`, `nameAlias`, `company`).
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "hero")]
#[serde(rename_all = "camelCase")]
#[schema(as = Hero)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub user_name: String,
    pub name_alias: String,
    pub company: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub type Hero = Model;

impl Model {
    pub fn new(
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        name_alias: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            name_alias: name_alias.into(),
            company: company.into(),
        }
    }

    /// Overwrite only the fields the patch carries.
    pub fn apply(&mut self, patch: &HeroPatch) {
        if let Some(v) = &patch.user_name {
            self.user_name = v.clone();
        }
        if let Some(v) = &patch.name_alias {
            self.name_alias = v.clone();
        }
        if let Some(v) = &patch.company {
            self.company = v.clone();
        }
    }
}

/// Partial update. `None` means "keep the stored value".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroPatch {
    pub user_name: Option<String>,
    pub name_alias: Option<String>,
    pub company: Option<String>,
}

impl HeroPatch {
    pub fn is_empty(&self) -> bool {
        self.user_name.is_none() && self.name_alias.is_none() && self.company.is_none()
    }

    /// Supplied fields as `(hash field, value)` pairs, named as stored in Redis.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::with_capacity(3);
        if let Some(v) = &self.user_name {
            out.push(("userName", v.clone()));
        }
        if let Some(v) = &self.name_alias {
            out.push(("nameAlias", v.clone()));
        }
        if let Some(v) = &self.company {
            out.push(("company", v.clone()));
        }
        out
    }

    /// Active model for a partial `UPDATE`: supplied columns are `Set`, the rest
    /// stay `NotSet` and are left out of the statement.
    pub fn into_active_model(self, user_id: &str) -> ActiveModel {
        let mut am = ActiveModel {
            user_id: Set(user_id.to_string()),
            ..Default::default()
        };
        if let Some(v) = self.user_name {
            am.user_name = Set(v);
        }
        if let Some(v) = self.name_alias {
            am.name_alias = Set(v);
        }
        if let Some(v) = self.company {
            am.company = Set(v);
        }
        am
    }
}
