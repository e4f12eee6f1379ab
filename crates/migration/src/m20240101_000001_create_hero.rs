//! Create `hero` table keyed by the caller-supplied `user_id`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hero::Table)
                    .if_not_exists()
                    .col(string_len(Hero::UserId, 128).primary_key())
                    .col(string_len(Hero::UserName, 255).not_null())
                    .col(string_len(Hero::NameAlias, 255).not_null())
                    .col(string_len(Hero::Company, 255).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Hero::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Hero { Table, UserId, UserName, NameAlias, Company }
