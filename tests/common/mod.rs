#![allow(dead_code)]

use sea_orm::{ActiveValue, Database, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;

pub mod page_entity;
pub mod page_set;

/// Fresh in-memory database with the pages table and three seeded rows,
/// `"Page #0"` through `"Page #2"` with descending priorities.
pub async fn setup_page_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    Migrator::up(&db, None).await?;

    use sea_orm::ActiveModelTrait;
    for n in 0..3 {
        page_entity::ActiveModel {
            name: ActiveValue::Set(format!("Page #{n}")),
            priority: ActiveValue::Set(2 - n),
            ..Default::default()
        }
        .insert(&db)
        .await?;
    }

    Ok(db)
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreatePageTable)]
    }
}

pub struct CreatePageTable;

impl MigrationName for CreatePageTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_page_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreatePageTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pages::Table)
                    .col(
                        ColumnDef::new(Pages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pages::Name).text().not_null())
                    .col(ColumnDef::new(Pages::Priority).integer().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Pages {
    Table,
    Id,
    Name,
    Priority,
}
