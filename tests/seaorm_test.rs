//! End-to-end scenarios over the bundled Sea-ORM adapter and SQLite.

mod common;

use common::page_entity;
use fetchcrate::{
    EntityProvider, Fetcher, FetcherConfig, FilterDefinition, Predicate, RawParams, SortDefinition,
};
use sea_orm::DbErr;

fn pages_fetcher() -> Fetcher<EntityProvider<page_entity::Entity>> {
    let config = FetcherConfig::builder()
        .filter(FilterDefinition::new("name").predicates([
            Predicate::Eq,
            Predicate::In,
            Predicate::Cont,
        ]))
        .filter(FilterDefinition::new("priority").predicates([
            Predicate::Eq,
            Predicate::Gte,
            Predicate::Lte,
        ]))
        .sort(SortDefinition::new("name"))
        .sort(SortDefinition::new("priority"))
        .build()
        .unwrap();
    Fetcher::new(EntityProvider::new(), &config).unwrap()
}

async fn names(
    select: sea_orm::Select<page_entity::Entity>,
    db: &sea_orm::DatabaseConnection,
) -> Result<Vec<String>, DbErr> {
    Ok(select
        .all(db)
        .await?
        .into_iter()
        .map(|page| page.name)
        .collect())
}

#[tokio::test]
async fn sorts_pages_by_name() -> Result<(), DbErr> {
    let db = common::setup_page_db().await?;
    let select = pages_fetcher()
        .call(RawParams::new().with_sort("name"))
        .success()
        .unwrap();
    assert_eq!(
        names(select, &db).await?,
        vec!["Page #0", "Page #1", "Page #2"]
    );
    Ok(())
}

#[tokio::test]
async fn multi_key_sort_orders_by_priority_then_name() -> Result<(), DbErr> {
    let db = common::setup_page_db().await?;
    // Seeded priorities descend with the page number, so descending priority
    // restores insertion order.
    let select = pages_fetcher()
        .call(RawParams::new().with_sort("-priority,name"))
        .success()
        .unwrap();
    assert_eq!(
        names(select, &db).await?,
        vec!["Page #0", "Page #1", "Page #2"]
    );
    Ok(())
}

#[tokio::test]
async fn equality_filter_narrows_the_select() -> Result<(), DbErr> {
    let db = common::setup_page_db().await?;
    let select = pages_fetcher()
        .call(RawParams::new().with_filter("name_eq", "Page #1"))
        .success()
        .unwrap();
    assert_eq!(names(select, &db).await?, vec!["Page #1"]);
    Ok(())
}

#[tokio::test]
async fn containment_and_range_filters_compose() -> Result<(), DbErr> {
    let db = common::setup_page_db().await?;
    let select = pages_fetcher()
        .call(
            RawParams::new()
                .with_filter("name_cont", "page")
                .with_filter("priority_gte", "1")
                .with_sort("name"),
        )
        .success()
        .unwrap();
    assert_eq!(names(select, &db).await?, vec!["Page #0", "Page #1"]);
    Ok(())
}

#[tokio::test]
async fn inclusion_filter_accepts_value_arrays() -> Result<(), DbErr> {
    let db = common::setup_page_db().await?;
    let select = pages_fetcher()
        .call(
            RawParams::new()
                .with_filter("name_in", vec!["Page #0", "Page #2"])
                .with_sort("name"),
        )
        .success()
        .unwrap();
    assert_eq!(names(select, &db).await?, vec!["Page #0", "Page #2"]);
    Ok(())
}

#[tokio::test]
async fn containment_treats_wildcards_as_literals() -> Result<(), DbErr> {
    let db = common::setup_page_db().await?;
    let fetcher = pages_fetcher();

    // A bare wildcard matches nothing instead of every row.
    let select = fetcher
        .call(RawParams::new().with_filter("name_cont", "%"))
        .success()
        .unwrap();
    assert!(names(select, &db).await?.is_empty());

    let select = fetcher
        .call(RawParams::new().with_filter("name_cont", "Page _"))
        .success()
        .unwrap();
    assert!(names(select, &db).await?.is_empty());

    // Literal text still matches.
    let select = fetcher
        .call(RawParams::new().with_filter("name_cont", "#2"))
        .success()
        .unwrap();
    assert_eq!(names(select, &db).await?, vec!["Page #2"]);
    Ok(())
}

#[tokio::test]
async fn failures_never_touch_the_database() {
    // No database at all: a rejected parameter fails before the query
    // pipeline would run.
    let result = pages_fetcher().call(RawParams::new().with_sort("-not_allowed,name"));
    assert!(result.is_failure());
    assert_eq!(result.errors()[0].field, "not_allowed");
}
