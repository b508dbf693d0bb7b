//! Content row creation against a real (SQLite) schema.

mod common;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait};
use uuid::Uuid;

use folio_backend::db::content as content_db;
use folio_backend::db::users as user_db;
use folio_backend::models::page_contents;

async fn make_user(ctx: &common::TestContext, username: &str) -> Uuid {
    user_db::create_user_with_content(
        &ctx.state.db,
        username.to_string(),
        format!("{username}@example.com"),
        "not-a-real-hash".to_string(),
    )
    .await
    .expect("create user")
    .id
}

async fn content_rows(ctx: &common::TestContext, user_id: Uuid) -> u64 {
    page_contents::Entity::find()
        .filter(page_contents::Column::UserId.eq(user_id))
        .count(&ctx.state.db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_conflicting_insert_leaves_the_transaction_usable() {
    let ctx = common::setup().await;
    let user_id = make_user(&ctx, "alice").await;

    let txn = ctx.state.db.begin().await.unwrap();
    let inserted = content_db::insert_empty_content(&txn, user_id).await.unwrap();
    assert!(!inserted);

    // The same transaction keeps working after the no-op insert.
    let content = content_db::get_or_create_content(&txn, user_id).await.unwrap();
    assert_eq!(content.user_id, user_id);
    txn.commit().await.unwrap();

    assert_eq!(content_rows(&ctx, user_id).await, 1);
}

#[tokio::test]
async fn test_missing_content_is_recreated_once() {
    let ctx = common::setup().await;
    let user_id = make_user(&ctx, "bob").await;
    page_contents::Entity::delete_many()
        .filter(page_contents::Column::UserId.eq(user_id))
        .exec(&ctx.state.db)
        .await
        .unwrap();

    let first = content_db::get_or_create_content(&ctx.state.db, user_id).await.unwrap();
    let second = content_db::get_or_create_content(&ctx.state.db, user_id).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.name, "");
    assert_eq!(content_rows(&ctx, user_id).await, 1);
}
