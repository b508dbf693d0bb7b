//! Layout resolution against a real (SQLite) schema.

mod common;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use folio_backend::db::users as user_db;
use folio_backend::models::layouts::{self, UpdateLayout};
use folio_backend::models::widgets::{self, WidgetKind, WidgetPatch};
use folio_backend::services::layout;

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

#[tokio::test]
async fn test_first_resolve_creates_default_layout_once() {
    let ctx = common::setup().await;
    let db = &ctx.state.db;
    let owner = make_user(&ctx, "alice").await;

    let first = layout::resolve(db, Some(owner), false).await.unwrap();
    let kinds: Vec<WidgetKind> = first.widgets.iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![
            WidgetKind::Hero,
            WidgetKind::About,
            WidgetKind::Education,
            WidgetKind::Portfolio,
            WidgetKind::Contact,
        ]
    );
    assert!(first.layout.is_active);
    assert_eq!(first.layout.user_id, Some(owner));

    let second = layout::resolve(db, Some(owner), false).await.unwrap();
    assert_eq!(second.layout.id, first.layout.id);

    let count = layouts::Entity::find()
        .filter(layouts::Column::UserId.eq(owner))
        .count(db)
        .await
        .unwrap();
    assert_eq!(count, 1);
    let widget_count = widgets::Entity::find()
        .filter(widgets::Column::LayoutId.eq(first.layout.id))
        .count(db)
        .await
        .unwrap();
    assert_eq!(widget_count, 5);
}

#[tokio::test]
async fn test_global_default_is_separate_from_user_layouts() {
    let ctx = common::setup().await;
    let db = &ctx.state.db;
    let owner = make_user(&ctx, "bob").await;

    let global = layout::resolve(db, None, false).await.unwrap();
    let own = layout::resolve(db, Some(owner), false).await.unwrap();

    assert_eq!(global.layout.user_id, None);
    assert_ne!(global.layout.id, own.layout.id);
    assert_eq!(layout::resolve(db, None, true).await.unwrap().layout.id, global.layout.id);
}

#[tokio::test]
async fn test_hidden_widgets_and_ordering() {
    let ctx = common::setup().await;
    let db = &ctx.state.db;
    let owner = make_user(&ctx, "carol").await;
    let resolved = layout::resolve(db, Some(owner), true).await.unwrap();
    let ids: Vec<Uuid> = resolved.widgets.iter().map(|w| w.id).collect();

    // Hide "about", move "contact" to the front, and tie "hero" with it.
    let update = UpdateLayout {
        widgets: Some(vec![
            WidgetPatch {
                id: Some(ids[1]),
                is_visible: Some(false),
                ..WidgetPatch::default()
            },
            WidgetPatch {
                id: Some(ids[4]),
                order: Some(0),
                ..WidgetPatch::default()
            },
        ]),
        ..UpdateLayout::default()
    };
    let updated = layout::update(db, resolved.layout, update).await.unwrap();
    assert_eq!(updated.widgets.len(), 5, "hidden widgets are kept");

    let visible = layout::resolve(db, Some(owner), false).await.unwrap();
    assert_eq!(visible.widgets.len(), 4);
    assert!(visible.widgets.iter().all(|w| w.is_visible));
    assert!(
        visible
            .widgets
            .windows(2)
            .all(|pair| (pair[0].order, pair[0].id) <= (pair[1].order, pair[1].id))
    );
    // Equal `order`: the earlier-created widget comes first.
    assert_eq!(visible.widgets[0].kind, WidgetKind::Hero);
    assert_eq!(visible.widgets[1].kind, WidgetKind::Contact);

    let all = layout::resolve(db, Some(owner), true).await.unwrap();
    assert_eq!(all.widgets.len(), 5);
}

#[tokio::test]
async fn test_update_skips_unknown_widgets_and_never_deletes() {
    let ctx = common::setup().await;
    let db = &ctx.state.db;
    let owner = make_user(&ctx, "dave").await;
    let resolved = layout::resolve(db, Some(owner), true).await.unwrap();
    let hero = resolved.widgets[0].id;

    let update = UpdateLayout {
        name: Some("Portfolio 2025".to_string()),
        widgets: Some(vec![
            WidgetPatch {
                id: Some(Uuid::new_v4()),
                title: Some("ghost".to_string()),
                ..WidgetPatch::default()
            },
            WidgetPatch {
                id: Some(hero),
                title: Some("สวัสดี".to_string()),
                ..WidgetPatch::default()
            },
        ]),
        ..UpdateLayout::default()
    };
    let updated = layout::update(db, resolved.layout, update).await.unwrap();

    assert_eq!(updated.layout.name, "Portfolio 2025");
    assert_eq!(updated.widgets.len(), 5);
    let hero_after = updated.widgets.iter().find(|w| w.id == hero).unwrap();
    assert_eq!(hero_after.title.as_deref(), Some("สวัสดี"));
    assert!(updated.widgets.iter().all(|w| w.title.as_deref() != Some("ghost")));
}

#[tokio::test]
async fn test_activating_a_layout_deactivates_the_others() {
    let ctx = common::setup().await;
    let db = &ctx.state.db;
    let owner = make_user(&ctx, "erin").await;
    let first = layout::resolve(db, Some(owner), true).await.unwrap().layout;

    // A second, inactive layout for the same owner.
    let second = {
        use sea_orm::{ActiveModelTrait, Set};
        layouts::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set("Draft".to_string()),
            is_active: Set(false),
            user_id: Set(Some(owner)),
            created_at: Set(chrono::Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await
        .unwrap()
    };

    let update = UpdateLayout {
        is_active: Some(true),
        ..UpdateLayout::default()
    };
    layout::update(db, second.clone(), update).await.unwrap();

    let active: Vec<layouts::Model> = layouts::Entity::find()
        .filter(layouts::Column::UserId.eq(owner))
        .filter(layouts::Column::IsActive.eq(true))
        .all(db)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, second.id);
    assert_ne!(active[0].id, first.id);

    let current = layout::find_current(db, Some(owner)).await.unwrap().unwrap();
    assert_eq!(current.id, second.id);
}

#[tokio::test]
async fn test_widget_patch_rejects_data_uri_images() {
    let ctx = common::setup().await;
    let db = &ctx.state.db;
    let owner = make_user(&ctx, "frank").await;
    let resolved = layout::resolve(db, Some(owner), true).await.unwrap();
    let id = resolved.widgets[0].id;

    let update = UpdateLayout {
        widgets: Some(vec![WidgetPatch {
            id: Some(id),
            image_url: Some("data:image/png;base64,AAAA".to_string()),
            ..WidgetPatch::default()
        }]),
        ..UpdateLayout::default()
    };
    assert!(layout::update(db, resolved.layout, update).await.is_err());
}

#[tokio::test]
async fn test_owner_cannot_hold_two_active_layouts() {
    use sea_orm::{ActiveModelTrait, Set};

    let ctx = common::setup().await;
    let db = &ctx.state.db;
    let owner = make_user(&ctx, "gail").await;
    let first = layout::resolve(db, Some(owner), true).await.unwrap();

    // What a racing first request would try to insert.
    let duplicate = layouts::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(layout::DEFAULT_LAYOUT_NAME.to_string()),
        is_active: Set(true),
        user_id: Set(Some(owner)),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    }
    .insert(db)
    .await
    .unwrap_err();
    assert!(folio_backend::db::is_unique_violation(&duplicate));

    let again = layout::resolve(db, Some(owner), true).await.unwrap();
    assert_eq!(again.layout.id, first.layout.id);
    assert_eq!(
        layouts::Entity::find()
            .filter(layouts::Column::UserId.eq(owner))
            .count(db)
            .await
            .unwrap(),
        1
    );
}
