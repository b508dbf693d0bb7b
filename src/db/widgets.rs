use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::error::AppError;
use crate::images::{self, DataUriPolicy};
use crate::models::layouts;
use crate::models::widgets::{self, CreateWidget, OrderItem, WidgetPatch};

/// Widgets of a layout by `(order, id)`, visible ones only unless `include_hidden`.
pub async fn list_for_layout<C: ConnectionTrait>(
    db: &C,
    layout_id: Uuid,
    include_hidden: bool,
) -> Result<Vec<widgets::Model>, DbErr> {
    let mut query = widgets::Entity::find().filter(widgets::Column::LayoutId.eq(layout_id));
    if !include_hidden {
        query = query.filter(widgets::Column::IsVisible.eq(true));
    }
    query
        .order_by_asc(widgets::Column::Order)
        .order_by_asc(widgets::Column::Id)
        .all(db)
        .await
}

pub async fn find_in_layout<C: ConnectionTrait>(
    db: &C,
    widget_id: Uuid,
    layout_id: Uuid,
) -> Result<Option<widgets::Model>, DbErr> {
    widgets::Entity::find_by_id(widget_id)
        .filter(widgets::Column::LayoutId.eq(layout_id))
        .one(db)
        .await
}

/// A widget, if it sits in one of `user_id`'s layouts.
pub async fn find_owned(
    db: &DatabaseConnection,
    widget_id: Uuid,
    user_id: Uuid,
) -> Result<Option<widgets::Model>, DbErr> {
    widgets::Entity::find_by_id(widget_id)
        .inner_join(layouts::Entity)
        .filter(layouts::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Normalize an image reference for a widget. Data URIs are refused.
fn normalize_image(image_url: Option<String>) -> Result<Option<String>, AppError> {
    image_url
        .map(|url| images::for_storage(&url, DataUriPolicy::Reject).map(Option::unwrap_or_default))
        .transpose()
}

pub fn normalize_patch(mut patch: WidgetPatch) -> Result<WidgetPatch, AppError> {
    patch.image_url = normalize_image(patch.image_url)?;
    Ok(patch)
}

fn check_geometry(x: i32, y: i32, w: i32, h: i32) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if x < 0 || y < 0 {
        errors.push("ตำแหน่งของวิดเจ็ตต้องไม่ติดลบ".to_string());
    }
    if !(1..=12).contains(&w) {
        errors.push("ความกว้างของวิดเจ็ตต้องอยู่ระหว่าง 1-12".to_string());
    }
    if h < 1 {
        errors.push("ความสูงของวิดเจ็ตต้องมากกว่า 0".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Append a widget. Without an explicit `order` it goes after the last one.
pub async fn create(
    db: &DatabaseConnection,
    layout_id: Uuid,
    input: CreateWidget,
) -> Result<widgets::Model, AppError> {
    let image_url = normalize_image(input.image_url)?.filter(|k| !k.is_empty());
    let (x, y, w, h) = (
        input.x.unwrap_or(0),
        input.y.unwrap_or(0),
        input.w.unwrap_or(12),
        input.h.unwrap_or(4),
    );
    check_geometry(x, y, w, h)?;

    let order = match input.order {
        Some(order) => order,
        None => widgets::Entity::find()
            .filter(widgets::Column::LayoutId.eq(layout_id))
            .order_by_desc(widgets::Column::Order)
            .one(db)
            .await?
            .map_or(0, |last| last.order + 1),
    };

    let created = widgets::ActiveModel {
        id: Set(Uuid::now_v7()),
        layout_id: Set(layout_id),
        kind: Set(input.kind),
        title: Set(input.title),
        content: Set(input.content),
        image_url: Set(image_url),
        x: Set(x),
        y: Set(y),
        w: Set(w),
        h: Set(h),
        order: Set(order),
        is_visible: Set(input.is_visible.unwrap_or(true)),
        settings: Set(input.settings),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    }
    .insert(db)
    .await?;

    Ok(created)
}

/// Apply a patch whose image has already gone through [`normalize_patch`].
pub async fn update<C: ConnectionTrait>(
    db: &C,
    widget: widgets::Model,
    patch: WidgetPatch,
) -> Result<widgets::Model, AppError> {
    check_geometry(
        patch.x.unwrap_or(widget.x),
        patch.y.unwrap_or(widget.y),
        patch.w.unwrap_or(widget.w),
        patch.h.unwrap_or(widget.h),
    )?;

    let mut active: widgets::ActiveModel = widget.into();
    if let Some(kind) = patch.kind {
        active.kind = Set(kind);
    }
    if let Some(title) = patch.title {
        active.title = Set(Some(title));
    }
    if let Some(content) = patch.content {
        active.content = Set(Some(content));
    }
    if let Some(image_url) = patch.image_url {
        active.image_url = Set((!image_url.is_empty()).then_some(image_url));
    }
    if let Some(x) = patch.x {
        active.x = Set(x);
    }
    if let Some(y) = patch.y {
        active.y = Set(y);
    }
    if let Some(w) = patch.w {
        active.w = Set(w);
    }
    if let Some(h) = patch.h {
        active.h = Set(h);
    }
    if let Some(order) = patch.order {
        active.order = Set(order);
    }
    if let Some(is_visible) = patch.is_visible {
        active.is_visible = Set(is_visible);
    }
    if let Some(settings) = patch.settings {
        active.settings = Set(Some(settings));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    Ok(active.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, widget_id: Uuid) -> Result<DeleteResult, DbErr> {
    widgets::Entity::delete_by_id(widget_id).exec(db).await
}

/// Set `order` for each listed widget of the layout in one transaction.
/// Ids from other layouts are ignored. Returns how many widgets moved.
pub async fn reorder(
    db: &DatabaseConnection,
    layout_id: Uuid,
    items: &[OrderItem],
) -> Result<u64, DbErr> {
    let txn = db.begin().await?;
    let now = chrono::Utc::now();
    let mut moved = 0;

    for item in items {
        let result = widgets::Entity::update_many()
            .col_expr(widgets::Column::Order, Expr::value(item.order))
            .col_expr(widgets::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(widgets::Column::Id.eq(item.id))
            .filter(widgets::Column::LayoutId.eq(layout_id))
            .exec(&txn)
            .await?;
        moved += result.rows_affected;
    }

    txn.commit().await?;
    Ok(moved)
}
