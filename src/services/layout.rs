//! Layout resolution: find the owner's current layout, or create the default
//! one on first use.

use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::db::widgets as widget_db;
use crate::error::AppError;
use crate::models::layouts::{self, ResolvedLayout, UpdateLayout};
use crate::models::widgets::{self, WidgetKind};

pub const DEFAULT_LAYOUT_NAME: &str = "Default";

/// `(kind, title, y, h)` of the widgets every new layout starts with. All span the full 12-column grid.
const DEFAULT_WIDGETS: &[(WidgetKind, &str, i32, i32)] = &[
    (WidgetKind::Hero, "หน้าแรก", 0, 4),
    (WidgetKind::About, "เกี่ยวกับฉัน", 4, 4),
    (WidgetKind::Education, "การศึกษา", 8, 4),
    (WidgetKind::Portfolio, "ผลงาน", 12, 6),
    (WidgetKind::Contact, "ติดต่อ", 18, 4),
];

pub fn owner_condition(owner: Option<Uuid>) -> Condition {
    match owner {
        Some(id) => Condition::all().add(layouts::Column::UserId.eq(id)),
        None => Condition::all().add(layouts::Column::UserId.is_null()),
    }
}

/// The owner's active layout, else their most recent one.
pub async fn find_current<C: ConnectionTrait>(
    db: &C,
    owner: Option<Uuid>,
) -> Result<Option<layouts::Model>, DbErr> {
    let active = layouts::Entity::find()
        .filter(owner_condition(owner))
        .filter(layouts::Column::IsActive.eq(true))
        .order_by_desc(layouts::Column::CreatedAt)
        .one(db)
        .await?;
    if active.is_some() {
        return Ok(active);
    }

    layouts::Entity::find()
        .filter(owner_condition(owner))
        .order_by_desc(layouts::Column::CreatedAt)
        .one(db)
        .await
}

/// Resolve the layout shown for `owner` (`None` = the global default),
/// creating it with the default widget set if none exists yet.
pub async fn resolve(
    db: &DatabaseConnection,
    owner: Option<Uuid>,
    include_hidden: bool,
) -> Result<ResolvedLayout, DbErr> {
    let layout = match find_current(db, owner).await? {
        Some(layout) => layout,
        None => create_default(db, owner).await?,
    };
    let widgets = widget_db::list_for_layout(db, layout.id, include_hidden).await?;
    Ok(ResolvedLayout { layout, widgets })
}

/// Create the default layout, or return the one a concurrent request just
/// created (the unique index on active layouts rejects the second insert).
async fn create_default(db: &DatabaseConnection, owner: Option<Uuid>) -> Result<layouts::Model, DbErr> {
    match insert_default(db, owner).await {
        Err(e) if is_unique_violation(&e) => {
            tracing::debug!(owner = ?owner, "default layout created concurrently");
            find_current(db, owner).await?.ok_or(e)
        }
        other => other,
    }
}

async fn insert_default(db: &DatabaseConnection, owner: Option<Uuid>) -> Result<layouts::Model, DbErr> {
    let txn = db.begin().await?;

    // Another request may have created it since the first lookup.
    if let Some(existing) = find_current(&txn, owner).await? {
        txn.commit().await?;
        return Ok(existing);
    }

    let now = chrono::Utc::now();
    let layout = layouts::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(String::from(DEFAULT_LAYOUT_NAME)),
        is_active: Set(true),
        user_id: Set(owner),
        created_at: Set(now),
        updated_at: Set(None),
    }
    .insert(&txn)
    .await?;

    for (order, (kind, title, y, h)) in DEFAULT_WIDGETS.iter().enumerate() {
        widgets::ActiveModel {
            id: Set(Uuid::now_v7()),
            layout_id: Set(layout.id),
            kind: Set(*kind),
            title: Set(Some(String::from(*title))),
            content: Set(None),
            image_url: Set(None),
            x: Set(0),
            y: Set(*y),
            w: Set(12),
            h: Set(*h),
            order: Set(order as i32),
            is_visible: Set(true),
            settings: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    tracing::info!(owner = ?owner, layout_id = %layout.id, "created default layout");
    Ok(layout)
}

/// Apply a partial update to `layout`. Activating it deactivates the owner's
/// other layouts. Widget patches whose id is not in this layout are skipped.
/// Returns the layout with all of its widgets, hidden ones included.
pub async fn update(
    db: &DatabaseConnection,
    layout: layouts::Model,
    input: UpdateLayout,
) -> Result<ResolvedLayout, AppError> {
    let patches = input
        .widgets
        .unwrap_or_default()
        .into_iter()
        .map(widget_db::normalize_patch)
        .collect::<Result<Vec<_>, _>>()?;

    let txn = db.begin().await?;
    let layout_id = layout.id;

    if input.is_active == Some(true) {
        layouts::Entity::update_many()
            .col_expr(layouts::Column::IsActive, Expr::value(false))
            .filter(owner_condition(layout.user_id))
            .filter(layouts::Column::Id.ne(layout_id))
            .exec(&txn)
            .await?;
    }

    let mut active: layouts::ActiveModel = layout.into();
    if let Some(name) = input.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
        active.name = Set(name);
    }
    if let Some(is_active) = input.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));
    let layout = active.update(&txn).await?;

    for patch in patches {
        let Some(widget_id) = patch.id else {
            tracing::warn!(%layout_id, "skipping widget patch without id");
            continue;
        };
        match widget_db::find_in_layout(&txn, widget_id, layout_id).await? {
            Some(widget) => {
                widget_db::update(&txn, widget, patch).await?;
            }
            None => tracing::warn!(%layout_id, %widget_id, "skipping patch for unknown widget"),
        }
    }

    txn.commit().await?;

    let widgets = widget_db::list_for_layout(db, layout_id, true).await?;
    Ok(ResolvedLayout { layout, widgets })
}
