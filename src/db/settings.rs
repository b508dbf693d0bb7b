use sea_orm::*;
use uuid::Uuid;

use super::is_unique_violation;
use crate::models::site_settings::{self, SettingsResponse, UpdateSettings};

pub async fn find_for_owner(
    db: &DatabaseConnection,
    owner: Option<Uuid>,
) -> Result<Option<site_settings::Model>, DbErr> {
    let condition = match owner {
        Some(id) => Condition::all().add(site_settings::Column::UserId.eq(id)),
        None => Condition::all().add(site_settings::Column::UserId.is_null()),
    };
    site_settings::Entity::find().filter(condition).one(db).await
}

/// Own row, else the global row, else built-in defaults.
pub async fn resolve(
    db: &DatabaseConnection,
    owner: Option<Uuid>,
) -> Result<SettingsResponse, DbErr> {
    if owner.is_some() {
        if let Some(own) = find_for_owner(db, owner).await? {
            return Ok(own.into());
        }
    }
    Ok(find_for_owner(db, None)
        .await?
        .map(SettingsResponse::from)
        .unwrap_or_default())
}

fn seeded(user_id: Uuid) -> Result<site_settings::ActiveModel, DbErr> {
    let d = SettingsResponse::default();
    let menu = serde_json::to_value(&d.menu_items).map_err(|e| DbErr::Custom(e.to_string()))?;
    Ok(site_settings::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(Some(user_id)),
        site_title: Set(d.site_title),
        header_text: Set(d.header_text),
        footer_text: Set(d.footer_text),
        menu_items: Set(menu),
        primary_color: Set(d.primary_color),
        secondary_color: Set(d.secondary_color),
        background_color: Set(d.background_color),
        text_color: Set(d.text_color),
        updated_at: Set(Some(chrono::Utc::now())),
    })
}

pub async fn get_or_create(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<site_settings::Model, DbErr> {
    if let Some(existing) = find_for_owner(db, Some(user_id)).await? {
        return Ok(existing);
    }
    match seeded(user_id)?.insert(db).await {
        Ok(created) => Ok(created),
        Err(e) if is_unique_violation(&e) => find_for_owner(db, Some(user_id))
            .await?
            .ok_or(DbErr::RecordNotFound("Settings not found".to_string())),
        Err(e) => Err(e),
    }
}

pub async fn update(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: UpdateSettings,
) -> Result<site_settings::Model, DbErr> {
    let row = get_or_create(db, user_id).await?;
    let mut active: site_settings::ActiveModel = row.into();

    if let Some(v) = input.site_title {
        active.site_title = Set(v);
    }
    if let Some(v) = input.header_text {
        active.header_text = Set(v);
    }
    if let Some(v) = input.footer_text {
        active.footer_text = Set(v);
    }
    if let Some(items) = input.menu_items {
        let menu = serde_json::to_value(items).map_err(|e| DbErr::Custom(e.to_string()))?;
        active.menu_items = Set(menu);
    }
    if let Some(v) = input.primary_color {
        active.primary_color = Set(v);
    }
    if let Some(v) = input.secondary_color {
        active.secondary_color = Set(v);
    }
    if let Some(v) = input.background_color {
        active.background_color = Set(v);
    }
    if let Some(v) = input.text_color {
        active.text_color = Set(v);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}
