use sea_orm::*;
use uuid::Uuid;

use super::is_unique_violation;
use crate::models::theme_preferences::{self, ThemePreferenceResponse, UpdateThemePreference};

pub async fn find_for_owner(
    db: &DatabaseConnection,
    owner: Option<Uuid>,
) -> Result<Option<theme_preferences::Model>, DbErr> {
    let condition = match owner {
        Some(id) => Condition::all().add(theme_preferences::Column::UserId.eq(id)),
        None => Condition::all().add(theme_preferences::Column::UserId.is_null()),
    };
    theme_preferences::Entity::find().filter(condition).one(db).await
}

/// Own row, else the global row, else built-in defaults.
pub async fn resolve(
    db: &DatabaseConnection,
    owner: Option<Uuid>,
) -> Result<ThemePreferenceResponse, DbErr> {
    if owner.is_some() {
        if let Some(own) = find_for_owner(db, owner).await? {
            return Ok(own.into());
        }
    }
    Ok(find_for_owner(db, None)
        .await?
        .map(ThemePreferenceResponse::from)
        .unwrap_or_default())
}

fn apply(active: &mut theme_preferences::ActiveModel, input: UpdateThemePreference) {
    if let Some(v) = input.primary_color {
        active.primary_color = Set(Some(v));
    }
    if let Some(v) = input.secondary_color {
        active.secondary_color = Set(Some(v));
    }
    if let Some(v) = input.accent_color {
        active.accent_color = Set(Some(v));
    }
    if let Some(v) = input.background_color {
        active.background_color = Set(Some(v));
    }
    if let Some(v) = input.text_color {
        active.text_color = Set(Some(v));
    }
    if let Some(v) = input.font_family {
        active.font_family = Set(Some(v));
    }
    if let Some(v) = input.mode {
        active.mode = Set(Some(v));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));
}

/// Insert or patch the user's preference row.
pub async fn upsert(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: UpdateThemePreference,
) -> Result<theme_preferences::Model, DbErr> {
    if let Some(existing) = find_for_owner(db, Some(user_id)).await? {
        let mut active: theme_preferences::ActiveModel = existing.into();
        apply(&mut active, input);
        return active.update(db).await;
    }

    let mut active = theme_preferences::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(Some(user_id)),
        primary_color: Set(None),
        secondary_color: Set(None),
        accent_color: Set(None),
        background_color: Set(None),
        text_color: Set(None),
        font_family: Set(None),
        mode: Set(None),
        updated_at: Set(None),
    };
    apply(&mut active, input.clone());
    match active.insert(db).await {
        Ok(created) => Ok(created),
        Err(e) if is_unique_violation(&e) => {
            // Lost a race with a concurrent insert; patch the winner instead.
            let existing = find_for_owner(db, Some(user_id))
                .await?
                .ok_or(DbErr::RecordNotFound("Theme preference not found".to_string()))?;
            let mut active: theme_preferences::ActiveModel = existing.into();
            apply(&mut active, input);
            active.update(db).await
        }
        Err(e) => Err(e),
    }
}
