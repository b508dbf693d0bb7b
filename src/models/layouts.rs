use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::widgets;

/// SeaORM entity for the `layouts` table. `user_id = NULL` is the global default layout.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "layouts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub user_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::widgets::Entity")]
    Widgets,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::widgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Widgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// `GET /api/layout?username=&includeHidden=`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutQuery {
    pub username: Option<String>,
    pub include_hidden: Option<bool>,
}

/// Partial update. Widgets missing from `widgets` are left alone, never deleted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateLayout {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub widgets: Option<Vec<widgets::WidgetPatch>>,
}

/// A layout with its widgets in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLayout {
    pub layout: Model,
    pub widgets: Vec<widgets::Model>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResponse {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub user_id: Option<Uuid>,
    pub widgets: Vec<widgets::WidgetResponse>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

impl LayoutResponse {
    pub fn build(resolved: ResolvedLayout, api_base: &str) -> Self {
        let ResolvedLayout { layout, widgets } = resolved;
        Self {
            id: layout.id,
            name: layout.name,
            is_active: layout.is_active,
            user_id: layout.user_id,
            widgets: widgets
                .into_iter()
                .map(|w| widgets::WidgetResponse::build(w, api_base))
                .collect(),
            created_at: layout.created_at,
            updated_at: layout.updated_at,
        }
    }
}
