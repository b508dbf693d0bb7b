use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::images;

/// Widget kinds stored as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    #[sea_orm(string_value = "hero")]
    Hero,
    #[sea_orm(string_value = "about")]
    About,
    #[sea_orm(string_value = "skills")]
    Skills,
    #[sea_orm(string_value = "education")]
    Education,
    #[sea_orm(string_value = "experience")]
    Experience,
    #[sea_orm(string_value = "portfolio")]
    Portfolio,
    #[sea_orm(string_value = "contact")]
    Contact,
    #[sea_orm(string_value = "image")]
    Image,
    #[sea_orm(string_value = "text")]
    Text,
    #[sea_orm(string_value = "custom")]
    Custom,
}

/// SeaORM entity for the `widgets` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "widgets")]
pub struct Model {
    /// UUIDv7, so ids sort by insertion and break `order` ties.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub layout_id: Uuid,
    pub kind: WidgetKind,
    pub title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub order: i32,
    pub is_visible: bool,
    /// Free-form style overrides.
    pub settings: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::layouts::Entity",
        from = "Column::LayoutId",
        to = "super::layouts::Column::Id"
    )]
    Layout,
}

impl Related<super::layouts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Layout.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateWidget {
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub w: Option<i32>,
    pub h: Option<i32>,
    pub order: Option<i32>,
    pub is_visible: Option<bool>,
    pub settings: Option<serde_json::Value>,
}

/// Partial widget update; also used inside `PUT /api/layout`, where `id` is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WidgetPatch {
    pub id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: Option<WidgetKind>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub w: Option<i32>,
    pub h: Option<i32>,
    pub order: Option<i32>,
    pub is_visible: Option<bool>,
    pub settings: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order: i32,
}

/// `PUT /api/widgets/reorder`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReorderWidgets {
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetResponse {
    pub id: Uuid,
    pub layout_id: Uuid,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub order: i32,
    pub is_visible: bool,
    pub settings: Option<serde_json::Value>,
}

impl WidgetResponse {
    pub fn build(m: Model, api_base: &str) -> Self {
        Self {
            id: m.id,
            layout_id: m.layout_id,
            kind: m.kind,
            image_url: images::display_opt(m.image_url.as_deref(), api_base),
            title: m.title,
            content: m.content,
            x: m.x,
            y: m.y,
            w: m.w,
            h: m.h,
            order: m.order,
            is_visible: m.is_visible,
            settings: m.settings,
        }
    }
}
