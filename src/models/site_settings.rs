use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `site_settings` table. `user_id = NULL` is the global row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Option<Uuid>,
    pub site_title: String,
    pub header_text: String,
    pub footer_text: String,
    /// JSON array of [`MenuItem`].
    pub menu_items: Json,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuItem {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateSettings {
    pub site_title: Option<String>,
    pub header_text: Option<String>,
    pub footer_text: Option<String>,
    pub menu_items: Option<Vec<MenuItem>>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub site_title: String,
    pub header_text: String,
    pub footer_text: String,
    pub menu_items: Vec<MenuItem>,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    /// False when these are built-in defaults rather than a stored row.
    pub is_custom: bool,
}

impl Default for SettingsResponse {
    fn default() -> Self {
        Self {
            site_title: "My Portfolio".to_string(),
            header_text: String::new(),
            footer_text: String::new(),
            menu_items: default_menu(),
            primary_color: "#3b82f6".to_string(),
            secondary_color: "#8b5cf6".to_string(),
            background_color: "#ffffff".to_string(),
            text_color: "#1f2937".to_string(),
            is_custom: false,
        }
    }
}

impl From<Model> for SettingsResponse {
    fn from(m: Model) -> Self {
        let menu_items = serde_json::from_value(m.menu_items).unwrap_or_else(|e| {
            tracing::warn!(settings_id = %m.id, "stored menu is not a menu list: {e}");
            default_menu()
        });
        Self {
            site_title: m.site_title,
            header_text: m.header_text,
            footer_text: m.footer_text,
            menu_items,
            primary_color: m.primary_color,
            secondary_color: m.secondary_color,
            background_color: m.background_color,
            text_color: m.text_color,
            is_custom: true,
        }
    }
}

pub fn default_menu() -> Vec<MenuItem> {
    [
        ("หน้าแรก", "#hero"),
        ("เกี่ยวกับ", "#about"),
        ("ผลงาน", "#portfolio"),
        ("ติดต่อ", "#contact"),
    ]
    .into_iter()
    .map(|(label, href)| MenuItem {
        label: label.to_string(),
        href: href.to_string(),
    })
    .collect()
}
