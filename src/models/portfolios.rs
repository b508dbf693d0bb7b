use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::images;

/// SeaORM entity for the `portfolios` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portfolios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub page_content_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Relative storage key.
    #[sea_orm(column_type = "Text", nullable)]
    pub image: Option<String>,
    pub link: Option<String>,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::page_contents::Entity",
        from = "Column::PageContentId",
        to = "super::page_contents::Column::Id"
    )]
    PageContent,
}

impl Related<super::page_contents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PageContent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PortfolioInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub link: Option<String>,
}

impl PortfolioResponse {
    pub fn build(m: Model, api_base: &str) -> Self {
        Self {
            id: m.id,
            image: images::display_opt(m.image.as_deref(), api_base),
            title: m.title,
            description: m.description,
            link: m.link,
        }
    }
}
