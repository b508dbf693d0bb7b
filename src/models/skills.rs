use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `skills` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "skills")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub page_content_id: Uuid,
    pub name: String,
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

/// Accepts either `"Rust"` or `{ "name": "Rust" }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillInput {
    Name(String),
    Object { name: String },
}

impl SkillInput {
    pub fn name(&self) -> &str {
        match self {
            SkillInput::Name(name) | SkillInput::Object { name } => name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<Model> for SkillResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}
