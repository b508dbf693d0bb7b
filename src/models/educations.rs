use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum EducationKind {
    #[sea_orm(string_value = "university")]
    University,
    #[sea_orm(string_value = "highschool")]
    Highschool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum EducationStatus {
    #[sea_orm(string_value = "studying")]
    Studying,
    #[sea_orm(string_value = "graduated")]
    Graduated,
}

/// SeaORM entity for the `educations` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "educations")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub page_content_id: Uuid,
    #[serde(rename = "type")]
    pub kind: EducationKind,
    pub field: String,
    pub institution: String,
    pub year: Option<String>,
    pub gpa: Option<String>,
    pub status: Option<EducationStatus>,
    #[serde(skip_serializing)]
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
pub struct EducationInput {
    #[serde(rename = "type")]
    pub kind: EducationKind,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub institution: String,
    pub year: Option<String>,
    pub gpa: Option<String>,
    pub status: Option<EducationStatus>,
}
