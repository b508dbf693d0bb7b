use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{educations, experiences, portfolios, skills};
use crate::images;

/// SeaORM entity for the `page_contents` table: one row per user holding the
/// personal data shown on their page.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "page_contents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub name: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    #[sea_orm(column_type = "Text")]
    pub about: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    /// Relative storage key (or a legacy data URI).
    #[sea_orm(column_type = "Text", nullable)]
    pub profile_image: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub about_image: Option<String>,
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
    #[sea_orm(has_many = "super::skills::Entity")]
    Skills,
    #[sea_orm(has_many = "super::educations::Entity")]
    Educations,
    #[sea_orm(has_many = "super::experiences::Entity")]
    Experiences,
    #[sea_orm(has_many = "super::portfolios::Entity")]
    Portfolios,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::skills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Skills.def()
    }
}

impl Related<super::educations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Educations.def()
    }
}

impl Related<super::experiences::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Experiences.def()
    }
}

impl Related<super::portfolios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Portfolios.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Personal fields shared by `PUT /api/profile` and `PUT /api/content/me`.
/// Absent fields are left untouched; an empty image string clears the image.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub about: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub profile_image: Option<String>,
    pub about_image: Option<String>,
}

/// Body of `PUT /api/content/me`. Each collection, when present, replaces the
/// stored one wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateContent {
    pub name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub about: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub profile_image: Option<String>,
    pub about_image: Option<String>,
    pub skills: Option<Vec<skills::SkillInput>>,
    pub education: Option<Vec<educations::EducationInput>>,
    pub experience: Option<Vec<experiences::ExperienceInput>>,
    pub portfolio: Option<Vec<portfolios::PortfolioInput>>,
}

/// Collections carried by an [`UpdateContent`] body.
#[derive(Debug, Clone, Default)]
pub struct CollectionUpdates {
    pub skills: Option<Vec<skills::SkillInput>>,
    pub education: Option<Vec<educations::EducationInput>>,
    pub experience: Option<Vec<experiences::ExperienceInput>>,
    pub portfolio: Option<Vec<portfolios::PortfolioInput>>,
}

impl UpdateContent {
    pub fn split(self) -> (UpdateProfile, CollectionUpdates) {
        (
            UpdateProfile {
                name: self.name,
                title: self.title,
                bio: self.bio,
                about: self.about,
                email: self.email,
                phone: self.phone,
                location: self.location,
                website: self.website,
                profile_image: self.profile_image,
                about_image: self.about_image,
            },
            CollectionUpdates {
                skills: self.skills,
                education: self.education,
                experience: self.experience,
                portfolio: self.portfolio,
            },
        )
    }
}

/// Child rows of a page, each in display order.
#[derive(Debug, Clone, Default)]
pub struct ContentChildren {
    pub skills: Vec<skills::Model>,
    pub education: Vec<educations::Model>,
    pub experience: Vec<experiences::Model>,
    pub portfolio: Vec<portfolios::Model>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub about: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub profile_image: Option<String>,
    pub about_image: Option<String>,
    pub updated_at: Option<DateTimeUtc>,
}

impl ProfileResponse {
    pub fn build(m: Model, username: &str, api_base: &str) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            username: username.to_string(),
            profile_image: images::display_opt(m.profile_image.as_deref(), api_base),
            about_image: images::display_opt(m.about_image.as_deref(), api_base),
            name: m.name,
            title: m.title,
            bio: m.bio,
            about: m.about,
            email: m.email,
            phone: m.phone,
            location: m.location,
            website: m.website,
            updated_at: m.updated_at.or(Some(m.created_at)),
        }
    }
}

/// Full page content as served to the page renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub skills: Vec<skills::SkillResponse>,
    pub education: Vec<educations::Model>,
    pub experience: Vec<experiences::Model>,
    pub portfolio: Vec<portfolios::PortfolioResponse>,
}

impl ContentResponse {
    pub fn build(m: Model, children: ContentChildren, username: &str, api_base: &str) -> Self {
        Self {
            profile: ProfileResponse::build(m, username, api_base),
            skills: children.skills.into_iter().map(Into::into).collect(),
            education: children.education,
            experience: children.experience,
            portfolio: children
                .portfolio
                .into_iter()
                .map(|p| portfolios::PortfolioResponse::build(p, api_base))
                .collect(),
        }
    }
}
