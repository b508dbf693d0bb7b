use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use uuid::Uuid;

use crate::models::educations::{self, EducationInput};
use crate::models::experiences::{self, ExperienceInput};
use crate::models::page_contents::{self, CollectionUpdates, ContentChildren, UpdateProfile};
use crate::models::portfolios::{self, PortfolioInput};
use crate::models::skills::{self, SkillInput};

fn empty_content(user_id: Uuid) -> page_contents::ActiveModel {
    page_contents::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        name: Set(String::new()),
        title: Set(String::new()),
        bio: Set(String::new()),
        about: Set(String::new()),
        email: Set(String::new()),
        phone: Set(String::new()),
        location: Set(String::new()),
        website: Set(String::new()),
        profile_image: Set(None),
        about_image: Set(None),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    }
}

pub async fn find_by_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Option<page_contents::Model>, DbErr> {
    page_contents::Entity::find()
        .filter(page_contents::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// The user's content row, created empty on first access. The only place
/// content rows are created outside registration. Safe inside a transaction:
/// a concurrent insert is absorbed by `ON CONFLICT DO NOTHING` instead of
/// failing the statement.
pub async fn get_or_create_content<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<page_contents::Model, DbErr> {
    if let Some(existing) = find_by_user(db, user_id).await? {
        return Ok(existing);
    }

    insert_empty_content(db, user_id).await?;
    find_by_user(db, user_id)
        .await?
        .ok_or(DbErr::RecordNotFound("Page content not found".to_string()))
}

/// Insert an empty content row unless the user already has one. Returns
/// whether a row was written.
pub async fn insert_empty_content<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<bool, DbErr> {
    let result = page_contents::Entity::insert(empty_content(user_id))
        .on_conflict(
            OnConflict::column(page_contents::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;
    match result {
        Ok(rows) => Ok(rows > 0),
        Err(DbErr::RecordNotInserted) => Ok(false),
        Err(e) => Err(e),
    }
}

/// All child collections of a content row, each in display order.
pub async fn load_children<C: ConnectionTrait>(
    db: &C,
    content_id: Uuid,
) -> Result<ContentChildren, DbErr> {
    let skills = skills::Entity::find()
        .filter(skills::Column::PageContentId.eq(content_id))
        .order_by_asc(skills::Column::SortOrder)
        .all(db)
        .await?;
    let education = educations::Entity::find()
        .filter(educations::Column::PageContentId.eq(content_id))
        .order_by_asc(educations::Column::SortOrder)
        .all(db)
        .await?;
    let experience = experiences::Entity::find()
        .filter(experiences::Column::PageContentId.eq(content_id))
        .order_by_asc(experiences::Column::SortOrder)
        .all(db)
        .await?;
    let portfolio = portfolios::Entity::find()
        .filter(portfolios::Column::PageContentId.eq(content_id))
        .order_by_asc(portfolios::Column::SortOrder)
        .all(db)
        .await?;

    Ok(ContentChildren {
        skills,
        education,
        experience,
        portfolio,
    })
}

fn clearable(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Patch the scalar fields. Image fields must already be normalized; an
/// empty string clears the image.
pub async fn update_fields<C: ConnectionTrait>(
    db: &C,
    content: page_contents::Model,
    input: UpdateProfile,
) -> Result<page_contents::Model, DbErr> {
    let mut active: page_contents::ActiveModel = content.into();

    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(bio) = input.bio {
        active.bio = Set(bio);
    }
    if let Some(about) = input.about {
        active.about = Set(about);
    }
    if let Some(email) = input.email {
        active.email = Set(email);
    }
    if let Some(phone) = input.phone {
        active.phone = Set(phone);
    }
    if let Some(location) = input.location {
        active.location = Set(location);
    }
    if let Some(website) = input.website {
        active.website = Set(website);
    }
    if let Some(image) = input.profile_image {
        active.profile_image = Set(clearable(image));
    }
    if let Some(image) = input.about_image {
        active.about_image = Set(clearable(image));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

pub async fn replace_skills<C: ConnectionTrait>(
    db: &C,
    content_id: Uuid,
    items: Vec<SkillInput>,
) -> Result<(), DbErr> {
    skills::Entity::delete_many()
        .filter(skills::Column::PageContentId.eq(content_id))
        .exec(db)
        .await?;

    let rows: Vec<skills::ActiveModel> = items
        .iter()
        .map(|s| s.name().trim().to_string())
        .filter(|name| !name.is_empty())
        .enumerate()
        .map(|(i, name)| skills::ActiveModel {
            id: Set(Uuid::new_v4()),
            page_content_id: Set(content_id),
            name: Set(name),
            sort_order: Set(i as i32),
        })
        .collect();
    if !rows.is_empty() {
        skills::Entity::insert_many(rows).exec_without_returning(db).await?;
    }
    Ok(())
}

pub async fn replace_educations<C: ConnectionTrait>(
    db: &C,
    content_id: Uuid,
    items: Vec<EducationInput>,
) -> Result<(), DbErr> {
    educations::Entity::delete_many()
        .filter(educations::Column::PageContentId.eq(content_id))
        .exec(db)
        .await?;

    let rows: Vec<educations::ActiveModel> = items
        .into_iter()
        .enumerate()
        .map(|(i, e)| educations::ActiveModel {
            id: Set(Uuid::new_v4()),
            page_content_id: Set(content_id),
            kind: Set(e.kind),
            field: Set(e.field),
            institution: Set(e.institution),
            year: Set(e.year),
            gpa: Set(e.gpa),
            status: Set(e.status),
            sort_order: Set(i as i32),
        })
        .collect();
    if !rows.is_empty() {
        educations::Entity::insert_many(rows).exec_without_returning(db).await?;
    }
    Ok(())
}

pub async fn replace_experiences<C: ConnectionTrait>(
    db: &C,
    content_id: Uuid,
    items: Vec<ExperienceInput>,
) -> Result<(), DbErr> {
    experiences::Entity::delete_many()
        .filter(experiences::Column::PageContentId.eq(content_id))
        .exec(db)
        .await?;

    let rows: Vec<experiences::ActiveModel> = items
        .into_iter()
        .enumerate()
        .map(|(i, e)| experiences::ActiveModel {
            id: Set(Uuid::new_v4()),
            page_content_id: Set(content_id),
            title: Set(e.title),
            company: Set(e.company),
            location: Set(e.location),
            period: Set(e.period),
            description: Set(e.description),
            sort_order: Set(i as i32),
        })
        .collect();
    if !rows.is_empty() {
        experiences::Entity::insert_many(rows).exec_without_returning(db).await?;
    }
    Ok(())
}

/// Items' `image` fields must already be normalized keys.
pub async fn replace_portfolios<C: ConnectionTrait>(
    db: &C,
    content_id: Uuid,
    items: Vec<PortfolioInput>,
) -> Result<(), DbErr> {
    portfolios::Entity::delete_many()
        .filter(portfolios::Column::PageContentId.eq(content_id))
        .exec(db)
        .await?;

    let rows: Vec<portfolios::ActiveModel> = items
        .into_iter()
        .enumerate()
        .map(|(i, p)| portfolios::ActiveModel {
            id: Set(Uuid::new_v4()),
            page_content_id: Set(content_id),
            title: Set(p.title),
            description: Set(p.description),
            image: Set(p.image.and_then(clearable)),
            link: Set(p.link.and_then(clearable)),
            sort_order: Set(i as i32),
        })
        .collect();
    if !rows.is_empty() {
        portfolios::Entity::insert_many(rows).exec_without_returning(db).await?;
    }
    Ok(())
}

/// Scalar patch plus wholesale replacement of every collection present in
/// `collections`, all in one transaction.
pub async fn update_content(
    db: &DatabaseConnection,
    user_id: Uuid,
    fields: UpdateProfile,
    collections: CollectionUpdates,
) -> Result<(page_contents::Model, ContentChildren), DbErr> {
    let txn = db.begin().await?;

    let content = get_or_create_content(&txn, user_id).await?;
    let content = update_fields(&txn, content, fields).await?;

    if let Some(items) = collections.skills {
        replace_skills(&txn, content.id, items).await?;
    }
    if let Some(items) = collections.education {
        replace_educations(&txn, content.id, items).await?;
    }
    if let Some(items) = collections.experience {
        replace_experiences(&txn, content.id, items).await?;
    }
    if let Some(items) = collections.portfolio {
        replace_portfolios(&txn, content.id, items).await?;
    }

    let children = load_children(&txn, content.id).await?;
    txn.commit().await?;
    Ok((content, children))
}

/// Set or clear one image field, returning the row and the key it replaced.
pub async fn set_image(
    db: &DatabaseConnection,
    user_id: Uuid,
    target: ImageTarget,
    key: Option<String>,
) -> Result<(page_contents::Model, Option<String>), DbErr> {
    let content = get_or_create_content(db, user_id).await?;
    let previous = match target {
        ImageTarget::Profile => content.profile_image.clone(),
        ImageTarget::About => content.about_image.clone(),
    };

    let mut active: page_contents::ActiveModel = content.into();
    match target {
        ImageTarget::Profile => active.profile_image = Set(key),
        ImageTarget::About => active.about_image = Set(key),
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    Ok((active.update(db).await?, previous))
}

/// Which image of a page an upload replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    Profile,
    About,
}

impl ImageTarget {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "" | "profile" => Some(ImageTarget::Profile),
            "about" => Some(ImageTarget::About),
            _ => None,
        }
    }
}

/// A portfolio item, if it belongs to `content_id`.
pub async fn find_portfolio_item(
    db: &DatabaseConnection,
    content_id: Uuid,
    item_id: Uuid,
) -> Result<Option<portfolios::Model>, DbErr> {
    portfolios::Entity::find_by_id(item_id)
        .filter(portfolios::Column::PageContentId.eq(content_id))
        .one(db)
        .await
}

pub async fn set_portfolio_image(
    db: &DatabaseConnection,
    item: portfolios::Model,
    key: String,
) -> Result<portfolios::Model, DbErr> {
    let mut active: portfolios::ActiveModel = item.into();
    active.image = Set(Some(key));
    active.update(db).await
}
