use sea_orm::*;
use uuid::Uuid;

use crate::models::users;

/// Fetch a single user by ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Look up by username. `username` must already be normalized.
pub async fn find_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db)
        .await
}

/// Look up by username or email, whichever `identifier` matches.
pub async fn find_by_login(
    db: &DatabaseConnection,
    identifier: &str,
) -> Result<Option<users::Model>, DbErr> {
    let identifier = identifier.trim().to_lowercase();
    users::Entity::find()
        .filter(
            Condition::any()
                .add(users::Column::Username.eq(identifier.as_str()))
                .add(users::Column::Email.eq(identifier.as_str())),
        )
        .one(db)
        .await
}

pub async fn username_taken(db: &DatabaseConnection, username: &str) -> Result<bool, DbErr> {
    Ok(users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .count(db)
        .await?
        > 0)
}

pub async fn email_taken(db: &DatabaseConnection, email: &str) -> Result<bool, DbErr> {
    Ok(users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .count(db)
        .await?
        > 0)
}

/// Insert a user together with their empty page content, atomically.
pub async fn create_user_with_content(
    db: &DatabaseConnection,
    username: String,
    email: String,
    password_hash: String,
) -> Result<users::Model, DbErr> {
    let txn = db.begin().await?;
    let now = chrono::Utc::now();

    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username),
        email: Set(email),
        password_hash: Set(password_hash),
        single_session: Set(false),
        token_version: Set(0),
        created_at: Set(now),
        updated_at: Set(None),
    }
    .insert(&txn)
    .await?;

    super::content::insert_empty_content(&txn, user.id).await?;

    txn.commit().await?;
    Ok(user)
}

/// Increment the session generation, revoking tokens issued before it.
pub async fn bump_token_version(
    db: &DatabaseConnection,
    user: users::Model,
) -> Result<users::Model, DbErr> {
    let next = user.token_version.wrapping_add(1);
    let mut active: users::ActiveModel = user.into();
    active.token_version = Set(next);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

pub async fn set_single_session(
    db: &DatabaseConnection,
    id: Uuid,
    single_session: bool,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();
    active.single_session = Set(single_session);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}
