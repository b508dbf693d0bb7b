use sea_orm::*;
use uuid::Uuid;

use crate::models::contact_messages::{self, CreateContactMessage};

pub async fn insert_message(
    db: &DatabaseConnection,
    recipient_id: Uuid,
    input: CreateContactMessage,
) -> Result<contact_messages::Model, DbErr> {
    contact_messages::ActiveModel {
        id: Set(Uuid::new_v4()),
        recipient_id: Set(recipient_id),
        name: Set(input.name.trim().to_string()),
        email: Set(input.email.trim().to_string()),
        message: Set(input.message.trim().to_string()),
        is_read: Set(false),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(db)
    .await
}

/// Messages addressed to `recipient_id`, newest first.
pub async fn list_for_recipient(
    db: &DatabaseConnection,
    recipient_id: Uuid,
    unread_only: bool,
) -> Result<Vec<contact_messages::Model>, DbErr> {
    let mut query = contact_messages::Entity::find()
        .filter(contact_messages::Column::RecipientId.eq(recipient_id));
    if unread_only {
        query = query.filter(contact_messages::Column::IsRead.eq(false));
    }
    query
        .order_by_desc(contact_messages::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn find_for_recipient(
    db: &DatabaseConnection,
    id: Uuid,
    recipient_id: Uuid,
) -> Result<Option<contact_messages::Model>, DbErr> {
    contact_messages::Entity::find_by_id(id)
        .filter(contact_messages::Column::RecipientId.eq(recipient_id))
        .one(db)
        .await
}

pub async fn mark_read(
    db: &DatabaseConnection,
    message: contact_messages::Model,
) -> Result<contact_messages::Model, DbErr> {
    let mut active: contact_messages::ActiveModel = message.into();
    active.is_read = Set(true);
    active.update(db).await
}

pub async fn delete_message(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    contact_messages::Entity::delete_by_id(id).exec(db).await
}
