use sea_orm::*;
use uuid::Uuid;

use crate::models::edit_histories::{self, CreateEditHistory, HistoryPage, HistoryQuery};
use crate::models::PaginationQuery;

pub async fn insert<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    input: CreateEditHistory,
) -> Result<edit_histories::Model, DbErr> {
    edit_histories::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        page: Set(input.page),
        section: Set(input.section),
        action: Set(input.action),
        old_value: Set(input.old_value),
        new_value: Set(input.new_value),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(db)
    .await
}

/// One page of the user's history, newest first.
pub async fn list_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
    query: HistoryQuery,
) -> Result<HistoryPage, DbErr> {
    let paging = PaginationQuery {
        page: query.page,
        limit: query.limit,
    };
    let (page, limit) = (paging.page(), paging.limit());

    let mut select =
        edit_histories::Entity::find().filter(edit_histories::Column::UserId.eq(user_id));
    if let Some(section) = query.section.filter(|s| !s.trim().is_empty()) {
        select = select.filter(edit_histories::Column::Section.eq(section));
    }

    let paginator = select
        .order_by_desc(edit_histories::Column::CreatedAt)
        .paginate(db, limit);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;

    Ok(HistoryPage {
        items,
        page,
        limit,
        total,
    })
}
