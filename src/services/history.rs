use sea_orm::ConnectionTrait;
use serde_json::Value;
use uuid::Uuid;

use crate::db::history as history_db;
use crate::models::edit_histories::CreateEditHistory;

/// Append an audit row. Never fails the caller: errors are logged and dropped.
pub async fn record<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    page: &str,
    section: &str,
    action: &str,
    old_value: Option<Value>,
    new_value: Option<Value>,
) {
    let entry = CreateEditHistory {
        page: page.to_string(),
        section: section.to_string(),
        action: action.to_string(),
        old_value,
        new_value,
    };
    if let Err(e) = history_db::insert(db, user_id, entry).await {
        tracing::warn!(%user_id, page, section, action, "failed to record edit history: {e}");
    }
}
