pub mod contact_messages;
pub mod edit_histories;
pub mod educations;
pub mod experiences;
pub mod layouts;
pub mod page_contents;
pub mod portfolios;
pub mod site_settings;
pub mod skills;
pub mod theme_preferences;
pub mod users;
pub mod widgets;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}
