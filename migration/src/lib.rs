pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_page_contents_table;
mod m20250301_000003_create_content_collections;
mod m20250302_000001_create_layouts_table;
mod m20250302_000002_create_widgets_table;
mod m20250303_000001_create_contact_messages_table;
mod m20250303_000002_create_settings_and_theme_tables;
mod m20250304_000001_create_edit_histories_table;
mod m20250305_000001_add_indexes;
mod m20250306_000001_unique_active_layout;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_page_contents_table::Migration),
            Box::new(m20250301_000003_create_content_collections::Migration),
            Box::new(m20250302_000001_create_layouts_table::Migration),
            Box::new(m20250302_000002_create_widgets_table::Migration),
            Box::new(m20250303_000001_create_contact_messages_table::Migration),
            Box::new(m20250303_000002_create_settings_and_theme_tables::Migration),
            Box::new(m20250304_000001_create_edit_histories_table::Migration),
            Box::new(m20250305_000001_add_indexes::Migration),
            Box::new(m20250306_000001_unique_active_layout::Migration),
        ]
    }
}
