use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Site chrome (header/footer/menu). A null `user_id` is the global default row.
#[derive(DeriveIden)]
enum SiteSettings {
    Table,
    Id,
    UserId,
    SiteTitle,
    HeaderText,
    FooterText,
    MenuItems,
    PrimaryColor,
    SecondaryColor,
    BackgroundColor,
    TextColor,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ThemePreferences {
    Table,
    Id,
    UserId,
    PrimaryColor,
    SecondaryColor,
    AccentColor,
    BackgroundColor,
    TextColor,
    FontFamily,
    Mode,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SiteSettings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SiteSettings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SiteSettings::UserId).uuid().unique_key())
                    .col(ColumnDef::new(SiteSettings::SiteTitle).string().not_null().default(""))
                    .col(ColumnDef::new(SiteSettings::HeaderText).string().not_null().default(""))
                    .col(ColumnDef::new(SiteSettings::FooterText).string().not_null().default(""))
                    .col(ColumnDef::new(SiteSettings::MenuItems).json().not_null())
                    .col(ColumnDef::new(SiteSettings::PrimaryColor).string().not_null())
                    .col(ColumnDef::new(SiteSettings::SecondaryColor).string().not_null())
                    .col(ColumnDef::new(SiteSettings::BackgroundColor).string().not_null())
                    .col(ColumnDef::new(SiteSettings::TextColor).string().not_null())
                    .col(ColumnDef::new(SiteSettings::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_site_settings_user_id")
                            .from(SiteSettings::Table, SiteSettings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ThemePreferences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ThemePreferences::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ThemePreferences::UserId).uuid().unique_key())
                    .col(ColumnDef::new(ThemePreferences::PrimaryColor).string())
                    .col(ColumnDef::new(ThemePreferences::SecondaryColor).string())
                    .col(ColumnDef::new(ThemePreferences::AccentColor).string())
                    .col(ColumnDef::new(ThemePreferences::BackgroundColor).string())
                    .col(ColumnDef::new(ThemePreferences::TextColor).string())
                    .col(ColumnDef::new(ThemePreferences::FontFamily).string())
                    .col(ColumnDef::new(ThemePreferences::Mode).string())
                    .col(ColumnDef::new(ThemePreferences::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_theme_preferences_user_id")
                            .from(ThemePreferences::Table, ThemePreferences::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ThemePreferences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SiteSettings::Table).to_owned())
            .await
    }
}
