use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `page_contents` table and its columns.
#[derive(DeriveIden)]
enum PageContents {
    Table,
    Id,
    UserId,
    Name,
    Title,
    Bio,
    About,
    Email,
    Phone,
    Location,
    Website,
    ProfileImage,
    AboutImage,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
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
                    .table(PageContents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PageContents::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PageContents::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PageContents::Name).string().not_null().default(""))
                    .col(ColumnDef::new(PageContents::Title).string().not_null().default(""))
                    .col(ColumnDef::new(PageContents::Bio).text().not_null().default(""))
                    .col(ColumnDef::new(PageContents::About).text().not_null().default(""))
                    .col(ColumnDef::new(PageContents::Email).string().not_null().default(""))
                    .col(ColumnDef::new(PageContents::Phone).string().not_null().default(""))
                    .col(
                        ColumnDef::new(PageContents::Location)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(PageContents::Website)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(PageContents::ProfileImage).text())
                    .col(ColumnDef::new(PageContents::AboutImage).text())
                    .col(
                        ColumnDef::new(PageContents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PageContents::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_page_contents_user_id")
                            .from(PageContents::Table, PageContents::UserId)
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
            .drop_table(Table::drop().table(PageContents::Table).to_owned())
            .await
    }
}
