use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Skills {
    Table,
    Id,
    PageContentId,
    Name,
    SortOrder,
}

#[derive(DeriveIden)]
enum Educations {
    Table,
    Id,
    PageContentId,
    Kind,
    Field,
    Institution,
    Year,
    Gpa,
    Status,
    SortOrder,
}

#[derive(DeriveIden)]
enum Experiences {
    Table,
    Id,
    PageContentId,
    Title,
    Company,
    Location,
    Period,
    Description,
    SortOrder,
}

#[derive(DeriveIden)]
enum Portfolios {
    Table,
    Id,
    PageContentId,
    Title,
    Description,
    Image,
    Link,
    SortOrder,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum PageContents {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Skills::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Skills::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Skills::PageContentId).uuid().not_null())
                    .col(ColumnDef::new(Skills::Name).string().not_null())
                    .col(ColumnDef::new(Skills::SortOrder).integer().not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_skills_page_content_id")
                            .from(Skills::Table, Skills::PageContentId)
                            .to(PageContents::Table, PageContents::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Educations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Educations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Educations::PageContentId).uuid().not_null())
                    .col(ColumnDef::new(Educations::Kind).string().not_null())
                    .col(ColumnDef::new(Educations::Field).string().not_null().default(""))
                    .col(ColumnDef::new(Educations::Institution).string().not_null())
                    .col(ColumnDef::new(Educations::Year).string())
                    .col(ColumnDef::new(Educations::Gpa).string())
                    .col(ColumnDef::new(Educations::Status).string())
                    .col(
                        ColumnDef::new(Educations::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_educations_page_content_id")
                            .from(Educations::Table, Educations::PageContentId)
                            .to(PageContents::Table, PageContents::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Experiences::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Experiences::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Experiences::PageContentId).uuid().not_null())
                    .col(ColumnDef::new(Experiences::Title).string().not_null())
                    .col(ColumnDef::new(Experiences::Company).string().not_null())
                    .col(ColumnDef::new(Experiences::Location).string().not_null().default(""))
                    .col(ColumnDef::new(Experiences::Period).string().not_null().default(""))
                    .col(ColumnDef::new(Experiences::Description).text())
                    .col(
                        ColumnDef::new(Experiences::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_experiences_page_content_id")
                            .from(Experiences::Table, Experiences::PageContentId)
                            .to(PageContents::Table, PageContents::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Portfolios::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Portfolios::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Portfolios::PageContentId).uuid().not_null())
                    .col(ColumnDef::new(Portfolios::Title).string().not_null())
                    .col(ColumnDef::new(Portfolios::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Portfolios::Image).text())
                    .col(ColumnDef::new(Portfolios::Link).string())
                    .col(
                        ColumnDef::new(Portfolios::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolios_page_content_id")
                            .from(Portfolios::Table, Portfolios::PageContentId)
                            .to(PageContents::Table, PageContents::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Portfolios::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Experiences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Educations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Skills::Table).to_owned())
            .await
    }
}
