use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `widgets` table and its columns.
#[derive(DeriveIden)]
enum Widgets {
    Table,
    Id,
    LayoutId,
    Kind,
    Title,
    Content,
    ImageUrl,
    X,
    Y,
    W,
    H,
    Order,
    IsVisible,
    Settings,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Layouts {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Widgets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Widgets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Widgets::LayoutId).uuid().not_null())
                    .col(ColumnDef::new(Widgets::Kind).string().not_null())
                    .col(ColumnDef::new(Widgets::Title).string())
                    .col(ColumnDef::new(Widgets::Content).text())
                    .col(ColumnDef::new(Widgets::ImageUrl).text())
                    .col(ColumnDef::new(Widgets::X).integer().not_null().default(0))
                    .col(ColumnDef::new(Widgets::Y).integer().not_null().default(0))
                    .col(ColumnDef::new(Widgets::W).integer().not_null().default(12))
                    .col(ColumnDef::new(Widgets::H).integer().not_null().default(4))
                    .col(ColumnDef::new(Widgets::Order).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Widgets::IsVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Widgets::Settings).json())
                    .col(
                        ColumnDef::new(Widgets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Widgets::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_widgets_layout_id")
                            .from(Widgets::Table, Widgets::LayoutId)
                            .to(Layouts::Table, Layouts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Widgets::Table).to_owned())
            .await
    }
}
