use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Append-only audit rows written after content mutations.
#[derive(DeriveIden)]
enum EditHistories {
    Table,
    Id,
    UserId,
    Page,
    Section,
    Action,
    OldValue,
    NewValue,
    CreatedAt,
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
                    .table(EditHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EditHistories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EditHistories::UserId).uuid().not_null())
                    .col(ColumnDef::new(EditHistories::Page).string().not_null())
                    .col(ColumnDef::new(EditHistories::Section).string().not_null())
                    .col(ColumnDef::new(EditHistories::Action).string().not_null())
                    .col(ColumnDef::new(EditHistories::OldValue).json())
                    .col(ColumnDef::new(EditHistories::NewValue).json())
                    .col(
                        ColumnDef::new(EditHistories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_edit_histories_user_id")
                            .from(EditHistories::Table, EditHistories::UserId)
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
            .drop_table(Table::drop().table(EditHistories::Table).to_owned())
            .await
    }
}
