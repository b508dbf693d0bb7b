use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Layouts {
    Table,
    UserId,
}

#[derive(DeriveIden)]
enum Widgets {
    Table,
    LayoutId,
    Order,
}

#[derive(DeriveIden)]
enum ContactMessages {
    Table,
    RecipientId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum EditHistories {
    Table,
    UserId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Layout lookup by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_layouts_user_id")
                    .table(Layouts::Table)
                    .col(Layouts::UserId)
                    .to_owned(),
            )
            .await?;

        // Widgets are always read per layout in display order
        manager
            .create_index(
                Index::create()
                    .name("idx_widgets_layout_order")
                    .table(Widgets::Table)
                    .col(Widgets::LayoutId)
                    .col(Widgets::Order)
                    .to_owned(),
            )
            .await?;

        // Inbox listing, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_contact_messages_recipient_created")
                    .table(ContactMessages::Table)
                    .col(ContactMessages::RecipientId)
                    .col(ContactMessages::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_edit_histories_user_created")
                    .table(EditHistories::Table)
                    .col(EditHistories::UserId)
                    .col(EditHistories::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_layouts_user_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_widgets_layout_order").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_contact_messages_recipient_created")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_edit_histories_user_created").to_owned())
            .await?;

        Ok(())
    }
}
