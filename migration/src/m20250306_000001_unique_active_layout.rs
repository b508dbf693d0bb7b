use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Partial indexes are not expressible through the index builder; both Postgres
// and SQLite accept this statement as-is.
const CREATE: &str = "CREATE UNIQUE INDEX IF NOT EXISTS uq_layouts_active_owner \
                      ON layouts (user_id) WHERE is_active";
const DROP: &str = "DROP INDEX IF EXISTS uq_layouts_active_owner";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One active layout per user. Rows with a NULL owner (the global
        // default) are not covered: NULLs never collide in a unique index.
        manager.get_connection().execute_unprepared(CREATE).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(DROP).await?;
        Ok(())
    }
}
