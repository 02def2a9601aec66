use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::EventId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(Events::Phase))
                    // Unix nanoseconds, UTC
                    .col(big_integer(Events::StartedAt))
                    .col(integer(Events::Exit))
                    .col(text_null(Events::Exception))
                    .col(big_integer(Events::EndedAt))
                    .col(string(Events::MachineId))
                    .col(string(Events::CoreVersion))
                    .col(string_null(Events::CorePath))
                    .to_owned(),
            )
            .await?;

        // Listing orders by started_at and retention deletes by it
        manager
            .create_index(
                Index::create()
                    .name("idx_events_started_at")
                    .table(Events::Table)
                    .col(Events::StartedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Events {
    Table,
    EventId,
    Phase,
    StartedAt,
    Exit,
    Exception,
    EndedAt,
    MachineId,
    CoreVersion,
    CorePath,
}
