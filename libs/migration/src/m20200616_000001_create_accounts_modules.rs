use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per (module, account) pair opted into the testing channel
        manager
            .create_table(
                Table::create()
                    .table(AccountsModules::Table)
                    .if_not_exists()
                    .col(string(AccountsModules::AccountId))
                    .col(string(AccountsModules::ModuleName))
                    .primary_key(
                        Index::create()
                            .col(AccountsModules::ModuleName)
                            .col(AccountsModules::AccountId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountsModules::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AccountsModules {
    Table,
    AccountId,
    ModuleName,
}
