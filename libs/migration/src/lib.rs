pub use sea_orm_migration::prelude::*;

mod m20200616_000001_create_accounts_modules;
mod m20200616_000002_create_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20200616_000001_create_accounts_modules::Migration),
            Box::new(m20200616_000002_create_events::Migration),
        ]
    }
}
