//! SQLite store: connection, prepared statement cache, migrations and seeding.

mod config;
mod health;
mod statements;
mod store;

pub use config::{Driver, SqliteConfig};
pub use health::check_health;
pub use statements::StatementCache;
pub use store::{MigrationOutcome, Store};

// Re-export driver types used by repositories
pub use sea_orm::DatabaseConnection;
pub use sea_orm_migration::MigratorTrait;
pub use sqlx::sqlite::{SqlitePool, SqliteQueryResult, SqliteRow, SqliteStatement};
