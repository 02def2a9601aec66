//! Data access primitives for the module update router.
//!
//! The router persists to SQLite through two layers:
//!
//! - **SeaORM** owns the connection, liveness checks and schema migrations.
//! - **sqlx** prepared statements, cached by query text, serve the handful of
//!   fixed queries the domain repositories issue.
//!
//! # Features
//!
//! - `sqlite` (default) - SQLite store, statement cache, migrations and seeding
//! - `config` - `core_config::FromEnv` for [`sqlite::SqliteConfig`]
//! - `all` - everything
//!
//! # Example
//!
//! ```ignore
//! use database::sqlite::{SqliteConfig, Store};
//! use migration::Migrator;
//!
//! let store = Store::open("sqlite", SqliteConfig::new("sqlite://router.db?mode=rwc")).await?;
//! store.migrate::<Migrator>(false).await?;
//! store.seed("fixtures/accounts.sql").await?;
//! ```

pub mod common;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use common::{DatabaseError, DatabaseResult};

#[cfg(feature = "sqlite")]
pub use sqlite::{MigrationOutcome, SqliteConfig, Store};
