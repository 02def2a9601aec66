//! SQLite test infrastructure
//!
//! Provides a `TestDatabase` helper backed by a private in-memory SQLite
//! database with every migration applied.

use database::{SqliteConfig, Store};
use migration::Migrator;
use sea_orm::ConnectionTrait;

/// Migrated in-memory database, dropped together with its last connection.
pub struct TestDatabase {
    store: Store,
}

impl TestDatabase {
    /// Create a new test database with migrations applied
    ///
    /// # Example
    ///
    /// ```no_run
    /// use test_utils::TestDatabase;
    ///
    /// # async fn example() {
    /// let db = TestDatabase::new().await;
    /// let store = db.store();
    /// # }
    /// ```
    pub async fn new() -> Self {
        let store = Store::open("sqlite", SqliteConfig::in_memory())
            .await
            .expect("Failed to open in-memory SQLite database");

        store
            .migrate::<Migrator>(false)
            .await
            .expect("Failed to migrate test database");

        tracing::debug!("Test database ready (in-memory SQLite)");

        Self { store }
    }

    /// A handle sharing this database's pool and statement cache.
    pub fn store(&self) -> Store {
        self.store.clone()
    }

    /// Run raw SQL, e.g. fixture inserts.
    pub async fn execute(&self, sql: &str) {
        self.store
            .connection()
            .execute_unprepared(sql)
            .await
            .unwrap_or_else(|e| panic!("Failed to execute {sql:?}: {e}"));
    }

    /// Seed a membership row linking `account` to `module`.
    pub async fn add_membership(&self, module: &str, account: &str) {
        self.execute(&format!(
            "INSERT INTO accounts_modules (module_name, account_id) VALUES ('{module}', '{account}')"
        ))
        .await;
    }

    /// Number of rows in `table`.
    pub async fn count_rows(&self, table: &str) -> i64 {
        let row = self
            .store
            .connection()
            .query_one(sea_orm::Statement::from_string(
                sea_orm::DatabaseBackend::Sqlite,
                format!("SELECT COUNT(*) AS n FROM {table}"),
            ))
            .await
            .expect("Failed to count rows")
            .expect("COUNT(*) returned no row");
        row.try_get("", "n").expect("COUNT(*) was not an integer")
    }
}
