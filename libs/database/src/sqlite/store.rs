use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use sqlx::sqlite::{SqlitePool, SqliteStatement};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::config::{Driver, SqliteConfig};
use super::statements::StatementCache;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

/// Result of [`Store::migrate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Schema was already current
    NoChange,
    /// Number of migrations applied
    Applied(usize),
}

/// Handle to the router's SQLite database.
///
/// Cheap to clone; every clone shares one connection pool and one
/// [`StatementCache`].
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    db: DatabaseConnection,
    pool: SqlitePool,
    statements: StatementCache,
}

impl Store {
    /// Connect with `driver` and verify the connection with a ping.
    #[instrument(skip(config), fields(url = %config.url()))]
    pub async fn open(driver: &str, config: SqliteConfig) -> DatabaseResult<Self> {
        driver.parse::<Driver>()?;

        let db = Database::connect(config.into_connect_options())
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        db.ping()
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        let store = Self::from_connection(db)?;
        info!("Connected to SQLite database");
        Ok(store)
    }

    /// [`Store::open`] with exponential backoff between attempts.
    pub async fn open_with_retry(
        driver: &str,
        config: SqliteConfig,
        retry: RetryConfig,
    ) -> DatabaseResult<Self> {
        driver.parse::<Driver>()?;
        retry_with_backoff(|| Self::open(driver, config.clone()), retry).await
    }

    /// Wrap an existing SeaORM connection. Fails unless it is backed by SQLite.
    pub fn from_connection(db: DatabaseConnection) -> DatabaseResult<Self> {
        if db.get_database_backend() != DatabaseBackend::Sqlite {
            return Err(DatabaseError::UnsupportedDriver(format!(
                "{:?}",
                db.get_database_backend()
            )));
        }
        let pool = db.get_sqlite_connection_pool().clone();

        Ok(Self {
            inner: Arc::new(StoreInner {
                db,
                pool,
                statements: StatementCache::new(),
            }),
        })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.inner.db
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Parsed statement for `sql`, served from the cache after first use.
    pub async fn prepared(&self, sql: &str) -> DatabaseResult<Arc<SqliteStatement<'static>>> {
        if self.inner.pool.is_closed() {
            return Err(DatabaseError::Closed);
        }
        self.inner
            .statements
            .get_or_prepare(&self.inner.pool, sql)
            .await
    }

    pub fn cached_statements(&self) -> usize {
        self.inner.statements.len()
    }

    pub async fn ping(&self) -> DatabaseResult<()> {
        self.inner
            .db
            .ping()
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))
    }

    /// Apply pending migrations in version order.
    ///
    /// With `reset`, every table is dropped first and the full history is
    /// reapplied.
    #[instrument(skip(self))]
    pub async fn migrate<M: MigratorTrait>(&self, reset: bool) -> DatabaseResult<MigrationOutcome> {
        let db = &self.inner.db;

        if reset {
            warn!("Dropping all tables before migrating");
            M::fresh(db)
                .await
                .map_err(|e| DatabaseError::Migration(e.to_string()))?;
            self.inner.statements.clear();
            let applied = M::migrations().len();
            info!(applied, "Database reset and migrated");
            return Ok(MigrationOutcome::Applied(applied));
        }

        let pending = M::get_pending_migrations(db)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?
            .len();
        if pending == 0 {
            info!("Database schema is up to date");
            return Ok(MigrationOutcome::NoChange);
        }

        M::up(db, None)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
        info!(applied = pending, "Database migrated");
        Ok(MigrationOutcome::Applied(pending))
    }

    /// Execute the SQL script at `path`. Statement errors are returned untouched.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn seed(&self, path: impl AsRef<Path>) -> DatabaseResult<()> {
        let path = path.as_ref();
        let script = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DatabaseError::Seed {
                path: path.to_path_buf(),
                source,
            })?;

        self.inner.db.execute_unprepared(&script).await?;
        info!("Seed script applied");
        Ok(())
    }

    /// Release cached statements and close every pooled connection.
    pub async fn close(&self) {
        self.inner.statements.clear();
        self.inner.pool.close().await;
        info!("SQLite store closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.pool.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::{Row, Statement};
    use std::io::Write;

    mod fixtures {
        use sea_orm_migration::prelude::*;

        pub struct Migrator;

        #[async_trait::async_trait]
        impl MigratorTrait for Migrator {
            fn migrations() -> Vec<Box<dyn MigrationTrait>> {
                vec![Box::new(CreateWidgets)]
            }
        }

        #[derive(DeriveMigrationName)]
        pub struct CreateWidgets;

        #[async_trait::async_trait]
        impl MigrationTrait for CreateWidgets {
            async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
                manager
                    .get_connection()
                    .execute_unprepared("CREATE TABLE widgets (name TEXT PRIMARY KEY)")
                    .await?;
                Ok(())
            }

            async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
                manager
                    .get_connection()
                    .execute_unprepared("DROP TABLE widgets")
                    .await?;
                Ok(())
            }
        }
    }

    async fn open() -> Store {
        Store::open("sqlite", SqliteConfig::in_memory()).await.unwrap()
    }

    async fn widget_count(store: &Store) -> i64 {
        let statement = store.prepared("SELECT COUNT(*) FROM widgets").await.unwrap();
        let row = statement.query().fetch_one(store.pool()).await.unwrap();
        row.try_get(0).unwrap()
    }

    #[tokio::test]
    async fn test_open_rejects_unknown_driver() {
        let result = Store::open("pgx", SqliteConfig::in_memory()).await;
        assert!(matches!(result, Err(DatabaseError::UnsupportedDriver(_))));
    }

    #[tokio::test]
    async fn test_open_pings() {
        let store = open().await;
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_migrate_reports_no_change_on_second_run() {
        let store = open().await;

        let first = store.migrate::<fixtures::Migrator>(false).await.unwrap();
        let second = store.migrate::<fixtures::Migrator>(false).await.unwrap();

        assert_eq!(first, MigrationOutcome::Applied(1));
        assert_eq!(second, MigrationOutcome::NoChange);
    }

    #[tokio::test]
    async fn test_migrate_reset_drops_existing_rows() {
        let store = open().await;
        store.migrate::<fixtures::Migrator>(false).await.unwrap();
        store
            .connection()
            .execute_unprepared("INSERT INTO widgets (name) VALUES ('a'), ('b')")
            .await
            .unwrap();
        assert_eq!(widget_count(&store).await, 2);

        let outcome = store.migrate::<fixtures::Migrator>(true).await.unwrap();

        assert_eq!(outcome, MigrationOutcome::Applied(1));
        assert_eq!(widget_count(&store).await, 0);
    }

    #[tokio::test]
    async fn test_seed_executes_script() {
        let store = open().await;
        store.migrate::<fixtures::Migrator>(false).await.unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "INSERT INTO widgets (name) VALUES ('seeded');").unwrap();
        writeln!(file, "INSERT INTO widgets (name) VALUES ('again');").unwrap();

        store.seed(file.path()).await.unwrap();

        assert_eq!(widget_count(&store).await, 2);
    }

    #[tokio::test]
    async fn test_seed_surfaces_sql_errors() {
        let store = open().await;
        store.migrate::<fixtures::Migrator>(false).await.unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "INSERT INTO missing_table (name) VALUES ('x');").unwrap();

        let err = store.seed(file.path()).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Orm(_)));
    }

    #[tokio::test]
    async fn test_seed_missing_file() {
        let store = open().await;
        let err = store.seed("/nonexistent/seed.sql").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Seed { .. }));
    }

    #[tokio::test]
    async fn test_prepared_statements_are_cached() {
        let store = open().await;
        store.migrate::<fixtures::Migrator>(false).await.unwrap();

        widget_count(&store).await;
        widget_count(&store).await;

        assert_eq!(store.cached_statements(), 1);
    }

    #[tokio::test]
    async fn test_close_releases_statements() {
        let store = open().await;
        store.migrate::<fixtures::Migrator>(false).await.unwrap();
        widget_count(&store).await;

        store.close().await;

        assert!(store.is_closed());
        assert_eq!(store.cached_statements(), 0);
        assert!(matches!(
            store.prepared("SELECT 1").await,
            Err(DatabaseError::Closed)
        ));
    }
}
