use std::path::PathBuf;

/// Unified database error type for all store operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Opening or pinging the database failed
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Only the `sqlite` driver is compiled in
    #[error("Unsupported database driver '{0}', expected 'sqlite'")]
    UnsupportedDriver(String),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    Migration(String),

    /// Seed script could not be read
    #[error("Failed to read seed file {path}: {source}")]
    Seed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SeaORM errors, including raw script execution failures
    #[cfg(feature = "sqlite")]
    #[error("{0}")]
    Orm(#[from] sea_orm::DbErr),

    /// Prepared statement errors
    #[cfg(feature = "sqlite")]
    #[error("{0}")]
    Query(#[from] sqlx::Error),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// The store was closed
    #[error("Database store is closed")]
    Closed,
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
