use sea_orm::ConnectOptions;
use std::str::FromStr;
use std::time::Duration;

use crate::common::DatabaseError;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_or_default, env_parse};

const IN_MEMORY_KEEPALIVE: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Supported database drivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Driver {
    Sqlite,
}

impl FromStr for Driver {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Driver::Sqlite),
            other => Err(DatabaseError::UnsupportedDriver(other.to_string())),
        }
    }
}

/// SQLite connection pool settings.
///
/// In-memory databases live only as long as one pooled connection does, so
/// [`SqliteConfig::into_connect_options`] pins them to a single connection.
#[derive(Clone, Debug)]
pub struct SqliteConfig {
    /// Connection URL, e.g. `sqlite://router.db?mode=rwc` or `sqlite::memory:`
    pub url: String,

    /// Maximum number of pooled connections
    pub max_connections: u32,

    /// Minimum number of pooled connections
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,

    /// Log every statement through sqlx
    pub sqlx_logging: bool,
}

impl SqliteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// A private in-memory database, used by tests and local runs.
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:")
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    pub fn into_connect_options(self) -> ConnectOptions {
        let (max, min) = if self.is_in_memory() {
            (1, 1)
        } else {
            (self.max_connections, self.min_connections.min(self.max_connections))
        };

        let mut opt = ConnectOptions::new(&self.url);
        opt.max_connections(max)
            .min_connections(min)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .sqlx_logging(self.sqlx_logging);
        if self.is_in_memory() {
            // Recycling the only connection would drop the database with it.
            opt.idle_timeout(IN_MEMORY_KEEPALIVE)
                .max_lifetime(IN_MEMORY_KEEPALIVE);
        }
        opt
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 8,
            acquire_timeout_secs: 8,
            sqlx_logging: false,
        }
    }
}

/// Environment variables:
/// - `DATABASE_URL` (default: `sqlite::memory:`)
/// - `DB_MAX_CONNECTIONS` (default: 10)
/// - `DB_MIN_CONNECTIONS` (default: 1)
/// - `DB_CONNECT_TIMEOUT_SECS` (default: 8)
/// - `DB_ACQUIRE_TIMEOUT_SECS` (default: 8)
/// - `DB_SQLX_LOGGING` (default: false)
#[cfg(feature = "config")]
impl FromEnv for SqliteConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_or_default("DATABASE_URL", "sqlite::memory:"),
            max_connections: env_parse("DB_MAX_CONNECTIONS", "10")?,
            min_connections: env_parse("DB_MIN_CONNECTIONS", "1")?,
            connect_timeout_secs: env_parse("DB_CONNECT_TIMEOUT_SECS", "8")?,
            acquire_timeout_secs: env_parse("DB_ACQUIRE_TIMEOUT_SECS", "8")?,
            sqlx_logging: env_parse("DB_SQLX_LOGGING", "false")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_parse() {
        assert_eq!("sqlite".parse::<Driver>().unwrap(), Driver::Sqlite);
        assert_eq!("SQLite3".parse::<Driver>().unwrap(), Driver::Sqlite);

        let err = "pgx".parse::<Driver>().unwrap_err();
        assert!(matches!(err, DatabaseError::UnsupportedDriver(ref d) if d == "pgx"));
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(SqliteConfig::in_memory().is_in_memory());
        assert!(SqliteConfig::new("sqlite://file:router?mode=memory&cache=shared").is_in_memory());
        assert!(!SqliteConfig::new("sqlite://router.db?mode=rwc").is_in_memory());
    }

    #[test]
    fn test_config_new_keeps_pool_defaults() {
        let config = SqliteConfig::new("sqlite://router.db");
        assert_eq!(config.url(), "sqlite://router.db");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert!(!config.sqlx_logging);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_config_from_env_defaults() {
        temp_env::with_vars(
            [("DATABASE_URL", None::<&str>), ("DB_MAX_CONNECTIONS", None::<&str>)],
            || {
                let config = SqliteConfig::from_env().unwrap();
                assert!(config.is_in_memory());
                assert_eq!(config.max_connections, 10);
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_config_from_env_invalid_number() {
        temp_env::with_var("DB_MAX_CONNECTIONS", Some("many"), || {
            let err = SqliteConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
        });
    }
}
