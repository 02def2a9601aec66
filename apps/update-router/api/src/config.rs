use core_config::server::ServerConfig;
use core_config::tracing::LogConfig;
use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse};
use database::SqliteConfig;
use database::sqlite::Driver;
use std::path::PathBuf;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration, assembled once at startup and passed
/// to every component that needs it.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub log: LogConfig,
    pub server: ServerConfig,
    pub metrics: ServerConfig,
    pub database: DatabaseSettings,
    pub api: ApiConfig,
    /// Event mirroring, enabled by `NATS_URL`
    pub mirror: Option<MirrorConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let log = LogConfig::from_env_for(&environment)?;
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let metrics = ServerConfig::metrics_from_env()?; // METRICS_PORT=2112

        Ok(Self {
            environment,
            log,
            server,
            metrics,
            database: DatabaseSettings::from_env()?,
            api: ApiConfig::from_env()?,
            mirror: MirrorConfig::from_env()?,
        })
    }
}

/// Store settings
#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub driver: String,
    pub sqlite: SqliteConfig,
    /// Drop every table before migrating
    pub reset: bool,
    /// SQL script run after migrations
    pub seed_path: Option<PathBuf>,
}

impl FromEnv for DatabaseSettings {
    /// - DB_DRIVER: only `sqlite` (default)
    /// - DB_RESET: defaults to false
    /// - SEED_PATH: unset by default
    fn from_env() -> Result<Self, ConfigError> {
        let driver = env_or_default("DB_DRIVER", "sqlite");
        driver
            .parse::<Driver>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "DB_DRIVER".to_string(),
                value: driver.clone(),
                expected: "sqlite".to_string(),
            })?;

        Ok(Self {
            driver,
            sqlite: SqliteConfig::from_env()?,
            reset: env_parse("DB_RESET", "false")?,
            seed_path: env_optional("SEED_PATH").map(PathBuf::from),
        })
    }
}

/// Where the API is mounted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub path_prefixes: Vec<String>,
    pub app_name: String,
    pub api_version: String,
}

impl ApiConfig {
    /// Each prefix joined with the app name and version, e.g.
    /// `/api/module-update-router/v1`.
    pub fn roots(&self) -> Vec<String> {
        self.path_prefixes
            .iter()
            .map(|prefix| join_path([prefix.as_str(), &self.app_name, &self.api_version]))
            .collect()
    }
}

impl FromEnv for ApiConfig {
    /// - PATH_PREFIX: comma separated, defaults to `/api`
    /// - APP_NAME: defaults to `module-update-router`
    /// - API_VERSION: defaults to `v1`
    fn from_env() -> Result<Self, ConfigError> {
        let path_prefixes: Vec<String> = env_or_default("PATH_PREFIX", "/api")
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if path_prefixes.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "PATH_PREFIX".to_string(),
                value: String::new(),
                expected: "a comma separated list of paths".to_string(),
            });
        }

        Ok(Self {
            path_prefixes,
            app_name: env_or_default("APP_NAME", "module-update-router"),
            api_version: env_or_default("API_VERSION", "v1"),
        })
    }
}

/// Join path segments with single slashes and a leading slash.
fn join_path<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let parts: Vec<&str> = segments
        .into_iter()
        .flat_map(|s| s.split('/'))
        .filter(|s| !s.is_empty())
        .collect();
    format!("/{}", parts.join("/"))
}

/// Outbound event mirroring settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MirrorConfig {
    pub nats_url: String,
    pub topic: String,
    pub buffer: usize,
}

impl MirrorConfig {
    /// `None` unless `NATS_URL` is set.
    ///
    /// - METRICS_TOPIC: defaults to `client-metrics`
    /// - EVENT_BUFFER: defaults to 1000
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(nats_url) = env_optional("NATS_URL") else {
            return Ok(None);
        };

        Ok(Some(Self {
            nats_url,
            topic: env_or_default("METRICS_TOPIC", "client-metrics"),
            buffer: env_parse("EVENT_BUFFER", "1000")?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 10] = [
        "PATH_PREFIX",
        "APP_NAME",
        "API_VERSION",
        "DB_DRIVER",
        "DB_RESET",
        "SEED_PATH",
        "NATS_URL",
        "METRICS_TOPIC",
        "EVENT_BUFFER",
        "DATABASE_URL",
    ];

    fn with_env<F: FnOnce()>(overrides: &[(&str, &str)], f: F) {
        let vars: Vec<(&str, Option<&str>)> = VARS
            .iter()
            .map(|key| {
                let value = overrides.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
                (*key, value)
            })
            .collect();
        temp_env::with_vars(vars, f);
    }

    #[test]
    fn test_defaults() {
        with_env(&[], || {
            let config = Config::from_env().unwrap();

            assert_eq!(config.server.port, 8080);
            assert_eq!(config.database.driver, "sqlite");
            assert!(!config.database.reset);
            assert_eq!(config.database.seed_path, None);
            assert!(config.database.sqlite.is_in_memory());
            assert_eq!(config.api.roots(), ["/api/module-update-router/v1"]);
            assert_eq!(config.mirror, None);
        });
    }

    #[test]
    fn test_multiple_path_prefixes() {
        with_env(
            &[
                ("PATH_PREFIX", "/api, /r/insights/platform/,"),
                ("APP_NAME", "module-update-router"),
                ("API_VERSION", "v2"),
            ],
            || {
                let api = ApiConfig::from_env().unwrap();
                assert_eq!(
                    api.roots(),
                    [
                        "/api/module-update-router/v2",
                        "/r/insights/platform/module-update-router/v2"
                    ]
                );
            },
        );
    }

    #[test]
    fn test_unsupported_driver() {
        with_env(&[("DB_DRIVER", "pgx")], || {
            let err = DatabaseSettings::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "DB_DRIVER"));
        });
    }

    #[test]
    fn test_reset_and_seed() {
        with_env(&[("DB_RESET", "true"), ("SEED_PATH", "/seed/dev.sql")], || {
            let db = DatabaseSettings::from_env().unwrap();
            assert!(db.reset);
            assert_eq!(db.seed_path, Some(PathBuf::from("/seed/dev.sql")));
        });
    }

    #[test]
    fn test_invalid_reset_flag() {
        with_env(&[("DB_RESET", "sometimes")], || {
            let err = DatabaseSettings::from_env().unwrap_err();
            assert!(err.to_string().contains("DB_RESET"));
        });
    }

    #[test]
    fn test_mirror_enabled_by_nats_url() {
        with_env(
            &[("NATS_URL", "nats://localhost:4222"), ("EVENT_BUFFER", "16")],
            || {
                let mirror = MirrorConfig::from_env().unwrap().unwrap();
                assert_eq!(mirror.nats_url, "nats://localhost:4222");
                assert_eq!(mirror.topic, "client-metrics");
                assert_eq!(mirror.buffer, 16);
            },
        );
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path(["/", "app", "v1"]), "/app/v1");
        assert_eq!(join_path(["api/", "/app", "v1/"]), "/api/app/v1");
    }
}
