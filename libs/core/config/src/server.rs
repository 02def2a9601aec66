use crate::{env_or_default, ConfigError, FromEnv};
use std::net::Ipv4Addr;

/// Listener configuration for an HTTP server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Prometheus listener, read from `METRICS_HOST` / `METRICS_PORT` (default 2112).
    pub fn metrics_from_env() -> Result<Self, ConfigError> {
        Self::from_vars("METRICS_HOST", "METRICS_PORT", 2112)
    }

    fn from_vars(host_key: &str, port_key: &str, default_port: u16) -> Result<Self, ConfigError> {
        let host = env_or_default(host_key, &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_or_default(port_key, &default_port.to_string())
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: port_key.to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self { host, port })
    }
}

impl FromEnv for ServerConfig {
    /// - HOST: defaults to 0.0.0.0
    /// - PORT: defaults to 8080
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars("HOST", "PORT", 8080)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 8080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_from_env_with_defaults() {
        temp_env::with_vars([("HOST", None::<&str>), ("PORT", None::<&str>)], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.address(), "0.0.0.0:8080");
        });
    }

    #[test]
    fn test_server_config_from_env_with_custom_values() {
        temp_env::with_vars(
            [("HOST", Some("127.0.0.1")), ("PORT", Some("3000"))],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.host, "127.0.0.1");
                assert_eq!(config.port, 3000);
            },
        );
    }

    #[test]
    fn test_server_config_from_env_port_out_of_range() {
        temp_env::with_var("PORT", Some("99999"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
    }

    #[test]
    fn test_metrics_listener_defaults_to_2112() {
        temp_env::with_vars(
            [("METRICS_HOST", None::<&str>), ("METRICS_PORT", None::<&str>)],
            || {
                let config = ServerConfig::metrics_from_env().unwrap();
                assert_eq!(config.address(), "0.0.0.0:2112");
            },
        );
    }

    #[test]
    fn test_metrics_listener_invalid_port() {
        temp_env::with_var("METRICS_PORT", Some("metrics"), || {
            let err = ServerConfig::metrics_from_env().unwrap_err();
            assert!(err.to_string().contains("METRICS_PORT"));
        });
    }
}
