//! Catalog API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use catalog_core::StatusPolicy;
use catalog_db::DbConfig;

/// Catalog API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Interface to bind
    pub bind_addr: IpAddr,

    /// SQLite database file
    pub database_path: String,

    /// Pool size
    pub db_max_connections: u32,

    /// Order status change rule
    pub order_status_policy: StatusPolicy,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ApiConfig {
            http_port: parse_var(&lookup, "CATALOG_HTTP_PORT", "1337")?,

            bind_addr: parse_var(&lookup, "CATALOG_BIND_ADDR", "0.0.0.0")?,

            database_path: lookup("CATALOG_DB_PATH").unwrap_or_else(|| "./catalog.db".to_string()),

            db_max_connections: parse_var(&lookup, "CATALOG_DB_MAX_CONNECTIONS", "5")?,

            order_status_policy: parse_var(&lookup, "CATALOG_ORDER_STATUS_POLICY", "permissive")?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("CATALOG_DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Socket address to listen on.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }

    /// Pool configuration derived from this config.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.db_max_connections)
            .status_policy(self.order_status_policy)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
