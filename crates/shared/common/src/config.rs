//! Shared configuration structures.
//!
//! Values come from environment variables (a `.env` file is loaded by the
//! binary before these are read). Every field has a development default.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECONDS, DEFAULT_DATABASE_DSN, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_CONNECTIONS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_SERVICE_NAME,
};

/// Base service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service name for logging
    pub service_name: String,
    /// Host address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Log level
    pub log_level: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            service_name: lookup("SERVICE_NAME").unwrap_or(defaults.service_name),
            host: lookup("SERVER_HOST").unwrap_or(defaults.host),
            port: lookup("SERVER_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Database configuration.
///
/// `dsn` accepts either a driver-style DSN
/// (`user:password@tcp(host:port)/dbname`) or a connection URL.
#[derive(Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(skip_serializing)]
    pub dsn: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
    /// Log every statement through the driver
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            dsn: lookup("DATABASE_DSN")
                .or_else(|| lookup("DATABASE_URL"))
                .unwrap_or(defaults.dsn),
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_connections),
            min_connections: lookup("DB_MIN_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_connections),
            connect_timeout_seconds: lookup("DB_CONNECT_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.connect_timeout_seconds),
            sqlx_logging: lookup("DB_SQLX_LOGGING")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(defaults.sqlx_logging),
        }
    }

    /// Connect timeout as a duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Configuration pointing at the given DSN, defaults elsewhere.
    pub fn with_dsn(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            ..Self::default()
        }
    }
}

// Don't expose credentials in debug output
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("dsn", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("sqlx_logging", &self.sqlx_logging)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: DEFAULT_DATABASE_DSN.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECONDS,
            sqlx_logging: false,
        }
    }
}
