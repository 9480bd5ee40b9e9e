//! Workspace-wide constants.
//!
//! Centralized location for default values used when the environment
//! does not provide an override.

// =============================================================================
// Service
// =============================================================================

/// Default service name used in logs
pub const DEFAULT_SERVICE_NAME: &str = "trader-api";

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port (the port the web frontend talks to)
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Database
// =============================================================================

/// Default data source name (local development MySQL, passwordless root)
pub const DEFAULT_DATABASE_DSN: &str = "root:@tcp(localhost:3306)/db_go_r";

/// Default MySQL port when a DSN omits it
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Default MySQL host when a DSN omits the address
pub const DEFAULT_MYSQL_HOST: &str = "127.0.0.1";

/// Default maximum number of pooled connections
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default minimum number of pooled connections
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 8;
