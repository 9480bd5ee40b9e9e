//! Check command - Connectivity test without touching the schema.

use common::{AppResult, DatabaseConfig};
use user_store_lib::dsn::{redact_url, resolve_database_url};
use user_store_lib::Database;

/// Execute the check command
pub async fn execute() -> AppResult<()> {
    let config = DatabaseConfig::from_env();
    let target = resolve_database_url(&config.dsn)?;

    let db = Database::connect_without_migrations(&config).await?;
    db.ping().await?;
    println!("Connected to {} ({})", redact_url(&target.url), db.backend());

    db.close().await?;
    Ok(())
}
