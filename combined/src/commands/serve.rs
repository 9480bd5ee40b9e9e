//! Serve command - Opens the database and starts the HTTP server.

use std::sync::Arc;

use common::{AppResult, DatabaseConfig, ServiceConfig};

use crate::cli::ServeArgs;

/// Execute the serve command.
///
/// Owns the database lifecycle: opened (and migrated) before the server
/// binds, closed after it drains.
pub async fn execute(args: ServeArgs) -> AppResult<()> {
    let mut service = ServiceConfig::from_env();
    service.host = args.host;
    service.port = args.port;

    let db_config = DatabaseConfig::from_env();
    tracing::debug!(?db_config, "Configuration loaded");

    let database = user_store_lib::connect(&db_config).await?;

    let served = gateway_lib::run_server(Arc::new(database.clone()), service).await;
    let closed = database.close().await;

    served?;
    closed?;
    Ok(())
}
