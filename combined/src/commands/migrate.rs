//! Migrate command - Schema auto-migration management.

use common::{AppResult, DatabaseConfig};
use user_store_lib::MigrateAction;

use crate::cli::{MigrateArgs, MigrateCommand};

/// Execute the migrate command
pub async fn execute(args: MigrateArgs) -> AppResult<()> {
    let config = DatabaseConfig::from_env();

    match args.action {
        MigrateCommand::Up => {
            tracing::info!("Running auto-migration...");
            let report = user_store_lib::run_migrations(&config, MigrateAction::Up).await?;
            if report.is_empty() {
                tracing::info!("Schema already up to date");
            }
        }
        MigrateCommand::Status => {
            tracing::info!("Checking schema against entities...");
            let report = user_store_lib::run_migrations(&config, MigrateAction::Status).await?;
            if report.is_empty() {
                println!("Schema is up to date");
            }
            for change in report.changes() {
                println!("[ ] {}", change);
            }
        }
    }

    Ok(())
}
