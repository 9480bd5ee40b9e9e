//! User Store Library
//!
//! Owns the database: resolves the configured data source name, opens the
//! connection and keeps the `users` table in line with its entity.
//!
//! There is no global handle. Callers receive a [`Database`] from
//! [`connect`] and pass it (or an `Arc<dyn ConnectionProbe>`) to whatever
//! needs it, then close it at shutdown.

pub mod dsn;
pub mod entities;
pub mod infra;

pub use dsn::{resolve_database_url, ConnectionTarget, DataSourceName};
pub use infra::{ConnectionProbe, Database, MigrationReport, SchemaChange};

#[cfg(any(test, feature = "test-utils"))]
pub use infra::MockConnectionProbe;

use tracing::info;

use common::{AppResult, DatabaseConfig};

/// Open the database and run the auto-migration for every entity.
pub async fn connect(config: &DatabaseConfig) -> AppResult<Database> {
    Database::connect(config).await
}

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    /// Apply pending changes
    Up,
    /// Report pending changes without applying them
    Status,
}

/// Run migrations (for CLI commands).
///
/// Returns the applied changes for [`MigrateAction::Up`] and the pending
/// ones for [`MigrateAction::Status`].
pub async fn run_migrations(
    config: &DatabaseConfig,
    action: MigrateAction,
) -> AppResult<MigrationReport> {
    let db = Database::connect_without_migrations(config).await?;

    let result = match action {
        MigrateAction::Up => db.auto_migrate().await.inspect(|report| {
            info!(changes = report.len(), "Migrations applied successfully");
        }),
        MigrateAction::Status => db.pending_changes().await,
    };
    let closed = db.close().await;

    let report = result?;
    closed?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_config() -> DatabaseConfig {
        DatabaseConfig {
            dsn: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..DatabaseConfig::default()
        }
    }

    #[tokio::test]
    async fn test_status_reports_pending_table() {
        let report = run_migrations(&sqlite_config(), MigrateAction::Status)
            .await
            .unwrap();
        assert_eq!(
            report.changes(),
            &[SchemaChange::CreateTable {
                table: "users".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_up_applies_changes() {
        let report = run_migrations(&sqlite_config(), MigrateAction::Up)
            .await
            .unwrap();
        assert_eq!(report.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_migration_returns_error_after_close() {
        // A file-backed database opened read-only cannot create tables.
        let path = std::env::temp_dir().join(format!(
            "user-store-readonly-{}.db",
            std::process::id()
        ));
        std::fs::File::create(&path).unwrap();
        let config = DatabaseConfig {
            dsn: format!("sqlite://{}?mode=ro", path.display()),
            ..sqlite_config()
        };

        let result = run_migrations(&config, MigrateAction::Up).await;
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(common::AppError::Database(_))));
    }
}
