//! Database connection and initialization.

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbBackend,
    DbErr, Statement,
};

use common::{AppResult, DatabaseConfig};

use super::schema::{self, MigrationReport};
use crate::dsn::{redact_url, resolve_database_url};
use crate::entities::user;

/// Database wrapper for connection management.
///
/// Cheap to clone; every clone shares the same underlying pool. The owner
/// that opened it is expected to call [`Database::close`] at shutdown.
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the connection and run the auto-migration.
    ///
    /// Fails with the driver's error when the database cannot be reached or
    /// rejects the credentials; no handle is returned in that case.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let db = Self::connect_without_migrations(config).await?;

        let report = db.auto_migrate().await?;
        if report.is_empty() {
            tracing::info!("Database connected, schema up to date");
        } else {
            tracing::info!(changes = report.len(), "Database connected and schema migrated");
        }

        Ok(db)
    }

    /// Connect without running migrations (for CLI commands).
    pub async fn connect_without_migrations(config: &DatabaseConfig) -> AppResult<Self> {
        let target = resolve_database_url(&config.dsn)?;
        let connect_timeout = target
            .connect_timeout
            .unwrap_or_else(|| config.connect_timeout());

        tracing::debug!(url = %redact_url(&target.url), "Connecting to database");

        let mut options = ConnectOptions::new(target.url);
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(connect_timeout)
            .sqlx_logging(config.sqlx_logging);

        let connection = SeaDatabase::connect(options).await?;
        Ok(Self { connection })
    }

    /// Wrap an already established connection.
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Bring the schema in line with every registered entity.
    pub async fn auto_migrate(&self) -> Result<MigrationReport, DbErr> {
        let mut report = MigrationReport::default();
        report.extend(schema::sync_entity(&self.connection, user::Entity).await?);

        for change in report.changes() {
            tracing::info!("Applied: {}", change);
        }

        Ok(report)
    }

    /// List the changes the auto-migration would make, without applying them.
    pub async fn pending_changes(&self) -> Result<MigrationReport, DbErr> {
        let mut report = MigrationReport::default();
        report.extend(schema::plan_entity(&self.connection, user::Entity).await?);
        Ok(report)
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }

    /// Name of the database backend behind this connection.
    #[allow(unreachable_patterns)]
    pub fn backend(&self) -> &'static str {
        match self.connection.get_database_backend() {
            DbBackend::MySql => "mysql",
            DbBackend::Postgres => "postgres",
            DbBackend::Sqlite => "sqlite",
            _ => "unknown",
        }
    }

    /// Close the pool. Other clones of this handle stop working afterwards.
    pub async fn close(self) -> Result<(), DbErr> {
        self.connection.close().await?;
        tracing::info!("Database connection closed");
        Ok(())
    }
}
