//! Database bootstrap tests.
//!
//! Schema tests run against an in-memory SQLite database so they need no
//! running MySQL server. A single pooled connection keeps the in-memory
//! database alive for the duration of each test.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};
use sea_orm_migration::SchemaManager;

use common::{AppError, DatabaseConfig};
use user_store_lib::entities::user;
use user_store_lib::{ConnectionProbe, Database, SchemaChange};

fn sqlite_config() -> DatabaseConfig {
    DatabaseConfig {
        dsn: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::default()
    }
}

const LEGACY_USERS_TABLE: &str = "CREATE TABLE users (
    id integer NOT NULL PRIMARY KEY AUTOINCREMENT,
    created_at text NOT NULL,
    updated_at text NOT NULL,
    name text NOT NULL,
    email text NOT NULL UNIQUE,
    password text NOT NULL
)";

// =============================================================================
// Connection
// =============================================================================

#[tokio::test]
async fn test_connect_creates_users_table() {
    let db = Database::connect(&sqlite_config()).await.unwrap();

    let manager = SchemaManager::new(db.connection());
    assert!(manager.has_table("users").await.unwrap());
    assert!(manager.has_column("users", "deleted_at").await.unwrap());
    assert!(manager.has_column("users", "email").await.unwrap());
}

#[tokio::test]
async fn test_connect_function_returns_usable_handle() {
    let db = user_store_lib::connect(&sqlite_config()).await.unwrap();

    assert!(db.ping().await.is_ok());
    assert_eq!(db.backend(), "sqlite");
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_unreachable_database_returns_driver_error() {
    let config = DatabaseConfig {
        dsn: "root:@tcp(127.0.0.1:1)/db_go_r".to_string(),
        connect_timeout_seconds: 1,
        ..DatabaseConfig::default()
    };

    let result = Database::connect(&config).await;
    assert!(matches!(result, Err(AppError::Database(_))));
}

#[tokio::test]
async fn test_malformed_dsn_fails_before_connecting() {
    let result = Database::connect(&DatabaseConfig::with_dsn("localhost:3306")).await;
    assert!(matches!(result, Err(AppError::Config(_))));
}

// =============================================================================
// Auto-migration
// =============================================================================

#[tokio::test]
async fn test_auto_migrate_is_idempotent() {
    let db = Database::connect(&sqlite_config()).await.unwrap();

    let second = db.auto_migrate().await.unwrap();
    assert!(second.is_empty());
    assert!(db.pending_changes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fresh_database_plans_table_creation() {
    let db = Database::connect_without_migrations(&sqlite_config())
        .await
        .unwrap();

    let pending = db.pending_changes().await.unwrap();
    assert_eq!(
        pending.changes(),
        &[SchemaChange::CreateTable {
            table: "users".to_string()
        }]
    );

    let applied = db.auto_migrate().await.unwrap();
    assert_eq!(applied, pending);
}

#[tokio::test]
async fn test_missing_column_is_added() {
    let db = Database::connect_without_migrations(&sqlite_config())
        .await
        .unwrap();
    db.connection()
        .execute_unprepared(LEGACY_USERS_TABLE)
        .await
        .unwrap();

    let pending = db.pending_changes().await.unwrap();
    assert_eq!(
        pending.changes(),
        &[SchemaChange::AddColumn {
            table: "users".to_string(),
            column: "deleted_at".to_string(),
        }]
    );

    db.auto_migrate().await.unwrap();

    let manager = SchemaManager::new(db.connection());
    assert!(manager.has_column("users", "deleted_at").await.unwrap());
    assert!(db.pending_changes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_existing_rows_survive_migration() {
    let db = Database::connect_without_migrations(&sqlite_config())
        .await
        .unwrap();
    db.connection()
        .execute_unprepared(LEGACY_USERS_TABLE)
        .await
        .unwrap();
    db.connection()
        .execute_unprepared(
            "INSERT INTO users (created_at, updated_at, name, email, password) \
             VALUES ('2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00', 'Ada', 'ada@example.com', 'x')",
        )
        .await
        .unwrap();

    db.auto_migrate().await.unwrap();

    let users = user::Entity::find().all(db.connection()).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "ada@example.com");
    assert!(users[0].deleted_at.is_none());
}

#[tokio::test]
async fn test_migrated_table_matches_entity() {
    let db = Database::connect(&sqlite_config()).await.unwrap();

    let now = Utc::now();
    let inserted = user::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        name: Set("Grace".to_string()),
        email: Set("grace@example.com".to_string()),
        password: Set("opaque".to_string()),
        ..Default::default()
    }
    .insert(db.connection())
    .await
    .unwrap();

    let found = user::Entity::find_by_id(inserted.id)
        .one(db.connection())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "Grace");

    // Unique email constraint comes from the entity definition
    let duplicate = user::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        name: Set("Impostor".to_string()),
        email: Set("grace@example.com".to_string()),
        password: Set("opaque".to_string()),
        ..Default::default()
    }
    .insert(db.connection())
    .await;
    assert!(duplicate.is_err());
}

// =============================================================================
// Probe
// =============================================================================

#[tokio::test]
async fn test_database_implements_probe() {
    let db = Database::connect(&sqlite_config()).await.unwrap();
    let probe: std::sync::Arc<dyn ConnectionProbe> = std::sync::Arc::new(db);

    assert!(probe.ping().await.is_ok());
    assert_eq!(probe.backend(), "sqlite");
}
