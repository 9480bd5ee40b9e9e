//! Infrastructure layer - database connection and schema management.

mod db;
mod probe;
pub mod schema;

pub use db::Database;
pub use probe::ConnectionProbe;
pub use schema::{MigrationReport, SchemaChange};

#[cfg(any(test, feature = "test-utils"))]
pub use probe::MockConnectionProbe;
