//! Entity-driven schema reconciliation.
//!
//! Derives the table definition from a SeaORM entity and brings the live
//! schema in line with it. Changes are additive only: missing tables are
//! created and missing columns are added. Existing columns are never altered
//! or dropped.

use std::fmt;

use sea_orm::sea_query::Table;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, IdenStatic, Iterable, Schema,
};
use sea_orm_migration::SchemaManager;

/// A single additive schema change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaChange {
    CreateTable { table: String },
    AddColumn { table: String, column: String },
}

impl fmt::Display for SchemaChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaChange::CreateTable { table } => write!(f, "create table {}", table),
            SchemaChange::AddColumn { table, column } => {
                write!(f, "add column {}.{}", table, column)
            }
        }
    }
}

/// Changes applied (or pending) across all registered entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    changes: Vec<SchemaChange>,
}

impl MigrationReport {
    pub fn changes(&self) -> &[SchemaChange] {
        &self.changes
    }

    /// True when the schema already matched every entity.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub(crate) fn extend(&mut self, changes: Vec<SchemaChange>) {
        self.changes.extend(changes);
    }
}

/// Compute the changes needed for `entity` without touching the database.
pub async fn plan_entity<E>(conn: &DatabaseConnection, entity: E) -> Result<Vec<SchemaChange>, DbErr>
where
    E: EntityTrait,
{
    let manager = SchemaManager::new(conn);
    let table = entity.table_name().to_string();

    if !manager.has_table(&table).await? {
        return Ok(vec![SchemaChange::CreateTable { table }]);
    }

    let mut changes = Vec::new();
    for column in E::Column::iter() {
        let name = column.as_str();
        if !manager.has_column(&table, name).await? {
            changes.push(SchemaChange::AddColumn {
                table: table.clone(),
                column: name.to_string(),
            });
        }
    }

    Ok(changes)
}

/// Apply previously planned changes for `entity`.
pub async fn apply_entity<E>(
    conn: &DatabaseConnection,
    entity: E,
    changes: &[SchemaChange],
) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let manager = SchemaManager::new(conn);
    let schema = Schema::new(conn.get_database_backend());

    for change in changes {
        match change {
            SchemaChange::CreateTable { table } => {
                tracing::info!(table = %table, "Creating table from entity");
                let mut statement = schema.create_table_from_entity(entity);
                manager
                    .create_table(statement.if_not_exists().to_owned())
                    .await?;

                for index in schema.create_index_from_entity(entity) {
                    manager.create_index(index).await?;
                }
            }
            SchemaChange::AddColumn { table, column } => {
                tracing::info!(table = %table, column = %column, "Adding missing column");
                let target = E::Column::iter()
                    .find(|c| c.as_str() == column.as_str())
                    .ok_or_else(|| {
                        DbErr::Custom(format!("Entity {} has no column {}", table, column))
                    })?;

                let mut definition = schema.get_column_def::<E>(target);
                manager
                    .alter_table(
                        Table::alter()
                            .table(entity.table_ref())
                            .add_column(&mut definition)
                            .to_owned(),
                    )
                    .await?;
            }
        }
    }

    Ok(())
}

/// Plan and apply in one step, returning what was changed.
pub async fn sync_entity<E>(conn: &DatabaseConnection, entity: E) -> Result<Vec<SchemaChange>, DbErr>
where
    E: EntityTrait,
{
    let changes = plan_entity(conn, entity).await?;
    if changes.is_empty() {
        tracing::debug!(table = entity.table_name(), "Schema already matches entity");
        return Ok(changes);
    }

    apply_entity(conn, entity, &changes).await?;
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_display() {
        let create = SchemaChange::CreateTable {
            table: "users".to_string(),
        };
        let add = SchemaChange::AddColumn {
            table: "users".to_string(),
            column: "deleted_at".to_string(),
        };
        assert_eq!(create.to_string(), "create table users");
        assert_eq!(add.to_string(), "add column users.deleted_at");
    }

    #[test]
    fn test_report_accumulates() {
        let mut report = MigrationReport::default();
        assert!(report.is_empty());

        report.extend(vec![SchemaChange::CreateTable {
            table: "users".to_string(),
        }]);
        report.extend(Vec::new());

        assert_eq!(report.len(), 1);
        assert!(!report.is_empty());
    }
}
