use std::collections::HashSet;

use crate::domain::persistence::Persistence;
use crate::domain::tables::{Column, ForeignKeyConstraint, Index, Table};

/// DDL statements applied together in one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStep {
    pub ctx: &'static str,
    pub ddls: Vec<String>,
}

impl MigrationStep {
    fn create_schema(database_schema: &str) -> Self {
        Self {
            ctx: "CREATE SCHEMA",
            ddls: vec![format!("CREATE SCHEMA IF NOT EXISTS \"{}\"", database_schema)],
        }
    }

    fn create_table(database_schema: &str, table: &Table) -> Self {
        Self {
            ctx: "CREATE TABLE",
            ddls: create_table_ddl(database_schema, table),
        }
    }
}

pub struct Migration<P: Persistence> {
    tables: Vec<Table>,
    persistence: P,
}

impl<P: Persistence> Migration<P> {
    pub fn new(tables: Vec<Table>, persistence: P) -> Self {
        Self {
            tables,
            persistence,
        }
    }

    /// Creates the tables missing from the schema, existing tables are left alone
    pub async fn migrate(&self) -> Result<(), anyhow::Error> {
        let database_schema = self.persistence.database_schema();
        let actual_schema = self.persistence.load().await?;
        let steps = migration_steps(database_schema, &self.tables, &actual_schema);

        if steps.is_empty() {
            tracing::info!("schema is up to date");
            return Ok(());
        }

        tracing::info!("creating {} tables", steps.len());
        let mut all_steps = vec![MigrationStep::create_schema(database_schema)];
        all_steps.extend(steps);
        self.persistence.apply_migration_steps(all_steps).await
    }
}

pub fn migration_steps(
    database_schema: &str,
    needed_schema: &[Table],
    actual_schema: &HashSet<String>,
) -> Vec<MigrationStep> {
    needed_schema
        .iter()
        .filter(|table| !actual_schema.contains(&table.name))
        .map(|table| MigrationStep::create_table(database_schema, table))
        .collect()
}

fn create_table_ddl(schema: &str, table: &Table) -> Vec<String> {
    let mut columns = Vec::new();
    let mut pk_columns = Vec::new();

    for column in table.columns.iter() {
        columns.push(column_ddl(column));
        if column.primary_key {
            pk_columns.push(format!("\"{}\"", column.name));
        }
    }

    let columns_sql = columns.join(",\n    ");
    let pk_columns_sql = pk_columns.join(", ");

    let table_ddl = format!(
        "CREATE TABLE \"{}\".\"{}\" (\n    {},\n    PRIMARY KEY({})\n)",
        schema, table.name, columns_sql, pk_columns_sql
    );

    let mut ddls = vec![table_ddl];

    for fk in table.foreign_keys.iter() {
        ddls.push(create_fk_ddl(schema, fk));
    }

    for index in table.indexes.iter() {
        ddls.push(create_index_ddl(schema, index));
    }

    ddls
}

fn column_ddl(column: &Column) -> String {
    let mut sql = format!("\"{}\" {}", column.name, column.column_type);
    if column.not_null {
        sql.push_str(" NOT NULL");
    }
    if let Some(default_value) = &column.default_value {
        sql.push_str(format!(" DEFAULT {}", default_value).as_str());
    }
    if column.unique {
        sql.push_str(" UNIQUE");
    }
    sql
}

fn create_fk_ddl(schema: &str, fk: &ForeignKeyConstraint) -> String {
    format!(
        "ALTER TABLE \"{}\".\"{}\" ADD CONSTRAINT \"{}_{}_fkey\" FOREIGN KEY (\"{}\") REFERENCES \"{}\".\"{}\" (\"{}\") ON DELETE CASCADE",
        schema,
        fk.table_name,
        fk.table_name,
        fk.column_name,
        fk.column_name,
        schema,
        fk.referenced_table_name,
        fk.referenced_column_name
    )
}

fn create_index_ddl(schema: &str, index: &Index) -> String {
    let columns_sql = index
        .columns
        .iter()
        .map(|column| format!("\"{}\"", column))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE {}INDEX \"{}_{}_idx\" ON \"{}\".\"{}\" ({})",
        if index.unique { "UNIQUE " } else { "" },
        index.table_name,
        index.columns.join("_"),
        schema,
        index.table_name,
        columns_sql
    )
}
