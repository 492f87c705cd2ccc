//! Database schema module
//!
//! Owns the table definitions and their idempotent creation, plus read-only
//! introspection used to produce the textual schema dump.

use imagestore_common::{Error, Result};
use rusqlite::Connection;

use crate::models::{ColumnInfo, TableSchema};

/// DDL for every table, all statements `IF NOT EXISTS`.
const SCHEMA_SQL: &str = include_str!("tables.sql");

/// Tables created by [`create_schema`], in creation order.
pub const TABLE_NAMES: &[&str] = &[
    "role",
    "worker",
    "has_role",
    "data",
    "request",
    "request_data",
    "image",
];

/// Create all tables that do not exist yet.
///
/// Existing tables and their rows are left untouched, so calling this any
/// number of times yields the same table set.
///
/// # Arguments
///
/// * `conn` - Database connection to create the schema on
pub fn create_schema(conn: &Connection) -> Result<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    tx.execute_batch(SCHEMA_SQL)
        .map_err(|e| Error::database(format!("Failed to create schema: {}", e)))?;

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

/// List user tables in creation order, skipping SQLite's internal tables.
pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'
             ORDER BY rowid",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(names)
}

/// Read the columns of one table in ordinal order.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnInfo>> {
    let mut stmt = conn
        .prepare("SELECT cid, name, type FROM pragma_table_info(?1) ORDER BY cid")
        .map_err(|e| Error::database(e.to_string()))?;

    let columns = stmt
        .query_map([table], |row| {
            Ok(ColumnInfo {
                ordinal: row.get(0)?,
                name: row.get(1)?,
                declared_type: row.get(2)?,
            })
        })
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(columns)
}

/// Introspect every live table together with its columns.
pub fn describe_schema(conn: &Connection) -> Result<Vec<TableSchema>> {
    list_tables(conn)?
        .into_iter()
        .map(|name| {
            let columns = table_columns(conn, &name)?;
            Ok(TableSchema { name, columns })
        })
        .collect()
}

/// Render tables as the plain-text dump format.
///
/// One block per table: a `TABLE: <name>` header, one
/// `  <ordinal>: <name> (<type>)` line per column, then a blank line.
pub fn render_schema(tables: &[TableSchema]) -> String {
    let mut out = String::new();
    for table in tables {
        out.push_str(&format!("TABLE: {}\n", table.name));
        for column in &table.columns {
            out.push_str(&format!(
                "  {}: {} ({})\n",
                column.ordinal, column.name, column.declared_type
            ));
        }
        out.push('\n');
    }
    out
}
