//! Database connection management.
//!
//! Every store operation opens its own connection and drops it when the
//! operation returns, on success and error paths alike. Foreign keys are
//! declared by the schema but left unenforced: the bundled SQLite turns
//! them on by default, so every writable connection switches them off.

use std::path::Path;

use imagestore_common::{Error, Result};
use rusqlite::{Connection, OpenFlags};

use crate::schema;

/// Open (creating if needed) the SQLite database file at `db_path`.
///
/// The schema is not touched; call [`schema::create_schema`] when the
/// tables may not exist yet.
///
/// # Arguments
///
/// * `db_path` - Path to the SQLite database file
///
/// # Example
///
/// ```no_run
/// use imagestore_db::connection::open_connection;
/// use std::path::Path;
///
/// let conn = open_connection(Path::new("./images.db")).unwrap();
/// ```
pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path).map_err(|e| {
        Error::database(format!(
            "Failed to open database {}: {}",
            db_path.display(),
            e
        ))
    })?;
    disable_foreign_keys(&conn)?;
    Ok(conn)
}

/// Open an existing database file without write access.
///
/// Never creates the file; a missing database is [`Error::NotFound`].
pub fn open_connection_read_only(db_path: &Path) -> Result<Connection> {
    if !db_path.is_file() {
        return Err(Error::not_found(format!(
            "database {}",
            db_path.display()
        )));
    }

    Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(|e| {
        Error::database(format!(
            "Failed to open database {} read-only: {}",
            db_path.display(),
            e
        ))
    })
}

fn disable_foreign_keys(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "OFF")
        .map_err(|e| Error::database(format!("Failed to disable foreign keys: {}", e)))
}

/// Open the database file and make sure every table exists.
pub fn init_connection(db_path: &Path) -> Result<Connection> {
    let conn = open_connection(db_path)?;
    schema::create_schema(&conn)?;
    Ok(conn)
}

/// Initialize an in-memory database with the full schema, for testing.
///
/// The database is lost when the connection is dropped.
///
/// # Example
///
/// ```
/// use imagestore_db::connection::init_memory_connection;
///
/// let conn = init_memory_connection().unwrap();
/// ```
pub fn init_memory_connection() -> Result<Connection> {
    let conn = Connection::open_in_memory()
        .map_err(|e| Error::database(format!("Failed to open in-memory database: {}", e)))?;
    disable_foreign_keys(&conn)?;
    schema::create_schema(&conn)?;
    Ok(conn)
}
