//! Schema and storage-layout management.
//!
//! [`SchemaManager`] owns the existence of the storage directories and of the
//! relational schema: creating both, destroying the database, and dumping
//! the table structure to text. It never touches image files; clearing those
//! is [`ImageStore::purge_images`](crate::images::ImageStore::purge_images).

use std::path::{Path, PathBuf};

use imagestore_common::Result;
use imagestore_db::connection::{init_connection, open_connection_read_only};
use imagestore_db::models::TableSchema;
use imagestore_db::schema;

use crate::config::StoreConfig;

/// Creates, destroys and introspects the store's schema and directories.
#[derive(Debug, Clone)]
pub struct SchemaManager {
    config: StoreConfig,
}

impl SchemaManager {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Create the base, live-image and example directories if missing.
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [
            self.config.base_dir.clone(),
            self.config.images_path(),
            self.config.examples_path(),
        ] {
            std::fs::create_dir_all(&dir)?;
        }

        tracing::info!(
            base = %self.config.base_dir.display(),
            images = %self.config.images_path().display(),
            examples = %self.config.examples_path().display(),
            "Storage directories ensured"
        );
        Ok(())
    }

    /// Create every table that does not exist yet. Never drops data.
    pub fn create_schema(&self) -> Result<()> {
        let _conn = init_connection(&self.config.database_path())?;
        tracing::debug!(
            db = %self.config.database_path().display(),
            "Schema ensured"
        );
        Ok(())
    }

    /// Delete the database file and recreate an empty schema.
    ///
    /// Returns whether a database existed beforehand. Image files are left
    /// alone, so callers must pair this with
    /// [`ImageStore::purge_images`](crate::images::ImageStore::purge_images)
    /// or use [`ImageStore::reset_all`](crate::images::ImageStore::reset_all).
    pub fn reset(&self) -> Result<bool> {
        let db_path = self.config.database_path();
        let existed = match std::fs::remove_file(&db_path) {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        if existed {
            tracing::info!(db = %db_path.display(), "Deleted database");
        } else {
            tracing::info!(db = %db_path.display(), "No database to delete");
        }

        self.create_schema()?;
        tracing::info!(db = %db_path.display(), "Created empty schema");

        Ok(existed)
    }

    /// Introspect the live tables and their columns.
    ///
    /// Opens the database read-only; a missing database is
    /// [`Error::NotFound`](imagestore_common::Error::NotFound) and is not
    /// created.
    pub fn describe(&self) -> Result<Vec<TableSchema>> {
        let conn = open_connection_read_only(&self.config.database_path())?;
        schema::describe_schema(&conn)
    }

    /// Write the textual schema dump to `target`, or to the configured
    /// `schema_file` when `None`. Returns the path written.
    pub fn export_schema(&self, target: Option<&Path>) -> Result<PathBuf> {
        let target = target
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.schema_path());

        let dump = schema::render_schema(&self.describe()?);
        std::fs::write(&target, dump)?;

        tracing::info!(target = %target.display(), "Exported database schema");
        Ok(target)
    }
}
