//! Image record store coordinating the live-image directory with the
//! `image` table.
//!
//! Each operation opens its own connection and drops it before returning.

use std::path::PathBuf;

use image::DynamicImage;
use imagestore_common::{Error, ImageId, ImageStatus, Prediction, Result};
use imagestore_db::connection::open_connection;
use imagestore_db::models::ImageRecord;
use imagestore_db::queries::images;
use rusqlite::Connection;

use super::seed::{self, SeedReport};
use super::storage::{self, ImageStorage};
use crate::config::StoreConfig;
use crate::schema::SchemaManager;

/// Explicit answer to a destructive operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Granted,
    Declined,
}

impl Consent {
    /// Interpret a typed answer; only `y` and `yes` (any case) grant consent.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => Self::Granted,
            _ => Self::Declined,
        }
    }

    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

impl From<bool> for Consent {
    fn from(granted: bool) -> Self {
        if granted {
            Self::Granted
        } else {
            Self::Declined
        }
    }
}

/// Result of [`ImageStore::reset_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Consent was declined; nothing changed.
    Declined,
    Completed {
        images_removed: usize,
        database_existed: bool,
    },
}

/// Records whose file side disagrees with the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Rows created by a save whose file write failed.
    pub without_path: Vec<ImageId>,
    /// Rows pointing at a file that no longer exists.
    pub missing_files: Vec<ImageId>,
    /// Rows whose stored filename differs from `{id}_{timestamp}.png`.
    pub misnamed: Vec<ImageId>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.without_path.is_empty() && self.missing_files.is_empty() && self.misnamed.is_empty()
    }
}

/// Authoritative create/update path for image records and their files.
#[derive(Debug, Clone)]
pub struct ImageStore {
    config: StoreConfig,
    storage: ImageStorage,
}

impl ImageStore {
    /// Create a new `ImageStore` over the configured layout.
    ///
    /// The schema must already exist; see [`SchemaManager::create_schema`].
    pub fn new(config: StoreConfig) -> Self {
        let storage = ImageStorage::new(config.images_path());
        Self { config, storage }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &ImageStorage {
        &self.storage
    }

    pub(crate) fn connection(&self) -> Result<Connection> {
        open_connection(&self.config.database_path())
    }

    /// Store image bytes and create their record.
    ///
    /// The row is inserted first to allocate the id, then the file is
    /// written, then the path is attached. The steps are not transactional
    /// across the filesystem: when the write fails the row remains with a
    /// null path and [`Error::PartialWrite`] names its id.
    pub fn save(&self, data: &[u8]) -> Result<ImageId> {
        // Paths are stored as TEXT; reject a directory that cannot round-trip.
        if self.storage.dir().to_str().is_none() {
            return Err(Error::invalid_input(format!(
                "Image directory {} is not valid UTF-8",
                self.storage.dir().display()
            )));
        }

        let conn = self.connection()?;

        let timestamp = storage::current_timestamp();
        let id = images::insert_pending(&conn, &timestamp)?;

        let path = match self.storage.write(id, &timestamp, data) {
            Ok(path) => path,
            Err(source) => {
                tracing::warn!(
                    %id,
                    error = %source,
                    "Image file write failed, record left without path"
                );
                return Err(Error::PartialWrite { id, source });
            }
        };

        let path_str = path.to_str().ok_or_else(|| {
            Error::invalid_input(format!(
                "Image path {} is not valid UTF-8",
                path.display()
            ))
        })?;
        if !images::set_path(&conn, id, path_str)? {
            return Err(Error::internal(format!(
                "Image {} vanished before its path was attached",
                id
            )));
        }

        tracing::debug!(%id, path = %path_str, bytes = data.len(), "Saved image");
        Ok(id)
    }

    /// Encode a decoded image as PNG and [`save`](Self::save) it.
    pub fn save_image(&self, img: &DynamicImage) -> Result<ImageId> {
        let bytes = storage::encode_png(img)?;
        self.save(&bytes)
    }

    /// Fetch one record.
    pub fn get(&self, id: ImageId) -> Result<Option<ImageRecord>> {
        let conn = self.connection()?;
        images::get_image(&conn, id)
    }

    /// List records in id order, optionally restricted to one status.
    pub fn list(&self, status: Option<ImageStatus>) -> Result<Vec<ImageRecord>> {
        let conn = self.connection()?;
        match status {
            Some(status) => images::list_images_by_status(&conn, status),
            None => images::list_images(&conn),
        }
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.connection()?;
        images::count_images(&conn)
    }

    /// Attach a detector result, moving the record to `predicted`.
    pub fn attach_prediction(&self, id: ImageId, prediction: Prediction) -> Result<()> {
        prediction.validate()?;

        let conn = self.connection()?;
        if images::mark_predicted(&conn, id, &prediction)? {
            tracing::debug!(%id, confidence = prediction.confidence, "Attached prediction");
            return Ok(());
        }

        match images::get_image(&conn, id)? {
            None => Err(Error::not_found(format!("image {}", id))),
            Some(record) => Err(Error::InvalidTransition {
                id,
                reason: format!("record is already {}", record.status),
            }),
        }
    }

    /// Delete every file in the live-image directory. Rows are untouched,
    /// so their paths dangle until the database is reset too.
    pub fn purge_images(&self) -> Result<usize> {
        let removed = self.storage.purge()?;
        tracing::info!(
            removed,
            dir = %self.storage.dir().display(),
            "Deleted all images from the file system"
        );
        Ok(removed)
    }

    /// Purge image files and reset the database together.
    pub fn reset_all(&self, consent: Consent) -> Result<ResetOutcome> {
        if !consent.is_granted() {
            tracing::info!("Reset declined, nothing changed");
            return Ok(ResetOutcome::Declined);
        }

        let images_removed = self.purge_images()?;
        let database_existed = SchemaManager::new(self.config.clone()).reset()?;

        Ok(ResetOutcome::Completed {
            images_removed,
            database_existed,
        })
    }

    /// Seed sample images with placeholder predictions.
    ///
    /// `limit == 0` uses every example image.
    pub fn seed_from_examples(&self, limit: usize) -> Result<SeedReport> {
        seed::seed_from_examples(self, limit, &mut rand::thread_rng())
    }

    /// Compare every record against the live-image directory.
    pub fn check_consistency(&self) -> Result<ConsistencyReport> {
        let mut report = ConsistencyReport::default();

        for record in self.list(None)? {
            let Some(path) = record.path.as_deref().map(PathBuf::from) else {
                report.without_path.push(record.id);
                continue;
            };

            if !path.is_file() {
                report.missing_files.push(record.id);
            }

            let expected = storage::format_filename(record.id, &record.timestamp);
            if path.file_name().and_then(|n| n.to_str()) != Some(expected.as_str()) {
                report.misnamed.push(record.id);
            }
        }

        Ok(report)
    }
}
