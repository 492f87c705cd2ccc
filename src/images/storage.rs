//! Filesystem-level image storage.
//!
//! Files live flat in the live-image directory, named
//! `{id}_{timestamp}.png`. Since ids are unique the name never collides,
//! even for images saved within the same millisecond.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::Local;
use image::{DynamicImage, ImageFormat};
use imagestore_common::{Error, ImageId, Result};

/// Timestamp layout used in records and filenames.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S%.3f";

/// Current local time formatted as `YYYY-MM-DD_HH:MM:SS.mmm`.
pub fn current_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Filename for the image with the given identity.
pub fn format_filename(id: ImageId, timestamp: &str) -> String {
    format!("{}_{}.png", id, timestamp)
}

/// Encode a decoded image as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| Error::image(format!("Failed to encode image as PNG: {}", e)))?;
    Ok(buf.into_inner())
}

/// Decode an image file from disk.
pub fn decode_file(path: &Path) -> Result<DynamicImage> {
    image::open(path)
        .map_err(|e| Error::image(format!("Failed to decode {}: {}", path.display(), e)))
}

/// Filesystem manager for the live-image directory.
#[derive(Debug, Clone)]
pub struct ImageStorage {
    dir: PathBuf,
}

impl ImageStorage {
    /// Create a new `ImageStorage` rooted at `dir`.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the image with this identity is stored at.
    pub fn path_for(&self, id: ImageId, timestamp: &str) -> PathBuf {
        self.dir.join(format_filename(id, timestamp))
    }

    /// Write raw bytes for the given identity and return the file path.
    pub fn write(&self, id: ImageId, timestamp: &str, data: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.path_for(id, timestamp);
        std::fs::write(&path, data)?;
        Ok(path)
    }

    /// Delete every file in the directory and return how many were removed.
    ///
    /// Subdirectories are not descended into or removed. A missing directory
    /// counts as already empty.
    pub fn purge(&self) -> Result<usize> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                tracing::debug!(path = %entry.path().display(), "Skipping subdirectory");
                continue;
            }
            std::fs::remove_file(entry.path())?;
            removed += 1;
        }
        Ok(removed)
    }
}
