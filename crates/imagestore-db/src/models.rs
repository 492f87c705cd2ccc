//! Rust models matching the database schema.

use imagestore_common::{BoundingBox, ImageId, ImageStatus};
use serde::{Deserialize, Serialize};

/// One row of the `image` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    pub id: ImageId,
    /// Creation time formatted `YYYY-MM-DD_HH:MM:SS.mmm`.
    pub timestamp: String,
    /// Location of the stored file; `None` means the file is missing.
    pub path: Option<String>,
    pub status: ImageStatus,
    /// Detector confidence, stored in the `class` column.
    pub class_confidence: Option<f64>,
    pub bbox: Option<BoundingBox>,
}

impl ImageRecord {
    /// Whether the row was created but its file never written.
    pub fn is_missing_file(&self) -> bool {
        self.path.is_none()
    }
}

/// A column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnInfo {
    pub ordinal: i64,
    pub name: String,
    pub declared_type: String,
}

/// A table and its columns in ordinal order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}
