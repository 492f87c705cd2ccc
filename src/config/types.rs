use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage locations, fixed once at startup.
///
/// Relative entries resolve against `base_dir`; absolute entries are used
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Directory holding the database, live images and example images.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// SQLite database file.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Live image directory, written by every save.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Sample images used for seeding; never written to.
    #[serde(default = "default_examples_dir")]
    pub examples_dir: PathBuf,

    /// Default target of the schema export.
    #[serde(default = "default_schema_file")]
    pub schema_file: PathBuf,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_database() -> PathBuf {
    PathBuf::from("images.db")
}
fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}
fn default_examples_dir() -> PathBuf {
    PathBuf::from("example_images")
}
fn default_schema_file() -> PathBuf {
    PathBuf::from("db_schema.txt")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            database: default_database(),
            images_dir: default_images_dir(),
            examples_dir: default_examples_dir(),
            schema_file: default_schema_file(),
        }
    }
}

impl StoreConfig {
    /// Default layout rooted at `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.resolve(&self.database)
    }

    pub fn images_path(&self) -> PathBuf {
        self.resolve(&self.images_dir)
    }

    pub fn examples_path(&self) -> PathBuf {
        self.resolve(&self.examples_dir)
    }

    pub fn schema_path(&self) -> PathBuf {
        self.resolve(&self.schema_file)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
