//! Shared test harness for integration tests.
//!
//! Provides [`TestStore`] which lays out a fresh store in a temporary
//! directory, creates the schema, and can populate the example directory
//! with small generated PNGs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgb, RgbImage};
use tempfile::TempDir;

use imagestore::config::StoreConfig;
use imagestore::images::ImageStore;
use imagestore::schema::SchemaManager;

/// A store rooted in its own temporary directory.
pub struct TestStore {
    pub dir: TempDir,
    pub config: StoreConfig,
    pub manager: SchemaManager,
    pub store: ImageStore,
}

impl TestStore {
    /// Create directories and schema under a new temporary base directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let config = StoreConfig::with_base_dir(dir.path());
        let manager = SchemaManager::new(config.clone());
        manager
            .ensure_directories()
            .expect("failed to create directories");
        manager.create_schema().expect("failed to create schema");
        let store = ImageStore::new(config.clone());

        Self {
            dir,
            config,
            manager,
            store,
        }
    }

    pub fn base(&self) -> &Path {
        self.dir.path()
    }

    /// Write `count` distinct PNGs into the example directory.
    pub fn add_examples(&self, count: usize) -> Vec<PathBuf> {
        write_examples(&self.config.examples_path(), count)
    }

    /// Files currently in the live-image directory.
    pub fn image_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(self.config.images_path())
            .expect("failed to read images dir")
            .map(|e| e.expect("bad dir entry").path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        files
    }
}

/// Small solid-color image, shade varies with `seed`.
pub fn sample_image(seed: u8) -> DynamicImage {
    let mut img = RgbImage::new(4, 3);
    for pixel in img.pixels_mut() {
        *pixel = Rgb([seed, 255 - seed, 128]);
    }
    DynamicImage::ImageRgb8(img)
}

/// Write `count` PNGs named `example_{i}.png` into `dir`.
pub fn write_examples(dir: &Path, count: usize) -> Vec<PathBuf> {
    std::fs::create_dir_all(dir).expect("failed to create examples dir");
    (0..count)
        .map(|i| {
            let path = dir.join(format!("example_{}.png", i));
            sample_image((i as u8).wrapping_mul(40))
                .save(&path)
                .expect("failed to write example image");
            path
        })
        .collect()
}
