//! Image record storage.
//!
//! Coordinates the live-image directory with the `image` table from
//! `imagestore_db`, and seeds demo data from the example directory.

pub mod seed;
mod service;
mod storage;

pub use seed::{SeedReport, SeededImage};
pub use service::{Consent, ConsistencyReport, ImageStore, ResetOutcome};
pub use storage::{current_timestamp, format_filename, ImageStorage, TIMESTAMP_FORMAT};
