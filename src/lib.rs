//! Imagestore - local image ingestion store
//!
//! This library crate exposes the schema manager and image record store
//! for the CLI and for integration testing.

pub mod config;
pub mod images;
pub mod schema;
