//! Imagestore-DB: Database schema, introspection, and query operations
//!
//! This crate provides the relational side of imagestore using SQLite
//! through rusqlite.
//!
//! # Modules
//!
//! - `connection` - Opening scoped SQLite connections
//! - `schema` - Table definitions, idempotent creation, and introspection
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```
//! use imagestore_db::connection::init_memory_connection;
//! use imagestore_db::queries::images;
//!
//! let conn = init_memory_connection().unwrap();
//! let id = images::insert_pending(&conn, "2024-05-01_12:30:00.123").unwrap();
//! let record = images::get_image(&conn, id).unwrap().unwrap();
//! assert!(record.path.is_none());
//! ```

pub mod connection;
pub mod models;
pub mod queries;
pub mod schema;
