//! Imagestore-Common: Shared types, IDs, and error handling.
//!
//! This crate provides the vocabulary shared by the database layer and the
//! image record store:
//!
//! - **Typed IDs**: [`ImageId`], the store-assigned integer identity of an image
//! - **Core Types**: [`ImageStatus`], [`BoundingBox`] and [`Prediction`]
//! - **Path Utilities**: Functions to detect image files by extension
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use imagestore_common::{BoundingBox, Error, ImageStatus, Prediction, Result};
//! use imagestore_common::paths::is_image_file;
//! use std::path::Path;
//!
//! let prediction = Prediction::new(0.3, Some(BoundingBox::new(0.1, 0.1, 0.9, 0.9)));
//! assert!(prediction.validate().is_ok());
//!
//! assert_eq!(ImageStatus::Pending.to_string(), "pending");
//! assert!(is_image_file(Path::new("cat.png")));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("image 7"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
