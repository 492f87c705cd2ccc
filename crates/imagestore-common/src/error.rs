//! Common error types used throughout imagestore.
//!
//! A single error enum covers the database, filesystem, and validation
//! failures of the schema manager and the image record store.

use crate::ids::ImageId;

/// Common error type for imagestore.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested record was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A record was asked to move to a state it cannot reach.
    #[error("Invalid transition for image {id}: {reason}")]
    InvalidTransition { id: ImageId, reason: String },

    /// The row for an image was created but its file could not be written.
    ///
    /// The record stays in the store with a null path.
    #[error("Image {id} was recorded but its file could not be written: {source}")]
    PartialWrite {
        id: ImageId,
        #[source]
        source: std::io::Error,
    },

    /// More sample images were requested than are available.
    #[error("Cannot sample {requested} example image(s), only {available} available")]
    InsufficientSamples { requested: usize, available: usize },

    /// Image decoding or encoding failed.
    #[error("Image error: {0}")]
    Image(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Image error.
    pub fn image<S: Into<String>>(msg: S) -> Self {
        Self::Image(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
