//! Error types for the platform read layer
//!
//! One crate-wide error enum using thiserror. Client-input problems
//! (`InvalidIdentifier`) and business-level misses (`NotFound`) stay distinct
//! from storage failures so the access facade can pass the former through
//! unchanged while collapsing the latter into an opaque internal error.

use thiserror::Error;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed composite platform identifier (client input error)
    #[error("Invalid platform identifier: {0}")]
    InvalidIdentifier(String),

    /// A well-formed identifier with no backing record
    #[error("Resource with id '{0}' could not be found")]
    NotFound(String),

    /// Dataset type with no registered value reader
    #[error("Unsupported dataset type: {0}")]
    UnsupportedDatasetType(String),

    /// Database connection or query errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// File I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error with the cause already logged; safe to expose
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using the crate Error
pub type Result<T> = std::result::Result<T, Error>;
