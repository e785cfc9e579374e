//! Error types for package emitters.

use plugpack_core::PackError;
use thiserror::Error;

/// Errors that can occur while emitting a plugin package.
#[derive(Debug, Error)]
pub enum BundleError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to walk the output directory.
    #[error("Failed to walk {path}: {message}")]
    WalkDir { path: String, message: String },

    /// A copy source does not exist.
    #[error("Copy source not found: {0}")]
    MissingSource(String),

    /// A transform or exclusion rule failed.
    #[error(transparent)]
    Pack(#[from] PackError),
}
