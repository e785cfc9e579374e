//! Error types for plugin package builds

use crate::config::StepKind;
use thiserror::Error;

/// Result type alias for plugin package operations
pub type PackResult<T> = Result<T, PackError>;

/// Error type for plugin package operations
#[derive(Error, Debug)]
pub enum PackError {
    /// A required build option was not supplied
    #[error("missing required option: {0}")]
    MissingOption(&'static str),

    /// A build option was supplied but is malformed
    #[error("invalid option {option}: {reason}")]
    InvalidOption { option: &'static str, reason: String },

    /// The base configuration does not carry a plugin step this core attaches to
    #[error("base configuration has no {kind} step")]
    MissingStep { kind: StepKind },

    /// The base configuration has no entry with this name
    #[error("base configuration has no {0} entry")]
    MissingEntry(String),

    /// A library is configured but no bundle file was recorded for it
    #[error("library {library} is configured but no bundle was emitted for it")]
    UnresolvedLibraryBundle { library: String },

    /// A module was routed to the vendor chunk without a library configuration
    #[error("no library configuration for {0}")]
    UnknownLibrary(String),

    /// An external pattern could not be compiled
    #[error("invalid external pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The manifest is missing a field this core reads
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// The underlying bundler reported a failure
    #[error("build failed: {0}")]
    BuildFailed(String),

    /// Another build currently holds this entry file patched
    #[error("entry point {0} is already patched by a running build")]
    EntryPointInUse(String),

    /// The delegated build was dropped before it completed
    #[error("build cancelled")]
    Cancelled,

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PackError {
    /// Returns a stable numeric code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            PackError::MissingOption(_) => 1,
            PackError::InvalidOption { .. } => 2,
            PackError::MissingStep { .. } => 3,
            PackError::MissingEntry(_) => 4,
            PackError::UnresolvedLibraryBundle { .. } => 5,
            PackError::UnknownLibrary(_) => 6,
            PackError::InvalidPattern { .. } => 7,
            PackError::InvalidManifest(_) => 8,
            PackError::BuildFailed(_) => 9,
            PackError::Cancelled => 10,
            PackError::Io(_) => 11,
            PackError::Json(_) => 12,
            PackError::Toml(_) => 13,
            PackError::EntryPointInUse(_) => 14,
        }
    }

    /// Whether the error was raised before any file was touched
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            PackError::MissingOption(_) | PackError::InvalidOption { .. }
        )
    }
}
