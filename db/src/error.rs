//! Error types for file persistence operations.
//!
//! Provides a unified error type covering I/O, serialization, snapshot
//! validation, and the backup-before-overwrite guard.

use std::path::PathBuf;

use concept_breakdown_core::PersistError;
use thiserror::Error;

/// Errors that can occur while reading or writing data files.
#[derive(Debug, Error)]
pub enum DbError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A snapshot parsed but its records violate store invariants.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// The existing file could not be copied aside; nothing was written.
    #[error("failed to create backup '{}': {source}", .path.display())]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing failed. `restored` tells whether the previous contents were
    /// put back from the backup.
    #[error("failed to write '{}': {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        restored: bool,
    },

    /// Configuration value could not be interpreted.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<DbError> for PersistError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::IoError(io) => PersistError::Io(io),
            other => PersistError::backend(other),
        }
    }
}

/// Convenience alias for results with [`DbError`].
pub type Result<T> = std::result::Result<T, DbError>;
