//! Error types for SQLite storage operations.
//!
//! Provides a unified error type covering database access, row conversion,
//! migration, and prefix validation failures.

use concept_breakdown_core::{EntityKind, PersistError};
use thiserror::Error;

/// Errors that can occur during SQLite storage operations.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Stored rows could not be rebuilt into a consistent record store.
    #[error("conversion error: {0}")]
    ConversionError(String),

    /// Migration lifecycle operation failure.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Table prefix contains invalid characters.
    #[error("invalid prefix '{0}': must contain only alphanumeric characters and underscores")]
    InvalidPrefix(String),

    /// An update or delete affected no rows.
    #[error("{kind} {key} not found in database")]
    NotFound { kind: EntityKind, key: String },
}

impl SqliteError {
    pub(crate) fn not_found(kind: EntityKind, key: impl ToString) -> Self {
        SqliteError::NotFound {
            kind,
            key: key.to_string(),
        }
    }
}

impl From<SqliteError> for PersistError {
    fn from(err: SqliteError) -> Self {
        PersistError::backend(err)
    }
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;
