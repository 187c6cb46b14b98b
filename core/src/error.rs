//! Error types for record store, persistence, and session operations.
//!
//! [`StoreError`] covers the outcomes of individual store operations,
//! including the ordinary "not found" case. [`PersistError`] is the
//! backend-neutral failure type of the [`Persistence`](crate::Persistence)
//! trait, and [`SessionError`] wraps both for the session façade.

use thiserror::Error;

use crate::types::EntityKind;

/// Errors produced by [`RecordStore`](crate::RecordStore) operations.
///
/// Every variant leaves the store exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A keyed lookup matched nothing.
    #[error("{kind} {key} not found")]
    NotFound { kind: EntityKind, key: String },

    /// Another category already uses this topic.
    #[error("category with topic '{0}' already exists")]
    DuplicateCategoryTopic(String),

    /// Another record of the same kind already uses this id.
    #[error("{kind} with id {id} already exists")]
    DuplicateId { kind: EntityKind, id: i64 },

    /// A concept referenced a category that does not exist.
    #[error("category {0} does not exist")]
    UnknownCategory(String),

    /// A component was attached to "the last concept" while there is none.
    #[error("no concept exists to attach the component to")]
    NoConcept,

    /// Every id after the current maximum is taken.
    #[error("no {0} id left to allocate")]
    IdSpaceExhausted(EntityKind),
}

impl StoreError {
    pub(crate) fn not_found(kind: EntityKind, key: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    /// Returns `true` for the [`NotFound`](StoreError::NotFound) variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Errors raised by a [`Persistence`](crate::Persistence) backend.
#[derive(Debug, Error)]
pub enum PersistError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data source the backend points at does not exist.
    #[error("data source not found: {0}")]
    SourceMissing(String),

    /// Backend-specific failure (malformed snapshot, SQL error, ...).
    #[error("{0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PersistError {
    /// Wraps any backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        PersistError::Backend(Box::new(err))
    }
}

/// Errors returned by the [`Session`](crate::Session) façade.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A command was issued before the startup load.
    #[error("session is not loaded")]
    NotLoaded,

    /// The startup load was attempted twice.
    #[error("session is already loaded")]
    AlreadyLoaded,

    /// The startup data source does not exist.
    #[error("data source not found: {0}")]
    SourceMissing(String),

    /// The command was rejected by the store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Loading or saving failed.
    #[error("persistence failure: {0}")]
    Persist(#[from] PersistError),
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
