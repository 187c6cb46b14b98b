//! The load/save boundary between the record store and durable storage.

use std::fmt;

use crate::command::Change;
use crate::error::PersistError;
use crate::store::RecordStore;

/// A problem found while loading, tied to a source line where one exists.
///
/// Diagnostics never abort a load; the offending unit is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number in the source, if the format is line-oriented.
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// The result of a successful load.
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    pub store: RecordStore,
    pub diagnostics: Vec<Diagnostic>,
}

impl Loaded {
    pub fn clean(store: RecordStore) -> Self {
        Self {
            store,
            diagnostics: Vec::new(),
        }
    }
}

/// A storage backend for the record store.
///
/// Implemented by the text and JSON file backends in
/// `concept-breakdown-db` and by the SQLite backend in
/// `concept-breakdown-sqlite`.
pub trait Persistence {
    /// Human-readable name of the data source (usually a path).
    fn describe(&self) -> String;

    /// Whether the data source exists and can be loaded.
    fn exists(&self) -> bool;

    /// Reads the whole store.
    fn load(&mut self) -> Result<Loaded, PersistError>;

    /// Writes the whole store, replacing what was stored before.
    fn save_all(&mut self, store: &RecordStore) -> Result<(), PersistError>;

    /// Records one applied change.
    ///
    /// `store` is the state after the change. The default rewrites
    /// everything; backends with per-record statements override it.
    fn persist(&mut self, store: &RecordStore, change: &Change) -> Result<(), PersistError> {
        let _ = change;
        self.save_all(store)
    }
}

impl<P: Persistence + ?Sized> Persistence for Box<P> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn exists(&self) -> bool {
        (**self).exists()
    }

    fn load(&mut self) -> Result<Loaded, PersistError> {
        (**self).load()
    }

    fn save_all(&mut self, store: &RecordStore) -> Result<(), PersistError> {
        (**self).save_all(store)
    }

    fn persist(&mut self, store: &RecordStore, change: &Change) -> Result<(), PersistError> {
        (**self).persist(store, change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        assert_eq!(
            Diagnostic::new(Some(3), "unknown record type 'Book'").to_string(),
            "line 3: unknown record type 'Book'"
        );
        assert_eq!(Diagnostic::new(None, "empty").to_string(), "empty");
    }
}
