//! [`Persistence`] implementations over text and JSON files.
//!
//! Both backends rewrite the whole file on every save, keeping a `.bak`
//! copy of the previous contents unless backups are turned off.

use std::path::{Path, PathBuf};

use concept_breakdown_core::{Diagnostic, Loaded, PersistError, Persistence, RecordStore};
use tracing::info;

use crate::backup::{SaveOutcome, write_with_backup, write_without_backup};
use crate::error::Result;
use crate::json::{read_json_file, render_json};
use crate::text::{read_text_file, render_text};

fn write(path: &Path, backup: bool, contents: &[u8]) -> Result<SaveOutcome> {
    if backup {
        write_with_backup(path, contents)
    } else {
        write_without_backup(path, contents)
    }
}

/// Stores records in the line-oriented text format.
///
/// # Examples
///
/// ```
/// use concept_breakdown_core::{Persistence, RecordStore};
/// use concept_breakdown_db::TextBackend;
///
/// let dir = tempfile::tempdir().unwrap();
/// let mut backend = TextBackend::new(dir.path().join("study.txt"));
/// assert!(!backend.exists());
///
/// let mut store = RecordStore::new();
/// store.add_category(1, "Design").unwrap();
/// backend.save_all(&store).unwrap();
///
/// let loaded = backend.load().unwrap();
/// assert_eq!(loaded.store, store);
/// ```
#[derive(Debug, Clone)]
pub struct TextBackend {
    path: PathBuf,
    backup: bool,
}

impl TextBackend {
    /// Creates a backend for `path` with backups enabled.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup: true,
        }
    }

    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for TextBackend {
    fn describe(&self) -> String {
        format!("text file '{}'", self.path.display())
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&mut self) -> std::result::Result<Loaded, PersistError> {
        let load = read_text_file(&self.path)?;
        Ok(Loaded {
            store: load.store,
            diagnostics: load.diagnostics.into_iter().map(Diagnostic::from).collect(),
        })
    }

    fn save_all(&mut self, store: &RecordStore) -> std::result::Result<(), PersistError> {
        let outcome = write(&self.path, self.backup, render_text(store).as_bytes())?;
        info!(
            path = %self.path.display(),
            bytes = outcome.bytes_written,
            backup = outcome.backup.is_some(),
            "text data saved"
        );
        Ok(())
    }
}

/// Stores records as a JSON snapshot.
#[derive(Debug, Clone)]
pub struct JsonBackend {
    path: PathBuf,
    backup: bool,
}

impl JsonBackend {
    /// Creates a backend for `path` with backups enabled.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup: true,
        }
    }

    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for JsonBackend {
    fn describe(&self) -> String {
        format!("JSON file '{}'", self.path.display())
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&mut self) -> std::result::Result<Loaded, PersistError> {
        Ok(Loaded::clean(read_json_file(&self.path)?))
    }

    fn save_all(&mut self, store: &RecordStore) -> std::result::Result<(), PersistError> {
        let json = render_json(store)?;
        let outcome = write(&self.path, self.backup, json.as_bytes())?;
        info!(
            path = %self.path.display(),
            bytes = outcome.bytes_written,
            backup = outcome.backup.is_some(),
            "JSON snapshot saved"
        );
        Ok(())
    }
}
