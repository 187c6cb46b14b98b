//! Storage selection shared by every data-touching subcommand.

use std::path::PathBuf;

use clap::Args;
use concept_breakdown_core::{DiagramCatalog, Persistence, Session};
use concept_breakdown_db::{
    JsonBackend, ResolvedStorage, StorageFormat, StorageOverrides, TextBackend, ToolConfig,
};
use concept_breakdown_sqlite::SqliteBackend;
use tracing::debug;

/// A session over whichever backend the storage options selected.
pub type DynSession = Session<Box<dyn Persistence>>;

/// CLI-specific storage format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliStorageFormat {
    Text,
    Json,
    Sqlite,
}

impl From<CliStorageFormat> for StorageFormat {
    fn from(fmt: CliStorageFormat) -> Self {
        match fmt {
            CliStorageFormat::Text => Self::Text,
            CliStorageFormat::Json => Self::Json,
            CliStorageFormat::Sqlite => Self::Sqlite,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct StorageArgs {
    /// Data file or database path (default: concept-breakdown.txt).
    #[arg(long)]
    pub data: Option<PathBuf>,
    /// Storage format (inferred from the file extension when omitted).
    #[arg(long)]
    pub format: Option<CliStorageFormat>,
    /// SQLite table prefix.
    #[arg(long)]
    pub prefix: Option<String>,
    /// Do not keep a .bak copy of the previous file on save.
    #[arg(long)]
    pub no_backup: bool,
    /// YAML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl StorageArgs {
    pub fn overrides(&self) -> StorageOverrides {
        StorageOverrides {
            format: self.format.map(StorageFormat::from),
            path: self.data.clone(),
            no_backup: self.no_backup,
            table_prefix: self.prefix.clone(),
        }
    }

    /// Merges these flags over `config`.
    pub fn resolve(&self, config: &ToolConfig) -> Result<ResolvedStorage, String> {
        config
            .resolve(&self.overrides())
            .map_err(|e| format!("Invalid storage settings: {e}"))
    }
}

/// Loads the configuration file if one was given.
pub fn load_config(path: Option<&PathBuf>) -> Result<ToolConfig, String> {
    match path {
        Some(path) => ToolConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display())),
        None => Ok(ToolConfig::default()),
    }
}

pub fn open_backend(storage: &ResolvedStorage) -> Result<Box<dyn Persistence>, String> {
    debug!(format = %storage.format, path = %storage.path.display(), "opening backend");
    let backend: Box<dyn Persistence> = match storage.format {
        StorageFormat::Text => {
            Box::new(TextBackend::new(&storage.path).with_backup(storage.backup))
        }
        StorageFormat::Json => {
            Box::new(JsonBackend::new(&storage.path).with_backup(storage.backup))
        }
        StorageFormat::Sqlite => Box::new(
            SqliteBackend::open(&storage.path, &storage.table_prefix)
                .map_err(|e| {
                    format!("Failed to open database '{}': {e}", storage.path.display())
                })?,
        ),
    };
    Ok(backend)
}

/// Opens the backend and performs the startup load.
///
/// Load diagnostics are printed to stderr as warnings.
pub fn open_session(storage: &ResolvedStorage) -> Result<DynSession, String> {
    let mut session = Session::new(open_backend(storage)?, DiagramCatalog::standard());
    let summary = session
        .load_on_startup()
        .map_err(|e| format!("Failed to load data: {e}"))?;
    for diagnostic in &summary.diagnostics {
        eprintln!("warning: {diagnostic}");
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use concept_breakdown_core::RecordStore;

    use super::*;

    fn storage(dir: &std::path::Path, name: &str) -> ResolvedStorage {
        StorageArgs {
            data: Some(dir.join(name)),
            ..StorageArgs::default()
        }
        .resolve(&ToolConfig::default())
        .unwrap()
    }

    #[test]
    fn test_format_flag_overrides_extension() {
        let args = StorageArgs {
            data: Some("notes.txt".into()),
            format: Some(CliStorageFormat::Json),
            ..StorageArgs::default()
        };
        let resolved = args.resolve(&ToolConfig::default()).unwrap();
        assert_eq!(resolved.format, StorageFormat::Json);
    }

    #[test]
    fn test_open_backend_per_format() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.txt", "b.json", "c.db"] {
            let storage = storage(dir.path(), name);
            let mut backend = open_backend(&storage).unwrap();
            assert!(!backend.exists());
            backend.save_all(&RecordStore::new()).unwrap();
            assert!(backend.exists(), "{name}");
        }
    }

    #[test]
    fn test_open_session_requires_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_session(&storage(dir.path(), "absent.txt")).err().unwrap();
        assert!(err.contains("not found"), "{err}");
    }
}
