//! Tool configuration.
//!
//! Defines the YAML-serializable settings that choose the storage backend,
//! the data location, whether saves keep a backup, and the log level.
//! Command-line flags override file values through [`ToolConfig::resolve`].
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1"
//! storage:
//!   format: sqlite
//!   path: study.db
//!   backup: true
//!   table_prefix: cbt_
//! logging:
//!   level: info
//! ```

use std::fmt;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DbError, Result};

/// Data file used when neither the command line nor the config names one.
pub const DEFAULT_DATA_PATH: &str = "concept-breakdown.txt";

/// Table prefix used by the SQLite backend when none is configured.
pub const DEFAULT_TABLE_PREFIX: &str = "cbt_";

/// On-disk representation of the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    /// Line-oriented `Category:` / `Concept:` / `Component:` records.
    Text,
    /// Pretty-printed JSON snapshot.
    Json,
    /// SQLite database with one table per record kind.
    Sqlite,
}

impl StorageFormat {
    /// Guesses the format from a file extension.
    ///
    /// `.json` is JSON, `.db`, `.sqlite` and `.sqlite3` are SQLite, and
    /// anything else is text.
    ///
    /// # Examples
    ///
    /// ```
    /// # use concept_breakdown_db::StorageFormat;
    /// assert_eq!(StorageFormat::from_path("notes.json"), StorageFormat::Json);
    /// assert_eq!(StorageFormat::from_path("study.DB"), StorageFormat::Sqlite);
    /// assert_eq!(StorageFormat::from_path("data.txt"), StorageFormat::Text);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => StorageFormat::Json,
            Some("db" | "sqlite" | "sqlite3") => StorageFormat::Sqlite,
            _ => StorageFormat::Text,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StorageFormat::Text => "text",
            StorageFormat::Json => "json",
            StorageFormat::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageFormat {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(StorageFormat::Text),
            "json" => Ok(StorageFormat::Json),
            "sqlite" | "db" => Ok(StorageFormat::Sqlite),
            other => Err(DbError::InvalidConfig(format!(
                "unknown storage format '{other}' (expected text, json, or sqlite)"
            ))),
        }
    }
}

/// Where and how records are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend to use. Inferred from `path` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<StorageFormat>,
    /// Data file or database location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Copy the previous file to `<path>.bak` before each file save.
    #[serde(default = "default_backup")]
    pub backup: bool,
    /// Prefix for SQLite table names.
    #[serde(default = "default_prefix")]
    pub table_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            format: None,
            path: None,
            backup: default_backup(),
            table_prefix: default_prefix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, such as `warn` or `concept_breakdown_db=debug`.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Top-level configuration file.
///
/// # Examples
///
/// ```
/// # use concept_breakdown_db::{StorageFormat, StorageOverrides, ToolConfig};
/// let yaml = "version: \"1\"\nstorage:\n  path: study.json\n";
/// let config: ToolConfig = serde_yaml::from_str(yaml).unwrap();
/// let resolved = config.resolve(&StorageOverrides::default()).unwrap();
/// assert_eq!(resolved.format, StorageFormat::Json);
/// assert!(resolved.backup);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Configuration format version.
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Values given on the command line. `None` leaves the file value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageOverrides {
    pub format: Option<StorageFormat>,
    pub path: Option<PathBuf>,
    pub no_backup: bool,
    pub table_prefix: Option<String>,
}

/// Fully determined storage settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStorage {
    pub format: StorageFormat,
    pub path: PathBuf,
    pub backup: bool,
    pub table_prefix: String,
}

impl ToolConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](DbError::IoError) if the file cannot be read, or
    /// [`YamlError`](DbError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](DbError::IoError) if the file cannot be written,
    /// or [`YamlError`](DbError::YamlError) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Merges command-line overrides over the file values.
    ///
    /// The path falls back to [`DEFAULT_DATA_PATH`]; the format falls back
    /// to [`StorageFormat::from_path`] on the resolved path.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfig`](DbError::InvalidConfig) if the table prefix
    /// is empty or contains characters other than ASCII letters, digits, and
    /// underscores.
    pub fn resolve(&self, overrides: &StorageOverrides) -> Result<ResolvedStorage> {
        let path = overrides
            .path
            .clone()
            .or_else(|| self.storage.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        let format = overrides
            .format
            .or(self.storage.format)
            .unwrap_or_else(|| StorageFormat::from_path(&path));
        let table_prefix = overrides
            .table_prefix
            .clone()
            .unwrap_or_else(|| self.storage.table_prefix.clone());
        if table_prefix.is_empty()
            || !table_prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(DbError::InvalidConfig(format!(
                "table prefix '{table_prefix}' must be non-empty ASCII letters, digits, or '_'"
            )));
        }
        Ok(ResolvedStorage {
            format,
            path,
            backup: self.storage.backup && !overrides.no_backup,
            table_prefix,
        })
    }
}

fn default_version() -> String {
    "1".to_string()
}

fn default_backup() -> bool {
    true
}

fn default_prefix() -> String {
    DEFAULT_TABLE_PREFIX.to_string()
}

fn default_level() -> String {
    "warn".to_string()
}
