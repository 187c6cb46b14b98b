//! Backup-before-overwrite file writes.
//!
//! Before a data file is replaced, its previous contents are copied to a
//! sibling `<name>.bak`. If that copy fails the save is refused and the data
//! file is left alone. If the write itself fails the backup is copied back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::error::{DbError, Result};

/// What a successful save did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub bytes_written: usize,
    /// Location of the copy of the previous contents, if one was made.
    pub backup: Option<PathBuf>,
}

/// Returns the backup location for `path`: the full file name plus `.bak`.
///
/// # Examples
///
/// ```
/// # use concept_breakdown_db::backup::backup_path;
/// # use std::path::Path;
/// assert_eq!(backup_path("data/study.txt"), Path::new("data/study.txt.bak"));
/// ```
pub fn backup_path(path: impl AsRef<Path>) -> PathBuf {
    let mut name = path.as_ref().as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Writes `contents` to `path`, copying any existing file aside first.
///
/// # Errors
///
/// - [`DbError::BackupFailed`] if the existing file could not be copied;
///   `path` is untouched.
/// - [`DbError::WriteFailed`] if writing failed; `restored` reports whether
///   the previous contents were put back.
pub fn write_with_backup(path: impl AsRef<Path>, contents: &[u8]) -> Result<SaveOutcome> {
    write_guarded(path.as_ref(), true, contents.len(), |p| fs::write(p, contents))
}

/// Writes `contents` to `path` without keeping a backup.
///
/// # Errors
///
/// Returns [`DbError::WriteFailed`] if writing failed.
pub fn write_without_backup(path: impl AsRef<Path>, contents: &[u8]) -> Result<SaveOutcome> {
    write_guarded(path.as_ref(), false, contents.len(), |p| fs::write(p, contents))
}

fn write_guarded<F>(path: &Path, keep_backup: bool, bytes: usize, write: F) -> Result<SaveOutcome>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let backup = if keep_backup && path.is_file() {
        let target = backup_path(path);
        fs::copy(path, &target).map_err(|source| DbError::BackupFailed {
            path: target.clone(),
            source,
        })?;
        debug!(path = %path.display(), backup = %target.display(), "backup created");
        Some(target)
    } else {
        None
    };

    if let Err(source) = write(path) {
        let restored = match &backup {
            Some(saved) => match fs::copy(saved, path) {
                Ok(_) => true,
                Err(err) => {
                    error!(path = %path.display(), error = %err, "could not restore backup");
                    false
                }
            },
            None => false,
        };
        return Err(DbError::WriteFailed {
            path: path.to_path_buf(),
            source,
            restored,
        });
    }

    debug!(path = %path.display(), bytes, "file written");
    Ok(SaveOutcome {
        bytes_written: bytes,
        backup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_has_no_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");

        let outcome = write_with_backup(&path, b"Category: 1,Design\n").unwrap();
        assert_eq!(outcome.bytes_written, 19);
        assert_eq!(outcome.backup, None);
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn test_overwrite_keeps_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "old").unwrap();

        let outcome = write_with_backup(&path, b"new").unwrap();
        let backup = outcome.backup.unwrap();
        assert_eq!(backup, dir.path().join("data.txt.bak"));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "old");
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_backup_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "old").unwrap();

        let outcome = write_without_backup(&path, b"new").unwrap();
        assert_eq!(outcome.backup, None);
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn test_backup_failure_aborts_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "old").unwrap();
        // A directory where the backup file should go makes the copy fail.
        fs::create_dir(backup_path(&path)).unwrap();

        let err = write_with_backup(&path, b"new").unwrap_err();
        assert!(matches!(err, DbError::BackupFailed { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
    }

    #[test]
    fn test_failed_write_restores_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "old").unwrap();

        let err = write_guarded(&path, true, 3, |p| {
            fs::write(p, "partial")?;
            Err(io::Error::other("disk full"))
        })
        .unwrap_err();

        assert!(matches!(err, DbError::WriteFailed { restored: true, .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
    }

    #[test]
    fn test_failed_write_without_backup_is_not_restored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");

        let err =
            write_guarded(&path, true, 0, |_| Err(io::Error::other("read-only"))).unwrap_err();
        assert!(matches!(err, DbError::WriteFailed { restored: false, .. }));
    }
}
