//! # JSON Document File
//!
//! Stores the whole ledger as a single pretty-printed JSON file.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── ledger_config.yaml
//! ├── ledger.json        ← This module manages this file
//! └── ledger.json.tmp    ← Only present while a write is in flight
//! ```
//!
//! ## Write Protocol
//!
//! 1. Serialize the document to `ledger.json.tmp` in the same directory
//! 2. `sync_all` the temp file
//! 3. Rename it over `ledger.json`
//! 4. `sync_all` the directory so the rename itself is durable
//!
//! A crash before step 3 leaves the old file intact; after step 3 the new
//! file is complete. Readers never see a truncated document.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::traits::DocumentStorage;
use super::StorageError;
use crate::domain::models::LedgerDocument;

#[derive(Debug, Clone)]
pub struct JsonDocumentFile {
    path: PathBuf,
}

impl JsonDocumentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling temp file used for the atomic write
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("ledger"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Create the directory holding the ledger file if it is missing
    pub fn prepare_directory(&self) -> Result<(), StorageError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
                fs::create_dir_all(dir).map_err(|e| StorageError::unavailable(dir, e))?;
                debug!("Created ledger directory {:?}", dir);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Remove a temp file left behind by an interrupted write
    ///
    /// Its contents were never committed, so they are discarded.
    pub fn discard_stale_temp(&self) -> Result<bool, StorageError> {
        let temp_path = self.temp_path();
        match fs::remove_file(&temp_path) {
            Ok(()) => {
                warn!("Discarded uncommitted ledger write at {:?}", temp_path);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::unavailable(temp_path, e)),
        }
    }

    /// Steps 1 and 2 of the write protocol: a fully synced temp file
    pub fn write_temp(&self, document: &LedgerDocument) -> Result<PathBuf, StorageError> {
        let temp_path = self.temp_path();
        let unavailable = |e: io::Error| StorageError::unavailable(&temp_path, e);

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(unavailable)?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document)
            .map_err(|e| unavailable(io::Error::new(io::ErrorKind::Other, e)))?;
        writer.write_all(b"\n").map_err(unavailable)?;

        let file = writer
            .into_inner()
            .map_err(|e| unavailable(e.into_error()))?;
        file.sync_all().map_err(unavailable)?;

        Ok(temp_path)
    }

    /// Steps 3 and 4 of the write protocol
    pub fn commit_temp(&self, temp_path: &Path) -> Result<(), StorageError> {
        fs::rename(temp_path, &self.path).map_err(|e| StorageError::unavailable(&self.path, e))?;
        self.sync_directory()
    }

    #[cfg(unix)]
    fn sync_directory(&self) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        File::open(dir)
            .and_then(|d| d.sync_all())
            .map_err(|e| StorageError::unavailable(dir, e))
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

impl DocumentStorage for JsonDocumentFile {
    fn load(&self) -> Result<Option<LedgerDocument>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::unavailable(&self.path, e)),
        };

        let document: LedgerDocument = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::corrupt(&self.path, e.to_string()))?;

        if document.version != LedgerDocument::CURRENT_VERSION {
            return Err(StorageError::corrupt(
                &self.path,
                format!(
                    "unsupported document version {} (expected {})",
                    document.version,
                    LedgerDocument::CURRENT_VERSION
                ),
            ));
        }

        debug!(
            "Loaded ledger from {:?}: {} users, {} chores, {} rewards",
            self.path,
            document.users.len(),
            document.chores.len(),
            document.rewards.len()
        );
        Ok(Some(document))
    }

    fn persist(&self, document: &LedgerDocument) -> Result<(), StorageError> {
        let temp_path = self.write_temp(document)?;
        self.commit_temp(&temp_path)?;
        debug!("Persisted ledger to {:?}", self.path);
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_in(temp_dir: &TempDir) -> JsonDocumentFile {
        JsonDocumentFile::new(temp_dir.path().join("ledger.json"))
    }

    #[test]
    fn test_temp_path_is_a_sibling() {
        let file = JsonDocumentFile::new("/data/ledger.json");
        assert_eq!(file.temp_path(), PathBuf::from("/data/ledger.json.tmp"));
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        assert!(file_in(&temp_dir).load().unwrap().is_none());
    }

    #[test]
    fn test_persist_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = file_in(&temp_dir);

        let document = LedgerDocument::default();
        file.persist(&document).unwrap();

        assert_eq!(file.load().unwrap(), Some(document));
        assert!(!file.temp_path().exists());
    }

    #[test]
    fn test_empty_file_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let file = file_in(&temp_dir);
        fs::write(file.path(), "").unwrap();

        let err = file.load().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_truncated_file_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let file = file_in(&temp_dir);
        fs::write(file.path(), r#"{"version": 1, "users": [{"id": "user::1""#).unwrap();

        assert!(matches!(file.load(), Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn test_unknown_version_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let file = file_in(&temp_dir);
        fs::write(
            file.path(),
            r#"{"version":99,"users":[],"chores":[],"rewards":[],"completedChores":[],"redeemedRewards":[]}"#,
        )
        .unwrap();

        match file.load() {
            Err(StorageError::Corrupt { reason, .. }) => assert!(reason.contains("99")),
            other => panic!("expected corrupt error, got {:?}", other),
        }
    }

    #[test]
    fn test_uncommitted_temp_does_not_replace_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = file_in(&temp_dir);
        let original = LedgerDocument::default();
        file.persist(&original).unwrap();

        fs::write(file.temp_path(), "{ half written").unwrap();

        assert_eq!(file.load().unwrap(), Some(original));
        assert!(file.discard_stale_temp().unwrap());
        assert!(!file.temp_path().exists());
        assert!(!file.discard_stale_temp().unwrap());
    }

    #[test]
    fn test_persist_into_missing_directory_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let file = JsonDocumentFile::new(temp_dir.path().join("gone").join("ledger.json"));

        let err = file.persist(&LedgerDocument::default()).unwrap_err();
        assert!(matches!(err, StorageError::Unavailable { .. }));
    }

    #[test]
    fn test_prepare_directory_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let file = JsonDocumentFile::new(temp_dir.path().join("a").join("b").join("ledger.json"));

        file.prepare_directory().unwrap();
        file.persist(&LedgerDocument::default()).unwrap();
        assert!(file.path().exists());
    }
}
