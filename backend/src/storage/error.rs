//! Errors raised by the durable document file.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The file system refused a read, write, or rename
    #[error("Ledger storage unavailable at {path:?}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file exists but is not a valid ledger document
    #[error("Ledger file {path:?} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    /// The blocking persistence task did not run to completion
    #[error("Ledger persistence interrupted: {0}")]
    Interrupted(String),
}

impl StorageError {
    pub fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Unavailable {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        StorageError::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
