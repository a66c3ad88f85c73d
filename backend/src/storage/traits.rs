//! # Storage Traits
//!
//! The ledger store persists through this seam so the durable file can be
//! swapped for an instrumented implementation in tests.

use std::path::Path;

use super::StorageError;
use crate::domain::models::LedgerDocument;

/// Durable home of the ledger document
///
/// Both methods block on file IO; the ledger store calls them from
/// `tokio::task::spawn_blocking`.
pub trait DocumentStorage: Send + Sync + 'static {
    /// Load the stored document, or `None` when nothing has been stored yet
    fn load(&self) -> Result<Option<LedgerDocument>, StorageError>;

    /// Replace the stored document as one unit
    ///
    /// After an interrupted call the previously stored document must still
    /// load unchanged.
    fn persist(&self, document: &LedgerDocument) -> Result<(), StorageError>;

    /// Location used in log messages
    fn location(&self) -> &Path;
}
