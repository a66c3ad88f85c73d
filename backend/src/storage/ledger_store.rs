//! # Ledger Store
//!
//! Owns the authoritative in-memory ledger document and is the only path by
//! which it changes.
//!
//! ## Concurrency
//!
//! - Mutations take one async write gate, so they run one at a time and each
//!   sees every mutation committed before it.
//! - A mutation runs against a private clone of the current document. The
//!   clone is persisted first and only then published with a single pointer
//!   swap. Readers holding an older `Arc` keep a complete, unchanging view.
//! - If persistence fails the swap never happens, so memory never runs ahead
//!   of disk.

use chrono::Utc;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::json_file::JsonDocumentFile;
use super::traits::DocumentStorage;
use super::StorageError;
use crate::domain::errors::LedgerError;
use crate::domain::models::LedgerDocument;
use crate::domain::transactions::{self, LedgerOperation, OperationOutcome};

type SharedDocument = Arc<RwLock<Arc<LedgerDocument>>>;

pub struct LedgerStore<S: DocumentStorage = JsonDocumentFile> {
    storage: Arc<S>,
    current: SharedDocument,
    write_gate: Arc<Mutex<()>>,
}

impl LedgerStore<JsonDocumentFile> {
    /// Open the ledger file at `path`, creating an empty ledger if it is missing
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let file = JsonDocumentFile::new(path.as_ref());
        let file = run_blocking(move || {
            file.prepare_directory()?;
            file.discard_stale_temp()?;
            Ok(file)
        })
        .await?;
        Self::with_storage(file).await
    }

    pub fn path(&self) -> &Path {
        self.storage.path()
    }
}

impl<S: DocumentStorage> LedgerStore<S> {
    /// Load the document from `storage`, initializing and persisting an empty
    /// one when nothing is stored yet
    pub async fn with_storage(storage: S) -> Result<Self, StorageError> {
        let storage = Arc::new(storage);
        let loader = Arc::clone(&storage);

        let (document, created) = run_blocking(move || match loader.load()? {
            Some(document) => Ok((document, false)),
            None => {
                let document = LedgerDocument::default();
                loader.persist(&document)?;
                Ok((document, true))
            }
        })
        .await?;

        if created {
            info!("Created empty ledger at {:?}", storage.location());
        } else {
            info!(
                "Opened ledger at {:?}: {} users, {} chores, {} rewards, {} history records",
                storage.location(),
                document.users.len(),
                document.chores.len(),
                document.rewards.len(),
                document.record_count()
            );
        }

        Ok(Self {
            storage,
            current: Arc::new(RwLock::new(Arc::new(document))),
            write_gate: Arc::new(Mutex::new(())),
        })
    }

    /// Immutable view of the latest committed document
    pub fn snapshot(&self) -> Arc<LedgerDocument> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            // Only a pointer swap happens under the lock, so a poisoned
            // guard still holds a complete document.
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Apply one business operation
    ///
    /// The operation is stamped with the wall-clock time at which it holds the
    /// write gate. Commit order is the order of the history collections, not
    /// of their timestamps.
    pub async fn apply(&self, operation: LedgerOperation) -> Result<OperationOutcome, LedgerError> {
        let name = operation.name();

        let result = self
            .transact(move |document| transactions::execute(document, operation, Utc::now()))
            .await;

        match &result {
            Ok(_) => info!("Committed {}", name),
            Err(LedgerError::Storage(e)) => error!("Failed to persist {}: {}", name, e),
            Err(e) => warn!("Rejected {}: {}", name, e),
        }
        result
    }

    /// Run `mutation` against the latest document as one atomic, durable step
    ///
    /// On `Err` from the mutation or from persistence the published document
    /// and the stored file are unchanged.
    pub async fn transact<T, F>(&self, mutation: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut LedgerDocument) -> Result<T, LedgerError>,
    {
        let gate = Arc::clone(&self.write_gate).lock_owned().await;

        let mut next = LedgerDocument::clone(&self.snapshot());
        let output = mutation(&mut next)?;

        let storage = Arc::clone(&self.storage);
        let current = Arc::clone(&self.current);
        let next = Arc::new(next);

        // The gate moves into the blocking task: a caller that stops waiting
        // cannot let the next mutation start before this one is published.
        run_blocking(move || {
            let _gate = gate;
            storage.persist(&next)?;
            publish(&current, next);
            Ok(())
        })
        .await?;

        debug!("Published new ledger snapshot");
        Ok(output)
    }
}

fn publish(current: &RwLock<Arc<LedgerDocument>>, next: Arc<LedgerDocument>) {
    match current.write() {
        Ok(mut guard) => *guard = next,
        Err(poisoned) => *poisoned.into_inner() = next,
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| StorageError::Interrupted(e.to_string()))?
}
