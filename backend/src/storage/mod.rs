//! # Storage Module
//!
//! Durable home of the chore ledger.
//!
//! The whole dataset lives in one versioned JSON document. The ledger store
//! keeps the latest committed copy in memory, serializes every mutation behind
//! a single write gate and replaces the file atomically after each commit.
//!
//! ## Layers
//!
//! - **json_file**: the on-disk document and its temp-file + rename protocol
//! - **traits**: the `DocumentStorage` seam the store persists through
//! - **ledger_store**: single-writer, copy-on-write document store
//!
//! ## Guarantees
//!
//! - Memory never runs ahead of disk: a snapshot is published only after the
//!   file holding it has been renamed into place
//! - A crash mid-write leaves the previous complete file
//! - Readers take an `Arc` to an immutable document and never wait on writers

pub mod error;
pub mod json_file;
pub mod ledger_store;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use error::StorageError;
pub use json_file::JsonDocumentFile;
pub use ledger_store::LedgerStore;
pub use traits::DocumentStorage;
