//! Typed failures returned by ledger operations.
//!
//! Business-rule failures leave the ledger untouched. Storage failures either
//! abort startup or, during a mutation, leave the previous document in place.

use shared::Role;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Absent, or present in another family
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("Only a {required} may perform this operation")]
    RoleForbidden { required: Role },
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("Invalid role: '{0}'")]
    InvalidRole(String),
    #[error("A child account requires a family id")]
    MissingFamilyId,
    #[error("Family does not exist: {0}")]
    UnknownFamily(String),
    #[error("Username already taken: {0}")]
    DuplicateUsername(String),
    #[error("Insufficient points: balance {balance}, cost {cost}")]
    InsufficientPoints { balance: u64, cost: u64 },
    #[error("Reward out of stock: {0}")]
    OutOfStock(String),
    #[error("{kind} is not active: {id}")]
    Unavailable { kind: &'static str, id: String },
    /// The store committed an operation but returned another operation's outcome
    #[error("Unexpected outcome for {0}")]
    UnexpectedOutcome(&'static str),
}

/// Stable classification for callers that map failures to their own codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StorageUnavailable,
    StorageCorrupt,
    NotFound,
    RoleForbidden,
    MissingFields,
    InvalidField,
    InvalidRole,
    MissingFamilyId,
    UnknownFamily,
    DuplicateUsername,
    InsufficientPoints,
    OutOfStock,
    Unavailable,
    Internal,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Storage(StorageError::Corrupt { .. }) => ErrorKind::StorageCorrupt,
            LedgerError::Storage(_) => ErrorKind::StorageUnavailable,
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::RoleForbidden { .. } => ErrorKind::RoleForbidden,
            LedgerError::MissingFields(_) => ErrorKind::MissingFields,
            LedgerError::InvalidField { .. } => ErrorKind::InvalidField,
            LedgerError::InvalidRole(_) => ErrorKind::InvalidRole,
            LedgerError::MissingFamilyId => ErrorKind::MissingFamilyId,
            LedgerError::UnknownFamily(_) => ErrorKind::UnknownFamily,
            LedgerError::DuplicateUsername(_) => ErrorKind::DuplicateUsername,
            LedgerError::InsufficientPoints { .. } => ErrorKind::InsufficientPoints,
            LedgerError::OutOfStock(_) => ErrorKind::OutOfStock,
            LedgerError::Unavailable { .. } => ErrorKind::Unavailable,
            LedgerError::UnexpectedOutcome(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        LedgerError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_storage_errors_classify_by_cause() {
        let unavailable = LedgerError::from(StorageError::unavailable(
            "/nowhere/ledger.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        ));
        assert_eq!(unavailable.kind(), ErrorKind::StorageUnavailable);

        let corrupt = LedgerError::from(StorageError::corrupt("/tmp/ledger.json", "EOF"));
        assert_eq!(corrupt.kind(), ErrorKind::StorageCorrupt);

        let interrupted = LedgerError::from(StorageError::Interrupted("cancelled".to_string()));
        assert_eq!(interrupted.kind(), ErrorKind::StorageUnavailable);
    }

    #[test]
    fn test_error_messages() {
        let err = LedgerError::MissingFields(vec!["title", "points"]);
        assert_eq!(err.to_string(), "Missing required fields: title, points");

        let err = LedgerError::InsufficientPoints { balance: 10, cost: 15 };
        assert_eq!(err.to_string(), "Insufficient points: balance 10, cost 15");

        let err = LedgerError::RoleForbidden { required: Role::Parent };
        assert_eq!(err.to_string(), "Only a parent may perform this operation");
    }
}
