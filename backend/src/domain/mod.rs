//! # Domain Module
//!
//! Business rules of the household points economy.
//!
//! ## Module Organization
//!
//! - **models**: records stored in the ledger document
//! - **transactions**: every mutating operation as a function of the document
//! - **query_views**: read-only projections over a snapshot
//! - **user_service / chore_service / reward_service**: typed entry points used
//!   by the external layer; each one runs its operations through the shared
//!   `LedgerStore`
//! - **errors**: the `LedgerError` taxonomy
//!
//! ## Business Rules
//!
//! - Point balances never go negative
//! - Chores and rewards are managed by parents; children complete and redeem
//! - Everything is scoped to one family; other families' items are reported
//!   as not found
//! - Completion and redemption records are append-only and capture the
//!   points, cost and title in force at the time

pub mod chore_service;
pub mod errors;
pub mod models;
pub mod query_views;
pub mod reward_service;
pub mod transactions;
pub mod user_service;

pub use chore_service::ChoreService;
pub use errors::{ErrorKind, LedgerError};
pub use reward_service::RewardService;
pub use transactions::{FamilyPolicy, LedgerOperation, OperationOutcome};
pub use user_service::UserService;
