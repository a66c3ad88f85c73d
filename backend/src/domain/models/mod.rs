//! Records stored in the ledger document.

pub mod user;
pub mod chore;
pub mod reward;
pub mod history;
pub mod document;

pub use user::User;
pub use chore::Chore;
pub use reward::Reward;
pub use history::{CompletedChoreRecord, RedeemedRewardRecord};
pub use document::LedgerDocument;
