//! The whole ledger as one versioned document.
//!
//! ## On-disk format
//!
//! ```json
//! {
//!   "version": 1,
//!   "users": [],
//!   "chores": [],
//!   "rewards": [],
//!   "completedChores": [],
//!   "redeemedRewards": []
//! }
//! ```
//!
//! Each collection keeps insertion order; the document is rewritten in full
//! on every committed mutation.

use serde::{Deserialize, Serialize};
use shared::Role;

use super::{Chore, CompletedChoreRecord, RedeemedRewardRecord, Reward, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDocument {
    pub version: u32,
    pub users: Vec<User>,
    pub chores: Vec<Chore>,
    pub rewards: Vec<Reward>,
    pub completed_chores: Vec<CompletedChoreRecord>,
    pub redeemed_rewards: Vec<RedeemedRewardRecord>,
}

impl Default for LedgerDocument {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            users: Vec::new(),
            chores: Vec::new(),
            rewards: Vec::new(),
            completed_chores: Vec::new(),
            redeemed_rewards: Vec::new(),
        }
    }
}

impl LedgerDocument {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub fn user_mut(&mut self, user_id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == user_id)
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn username_taken(&self, username: &str) -> bool {
        self.user_by_username(username).is_some()
    }

    /// A family exists once a parent has registered with its id
    pub fn family_exists(&self, family_id: &str) -> bool {
        self.users
            .iter()
            .any(|u| u.role == Role::Parent && u.family_id == family_id)
    }

    /// Position of a chore, only if it belongs to `family_id`
    pub fn chore_position(&self, chore_id: &str, family_id: &str) -> Option<usize> {
        self.chores
            .iter()
            .position(|c| c.id == chore_id && c.family_id == family_id)
    }

    /// Position of a reward, only if it belongs to `family_id`
    pub fn reward_position(&self, reward_id: &str, family_id: &str) -> Option<usize> {
        self.rewards
            .iter()
            .position(|r| r.id == reward_id && r.family_id == family_id)
    }

    pub fn record_count(&self) -> usize {
        self.completed_chores.len() + self.redeemed_rewards.len()
    }
}
