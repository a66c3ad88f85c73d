//! Append-only audit records.
//!
//! Titles and point values are copied in at transaction time, so a record
//! keeps its values when the chore or reward is later edited or deleted.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedChoreRecord {
    pub id: String,
    pub chore_id: String,
    pub chore_title: String,
    pub user_id: String,
    pub username: String,
    pub points: u64,
    pub completed_at: DateTime<Utc>,
}

impl CompletedChoreRecord {
    pub fn generate_id() -> String {
        format!("completion::{}", Uuid::new_v4())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemedRewardRecord {
    pub id: String,
    pub reward_id: String,
    pub reward_title: String,
    pub user_id: String,
    pub username: String,
    pub cost: u64,
    pub redeemed_at: DateTime<Utc>,
}

impl RedeemedRewardRecord {
    pub fn generate_id() -> String {
        format!("redemption::{}", Uuid::new_v4())
    }
}
