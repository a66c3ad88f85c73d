//! Domain model for a reward children can redeem points for.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::ItemStatus;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Points debited on redemption, always greater than zero
    pub cost: u64,
    pub family_id: String,
    pub created_by: String,
    pub status: ItemStatus,
    /// Remaining redemptions; `None` is unlimited
    pub stock: Option<u32>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Reward {
    pub fn generate_id() -> String {
        format!("reward::{}", Uuid::new_v4())
    }

    pub fn is_active(&self) -> bool {
        self.status == ItemStatus::Active
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == Some(0)
    }
}
