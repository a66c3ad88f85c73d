//! Domain model for a chore offered to a family.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::ItemStatus;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chore {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Points credited on completion, always greater than zero
    pub points: u64,
    pub family_id: String,
    /// User id of the parent who created the chore
    pub created_by: String,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Chore {
    pub fn generate_id() -> String {
        format!("chore::{}", Uuid::new_v4())
    }

    pub fn is_active(&self) -> bool {
        self.status == ItemStatus::Active
    }
}
