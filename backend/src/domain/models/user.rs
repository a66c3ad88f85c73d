//! Domain model for a household member.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{FamilyMember, Role, UserProfile, Credentials};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Unique across all families, compared case-sensitively
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub family_id: String,
    pub points: u64,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn generate_id() -> String {
        format!("user::{}", Uuid::new_v4())
    }

    /// A parent registration opens a new family under this id
    pub fn generate_family_id() -> String {
        format!("family::{}", Uuid::new_v4())
    }

    pub fn to_family_member(&self) -> FamilyMember {
        FamilyMember {
            id: self.id.clone(),
            username: self.username.clone(),
            role: self.role,
            points: self.points,
        }
    }

    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            role: self.role,
            family_id: self.family_id.clone(),
            points: self.points,
            created_at: self.created_at,
        }
    }

    pub fn to_credentials(&self) -> Credentials {
        Credentials {
            user_id: self.id.clone(),
            username: self.username.clone(),
            password_hash: self.password_hash.clone(),
            role: self.role,
            family_id: self.family_id.clone(),
        }
    }
}
