use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};

/// Role of a household member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Creates chores and rewards for the family
    Parent,
    /// Completes chores and redeems rewards
    Child,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Parent => "parent",
            Role::Child => "child",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parent" => Ok(Role::Parent),
            "child" => Ok(Role::Child),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoleParseError(pub String);

impl fmt::Display for RoleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid role '{}', expected 'parent' or 'child'", self.0)
    }
}

impl std::error::Error for RoleParseError {}

/// Whether a chore or reward is currently offered to the family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Active,
    Inactive,
}

/// Already-verified identity of the caller, supplied by the authentication layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerContext {
    pub user_id: String,
    pub role: Role,
    pub family_id: String,
}

impl CallerContext {
    pub fn new(user_id: impl Into<String>, role: Role, family_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            family_id: family_id.into(),
        }
    }

    pub fn is_parent(&self) -> bool {
        self.role == Role::Parent
    }

    pub fn is_child(&self) -> bool {
        self.role == Role::Child
    }
}

/// Request to register a new household member
///
/// The role is kept as free text so an unknown role can be reported as such
/// instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub username: String,
    /// Hash produced by the authentication layer; never the plain password
    pub password_hash: String,
    pub role: String,
    /// Required for children, ignored for parents
    #[serde(default)]
    pub family_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChoreRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub points: Option<u64>,
}

/// Partial update for a chore; unset fields are left unchanged
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChoreRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub points: Option<u64>,
    pub status: Option<ItemStatus>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRewardRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cost: Option<u64>,
    /// `None` means unlimited stock
    #[serde(default)]
    pub stock: Option<u32>,
}

/// Partial update for a reward; unset fields are left unchanged
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRewardRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cost: Option<u64>,
    pub status: Option<ItemStatus>,
    /// Absent: unchanged. `null`: unlimited. A number: that many left.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub stock: Option<Option<u32>>,
}

/// Distinguishes an explicit `null` from an absent field
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Roster entry for a family member; never carries credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub points: u64,
}

/// The caller's own profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub family_id: String,
    pub points: u64,
    pub created_at: DateTime<Utc>,
}

/// What the authentication layer needs to verify a login and build a `CallerContext`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub user_id: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub family_id: String,
}

impl Credentials {
    pub fn caller_context(&self) -> CallerContext {
        CallerContext::new(self.user_id.clone(), self.role, self.family_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("parent".parse::<Role>().unwrap(), Role::Parent);
        assert_eq!("child".parse::<Role>().unwrap(), Role::Child);

        // Roles are case-sensitive
        assert!("Parent".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());

        let err = "admin".parse::<Role>().unwrap_err();
        assert_eq!(err.0, "admin");
    }

    #[test]
    fn test_role_display_matches_serde() {
        assert_eq!(Role::Parent.to_string(), "parent");
        assert_eq!(serde_json::to_string(&Role::Child).unwrap(), "\"child\"");
    }

    #[test]
    fn test_caller_context_uses_camel_case() {
        let caller = CallerContext::new("user::1", Role::Child, "family::1");
        let json = serde_json::to_value(&caller).unwrap();

        assert_eq!(json["userId"], "user::1");
        assert_eq!(json["familyId"], "family::1");
        assert_eq!(json["role"], "child");
        assert!(caller.is_child());
        assert!(!caller.is_parent());
    }

    #[test]
    fn test_register_request_family_id_optional() {
        let request: RegisterUserRequest = serde_json::from_str(
            r#"{"username":"alice","passwordHash":"h","role":"parent"}"#,
        )
        .unwrap();
        assert_eq!(request.family_id, None);
    }

    #[test]
    fn test_update_reward_stock_distinguishes_null_from_absent() {
        let absent: UpdateRewardRequest = serde_json::from_str(r#"{"title":"Movie"}"#).unwrap();
        assert_eq!(absent.stock, None);

        let unlimited: UpdateRewardRequest = serde_json::from_str(r#"{"stock":null}"#).unwrap();
        assert_eq!(unlimited.stock, Some(None));

        let limited: UpdateRewardRequest = serde_json::from_str(r#"{"stock":3}"#).unwrap();
        assert_eq!(limited.stock, Some(Some(3)));
    }

    #[test]
    fn test_credentials_caller_context() {
        let credentials = Credentials {
            user_id: "user::42".to_string(),
            username: "bob".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Child,
            family_id: "family::7".to_string(),
        };

        let caller = credentials.caller_context();
        assert_eq!(caller.user_id, "user::42");
        assert_eq!(caller.role, Role::Child);
        assert_eq!(caller.family_id, "family::7");
    }
}
