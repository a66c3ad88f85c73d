//! Test utilities module for automatic cleanup and consistent test infrastructure
//!
//! This module provides RAII-based cleanup that guarantees test data is removed
//! even if tests panic or fail.

use std::path::PathBuf;
use tempfile::TempDir;
use shared::{CallerContext, CreateChoreRequest, CreateRewardRequest, RegisterUserRequest};

use super::{LedgerStore, StorageError};
use crate::domain::transactions::{self, FamilyPolicy};

/// RAII test environment; the ledger directory is removed on drop
pub struct TestEnvironment {
    /// Kept alive so the directory survives until the environment is dropped
    _temp_dir: TempDir,
    pub base_path: PathBuf,
    pub ledger_path: PathBuf,
}

/// A parent and a child sharing one family
pub struct TestFamily {
    pub parent: CallerContext,
    pub child: CallerContext,
}

impl TestEnvironment {
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = TempDir::with_prefix("chore_ledger_test")?;
        let base_path = temp_dir.path().to_path_buf();
        let ledger_path = base_path.join("ledger.json");

        Ok(Self {
            _temp_dir: temp_dir,
            base_path,
            ledger_path,
        })
    }

    pub async fn open_store(&self) -> Result<LedgerStore, StorageError> {
        LedgerStore::open(&self.ledger_path).await
    }

    /// Register parent "alice" and child "bob" in a fresh family
    pub async fn seed_family(&self, store: &LedgerStore) -> TestFamily {
        let parent = store
            .transact(|document| {
                transactions::register_user(
                    document,
                    register_request("alice", "pw1", "parent", None),
                    FamilyPolicy::RequireExisting,
                    chrono::Utc::now(),
                )
            })
            .await
            .expect("Failed to register parent");

        let child = store
            .transact(|document| {
                transactions::register_user(
                    document,
                    register_request("bob", "pw2", "child", Some(parent.family_id.as_str())),
                    FamilyPolicy::RequireExisting,
                    chrono::Utc::now(),
                )
            })
            .await
            .expect("Failed to register child");

        TestFamily {
            parent: CallerContext::new(parent.id, parent.role, parent.family_id),
            child: CallerContext::new(child.id, child.role, child.family_id),
        }
    }
}

pub fn register_request(
    username: &str,
    password_hash: &str,
    role: &str,
    family_id: Option<&str>,
) -> RegisterUserRequest {
    RegisterUserRequest {
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        role: role.to_string(),
        family_id: family_id.map(str::to_string),
    }
}

pub fn chore_request(title: &str, points: u64) -> CreateChoreRequest {
    CreateChoreRequest {
        title: Some(title.to_string()),
        description: Some(format!("{} for the whole family", title)),
        points: Some(points),
    }
}

pub fn reward_request(title: &str, cost: u64) -> CreateRewardRequest {
    CreateRewardRequest {
        title: Some(title.to_string()),
        description: None,
        cost: Some(cost),
        stock: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_environment_cleanup() {
        let path = {
            let env = TestEnvironment::new().unwrap();
            env.open_store().await.unwrap();
            assert!(env.ledger_path.exists());
            env.base_path.clone()
        };

        assert!(!path.exists());
    }
}
