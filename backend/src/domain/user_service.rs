use std::sync::Arc;
use tracing::{info, warn};

use shared::{CallerContext, Credentials, FamilyMember, RegisterUserRequest, UserProfile};

use crate::domain::errors::LedgerError;
use crate::domain::models::User;
use crate::domain::query_views;
use crate::domain::transactions::{FamilyPolicy, LedgerOperation, OperationOutcome};
use crate::storage::LedgerStore;

/// Service for registering household members and reading their accounts
#[derive(Clone)]
pub struct UserService {
    store: Arc<LedgerStore>,
    family_policy: FamilyPolicy,
}

impl UserService {
    pub fn new(store: Arc<LedgerStore>, family_policy: FamilyPolicy) -> Self {
        Self { store, family_policy }
    }

    /// Register a parent (opening a new family) or a child joining one
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, LedgerError> {
        info!("Registering user: username={}, role={}", request.username, request.role);

        let operation = LedgerOperation::RegisterUser {
            request,
            family_policy: self.family_policy,
        };
        let user = match self.store.apply(operation).await? {
            OperationOutcome::UserRegistered(user) => user,
            _ => return Err(LedgerError::UnexpectedOutcome("register_user")),
        };

        info!("Registered {} {} in family {}", user.role, user.id, user.family_id);
        Ok(user)
    }

    /// The caller's own profile
    pub fn profile(&self, caller: &CallerContext) -> Result<UserProfile, LedgerError> {
        query_views::current_user(&self.store.snapshot(), caller)
    }

    pub fn roster(&self, caller: &CallerContext) -> Vec<FamilyMember> {
        let roster = query_views::family_roster(&self.store.snapshot(), caller);
        info!("Family {} has {} members", caller.family_id, roster.len());
        roster
    }

    /// Login material for the authentication layer
    pub fn credentials(&self, username: &str) -> Option<Credentials> {
        let credentials = query_views::find_credentials(&self.store.snapshot(), username);
        if credentials.is_none() {
            warn!("No account for username: {}", username);
        }
        credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;
    use crate::storage::test_utils::{register_request, TestEnvironment};
    use shared::Role;

    async fn setup(family_policy: FamilyPolicy) -> (TestEnvironment, UserService) {
        let env = TestEnvironment::new().unwrap();
        let store = Arc::new(env.open_store().await.unwrap());
        (env, UserService::new(store, family_policy))
    }

    #[tokio::test]
    async fn test_register_parent_and_child() {
        let (_env, service) = setup(FamilyPolicy::RequireExisting).await;

        let alice = service.register(register_request("alice", "pw1", "parent", None)).await.unwrap();
        assert_eq!(alice.role, Role::Parent);
        assert_eq!(alice.points, 0);
        assert!(alice.family_id.starts_with("family::"));

        let bob = service
            .register(register_request("bob", "pw2", "child", Some(alice.family_id.as_str())))
            .await
            .unwrap();
        assert_eq!(bob.family_id, alice.family_id);

        let roster = service.roster(&alice.to_credentials().caller_context());
        assert_eq!(roster.len(), 2);
    }

    #[tokio::test]
    async fn test_register_rejections() {
        let (_env, service) = setup(FamilyPolicy::RequireExisting).await;
        service.register(register_request("alice", "pw1", "parent", None)).await.unwrap();

        let duplicate = service.register(register_request("alice", "pw9", "parent", None)).await;
        assert_eq!(duplicate.unwrap_err().kind(), ErrorKind::DuplicateUsername);

        let role = service.register(register_request("carl", "pw", "grandparent", None)).await;
        assert_eq!(role.unwrap_err().kind(), ErrorKind::InvalidRole);

        let orphan = service.register(register_request("dina", "pw", "child", None)).await;
        assert_eq!(orphan.unwrap_err().kind(), ErrorKind::MissingFamilyId);

        let unknown = service
            .register(register_request("erin", "pw", "child", Some("family::nowhere")))
            .await;
        assert_eq!(unknown.unwrap_err().kind(), ErrorKind::UnknownFamily);
    }

    #[tokio::test]
    async fn test_permissive_policy_accepts_any_family() {
        let (_env, service) = setup(FamilyPolicy::AcceptAny).await;

        let child = service
            .register(register_request("bob", "pw2", "child", Some("family::later")))
            .await
            .unwrap();
        assert_eq!(child.family_id, "family::later");
    }

    #[tokio::test]
    async fn test_profile_and_credentials() {
        let (_env, service) = setup(FamilyPolicy::RequireExisting).await;
        let alice = service.register(register_request("alice", "pw1", "parent", None)).await.unwrap();

        let credentials = service.credentials("alice").unwrap();
        assert_eq!(credentials.password_hash, "pw1");

        let profile = service.profile(&credentials.caller_context()).unwrap();
        assert_eq!(profile.id, alice.id);
        assert_eq!(profile.created_at, alice.created_at);

        assert!(service.credentials("mallory").is_none());
    }
}
