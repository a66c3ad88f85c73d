//! Transaction executor: every business operation on the ledger.
//!
//! Each operation is a function of the document it mutates and the current
//! time. All validation runs before the first write to `document`, so an
//! `Err` always leaves the document exactly as it was. The ledger store runs
//! these against a private copy of the latest snapshot and only publishes the
//! copy once it is durably stored.

use chrono::{DateTime, Utc};
use shared::{
    CallerContext, CreateChoreRequest, CreateRewardRequest, ItemStatus, RegisterUserRequest,
    Role, UpdateChoreRequest, UpdateRewardRequest,
};

use super::errors::LedgerError;
use super::models::{
    Chore, CompletedChoreRecord, LedgerDocument, RedeemedRewardRecord, Reward, User,
};

pub const MAX_USERNAME_LENGTH: usize = 64;
pub const MAX_TITLE_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// How a child's family id is checked at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyPolicy {
    /// The family must already have a registered parent
    RequireExisting,
    /// Any non-empty family id is accepted
    AcceptAny,
}

/// A business operation together with the caller it runs for
#[derive(Debug, Clone)]
pub enum LedgerOperation {
    RegisterUser {
        request: RegisterUserRequest,
        family_policy: FamilyPolicy,
    },
    CreateChore {
        caller: CallerContext,
        request: CreateChoreRequest,
    },
    UpdateChore {
        caller: CallerContext,
        chore_id: String,
        request: UpdateChoreRequest,
    },
    DeleteChore {
        caller: CallerContext,
        chore_id: String,
    },
    CompleteChore {
        caller: CallerContext,
        chore_id: String,
    },
    CreateReward {
        caller: CallerContext,
        request: CreateRewardRequest,
    },
    UpdateReward {
        caller: CallerContext,
        reward_id: String,
        request: UpdateRewardRequest,
    },
    DeleteReward {
        caller: CallerContext,
        reward_id: String,
    },
    RedeemReward {
        caller: CallerContext,
        reward_id: String,
    },
}

impl LedgerOperation {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerOperation::RegisterUser { .. } => "register_user",
            LedgerOperation::CreateChore { .. } => "create_chore",
            LedgerOperation::UpdateChore { .. } => "update_chore",
            LedgerOperation::DeleteChore { .. } => "delete_chore",
            LedgerOperation::CompleteChore { .. } => "complete_chore",
            LedgerOperation::CreateReward { .. } => "create_reward",
            LedgerOperation::UpdateReward { .. } => "update_reward",
            LedgerOperation::DeleteReward { .. } => "delete_reward",
            LedgerOperation::RedeemReward { .. } => "redeem_reward",
        }
    }
}

/// Result of a committed operation
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    UserRegistered(User),
    ChoreCreated(Chore),
    ChoreUpdated(Chore),
    ChoreDeleted(Chore),
    ChoreCompleted {
        record: CompletedChoreRecord,
        balance: u64,
    },
    RewardCreated(Reward),
    RewardUpdated(Reward),
    RewardDeleted(Reward),
    RewardRedeemed {
        record: RedeemedRewardRecord,
        balance: u64,
    },
}

/// Apply one operation to `document`
pub fn execute(
    document: &mut LedgerDocument,
    operation: LedgerOperation,
    now: DateTime<Utc>,
) -> Result<OperationOutcome, LedgerError> {
    match operation {
        LedgerOperation::RegisterUser {
            request,
            family_policy,
        } => register_user(document, request, family_policy, now).map(OperationOutcome::UserRegistered),
        LedgerOperation::CreateChore { caller, request } => {
            create_chore(document, &caller, request, now).map(OperationOutcome::ChoreCreated)
        }
        LedgerOperation::UpdateChore {
            caller,
            chore_id,
            request,
        } => update_chore(document, &caller, &chore_id, request, now).map(OperationOutcome::ChoreUpdated),
        LedgerOperation::DeleteChore { caller, chore_id } => {
            delete_chore(document, &caller, &chore_id).map(OperationOutcome::ChoreDeleted)
        }
        LedgerOperation::CompleteChore { caller, chore_id } => {
            complete_chore(document, &caller, &chore_id, now)
                .map(|(record, balance)| OperationOutcome::ChoreCompleted { record, balance })
        }
        LedgerOperation::CreateReward { caller, request } => {
            create_reward(document, &caller, request, now).map(OperationOutcome::RewardCreated)
        }
        LedgerOperation::UpdateReward {
            caller,
            reward_id,
            request,
        } => update_reward(document, &caller, &reward_id, request, now).map(OperationOutcome::RewardUpdated),
        LedgerOperation::DeleteReward { caller, reward_id } => {
            delete_reward(document, &caller, &reward_id).map(OperationOutcome::RewardDeleted)
        }
        LedgerOperation::RedeemReward { caller, reward_id } => {
            redeem_reward(document, &caller, &reward_id, now)
                .map(|(record, balance)| OperationOutcome::RewardRedeemed { record, balance })
        }
    }
}

pub fn register_user(
    document: &mut LedgerDocument,
    request: RegisterUserRequest,
    family_policy: FamilyPolicy,
    now: DateTime<Utc>,
) -> Result<User, LedgerError> {
    let mut missing = Vec::new();
    if request.username.trim().is_empty() {
        missing.push("username");
    }
    if request.password_hash.is_empty() {
        missing.push("passwordHash");
    }
    if !missing.is_empty() {
        return Err(LedgerError::MissingFields(missing));
    }
    if request.username.len() > MAX_USERNAME_LENGTH {
        return Err(LedgerError::invalid(
            "username",
            format!("cannot exceed {} characters", MAX_USERNAME_LENGTH),
        ));
    }

    let role: Role = request
        .role
        .parse()
        .map_err(|_| LedgerError::InvalidRole(request.role.clone()))?;

    if document.username_taken(&request.username) {
        return Err(LedgerError::DuplicateUsername(request.username));
    }

    let family_id = match role {
        Role::Parent => User::generate_family_id(),
        Role::Child => {
            let family_id = request
                .family_id
                .filter(|id| !id.trim().is_empty())
                .ok_or(LedgerError::MissingFamilyId)?;
            if family_policy == FamilyPolicy::RequireExisting && !document.family_exists(&family_id) {
                return Err(LedgerError::UnknownFamily(family_id));
            }
            family_id
        }
    };

    let user = User {
        id: User::generate_id(),
        username: request.username,
        password_hash: request.password_hash,
        role,
        family_id,
        points: 0,
        created_at: now,
    };
    document.users.push(user.clone());
    Ok(user)
}

pub fn create_chore(
    document: &mut LedgerDocument,
    caller: &CallerContext,
    request: CreateChoreRequest,
    now: DateTime<Utc>,
) -> Result<Chore, LedgerError> {
    require_role(caller, Role::Parent)?;

    let mut missing = Vec::new();
    let title = non_blank(request.title);
    if title.is_none() {
        missing.push("title");
    }
    if request.points.is_none() {
        missing.push("points");
    }
    let (Some(title), Some(points)) = (title, request.points) else {
        return Err(LedgerError::MissingFields(missing));
    };
    let description = request.description.unwrap_or_default();
    validate_item_fields(Some(&title), Some(&description), Some(points), "points")?;

    let chore = Chore {
        id: Chore::generate_id(),
        title,
        description,
        points,
        family_id: caller.family_id.clone(),
        created_by: caller.user_id.clone(),
        status: ItemStatus::Active,
        created_at: now,
        updated_at: None,
    };
    document.chores.push(chore.clone());
    Ok(chore)
}

pub fn update_chore(
    document: &mut LedgerDocument,
    caller: &CallerContext,
    chore_id: &str,
    request: UpdateChoreRequest,
    now: DateTime<Utc>,
) -> Result<Chore, LedgerError> {
    require_role(caller, Role::Parent)?;
    validate_item_fields(
        request.title.as_ref(),
        request.description.as_ref(),
        request.points,
        "points",
    )?;
    if request.title.as_ref().is_some_and(|t| t.trim().is_empty()) {
        return Err(LedgerError::invalid("title", "cannot be empty"));
    }

    let index = document
        .chore_position(chore_id, &caller.family_id)
        .ok_or_else(|| LedgerError::not_found("chore", chore_id))?;

    let chore = &mut document.chores[index];
    if let Some(title) = request.title {
        chore.title = title;
    }
    if let Some(description) = request.description {
        chore.description = description;
    }
    if let Some(points) = request.points {
        chore.points = points;
    }
    if let Some(status) = request.status {
        chore.status = status;
    }
    chore.updated_at = Some(now);
    Ok(chore.clone())
}

pub fn delete_chore(
    document: &mut LedgerDocument,
    caller: &CallerContext,
    chore_id: &str,
) -> Result<Chore, LedgerError> {
    require_role(caller, Role::Parent)?;
    let index = document
        .chore_position(chore_id, &caller.family_id)
        .ok_or_else(|| LedgerError::not_found("chore", chore_id))?;
    Ok(document.chores.remove(index))
}

/// Credit the chore's points to the calling child
///
/// Returns the audit record and the child's new balance.
pub fn complete_chore(
    document: &mut LedgerDocument,
    caller: &CallerContext,
    chore_id: &str,
    now: DateTime<Utc>,
) -> Result<(CompletedChoreRecord, u64), LedgerError> {
    require_role(caller, Role::Child)?;

    let chore = document
        .chore_position(chore_id, &caller.family_id)
        .map(|index| &document.chores[index])
        .ok_or_else(|| LedgerError::not_found("chore", chore_id))?;
    if !chore.is_active() {
        return Err(LedgerError::Unavailable {
            kind: "chore",
            id: chore_id.to_string(),
        });
    }
    let (chore_title, points) = (chore.title.clone(), chore.points);

    let user = caller_user(document, caller)?;
    let balance = user
        .points
        .checked_add(points)
        .ok_or_else(|| LedgerError::invalid("points", "balance would overflow"))?;

    let record = CompletedChoreRecord {
        id: CompletedChoreRecord::generate_id(),
        chore_id: chore_id.to_string(),
        chore_title,
        user_id: user.id.clone(),
        username: user.username.clone(),
        points,
        completed_at: now,
    };

    credit(document, &caller.user_id, balance);
    document.completed_chores.push(record.clone());
    Ok((record, balance))
}

pub fn create_reward(
    document: &mut LedgerDocument,
    caller: &CallerContext,
    request: CreateRewardRequest,
    now: DateTime<Utc>,
) -> Result<Reward, LedgerError> {
    require_role(caller, Role::Parent)?;

    let mut missing = Vec::new();
    let title = non_blank(request.title);
    if title.is_none() {
        missing.push("title");
    }
    if request.cost.is_none() {
        missing.push("cost");
    }
    let (Some(title), Some(cost)) = (title, request.cost) else {
        return Err(LedgerError::MissingFields(missing));
    };
    let description = request.description.unwrap_or_default();
    validate_item_fields(Some(&title), Some(&description), Some(cost), "cost")?;

    let reward = Reward {
        id: Reward::generate_id(),
        title,
        description,
        cost,
        family_id: caller.family_id.clone(),
        created_by: caller.user_id.clone(),
        status: ItemStatus::Active,
        stock: request.stock,
        created_at: now,
        updated_at: None,
    };
    document.rewards.push(reward.clone());
    Ok(reward)
}

pub fn update_reward(
    document: &mut LedgerDocument,
    caller: &CallerContext,
    reward_id: &str,
    request: UpdateRewardRequest,
    now: DateTime<Utc>,
) -> Result<Reward, LedgerError> {
    require_role(caller, Role::Parent)?;
    validate_item_fields(
        request.title.as_ref(),
        request.description.as_ref(),
        request.cost,
        "cost",
    )?;
    if request.title.as_ref().is_some_and(|t| t.trim().is_empty()) {
        return Err(LedgerError::invalid("title", "cannot be empty"));
    }

    let index = document
        .reward_position(reward_id, &caller.family_id)
        .ok_or_else(|| LedgerError::not_found("reward", reward_id))?;

    let reward = &mut document.rewards[index];
    if let Some(title) = request.title {
        reward.title = title;
    }
    if let Some(description) = request.description {
        reward.description = description;
    }
    if let Some(cost) = request.cost {
        reward.cost = cost;
    }
    if let Some(status) = request.status {
        reward.status = status;
    }
    if let Some(stock) = request.stock {
        reward.stock = stock;
    }
    reward.updated_at = Some(now);
    Ok(reward.clone())
}

pub fn delete_reward(
    document: &mut LedgerDocument,
    caller: &CallerContext,
    reward_id: &str,
) -> Result<Reward, LedgerError> {
    require_role(caller, Role::Parent)?;
    let index = document
        .reward_position(reward_id, &caller.family_id)
        .ok_or_else(|| LedgerError::not_found("reward", reward_id))?;
    Ok(document.rewards.remove(index))
}

/// Debit the reward's cost from the calling child
///
/// The balance check runs against the document being mutated, so of two
/// serialized redemptions the second sees the first debit.
pub fn redeem_reward(
    document: &mut LedgerDocument,
    caller: &CallerContext,
    reward_id: &str,
    now: DateTime<Utc>,
) -> Result<(RedeemedRewardRecord, u64), LedgerError> {
    require_role(caller, Role::Child)?;

    let index = document
        .reward_position(reward_id, &caller.family_id)
        .ok_or_else(|| LedgerError::not_found("reward", reward_id))?;
    let reward = &document.rewards[index];
    if !reward.is_active() {
        return Err(LedgerError::Unavailable {
            kind: "reward",
            id: reward_id.to_string(),
        });
    }
    if reward.is_out_of_stock() {
        return Err(LedgerError::OutOfStock(reward_id.to_string()));
    }
    let (reward_title, cost) = (reward.title.clone(), reward.cost);

    let user = caller_user(document, caller)?;
    let balance = user
        .points
        .checked_sub(cost)
        .ok_or(LedgerError::InsufficientPoints {
            balance: user.points,
            cost,
        })?;

    let record = RedeemedRewardRecord {
        id: RedeemedRewardRecord::generate_id(),
        reward_id: reward_id.to_string(),
        reward_title,
        user_id: user.id.clone(),
        username: user.username.clone(),
        cost,
        redeemed_at: now,
    };

    credit(document, &caller.user_id, balance);
    let reward = &mut document.rewards[index];
    if let Some(stock) = reward.stock.as_mut() {
        *stock -= 1;
    }
    document.redeemed_rewards.push(record.clone());
    Ok((record, balance))
}

fn require_role(caller: &CallerContext, required: Role) -> Result<(), LedgerError> {
    let allowed = match required {
        Role::Parent => caller.is_parent(),
        Role::Child => caller.is_child(),
    };
    if allowed {
        Ok(())
    } else {
        Err(LedgerError::RoleForbidden { required })
    }
}

/// The caller's own record, which must sit in the caller's family
fn caller_user<'a>(
    document: &'a LedgerDocument,
    caller: &CallerContext,
) -> Result<&'a User, LedgerError> {
    document
        .user(&caller.user_id)
        .filter(|u| u.family_id == caller.family_id)
        .ok_or_else(|| LedgerError::not_found("user", caller.user_id.as_str()))
}

/// Set a validated balance; the user was looked up by the caller
fn credit(document: &mut LedgerDocument, user_id: &str, balance: u64) {
    if let Some(user) = document.user_mut(user_id) {
        user.points = balance;
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn validate_item_fields(
    title: Option<&String>,
    description: Option<&String>,
    amount: Option<u64>,
    amount_field: &'static str,
) -> Result<(), LedgerError> {
    if title.is_some_and(|t| t.len() > MAX_TITLE_LENGTH) {
        return Err(LedgerError::invalid(
            "title",
            format!("cannot exceed {} characters", MAX_TITLE_LENGTH),
        ));
    }
    if description.is_some_and(|d| d.len() > MAX_DESCRIPTION_LENGTH) {
        return Err(LedgerError::invalid(
            "description",
            format!("cannot exceed {} characters", MAX_DESCRIPTION_LENGTH),
        ));
    }
    if amount == Some(0) {
        return Err(LedgerError::invalid(amount_field, "must be greater than zero"));
    }
    Ok(())
}
