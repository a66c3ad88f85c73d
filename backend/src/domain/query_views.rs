//! Read-only projections over a ledger snapshot.
//!
//! Every view is scoped to the caller's family and computed on demand from an
//! immutable document, so views never wait on the write gate.

use std::collections::HashSet;

use serde::Serialize;
use shared::{CallerContext, Credentials, FamilyMember, Role, UserProfile};

use super::errors::LedgerError;
use super::models::{Chore, CompletedChoreRecord, LedgerDocument, RedeemedRewardRecord, Reward};

/// Completion and redemption history visible to one caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub completed_chores: Vec<CompletedChoreRecord>,
    pub redeemed_rewards: Vec<RedeemedRewardRecord>,
}

/// Members of the caller's family, in registration order
pub fn family_roster(document: &LedgerDocument, caller: &CallerContext) -> Vec<FamilyMember> {
    document
        .users
        .iter()
        .filter(|u| u.family_id == caller.family_id)
        .map(|u| u.to_family_member())
        .collect()
}

pub fn list_chores(document: &LedgerDocument, caller: &CallerContext) -> Vec<Chore> {
    document
        .chores
        .iter()
        .filter(|c| c.family_id == caller.family_id)
        .cloned()
        .collect()
}

pub fn list_rewards(document: &LedgerDocument, caller: &CallerContext) -> Vec<Reward> {
    document
        .rewards
        .iter()
        .filter(|r| r.family_id == caller.family_id)
        .cloned()
        .collect()
}

pub fn get_chore(
    document: &LedgerDocument,
    caller: &CallerContext,
    chore_id: &str,
) -> Result<Chore, LedgerError> {
    document
        .chore_position(chore_id, &caller.family_id)
        .map(|index| document.chores[index].clone())
        .ok_or_else(|| LedgerError::not_found("chore", chore_id))
}

pub fn get_reward(
    document: &LedgerDocument,
    caller: &CallerContext,
    reward_id: &str,
) -> Result<Reward, LedgerError> {
    document
        .reward_position(reward_id, &caller.family_id)
        .map(|index| document.rewards[index].clone())
        .ok_or_else(|| LedgerError::not_found("reward", reward_id))
}

pub fn current_user(document: &LedgerDocument, caller: &CallerContext) -> Result<UserProfile, LedgerError> {
    document
        .user(&caller.user_id)
        .filter(|u| u.family_id == caller.family_id)
        .map(|u| u.to_profile())
        .ok_or_else(|| LedgerError::not_found("user", caller.user_id.as_str()))
}

/// Login material for `username`, looked up case-sensitively
pub fn find_credentials(document: &LedgerDocument, username: &str) -> Option<Credentials> {
    document.user_by_username(username).map(|u| u.to_credentials())
}

/// Completions by members of the caller's family, newest first
///
/// Records with equal timestamps keep the order they were appended in.
pub fn completed_chore_history(document: &LedgerDocument, caller: &CallerContext) -> Vec<CompletedChoreRecord> {
    let members = family_member_ids(document, &caller.family_id);
    let mut records: Vec<CompletedChoreRecord> = document
        .completed_chores
        .iter()
        .filter(|r| members.contains(r.user_id.as_str()))
        .cloned()
        .collect();
    records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    records
}

/// Redemptions by members of the caller's family, newest first
pub fn redeemed_reward_history(document: &LedgerDocument, caller: &CallerContext) -> Vec<RedeemedRewardRecord> {
    let members = family_member_ids(document, &caller.family_id);
    let mut records: Vec<RedeemedRewardRecord> = document
        .redeemed_rewards
        .iter()
        .filter(|r| members.contains(r.user_id.as_str()))
        .cloned()
        .collect();
    records.sort_by(|a, b| b.redeemed_at.cmp(&a.redeemed_at));
    records
}

/// History as the caller may see it: a child only their own, a parent the
/// whole family's
pub fn child_history(document: &LedgerDocument, caller: &CallerContext) -> HistoryView {
    let mut completed_chores = completed_chore_history(document, caller);
    let mut redeemed_rewards = redeemed_reward_history(document, caller);

    if caller.role == Role::Child {
        completed_chores.retain(|r| r.user_id == caller.user_id);
        redeemed_rewards.retain(|r| r.user_id == caller.user_id);
    }

    HistoryView {
        completed_chores,
        redeemed_rewards,
    }
}

fn family_member_ids<'a>(document: &'a LedgerDocument, family_id: &str) -> HashSet<&'a str> {
    document
        .users
        .iter()
        .filter(|u| u.family_id == family_id)
        .map(|u| u.id.as_str())
        .collect()
}
