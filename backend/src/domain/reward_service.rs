use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use shared::{CallerContext, CreateRewardRequest, UpdateRewardRequest};

use crate::domain::errors::LedgerError;
use crate::domain::models::{RedeemedRewardRecord, Reward};
use crate::domain::query_views;
use crate::domain::transactions::{LedgerOperation, OperationOutcome};
use crate::storage::LedgerStore;

/// A committed redemption and the child's balance after it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRedemption {
    pub record: RedeemedRewardRecord,
    pub balance: u64,
}

/// Service for the rewards a family offers and their redemption
#[derive(Clone)]
pub struct RewardService {
    store: Arc<LedgerStore>,
}

impl RewardService {
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    pub async fn create_reward(&self, caller: &CallerContext, request: CreateRewardRequest) -> Result<Reward, LedgerError> {
        info!("Creating reward: title={:?}, cost={:?}", request.title, request.cost);

        let operation = LedgerOperation::CreateReward {
            caller: caller.clone(),
            request,
        };
        let reward = match self.store.apply(operation).await? {
            OperationOutcome::RewardCreated(reward) => reward,
            _ => return Err(LedgerError::UnexpectedOutcome("create_reward")),
        };

        info!("Created reward: {} with ID: {}", reward.title, reward.id);
        Ok(reward)
    }

    pub async fn update_reward(
        &self,
        caller: &CallerContext,
        reward_id: &str,
        request: UpdateRewardRequest,
    ) -> Result<Reward, LedgerError> {
        info!("Updating reward: {}", reward_id);

        let operation = LedgerOperation::UpdateReward {
            caller: caller.clone(),
            reward_id: reward_id.to_string(),
            request,
        };
        let reward = match self.store.apply(operation).await? {
            OperationOutcome::RewardUpdated(reward) => reward,
            _ => return Err(LedgerError::UnexpectedOutcome("update_reward")),
        };

        info!("Updated reward: {} with ID: {}", reward.title, reward.id);
        Ok(reward)
    }

    pub async fn delete_reward(&self, caller: &CallerContext, reward_id: &str) -> Result<Reward, LedgerError> {
        info!("Deleting reward: {}", reward_id);

        let operation = LedgerOperation::DeleteReward {
            caller: caller.clone(),
            reward_id: reward_id.to_string(),
        };
        let reward = match self.store.apply(operation).await? {
            OperationOutcome::RewardDeleted(reward) => reward,
            _ => return Err(LedgerError::UnexpectedOutcome("delete_reward")),
        };

        info!("Deleted reward: {} with ID: {}", reward.title, reward.id);
        Ok(reward)
    }

    /// Debit a reward's cost from the calling child
    pub async fn redeem_reward(&self, caller: &CallerContext, reward_id: &str) -> Result<RewardRedemption, LedgerError> {
        info!("User {} redeeming reward {}", caller.user_id, reward_id);

        let operation = LedgerOperation::RedeemReward {
            caller: caller.clone(),
            reward_id: reward_id.to_string(),
        };
        let (record, balance) = match self.store.apply(operation).await? {
            OperationOutcome::RewardRedeemed { record, balance } => (record, balance),
            _ => return Err(LedgerError::UnexpectedOutcome("redeem_reward")),
        };

        info!(
            "{} spent {} points on '{}', balance now {}",
            record.username, record.cost, record.reward_title, balance
        );
        Ok(RewardRedemption { record, balance })
    }

    pub fn list_rewards(&self, caller: &CallerContext) -> Vec<Reward> {
        let rewards = query_views::list_rewards(&self.store.snapshot(), caller);
        info!("Found {} rewards for family {}", rewards.len(), caller.family_id);
        rewards
    }

    pub fn get_reward(&self, caller: &CallerContext, reward_id: &str) -> Result<Reward, LedgerError> {
        query_views::get_reward(&self.store.snapshot(), caller, reward_id)
    }

    /// Redemption history visible to the caller, newest first
    pub fn redemption_history(&self, caller: &CallerContext) -> Vec<RedeemedRewardRecord> {
        query_views::child_history(&self.store.snapshot(), caller).redeemed_rewards
    }
}
