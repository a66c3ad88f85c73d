use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use shared::{CallerContext, CreateChoreRequest, UpdateChoreRequest};

use crate::domain::errors::LedgerError;
use crate::domain::models::{Chore, CompletedChoreRecord};
use crate::domain::query_views;
use crate::domain::transactions::{LedgerOperation, OperationOutcome};
use crate::storage::LedgerStore;

/// A committed completion and the child's balance after it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoreCompletion {
    pub record: CompletedChoreRecord,
    pub balance: u64,
}

/// Service for the chores a family offers and their completion
#[derive(Clone)]
pub struct ChoreService {
    store: Arc<LedgerStore>,
}

impl ChoreService {
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    pub async fn create_chore(&self, caller: &CallerContext, request: CreateChoreRequest) -> Result<Chore, LedgerError> {
        info!("Creating chore: title={:?}, points={:?}", request.title, request.points);

        let operation = LedgerOperation::CreateChore {
            caller: caller.clone(),
            request,
        };
        let chore = match self.store.apply(operation).await? {
            OperationOutcome::ChoreCreated(chore) => chore,
            _ => return Err(LedgerError::UnexpectedOutcome("create_chore")),
        };

        info!("Created chore: {} with ID: {}", chore.title, chore.id);
        Ok(chore)
    }

    pub async fn update_chore(
        &self,
        caller: &CallerContext,
        chore_id: &str,
        request: UpdateChoreRequest,
    ) -> Result<Chore, LedgerError> {
        info!("Updating chore: {}", chore_id);

        let operation = LedgerOperation::UpdateChore {
            caller: caller.clone(),
            chore_id: chore_id.to_string(),
            request,
        };
        let chore = match self.store.apply(operation).await? {
            OperationOutcome::ChoreUpdated(chore) => chore,
            _ => return Err(LedgerError::UnexpectedOutcome("update_chore")),
        };

        info!("Updated chore: {} with ID: {}", chore.title, chore.id);
        Ok(chore)
    }

    pub async fn delete_chore(&self, caller: &CallerContext, chore_id: &str) -> Result<Chore, LedgerError> {
        info!("Deleting chore: {}", chore_id);

        let operation = LedgerOperation::DeleteChore {
            caller: caller.clone(),
            chore_id: chore_id.to_string(),
        };
        let chore = match self.store.apply(operation).await? {
            OperationOutcome::ChoreDeleted(chore) => chore,
            _ => return Err(LedgerError::UnexpectedOutcome("delete_chore")),
        };

        info!("Deleted chore: {} with ID: {}", chore.title, chore.id);
        Ok(chore)
    }

    /// Credit a chore's points to the calling child
    pub async fn complete_chore(&self, caller: &CallerContext, chore_id: &str) -> Result<ChoreCompletion, LedgerError> {
        info!("User {} completing chore {}", caller.user_id, chore_id);

        let operation = LedgerOperation::CompleteChore {
            caller: caller.clone(),
            chore_id: chore_id.to_string(),
        };
        let (record, balance) = match self.store.apply(operation).await? {
            OperationOutcome::ChoreCompleted { record, balance } => (record, balance),
            _ => return Err(LedgerError::UnexpectedOutcome("complete_chore")),
        };

        info!(
            "{} earned {} points for '{}', balance now {}",
            record.username, record.points, record.chore_title, balance
        );
        Ok(ChoreCompletion { record, balance })
    }

    pub fn list_chores(&self, caller: &CallerContext) -> Vec<Chore> {
        let chores = query_views::list_chores(&self.store.snapshot(), caller);
        info!("Found {} chores for family {}", chores.len(), caller.family_id);
        chores
    }

    pub fn get_chore(&self, caller: &CallerContext, chore_id: &str) -> Result<Chore, LedgerError> {
        query_views::get_chore(&self.store.snapshot(), caller, chore_id)
    }

    /// Completion history visible to the caller, newest first
    pub fn completion_history(&self, caller: &CallerContext) -> Vec<CompletedChoreRecord> {
        query_views::child_history(&self.store.snapshot(), caller).completed_chores
    }
}
