//! # Chore Ledger Backend
//!
//! Household points economy: children earn points by completing chores and
//! spend them on rewards, scoped per family.
//!
//! ## Architecture
//!
//! ```text
//! External layer (HTTP, authentication)
//!     ↓
//! Domain Layer (services, transactions, query views)
//!     ↓
//! Storage Layer (ledger store, JSON document file)
//! ```
//!
//! The external layer authenticates callers itself and passes an already
//! verified `CallerContext` into every service call.

pub mod config;
pub mod domain;
pub mod storage;

use std::sync::Arc;
use tracing::info;

use crate::config::LedgerConfig;
use crate::domain::{ChoreService, RewardService, UserService};
use crate::storage::{LedgerStore, StorageError};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LedgerStore>,
    pub user_service: UserService,
    pub chore_service: ChoreService,
    pub reward_service: RewardService,
}

/// Open the ledger named by `config` and build the services around it
pub async fn initialize_backend(config: &LedgerConfig) -> Result<AppState, StorageError> {
    let ledger_path = config.ledger_path();
    info!("Opening ledger at {:?}", ledger_path);
    let store = Arc::new(LedgerStore::open(&ledger_path).await?);

    info!("Setting up domain services");
    let user_service = UserService::new(Arc::clone(&store), config.family_policy());
    let chore_service = ChoreService::new(Arc::clone(&store));
    let reward_service = RewardService::new(Arc::clone(&store));

    Ok(AppState {
        store,
        user_service,
        chore_service,
        reward_service,
    })
}
