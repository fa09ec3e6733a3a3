//! Game flow service: runs domain operations under the per-game lock and
//! hands back the caller's snapshot alongside the operation result.

mod ai_coordinator;
mod card_duel;
mod draft;
mod duel;
mod interactions;
mod lobby;
mod mutation;
mod turns;

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::store::GameStore;

pub use ai_coordinator::BotRunSummary;
pub use lobby::CreatedGame;
pub use mutation::ActionResponse;

/// Entry point for every game operation. Cheap to clone.
#[derive(Clone)]
pub struct GameFlowService {
    store: Arc<GameStore>,
    config: EngineConfig,
}

impl GameFlowService {
    pub fn new(config: EngineConfig) -> Self {
        let store = Arc::new(GameStore::new(config.lock_timeout));
        Self { store, config }
    }

    pub fn with_store(config: EngineConfig, store: Arc<GameStore>) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
