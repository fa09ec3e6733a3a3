#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod services;
pub mod store;
pub mod telemetry;
pub mod utils;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use config::EngineConfig;
pub use error::{AppError, Rejection};
pub use errors::ErrorCode;
pub use services::game_flow::{ActionResponse, BotRunSummary, CreatedGame, GameFlowService};
pub use store::GameStore;

// Prelude for test convenience
pub mod prelude {
    pub use super::domain::cards::{DuelCardCode, SupportCardCode};
    pub use super::domain::lobby::GameConfig;
    pub use super::domain::pending::{DuelChoice, DuelReward, InteractionKind};
    pub use super::domain::snapshot::GameSnapshot;
    pub use super::domain::state::{
        DuelStyle, GameId, GameMode, GameStatus, ParticipantId, SurvivalDifficulty, UserId,
    };
    pub use super::domain::tiles::TileType;
    pub use super::ai::{AiPlayer, BotAction, RandomPlayer};
    pub use super::{ActionResponse, AppError, EngineConfig, ErrorCode, GameFlowService};
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
