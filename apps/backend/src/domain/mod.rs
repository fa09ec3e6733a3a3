//! Domain layer: pure game logic. No I/O, no clocks; every random choice
//! flows from a caller-supplied RNG.

pub mod board;
pub mod card_duel;
pub mod cards;
pub mod damage;
pub mod draft;
pub mod duel;
pub mod effects;
pub mod interactions;
pub mod lobby;
pub mod log;
pub mod ordering;
pub mod pending;
pub mod questions;
pub mod status;
pub mod tiles;
pub mod turns;

pub mod game_transition;
pub mod seed_derivation;
pub mod snapshot;
pub mod state;
#[cfg(test)]
mod test_state_helpers;

#[cfg(test)]
mod tests_card_duel;
#[cfg(test)]
mod tests_duel;
#[cfg(test)]
mod tests_effects;
#[cfg(test)]
mod tests_lobby;
#[cfg(test)]
mod tests_snapshot;
#[cfg(test)]
mod tests_turns;

// Re-exports for ergonomics
pub use cards::{DuelCardCode, SupportCardCode};
pub use damage::{apply_damage, DamageResult};
pub use game_transition::{derive_game_transitions, GameLifecycleView, GameTransition};
pub use lobby::{GameConfig, GameDefaults, GameSettings};
pub use pending::{DuelChoice, DuelReward, InteractionKind, PendingInteraction};
pub use seed_derivation::{derive_op_seed, op_rng};
pub use snapshot::{snapshot, GameSnapshot};
pub use state::{Game, GameId, GameMode, GameStatus, Participant, ParticipantId, UserId};
pub use tiles::{Tile, TileType};
