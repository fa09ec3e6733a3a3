//! Bot players - automated decisions for simulation and tests.
//!
//! This module provides:
//! - The [`AiPlayer`] trait, deciding from a participant's own snapshot
//! - [`candidate_actions`], the legal-looking moves a snapshot allows
//! - [`RandomPlayer`]: picks uniformly among candidates (seedable)

mod legal;
mod random;
mod trait_def;

pub use legal::candidate_actions;
pub use random::RandomPlayer;
pub use trait_def::{AiError, AiPlayer, BotAction};

/// Create a bot from its kind name. Returns None if the kind is unknown.
pub fn create_ai(kind: &str, seed: Option<u64>) -> Option<Box<dyn AiPlayer>> {
    match kind {
        "random" => Some(Box::new(RandomPlayer::new(seed))),
        _ => None,
    }
}
