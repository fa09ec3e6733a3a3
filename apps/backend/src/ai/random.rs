//! Random bot - picks uniformly among the candidate actions.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use super::legal::candidate_actions;
use super::trait_def::{AiError, AiPlayer, BotAction};
use crate::domain::snapshot::GameSnapshot;

/// Bot that makes random candidate moves.
///
/// `Mutex` gives interior mutability for the RNG, since [`AiPlayer`]
/// methods take `&self`. Seed it for reproducible runs.
pub struct RandomPlayer {
    rng: Mutex<StdRng>,
}

impl RandomPlayer {
    pub const NAME: &'static str = "RandomPlayer";

    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl AiPlayer for RandomPlayer {
    fn choose_action(&self, view: &GameSnapshot) -> Result<Option<BotAction>, AiError> {
        let candidates = candidate_actions(view);
        if candidates.is_empty() {
            return Ok(None);
        }

        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AiError::Internal(format!("RNG lock poisoned: {e}")))?;

        Ok(candidates.choose(&mut *rng).cloned())
    }
}
