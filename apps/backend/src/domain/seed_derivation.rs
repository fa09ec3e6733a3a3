//! RNG seed derivation for deterministic game behavior.
//!
//! Every committed mutation gets its own RNG, derived from the game's base
//! seed and the version the mutation produces. Replaying a game from its
//! seed and operation sequence therefore reproduces every dice roll,
//! board, shuffle and question.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const OP_CONTEXT: &str = "blitzquest 2025 per-operation rng";

/// Derive the 32-byte seed for the operation producing `version`.
///
/// # Arguments
///
/// * `game_seed` - Base seed stored on the game
/// * `version` - Version the mutation will commit as
pub fn derive_op_seed(game_seed: u64, version: u64) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(OP_CONTEXT);
    hasher.update(&game_seed.to_le_bytes());
    hasher.update(&version.to_le_bytes());
    *hasher.finalize().as_bytes()
}

/// Per-operation RNG.
pub fn op_rng(game_seed: u64, version: u64) -> ChaCha8Rng {
    ChaCha8Rng::from_seed(derive_op_seed(game_seed, version))
}
