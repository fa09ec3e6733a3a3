use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::{game_not_found, GameStore};
use crate::domain::game_transition::GameLifecycleView;
use crate::domain::seed_derivation::op_rng;
use crate::domain::state::{Game, GameId};
use crate::error::AppError;
use crate::errors::domain::DomainError;

/// Result of one locked read-modify-write.
#[derive(Debug)]
pub struct TxnResult<T> {
    /// Lifecycle view before the mutation ran.
    pub before: GameLifecycleView,
    /// The committed game on success, the untouched game on rejection.
    pub game: Game,
    pub outcome: Result<T, DomainError>,
}

impl<T> TxnResult<T> {
    pub fn committed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Run `mutation` against game `game_id` under its exclusive lock.
///
/// The mutation works on a clone whose version is already bumped, with an
/// RNG derived from the game's seed and that version. On `Ok` the clone
/// replaces the stored aggregate; on `Err` nothing is written.
pub async fn with_game_txn<T, F>(
    store: &GameStore,
    game_id: GameId,
    mutation: F,
) -> Result<TxnResult<T>, AppError>
where
    F: FnOnce(&mut Game, &mut ChaCha8Rng) -> Result<T, DomainError>,
{
    let slot = store.slot(game_id)?;
    let mut guard = store.lock(game_id, &slot).await?;
    let Some(current) = guard.as_ref() else {
        return Err(game_not_found(game_id));
    };

    let before = GameLifecycleView::of(current);
    let mut work = current.clone();
    work.version = current.version + 1;
    let mut rng = op_rng(work.rng_seed, work.version);

    match mutation(&mut work, &mut rng) {
        Ok(value) => {
            *guard = Some(work.clone());
            debug!(game_id, version = work.version, "committed");
            Ok(TxnResult {
                before,
                game: work,
                outcome: Ok(value),
            })
        }
        Err(err) => {
            debug!(game_id, version = current.version, error = %err, "rejected");
            Ok(TxnResult {
                before,
                game: current.clone(),
                outcome: Err(err),
            })
        }
    }
}

/// Remove game `game_id` if `check` allows it, under the same lock. The
/// result carries the game as it was just before the delete, or untouched
/// on rejection.
pub async fn delete_game_txn<F>(store: &GameStore, game_id: GameId, check: F) -> Result<TxnResult<()>, AppError>
where
    F: FnOnce(&Game) -> Result<(), DomainError>,
{
    let slot = store.slot(game_id)?;
    let mut guard = store.lock(game_id, &slot).await?;
    let Some(current) = guard.take() else {
        return Err(game_not_found(game_id));
    };
    let before = GameLifecycleView::of(&current);
    if let Err(err) = check(&current) {
        debug!(game_id, version = current.version, error = %err, "delete rejected");
        *guard = Some(current.clone());
        return Ok(TxnResult {
            before,
            game: current,
            outcome: Err(err),
        });
    }
    drop(guard);
    store.forget(game_id, &current.join_code);
    Ok(TxnResult {
        before,
        game: current,
        outcome: Ok(()),
    })
}
