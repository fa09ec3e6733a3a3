use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::game_transition::{derive_game_transitions, GameLifecycleView, GameTransition};
use crate::domain::snapshot::{snapshot, GameSnapshot};
use crate::domain::state::{Game, GameId, ParticipantId, UserId};
use crate::error::{AppError, Rejection};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::services::game_flow::GameFlowService;
use crate::store::txn::with_game_txn;

/// What every operation returns: the caller's view of the game after the
/// attempt, and either the operation's result or why it was rejected.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse<T> {
    pub snapshot: GameSnapshot,
    pub transitions: Vec<GameTransition>,
    pub outcome: Result<T, Rejection>,
}

impl<T> ActionResponse<T> {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn version(&self) -> u64 {
        self.snapshot.version
    }
}

impl<T: Serialize> ActionResponse<T> {
    /// Same response with the outcome as JSON, for callers that handle
    /// every operation uniformly.
    pub fn erase(self) -> Result<ActionResponse<serde_json::Value>, AppError> {
        let outcome = match self.outcome {
            Ok(value) => Ok(serde_json::to_value(value)?),
            Err(rejection) => Err(rejection),
        };
        Ok(ActionResponse {
            snapshot: self.snapshot,
            transitions: self.transitions,
            outcome,
        })
    }
}

/// Resolve `user` to their seat in `game`.
pub(super) fn seat_of(game: &Game, user: UserId) -> Result<ParticipantId, DomainError> {
    game.participant_for_user(user).map(|p| p.id).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::NotAParticipant,
            format!("user {user} is not seated in game {}", game.id),
        )
    })
}

fn log_transitions(game_id: GameId, transitions: &[GameTransition]) {
    for t in transitions {
        match t {
            GameTransition::PlayerJoined { participant } => {
                info!(game_id, participant_id = participant, "player joined")
            }
            GameTransition::GameStarted => info!(game_id, "game started"),
            GameTransition::TurnBecame { participant } => {
                debug!(game_id, participant_id = participant, "turn changed")
            }
            GameTransition::GameEnded => info!(game_id, "game ended"),
        }
    }
}

impl GameFlowService {
    /// Run `mutation` for `user` under the game lock.
    pub(super) async fn run_mutation<T, F>(
        &self,
        game_id: GameId,
        user: UserId,
        op: &'static str,
        mutation: F,
    ) -> Result<ActionResponse<T>, AppError>
    where
        F: FnOnce(&mut Game, &mut ChaCha8Rng) -> Result<T, DomainError>,
    {
        let res = with_game_txn(&self.store, game_id, mutation).await?;

        let transitions = match &res.outcome {
            Ok(_) => {
                let after = GameLifecycleView::of(&res.game);
                derive_game_transitions(&res.before, &after)
            }
            Err(err) => {
                debug!(game_id, user_id = user, op, code = %err.code(), "operation rejected");
                Vec::new()
            }
        };
        log_transitions(game_id, &transitions);

        Ok(ActionResponse {
            snapshot: snapshot(&res.game, Some(user)),
            transitions,
            outcome: res
                .outcome
                .map_err(|e| AppError::from(e).to_rejection()),
        })
    }

    /// Same as [`Self::run_mutation`], for operations a seated participant
    /// performs; the closure receives their participant id.
    pub(super) async fn run_participant_action<T, F>(
        &self,
        game_id: GameId,
        user: UserId,
        op: &'static str,
        action: F,
    ) -> Result<ActionResponse<T>, AppError>
    where
        F: FnOnce(&mut Game, ParticipantId, &mut ChaCha8Rng) -> Result<T, DomainError>,
    {
        self.run_mutation(game_id, user, op, |game, rng| {
            let pid = seat_of(game, user)?;
            debug!(game_id, user_id = user, participant_id = pid, op, "participant action");
            action(game, pid, rng)
        })
        .await
    }
}
