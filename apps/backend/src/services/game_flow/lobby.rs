use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use super::mutation::ActionResponse;
use super::GameFlowService;
use crate::domain::lobby::{self, EndOutcome, GameConfig, JoinOutcome, StartOutcome};
use crate::domain::snapshot::{snapshot, GameSnapshot};
use crate::domain::state::{GameId, UserId};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::errors::ErrorCode;
use crate::store::txn::delete_game_txn;
use crate::utils::join_code::generate_join_code;

/// Attempts at drawing an unused join code before giving up.
const JOIN_CODE_ATTEMPTS: usize = 16;

#[derive(Debug, Clone, Serialize)]
pub struct CreatedGame {
    pub game_id: GameId,
    pub join_code: String,
    pub snapshot: GameSnapshot,
}

impl GameFlowService {
    /// Create a game in Waiting with `host` in seat 0.
    ///
    /// Invalid configuration is an error here rather than a rejection:
    /// there is no game yet to return a snapshot of.
    pub fn create_game(&self, host: UserId, config: &GameConfig) -> Result<CreatedGame, AppError> {
        let settings = lobby::resolve_config(config, &self.config.to_defaults())?;
        let game_id = self.store.allocate_id();
        let mut rng = rand::rng();
        let seed = config.seed.unwrap_or_else(|| rng.random());

        for attempt in 0..JOIN_CODE_ATTEMPTS {
            let join_code = generate_join_code(&mut rng);
            let game = lobby::new_game(game_id, join_code.clone(), host, settings.clone(), seed);
            let snapshot = snapshot(&game, Some(host));
            match self.store.insert(game) {
                Ok(()) => {
                    info!(game_id, user_id = host, mode = ?settings.mode, join_code = %join_code, "game created");
                    return Ok(CreatedGame {
                        game_id,
                        join_code,
                        snapshot,
                    });
                }
                Err(err) if err.code() == ErrorCode::JoinCodeConflict => {
                    warn!(game_id, attempt, "join code collision, retrying");
                }
                Err(err) => return Err(err),
            }
        }
        Err(DomainError::conflict(
            ConflictKind::JoinCodeConflict,
            format!("no free join code after {JOIN_CODE_ATTEMPTS} attempts"),
        )
        .into())
    }

    pub async fn join(&self, game_id: GameId, user: UserId) -> Result<ActionResponse<JoinOutcome>, AppError> {
        self.run_mutation(game_id, user, "join", |game, _| lobby::join(game, user))
            .await
    }

    /// Join by the typed code; case-insensitive.
    pub async fn join_by_code(&self, code: &str, user: UserId) -> Result<ActionResponse<JoinOutcome>, AppError> {
        let game_id = self
            .store
            .id_for_code(code)
            .ok_or_else(|| AppError::not_found(ErrorCode::GameNotFound, format!("no game with code {code}")))?;
        self.join(game_id, user).await
    }

    pub async fn start(&self, game_id: GameId, user: UserId) -> Result<ActionResponse<StartOutcome>, AppError> {
        self.run_mutation(game_id, user, "start", |game, rng| lobby::start(game, user, rng))
            .await
    }

    pub async fn end_game(&self, game_id: GameId, user: UserId) -> Result<ActionResponse<EndOutcome>, AppError> {
        self.run_mutation(game_id, user, "end_game", |game, _| lobby::end_game(game, user))
            .await
    }

    /// Host-only, and never while Active. On success the snapshot shows the
    /// game as it was when removed.
    pub async fn delete_game(&self, game_id: GameId, user: UserId) -> Result<ActionResponse<()>, AppError> {
        let res = delete_game_txn(&self.store, game_id, |game| lobby::require_can_delete(game, user)).await?;
        match &res.outcome {
            Ok(()) => info!(game_id, user_id = user, "game deleted"),
            Err(err) => warn!(game_id, user_id = user, code = %err.code(), "delete rejected"),
        }
        Ok(ActionResponse {
            snapshot: snapshot(&res.game, Some(user)),
            transitions: Vec::new(),
            outcome: res.outcome.map_err(|e| AppError::from(e).to_rejection()),
        })
    }

    /// Snapshot for `viewer` (None for a spectator).
    pub async fn get_public_state(&self, game_id: GameId, viewer: Option<UserId>) -> Result<GameSnapshot, AppError> {
        let game = self.store.load(game_id).await?;
        Ok(snapshot(&game, viewer))
    }
}
