use super::mutation::ActionResponse;
use super::GameFlowService;
use crate::domain::duel::{self, DuelRewardOutcome, DuelStepOutcome};
use crate::domain::pending::{DuelChoice, DuelReward};
use crate::domain::state::{GameId, ParticipantId, UserId};
use crate::error::AppError;

impl GameFlowService {
    pub async fn duel_choose_opponent(
        &self,
        game_id: GameId,
        user: UserId,
        opponent: ParticipantId,
    ) -> Result<ActionResponse<DuelStepOutcome>, AppError> {
        self.run_participant_action(game_id, user, "duel_choose_opponent", |game, pid, _| {
            duel::choose_opponent(game, pid, opponent)
        })
        .await
    }

    pub async fn duel_commit(
        &self,
        game_id: GameId,
        user: UserId,
        choice: DuelChoice,
    ) -> Result<ActionResponse<DuelStepOutcome>, AppError> {
        self.run_participant_action(game_id, user, "duel_commit", |game, pid, _| {
            duel::commit(game, pid, choice)
        })
        .await
    }

    pub async fn duel_predict(
        &self,
        game_id: GameId,
        user: UserId,
        prediction: DuelChoice,
    ) -> Result<ActionResponse<DuelStepOutcome>, AppError> {
        self.run_participant_action(game_id, user, "duel_predict", |game, pid, _| {
            duel::predict(game, pid, prediction)
        })
        .await
    }

    pub async fn duel_choose_reward(
        &self,
        game_id: GameId,
        user: UserId,
        reward: DuelReward,
    ) -> Result<ActionResponse<DuelRewardOutcome>, AppError> {
        self.run_participant_action(game_id, user, "duel_choose_reward", |game, pid, rng| {
            duel::choose_reward(game, pid, reward, rng)
        })
        .await
    }

    /// Either duelist may close a stalled duel.
    pub async fn duel_timeout(
        &self,
        game_id: GameId,
        user: UserId,
    ) -> Result<ActionResponse<DuelStepOutcome>, AppError> {
        self.run_participant_action(game_id, user, "duel_timeout", |game, pid, _| {
            duel::duel_timeout(game, pid)
        })
        .await
    }
}
