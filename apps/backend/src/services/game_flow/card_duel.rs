use super::mutation::ActionResponse;
use super::GameFlowService;
use crate::domain::card_duel::{self, EndTurnOutcome, PlayCardOutcome, StartingPickOutcome};
use crate::domain::cards::DuelCardCode;
use crate::domain::state::{GameId, UserId};
use crate::error::AppError;

impl GameFlowService {
    pub async fn pick_starting_card(
        &self,
        game_id: GameId,
        user: UserId,
        code: DuelCardCode,
    ) -> Result<ActionResponse<StartingPickOutcome>, AppError> {
        self.run_participant_action(game_id, user, "pick_starting_card", |game, pid, rng| {
            card_duel::pick_starting_card(game, pid, code, rng)
        })
        .await
    }

    /// `discard` is only read by discard-and-draw cards.
    pub async fn play_card(
        &self,
        game_id: GameId,
        user: UserId,
        code: DuelCardCode,
        discard: Vec<DuelCardCode>,
    ) -> Result<ActionResponse<PlayCardOutcome>, AppError> {
        self.run_participant_action(game_id, user, "play_card", |game, pid, rng| {
            card_duel::play_card(game, pid, code, &discard, rng)
        })
        .await
    }

    pub async fn end_turn(&self, game_id: GameId, user: UserId) -> Result<ActionResponse<EndTurnOutcome>, AppError> {
        self.run_participant_action(game_id, user, "end_turn", |game, pid, rng| {
            card_duel::end_turn(game, pid, rng)
        })
        .await
    }
}
