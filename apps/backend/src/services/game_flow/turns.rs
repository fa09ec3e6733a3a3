use super::mutation::ActionResponse;
use super::GameFlowService;
use crate::domain::ordering::{self, OrderRollOutcome};
use crate::domain::state::{CardInstanceId, GameId, ParticipantId, UserId};
use crate::domain::turns::{self, RollOutcome, SupportUseOutcome};
use crate::error::AppError;

impl GameFlowService {
    /// One roll in the turn-order sub-machine.
    pub async fn roll_for_order(&self, game_id: GameId, user: UserId) -> Result<ActionResponse<OrderRollOutcome>, AppError> {
        self.run_participant_action(game_id, user, "roll_for_order", |game, pid, rng| {
            ordering::roll_for_order(game, pid, rng)
        })
        .await
    }

    /// Roll 1-6, move, resolve the landing and settle the turn.
    pub async fn roll_dice_and_move(&self, game_id: GameId, user: UserId) -> Result<ActionResponse<RollOutcome>, AppError> {
        self.run_participant_action(game_id, user, "roll_dice_and_move", |game, pid, rng| {
            turns::roll_dice_and_move(game, pid, rng)
        })
        .await
    }

    pub async fn use_support_card(
        &self,
        game_id: GameId,
        user: UserId,
        card_id: CardInstanceId,
        target: Option<ParticipantId>,
    ) -> Result<ActionResponse<SupportUseOutcome>, AppError> {
        self.run_participant_action(game_id, user, "use_support_card", |game, pid, rng| {
            turns::use_support_card(game, pid, card_id, target, rng)
        })
        .await
    }
}
