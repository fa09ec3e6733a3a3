use super::mutation::ActionResponse;
use super::GameFlowService;
use crate::domain::cards::SupportCardCode;
use crate::domain::interactions::{self, AnswerOutcome, CloseOutcome, GunOutcome, ShopTradeOutcome};
use crate::domain::state::{CardInstanceId, GameId, ParticipantId, UserId};
use crate::error::AppError;

impl GameFlowService {
    /// `choice` of None is the timeout flavor: no coins, one damage.
    pub async fn answer_question(
        &self,
        game_id: GameId,
        user: UserId,
        choice: Option<usize>,
    ) -> Result<ActionResponse<AnswerOutcome>, AppError> {
        self.run_participant_action(game_id, user, "answer_question", |game, pid, _| {
            interactions::answer_question(game, pid, choice)
        })
        .await
    }

    pub async fn shop_buy(
        &self,
        game_id: GameId,
        user: UserId,
        code: SupportCardCode,
    ) -> Result<ActionResponse<ShopTradeOutcome>, AppError> {
        self.run_participant_action(game_id, user, "shop_buy", |game, pid, _| {
            interactions::shop_buy(game, pid, code)
        })
        .await
    }

    pub async fn shop_sell(
        &self,
        game_id: GameId,
        user: UserId,
        card_id: CardInstanceId,
    ) -> Result<ActionResponse<ShopTradeOutcome>, AppError> {
        self.run_participant_action(game_id, user, "shop_sell", |game, pid, _| {
            interactions::shop_sell(game, pid, card_id)
        })
        .await
    }

    pub async fn shop_close(&self, game_id: GameId, user: UserId) -> Result<ActionResponse<CloseOutcome>, AppError> {
        self.run_participant_action(game_id, user, "shop_close", |game, pid, _| {
            interactions::shop_close(game, pid)
        })
        .await
    }

    pub async fn gun_attack(
        &self,
        game_id: GameId,
        user: UserId,
        target: ParticipantId,
    ) -> Result<ActionResponse<GunOutcome>, AppError> {
        self.run_participant_action(game_id, user, "gun_attack", |game, pid, _| {
            interactions::gun_attack(game, pid, target)
        })
        .await
    }

    pub async fn gun_skip(&self, game_id: GameId, user: UserId) -> Result<ActionResponse<GunOutcome>, AppError> {
        self.run_participant_action(game_id, user, "gun_skip", |game, pid, _| {
            interactions::gun_skip(game, pid)
        })
        .await
    }
}
