use serde::Serialize;
use tracing::{debug, info, warn};

use super::mutation::ActionResponse;
use super::GameFlowService;
use crate::ai::{AiPlayer, BotAction};
use crate::domain::snapshot::snapshot;
use crate::domain::state::{GameId, GameStatus, ParticipantId, UserId};
use crate::error::AppError;

/// Outcome of a bot-driven run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BotRunSummary {
    pub steps: usize,
    pub rejected: usize,
    pub finished: bool,
    /// No seated bot had anything to do.
    pub stalled: bool,
    pub winner: Option<ParticipantId>,
    pub version: u64,
}

impl GameFlowService {
    /// Dispatch one action to the matching operation.
    pub async fn perform(
        &self,
        game_id: GameId,
        user: UserId,
        action: BotAction,
    ) -> Result<ActionResponse<serde_json::Value>, AppError> {
        match action {
            BotAction::RollForOrder => self.roll_for_order(game_id, user).await?.erase(),
            BotAction::Roll => self.roll_dice_and_move(game_id, user).await?.erase(),
            BotAction::UseSupportCard { card_id, target } => self
                .use_support_card(game_id, user, card_id, target)
                .await?
                .erase(),
            BotAction::AnswerQuestion { choice } => self.answer_question(game_id, user, choice).await?.erase(),
            BotAction::ShopBuy { code } => self.shop_buy(game_id, user, code).await?.erase(),
            BotAction::ShopSell { card_id } => self.shop_sell(game_id, user, card_id).await?.erase(),
            BotAction::ShopClose => self.shop_close(game_id, user).await?.erase(),
            BotAction::GunAttack { target } => self.gun_attack(game_id, user, target).await?.erase(),
            BotAction::GunSkip => self.gun_skip(game_id, user).await?.erase(),
            BotAction::DuelChooseOpponent { opponent } => self
                .duel_choose_opponent(game_id, user, opponent)
                .await?
                .erase(),
            BotAction::DuelCommit { choice } => self.duel_commit(game_id, user, choice).await?.erase(),
            BotAction::DuelPredict { prediction } => self.duel_predict(game_id, user, prediction).await?.erase(),
            BotAction::DuelChooseReward { reward } => self.duel_choose_reward(game_id, user, reward).await?.erase(),
            BotAction::DuelTimeout => self.duel_timeout(game_id, user).await?.erase(),
            BotAction::DraftPick { code } => self.draft_pick(game_id, user, code).await?.erase(),
            BotAction::PickStartingCard { code } => self.pick_starting_card(game_id, user, code).await?.erase(),
            BotAction::PlayCard { code, discard } => self.play_card(game_id, user, code, discard).await?.erase(),
            BotAction::EndTurn => self.end_turn(game_id, user).await?.erase(),
        }
    }

    /// Let bots play `game_id` until it finishes, stalls, or `max_steps`
    /// actions have been attempted. Each loop iteration the first seat with
    /// something to do acts once.
    pub async fn drive_bots(
        &self,
        game_id: GameId,
        seats: &[(UserId, &dyn AiPlayer)],
        max_steps: usize,
    ) -> Result<BotRunSummary, AppError> {
        let mut summary = BotRunSummary::default();

        while summary.steps < max_steps {
            let game = self.store.load(game_id).await?;
            if game.status == GameStatus::Finished {
                break;
            }

            let mut acted = false;
            for &(user, bot) in seats {
                let view = snapshot(&game, Some(user));
                let Some(action) = bot.choose_action(&view)? else {
                    continue;
                };
                debug!(game_id, user_id = user, ?action, "bot action");
                let resp = self.perform(game_id, user, action).await?;
                summary.steps += 1;
                if let Err(rejection) = &resp.outcome {
                    summary.rejected += 1;
                    debug!(game_id, user_id = user, code = %rejection.code, "bot action rejected");
                }
                acted = true;
                break;
            }

            if !acted {
                warn!(game_id, status = ?game.status, "no bot can act; stopping");
                summary.stalled = true;
                break;
            }
        }

        let game = self.store.load(game_id).await?;
        summary.finished = game.status == GameStatus::Finished;
        summary.winner = game.winner;
        summary.version = game.version;
        info!(
            game_id,
            steps = summary.steps,
            rejected = summary.rejected,
            finished = summary.finished,
            "bot run complete"
        );
        Ok(summary)
    }
}
