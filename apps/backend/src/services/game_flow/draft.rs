use super::mutation::ActionResponse;
use super::GameFlowService;
use crate::domain::cards::SupportCardCode;
use crate::domain::draft::{self, DraftPickOutcome};
use crate::domain::state::{GameId, UserId};
use crate::error::AppError;

impl GameFlowService {
    /// Take one of the dealt options. The last pick of the last drafter
    /// moves the game to Active.
    pub async fn draft_pick(
        &self,
        game_id: GameId,
        user: UserId,
        code: SupportCardCode,
    ) -> Result<ActionResponse<DraftPickOutcome>, AppError> {
        self.run_participant_action(game_id, user, "draft_pick", |game, pid, rng| {
            draft::draft_pick(game, pid, code, rng)
        })
        .await
    }
}
