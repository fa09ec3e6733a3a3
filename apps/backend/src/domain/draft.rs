//! Draft mode: before play, each participant repeatedly picks one of K dealt
//! support cards until the pick cap; the game goes Active when all are done.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::cards::SupportCardCode;
use crate::domain::log::LogAction;
use crate::domain::state::{CardInstanceId, Game, GameStatus, ParticipantId};
use crate::errors::domain::{DomainError, ValidationKind};

pub const MAX_DRAFT_PICKS: u8 = 3;
pub const DRAFT_OPTIONS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftState {
    pub picks_done: u8,
    pub options: Vec<SupportCardCode>,
}

impl DraftState {
    pub fn is_complete(&self) -> bool {
        self.picks_done >= MAX_DRAFT_PICKS
    }
}

pub fn deal_draft_options(rng: &mut impl Rng) -> Vec<SupportCardCode> {
    SupportCardCode::ALL
        .choose_multiple(rng, DRAFT_OPTIONS)
        .copied()
        .collect()
}

/// Enter Drafting: everybody gets a first hand of options.
pub fn begin_draft(game: &mut Game, rng: &mut impl Rng) {
    for p in game.participants.iter_mut() {
        p.draft = Some(DraftState {
            picks_done: 0,
            options: deal_draft_options(rng),
        });
    }
    game.status = GameStatus::Drafting;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPickOutcome {
    pub participant: ParticipantId,
    pub picked: SupportCardCode,
    pub card_id: CardInstanceId,
    pub picks_done: u8,
    /// Everyone finished and the game went Active.
    pub draft_complete: bool,
}

pub fn draft_pick(
    game: &mut Game,
    pid: ParticipantId,
    code: SupportCardCode,
    rng: &mut impl Rng,
) -> Result<DraftPickOutcome, DomainError> {
    game.require_status(GameStatus::Drafting, "draft_pick")?;
    let draft = game
        .participant(pid)?
        .draft
        .clone()
        .ok_or_else(|| DomainError::validation_other("Invariant violated: draft state must be set (draft_pick)"))?;
    if draft.is_complete() {
        return Err(DomainError::validation(
            ValidationKind::PicksComplete,
            format!("all {MAX_DRAFT_PICKS} picks already made"),
        ));
    }
    if !draft.options.contains(&code) {
        return Err(DomainError::validation(
            ValidationKind::PickNotOffered,
            format!("{code:?} is not among the dealt options"),
        ));
    }

    let card_id = game.grant_support_card(pid, code)?;
    let picks_done = draft.picks_done + 1;
    let options = if picks_done < MAX_DRAFT_PICKS {
        deal_draft_options(rng)
    } else {
        Vec::new()
    };
    game.participant_mut(pid)?.draft = Some(DraftState {
        picks_done,
        options,
    });
    game.push_log(LogAction::DraftPick, Some(pid), format!("drafted {code:?}"));

    let draft_complete = game
        .participants
        .iter()
        .all(|p| p.draft.as_ref().is_some_and(DraftState::is_complete));
    if draft_complete {
        game.status = GameStatus::Active;
        game.current_turn_index = 0;
        game.push_log(LogAction::Start, None, "draft complete");
    }

    Ok(DraftPickOutcome {
        participant: pid,
        picked: code,
        card_id,
        picks_done,
        draft_complete,
    })
}
