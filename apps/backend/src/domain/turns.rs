//! Board-mode turn actions: the dice roll and support-card use.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::cards::{support_card, SupportCardCode, SupportEffect};
use crate::domain::damage::apply_heal;
use crate::domain::effects::{resolve_landing, LandingResolution};
use crate::domain::log::LogAction;
use crate::domain::pending::{require_no_pending, require_question};
use crate::domain::questions::generate_question;
use crate::domain::state::{CardInstanceId, Game, GameStatus, ParticipantId, BOARD_MAX_HP};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub participant: ParticipantId,
    pub dice: u8,
    pub from: usize,
    pub to: usize,
    pub landing: LandingResolution,
    /// An extra roll was spent to keep the turn.
    pub extra_roll_used: bool,
    pub next_participant: Option<ParticipantId>,
    pub finished: bool,
    pub winner: Option<ParticipantId>,
}

fn require_board_turn(game: &Game, pid: ParticipantId, ctx: &'static str) -> Result<(), DomainError> {
    game.require_status(GameStatus::Active, ctx)?;
    game.require_mode(game.mode.uses_board(), ctx)?;
    game.require_alive(pid)?;
    require_no_pending(&game.pending, pid)?;
    game.require_turn(pid)
}

/// Drop a pending interaction whose owner was eliminated mid-move.
fn drop_orphaned_pending(game: &mut Game) {
    let orphaned = game
        .pending
        .as_ref()
        .is_some_and(|p| game.participants.get(p.owner() as usize).map_or(true, |o| !o.is_alive));
    if orphaned {
        debug!(game_id = game.id, "clearing pending interaction of eliminated owner");
        game.pending = None;
    }
}

pub fn roll_dice_and_move(
    game: &mut Game,
    pid: ParticipantId,
    rng: &mut impl Rng,
) -> Result<RollOutcome, DomainError> {
    require_board_turn(game, pid, "roll_dice_and_move")?;

    let dice: u8 = rng.random_range(1..=6);
    let from = game.participant(pid)?.position;
    let to = game.clamp_position(from as i64 + dice as i64);
    game.participant_mut(pid)?.position = to;
    game.push_log(LogAction::Roll, Some(pid), format!("rolled {dice}: {from} -> {to}"));
    debug!(game_id = game.id, participant_id = pid, dice, from, to, "dice rolled");

    let landing = resolve_landing(game, pid, rng);
    drop_orphaned_pending(game);

    let mut extra_roll_used = false;
    let next_participant = if game.status == GameStatus::Finished {
        None
    } else if let Some(pending) = &game.pending {
        let owner = pending.owner();
        game.pin_turn_to(owner);
        Some(owner)
    } else {
        let actor = game.participant_mut(pid)?;
        if actor.is_alive && actor.extra_rolls > 0 {
            actor.extra_rolls -= 1;
            extra_roll_used = true;
            Some(pid)
        } else {
            game.advance_turn()
        }
    };

    Ok(RollOutcome {
        participant: pid,
        dice,
        from,
        to,
        landing,
        extra_roll_used,
        next_participant,
        finished: game.status == GameStatus::Finished,
        winner: game.winner,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportUseOutcome {
    pub participant: ParticipantId,
    pub card_id: CardInstanceId,
    pub code: Option<SupportCardCode>,
    pub target: Option<ParticipantId>,
    pub healed: u32,
    pub shield_gained: u32,
    pub coins_gained: u32,
    pub extra_rolls_gained: u32,
    pub moved_to: Option<usize>,
    pub landing: Option<LandingResolution>,
    pub question_changed: bool,
    pub next_participant: Option<ParticipantId>,
    pub finished: bool,
}

/// Play an owned support card. Change Question is only legal on the caller's
/// own pending Question; every other card needs the turn and a clear board.
pub fn use_support_card(
    game: &mut Game,
    pid: ParticipantId,
    card_id: CardInstanceId,
    target: Option<ParticipantId>,
    rng: &mut impl Rng,
) -> Result<SupportUseOutcome, DomainError> {
    game.require_status(GameStatus::Active, "use_support_card")?;
    game.require_mode(game.mode.uses_board(), "use_support_card")?;
    game.require_alive(pid)?;

    let code = game
        .participant(pid)?
        .support_cards
        .iter()
        .find(|c| c.id == card_id && !c.is_used)
        .map(|c| c.code)
        .ok_or_else(|| {
            DomainError::validation(
                ValidationKind::CardNotOwned,
                format!("card {card_id} is not an unused card of participant {pid}"),
            )
        })?;

    let mut out = SupportUseOutcome {
        participant: pid,
        card_id,
        code: Some(code),
        target,
        ..SupportUseOutcome::default()
    };

    let Some(def) = support_card(code) else {
        warn!(game_id = game.id, ?code, "support card missing from catalog; no-op");
        out.next_participant = game.current_participant_id();
        return Ok(out);
    };

    if def.effect == SupportEffect::ChangeQuestion {
        let question = require_question(&mut game.pending, pid)?;
        if question.changed_once {
            return Err(DomainError::validation(
                ValidationKind::QuestionAlreadyChanged,
                "question was already changed once",
            ));
        }
        question.question = generate_question(rng);
        question.changed_once = true;
        out.question_changed = true;
    } else {
        require_no_pending(&game.pending, pid)?;
        game.require_turn(pid)?;
        if def.effect.needs_target() {
            let t = target.ok_or_else(|| {
                DomainError::validation(ValidationKind::InvalidTarget, "card needs a target")
            })?;
            game.require_valid_target(pid, t)?;
        }
        apply_support_effect(game, pid, target, def.effect, &mut out, rng)?;
    }

    if let Some(card) = game
        .participant_mut(pid)?
        .support_cards
        .iter_mut()
        .find(|c| c.id == card_id)
    {
        card.is_used = true;
    }
    game.push_log(LogAction::CardUse, Some(pid), format!("used {}", def.name));

    drop_orphaned_pending(game);
    out.next_participant = if game.status == GameStatus::Finished {
        None
    } else if let Some(pending) = &game.pending {
        let owner = pending.owner();
        game.pin_turn_to(owner);
        Some(owner)
    } else if !game.participant(pid)?.is_alive {
        game.advance_turn()
    } else {
        game.current_participant_id()
    };
    out.finished = game.status == GameStatus::Finished;
    Ok(out)
}

fn apply_support_effect(
    game: &mut Game,
    pid: ParticipantId,
    target: Option<ParticipantId>,
    effect: SupportEffect,
    out: &mut SupportUseOutcome,
    rng: &mut impl Rng,
) -> Result<(), DomainError> {
    match effect {
        SupportEffect::MoveExtra { steps } => {
            let from = game.participant(pid)?.position;
            let to = game.clamp_position(from as i64 + steps as i64);
            game.participant_mut(pid)?.position = to;
            game.push_log(LogAction::Move, Some(pid), format!("moved {from} -> {to}"));
            out.moved_to = Some(to);
            out.landing = Some(resolve_landing(game, pid, rng));
        }
        SupportEffect::Heal { amount } => {
            out.healed = apply_heal(game.participant_mut(pid)?, amount, Some(BOARD_MAX_HP));
        }
        SupportEffect::Shield { amount } => {
            let p = game.participant_mut(pid)?;
            p.shield_points = p.shield_points.saturating_add(amount);
            out.shield_gained = amount;
        }
        SupportEffect::Reroll { rolls } => {
            let p = game.participant_mut(pid)?;
            p.extra_rolls = p.extra_rolls.saturating_add(rolls);
            out.extra_rolls_gained = rolls;
        }
        SupportEffect::SwapPosition => {
            if let Some(t) = target {
                let mine = game.participant(pid)?.position;
                let theirs = game.participant(t)?.position;
                game.participant_mut(pid)?.position = theirs;
                game.participant_mut(t)?.position = mine;
                out.moved_to = Some(theirs);
            }
        }
        SupportEffect::BonusCoin { amount } => {
            let p = game.participant_mut(pid)?;
            p.coins = p.coins.saturating_add(amount);
            out.coins_gained = amount;
        }
        SupportEffect::ChangeQuestion => {}
    }
    Ok(())
}
