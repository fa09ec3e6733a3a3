//! Resolution of the single-owner pending interactions: Question, Shop, Gun.
//! Each resolving call clears the interaction and advances the turn.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{support_card, SupportCardCode};
use crate::domain::damage::{apply_damage, DamageResult};
use crate::domain::log::LogAction;
use crate::domain::pending::{require_gun, require_question, require_shop};
use crate::domain::state::{CardInstanceId, Game, GameStatus, ParticipantId};
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

/// Damage for a wrong or timed-out answer.
pub const QUESTION_PENALTY: u32 = 1;

/// Clear the interaction and hand the turn on.
pub(crate) fn close_and_advance(game: &mut Game) -> Option<ParticipantId> {
    game.pending = None;
    game.advance_turn()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub participant: ParticipantId,
    pub correct: bool,
    pub timed_out: bool,
    /// Revealed only once the question is closed.
    pub correct_index: usize,
    pub coins_awarded: u32,
    pub damage: Option<DamageResult>,
    pub next_participant: Option<ParticipantId>,
    pub finished: bool,
}

/// `choice == None` is the timeout flavor: always a miss.
pub fn answer_question(
    game: &mut Game,
    pid: ParticipantId,
    choice: Option<usize>,
) -> Result<AnswerOutcome, DomainError> {
    game.require_status(GameStatus::Active, "answer_question")?;
    let q = require_question(&mut game.pending, pid)?;
    if let Some(c) = choice {
        if c >= q.question.choices.len() {
            return Err(DomainError::validation(
                ValidationKind::InvalidChoice,
                format!("choice {c} out of range"),
            ));
        }
    }
    let correct_index = q.question.correct_index;
    let reward = q.reward_coins;
    let correct = choice == Some(correct_index);

    let mut coins_awarded = 0;
    let mut damage = None;
    let p = game.participant_mut(pid)?;
    if correct {
        p.coins = p.coins.saturating_add(reward);
        coins_awarded = reward;
    } else {
        damage = Some(apply_damage(p, QUESTION_PENALTY));
    }

    let msg = match (correct, choice) {
        (true, _) => format!("answered correctly, +{reward} coins"),
        (false, None) => "question timed out".to_string(),
        (false, Some(_)) => "answered wrong".to_string(),
    };
    game.push_log(LogAction::QuestionAnswer, Some(pid), msg);
    if damage.is_some_and(|d| d.died) {
        game.push_log(LogAction::Elimination, Some(pid), "eliminated");
    }

    let next_participant = close_and_advance(game);
    Ok(AnswerOutcome {
        participant: pid,
        correct,
        timed_out: choice.is_none(),
        correct_index,
        coins_awarded,
        damage,
        next_participant,
        finished: game.status == GameStatus::Finished,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopTradeOutcome {
    pub participant: ParticipantId,
    pub code: SupportCardCode,
    pub card_id: CardInstanceId,
    /// Negative when buying.
    pub coins_delta: i64,
    pub coins_after: u32,
}

pub fn shop_buy(
    game: &mut Game,
    pid: ParticipantId,
    code: SupportCardCode,
) -> Result<ShopTradeOutcome, DomainError> {
    game.require_status(GameStatus::Active, "shop_buy")?;
    let coins = game.participant(pid)?.coins;
    let shop = require_shop(&mut game.pending, pid)?;
    let Some(idx) = shop.offers.iter().position(|o| o.code == code) else {
        return Err(DomainError::validation(
            ValidationKind::OfferNotAvailable,
            format!("{code:?} is not on offer"),
        ));
    };
    let cost = shop.offers[idx].cost;
    if coins < cost {
        return Err(DomainError::validation(
            ValidationKind::InsufficientCoins,
            format!("need {cost} coins, have {coins}"),
        ));
    }
    shop.offers.remove(idx);

    let p = game.participant_mut(pid)?;
    p.coins -= cost;
    let coins_after = p.coins;
    let card_id = game.grant_support_card(pid, code)?;
    game.push_log(LogAction::Shop, Some(pid), format!("bought {code:?} for {cost}"));
    Ok(ShopTradeOutcome {
        participant: pid,
        code,
        card_id,
        coins_delta: -(cost as i64),
        coins_after,
    })
}

pub fn shop_sell(
    game: &mut Game,
    pid: ParticipantId,
    card_id: CardInstanceId,
) -> Result<ShopTradeOutcome, DomainError> {
    game.require_status(GameStatus::Active, "shop_sell")?;
    require_shop(&mut game.pending, pid)?;

    let p = game.participant_mut(pid)?;
    let Some(idx) = p.support_cards.iter().position(|c| c.id == card_id && !c.is_used) else {
        return Err(DomainError::validation(
            ValidationKind::CardNotOwned,
            format!("card {card_id} is not an unused card of participant {pid}"),
        ));
    };
    let code = p.support_cards[idx].code;
    let price = support_card(code)
        .map(|d| d.sell_price())
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Card, format!("{code:?} not catalogued")))?;
    p.support_cards.remove(idx);
    p.coins = p.coins.saturating_add(price);
    let coins_after = p.coins;

    game.push_log(LogAction::Shop, Some(pid), format!("sold {code:?} for {price}"));
    Ok(ShopTradeOutcome {
        participant: pid,
        code,
        card_id,
        coins_delta: price as i64,
        coins_after,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseOutcome {
    pub participant: ParticipantId,
    pub next_participant: Option<ParticipantId>,
    pub finished: bool,
}

pub fn shop_close(game: &mut Game, pid: ParticipantId) -> Result<CloseOutcome, DomainError> {
    game.require_status(GameStatus::Active, "shop_close")?;
    require_shop(&mut game.pending, pid)?;
    game.push_log(LogAction::Shop, Some(pid), "left the shop");
    let next_participant = close_and_advance(game);
    Ok(CloseOutcome {
        participant: pid,
        next_participant,
        finished: game.status == GameStatus::Finished,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GunOutcome {
    pub participant: ParticipantId,
    pub target: Option<ParticipantId>,
    pub damage: Option<DamageResult>,
    pub next_participant: Option<ParticipantId>,
    pub finished: bool,
    pub winner: Option<ParticipantId>,
}

pub fn gun_attack(
    game: &mut Game,
    pid: ParticipantId,
    target: ParticipantId,
) -> Result<GunOutcome, DomainError> {
    game.require_status(GameStatus::Active, "gun_attack")?;
    let gun = require_gun(&game.pending, pid)?;
    game.require_valid_target(pid, target)?;

    let result = apply_damage(game.participant_mut(target)?, gun.damage);
    game.push_log(
        LogAction::Gun,
        Some(pid),
        format!("shot participant {target} for {} ({} blocked)", result.taken, result.blocked),
    );
    if result.died {
        game.push_log(LogAction::Elimination, Some(target), "eliminated");
    }

    let next_participant = close_and_advance(game);
    Ok(GunOutcome {
        participant: pid,
        target: Some(target),
        damage: Some(result),
        next_participant,
        finished: game.status == GameStatus::Finished,
        winner: game.winner,
    })
}

pub fn gun_skip(game: &mut Game, pid: ParticipantId) -> Result<GunOutcome, DomainError> {
    game.require_status(GameStatus::Active, "gun_skip")?;
    require_gun(&game.pending, pid)?;
    game.push_log(LogAction::Gun, Some(pid), "holstered the gun");
    let next_participant = close_and_advance(game);
    Ok(GunOutcome {
        participant: pid,
        target: None,
        damage: None,
        next_participant,
        finished: game.status == GameStatus::Finished,
        winner: game.winner,
    })
}
