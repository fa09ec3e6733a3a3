//! Card-Duel mode: two participants, independent decks, one Action and one
//! Bonus card per turn, statuses ticking at each turn start.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::cards::{duel_card, duel_deck_codes, CardSlot, DuelCardCode, DuelEffect, StatusTarget};
use crate::domain::damage::{apply_damage, apply_damage_with, apply_heal, DamageResult};
use crate::domain::log::LogAction;
use crate::domain::state::{Game, GameMode, GameStatus, ParticipantId};
use crate::domain::status::{tick_start_of_turn, StatusEffect, StatusKind, StatusList, TickReport};
use crate::errors::domain::{DomainError, ValidationKind};

pub const CARD_DUEL_START_HP: u32 = 20;
pub const CARD_DUEL_MAX_HP: u32 = 20;
pub const CARD_DUEL_SEATS: usize = 2;
/// Starting hand size, built one pick at a time.
pub const MAX_PICKS: u8 = 5;
pub const PICK_OPTIONS: usize = 3;
/// Cards drawn at each turn start, before status bonuses.
pub const TURN_DRAW: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnFlags {
    pub action_used: bool,
    pub bonus_used: bool,
    pub draws_this_turn: u32,
    pub last_played: Option<DuelCardCode>,
    /// Latched at turn start from Silence.
    pub silenced: bool,
    /// Latched at turn start from Stun.
    pub stunned: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDuelState {
    pub deck: Vec<DuelCardCode>,
    pub hand: Vec<DuelCardCode>,
    pub discard: Vec<DuelCardCode>,
    pub statuses: StatusList,
    pub turn_flags: TurnFlags,
    pub picks_done: u8,
    /// Reserved off the deck until the pick resolves.
    pub pick_options: Vec<DuelCardCode>,
}

impl CardDuelState {
    pub fn picks_finished(&self) -> bool {
        self.picks_done >= MAX_PICKS || self.pick_options.is_empty()
    }

    fn deal_pick_options(&mut self, rng: &mut impl Rng) {
        self.deck.shuffle(rng);
        let take = PICK_OPTIONS.min(self.deck.len());
        self.pick_options = self.deck.drain(..take).collect();
    }

    /// Draw `n`, reshuffling the discard pile into the deck when it runs dry.
    pub fn draw(&mut self, n: u32, rng: &mut impl Rng) -> u32 {
        let mut drawn = 0;
        for _ in 0..n {
            if self.deck.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.deck.append(&mut self.discard);
                self.deck.shuffle(rng);
            }
            if let Some(card) = self.deck.pop() {
                self.hand.push(card);
                drawn += 1;
            }
        }
        self.turn_flags.draws_this_turn += drawn;
        drawn
    }
}

fn cd_ref(game: &Game, pid: ParticipantId) -> Result<&CardDuelState, DomainError> {
    game.participant(pid)?.card_duel.as_ref().ok_or_else(|| {
        DomainError::validation_other("Invariant violated: card duel state must be set")
    })
}

fn cd_mut(game: &mut Game, pid: ParticipantId) -> Result<&mut CardDuelState, DomainError> {
    game.participant_mut(pid)?.card_duel.as_mut().ok_or_else(|| {
        DomainError::validation_other("Invariant violated: card duel state must be set")
    })
}

fn require_card_duel(game: &Game, ctx: &'static str) -> Result<(), DomainError> {
    game.require_mode(game.mode == GameMode::CardDuel, ctx)?;
    game.require_status(GameStatus::Active, ctx)
}

/// True once every participant built their starting hand.
pub fn picks_complete(game: &Game) -> bool {
    game.participants
        .iter()
        .all(|p| p.card_duel.as_ref().is_some_and(CardDuelState::picks_finished))
}

fn require_picks_complete(game: &Game) -> Result<(), DomainError> {
    if !picks_complete(game) {
        return Err(DomainError::validation(
            ValidationKind::PicksIncomplete,
            "starting picks are not finished",
        ));
    }
    Ok(())
}

/// The other seat. Card-Duel is strictly two participants.
pub fn opponent_of(game: &Game, pid: ParticipantId) -> Result<ParticipantId, DomainError> {
    game.participants
        .iter()
        .map(|p| p.id)
        .find(|&p| p != pid)
        .ok_or_else(|| DomainError::validation(ValidationKind::InvalidTarget, "no opponent seated"))
}

/// Randomize order, reset everyone to duel stats, shuffle decks and deal
/// the first pick options.
pub fn start_card_duel(game: &mut Game, rng: &mut impl Rng) {
    let codes = duel_deck_codes();
    if codes.is_empty() {
        warn!(game_id = game.id, "card duel catalog is empty; starting with empty decks");
    }

    let mut order: Vec<ParticipantId> = game.participants.iter().map(|p| p.id).collect();
    order.shuffle(rng);
    for (idx, pid) in order.into_iter().enumerate() {
        if let Some(p) = game.participants.get_mut(pid as usize) {
            p.turn_order = idx;
        }
    }

    game.tiles.clear();
    game.current_turn_index = 0;
    game.status = GameStatus::Active;

    for p in game.participants.iter_mut() {
        p.position = 0;
        p.coins = 0;
        p.hp = CARD_DUEL_START_HP;
        p.shield_points = 0;
        p.extra_rolls = 0;
        p.is_alive = true;
        let mut cd = CardDuelState {
            deck: codes.clone(),
            ..CardDuelState::default()
        };
        cd.deal_pick_options(rng);
        p.card_duel = Some(cd);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingPickOutcome {
    pub participant: ParticipantId,
    pub picked: DuelCardCode,
    pub picks_done: u8,
    pub all_ready: bool,
}

pub fn pick_starting_card(
    game: &mut Game,
    pid: ParticipantId,
    code: DuelCardCode,
    rng: &mut impl Rng,
) -> Result<StartingPickOutcome, DomainError> {
    require_card_duel(game, "pick_starting_card")?;
    let cd = cd_mut(game, pid)?;
    if cd.picks_finished() {
        return Err(DomainError::validation(
            ValidationKind::PicksComplete,
            format!("all {MAX_PICKS} starting picks already made"),
        ));
    }
    let Some(idx) = cd.pick_options.iter().position(|&c| c == code) else {
        return Err(DomainError::validation(
            ValidationKind::PickNotOffered,
            format!("{code:?} is not among the pick options"),
        ));
    };

    let mut options = std::mem::take(&mut cd.pick_options);
    let picked = options.remove(idx);
    cd.hand.push(picked);
    cd.deck.append(&mut options);
    cd.picks_done += 1;
    if cd.picks_done < MAX_PICKS {
        cd.deal_pick_options(rng);
    }
    let picks_done = cd.picks_done;

    game.push_log(LogAction::DraftPick, Some(pid), format!("picked {code:?}"));
    Ok(StartingPickOutcome {
        participant: pid,
        picked,
        picks_done,
        all_ready: picks_complete(game),
    })
}

/// What a played card did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEffectReport {
    pub damage: Option<DamageResult>,
    pub reflected: Option<DamageResult>,
    pub self_damage: Option<DamageResult>,
    pub healed: u32,
    pub shield_gained: u32,
    pub statuses_applied: Vec<(ParticipantId, StatusKind)>,
    pub cleansed: usize,
    pub drawn: u32,
    pub discarded: Vec<DuelCardCode>,
    pub gamble_won: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayCardOutcome {
    pub participant: ParticipantId,
    pub card: DuelCardCode,
    pub slot: Option<CardSlot>,
    pub report: CardEffectReport,
    pub finished: bool,
    pub winner: Option<ParticipantId>,
}

pub fn play_card(
    game: &mut Game,
    pid: ParticipantId,
    code: DuelCardCode,
    discard: &[DuelCardCode],
    rng: &mut impl Rng,
) -> Result<PlayCardOutcome, DomainError> {
    require_card_duel(game, "play_card")?;
    require_picks_complete(game)?;
    game.require_alive(pid)?;
    game.require_turn(pid)?;
    let opponent = opponent_of(game, pid)?;

    let cd = cd_ref(game, pid)?;
    let Some(hand_idx) = cd.hand.iter().position(|&c| c == code) else {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            format!("{code:?} is not in hand"),
        ));
    };

    let Some(def) = duel_card(code) else {
        warn!(game_id = game.id, card = ?code, "card missing from catalog; discarding as no-op");
        let cd = cd_mut(game, pid)?;
        cd.hand.remove(hand_idx);
        cd.discard.push(code);
        return Ok(PlayCardOutcome {
            participant: pid,
            card: code,
            slot: None,
            report: CardEffectReport::default(),
            finished: false,
            winner: None,
        });
    };

    let slot = def.slot();
    let flags = &cd.turn_flags;
    if flags.silenced {
        return Err(DomainError::validation(ValidationKind::CardBlocked, "silenced: no cards this turn"));
    }
    if flags.stunned && slot == CardSlot::Action {
        return Err(DomainError::validation(ValidationKind::CardBlocked, "stunned: no Action cards this turn"));
    }
    let used = match slot {
        CardSlot::Action => flags.action_used,
        CardSlot::Bonus => flags.bonus_used,
    };
    if used {
        return Err(DomainError::validation(
            ValidationKind::CardSlotUsed,
            format!("{slot:?} card already played this turn"),
        ));
    }

    if let DuelEffect::DiscardAndDraw { max } = def.effect {
        validate_discards(&cd.hand, hand_idx, discard, max)?;
    }

    {
        let cd = cd_mut(game, pid)?;
        cd.hand.remove(hand_idx);
    }
    let report = apply_card_effect(game, pid, opponent, &def.effect, discard, rng)?;
    {
        let cd = cd_mut(game, pid)?;
        cd.discard.push(code);
        match slot {
            CardSlot::Action => cd.turn_flags.action_used = true,
            CardSlot::Bonus => cd.turn_flags.bonus_used = true,
        }
        cd.turn_flags.last_played = Some(code);
    }
    game.push_log(LogAction::CardUse, Some(pid), format!("played {}", def.name));

    let self_alive = game.participant(pid)?.is_alive;
    let opp_alive = game.participant(opponent)?.is_alive;
    if !opp_alive {
        game.push_log(LogAction::Elimination, Some(opponent), "eliminated");
        game.finish(self_alive.then_some(pid));
    } else if !self_alive {
        game.push_log(LogAction::Elimination, Some(pid), "eliminated");
        game.finish(Some(opponent));
    }

    Ok(PlayCardOutcome {
        participant: pid,
        card: code,
        slot: Some(slot),
        report,
        finished: game.status == GameStatus::Finished,
        winner: game.winner,
    })
}

fn validate_discards(
    hand: &[DuelCardCode],
    played_idx: usize,
    discard: &[DuelCardCode],
    max: usize,
) -> Result<(), DomainError> {
    if discard.len() > max {
        return Err(DomainError::validation(
            ValidationKind::InvalidChoice,
            format!("can replace at most {max} cards"),
        ));
    }
    let mut remaining: Vec<DuelCardCode> = hand
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != played_idx)
        .map(|(_, &c)| c)
        .collect();
    for code in discard {
        match remaining.iter().position(|c| c == code) {
            Some(i) => {
                remaining.swap_remove(i);
            }
            None => {
                return Err(DomainError::validation(
                    ValidationKind::CardNotInHand,
                    format!("{code:?} is not in hand to discard"),
                ))
            }
        }
    }
    Ok(())
}

fn statuses_mut(game: &mut Game, pid: ParticipantId) -> Result<&mut StatusList, DomainError> {
    Ok(&mut cd_mut(game, pid)?.statuses)
}

/// Attack damage after the attacker's and defender's modifiers, through the
/// damage primitive, followed by any counter-stance reflection.
fn strike(
    game: &mut Game,
    attacker: ParticipantId,
    defender: ParticipantId,
    base: u32,
) -> Result<(DamageResult, Option<DamageResult>), DomainError> {
    let atk = statuses_mut(game, attacker)?;
    let mut amount = base;
    if let Some(focus) = atk.get(StatusKind::BattleFocus) {
        amount += focus.params.damage_bonus * focus.stacks;
    }
    if let Some(weaken) = atk.consume(StatusKind::Weaken) {
        amount = amount.saturating_sub(weaken.params.damage_down * weaken.stacks);
    }
    if let Some(curse) = atk.consume(StatusKind::WeakenCurse) {
        amount -= amount * curse.params.damage_percent.min(100) / 100;
    }
    let bypass = atk.consume(StatusKind::ShieldBypass).is_some();

    let def = statuses_mut(game, defender)?;
    if let Some(vuln) = def.get(StatusKind::Vulnerable) {
        amount += vuln.params.damage_taken_up * vuln.stacks;
    }

    let result = apply_damage_with(game.participant_mut(defender)?, amount, bypass);

    let mut reflected = None;
    if result.blocked + result.taken > 0 {
        if let Some(counter) = statuses_mut(game, defender)?.consume(StatusKind::CounterStance) {
            let r = apply_damage(game.participant_mut(attacker)?, counter.params.reflect);
            reflected = Some(r);
        }
    }
    Ok((result, reflected))
}

/// Card heal: amplify bonus is consumed here, capped at max hp.
fn card_heal(game: &mut Game, pid: ParticipantId, base: u32) -> Result<u32, DomainError> {
    let bonus = statuses_mut(game, pid)?
        .consume(StatusKind::AmplifyHeal)
        .map(|s| s.params.heal_bonus)
        .unwrap_or(0);
    Ok(apply_heal(game.participant_mut(pid)?, base + bonus, Some(CARD_DUEL_MAX_HP)))
}

fn add_status(
    game: &mut Game,
    pid: ParticipantId,
    status: StatusEffect,
    report: &mut CardEffectReport,
) -> Result<(), DomainError> {
    if !game.participant(pid)?.is_alive {
        return Ok(());
    }
    statuses_mut(game, pid)?.add(status);
    report.statuses_applied.push((pid, status.kind));
    Ok(())
}

fn apply_card_effect(
    game: &mut Game,
    caster: ParticipantId,
    opponent: ParticipantId,
    effect: &DuelEffect,
    discard: &[DuelCardCode],
    rng: &mut impl Rng,
) -> Result<CardEffectReport, DomainError> {
    let mut report = CardEffectReport::default();
    match effect {
        DuelEffect::Damage { amount, rider } => {
            let (hit, reflected) = strike(game, caster, opponent, *amount)?;
            report.damage = Some(hit);
            report.reflected = reflected;
            if let Some(status) = rider {
                add_status(game, opponent, *status, &mut report)?;
            }
        }
        DuelEffect::Heal { amount, rider } => {
            report.healed = card_heal(game, caster, *amount)?;
            if let Some(status) = rider {
                add_status(game, caster, *status, &mut report)?;
            }
        }
        DuelEffect::Shield { amount } => {
            let p = game.participant_mut(caster)?;
            p.shield_points = p.shield_points.saturating_add(*amount);
            report.shield_gained = *amount;
        }
        DuelEffect::ApplyStatus { status, target } => {
            let who = match target {
                StatusTarget::Caster => caster,
                StatusTarget::Opponent => opponent,
            };
            add_status(game, who, *status, &mut report)?;
        }
        DuelEffect::Cleanse { max, kinds } => {
            report.cleansed = statuses_mut(game, caster)?.cleanse(*max, kinds);
        }
        DuelEffect::Draw { amount } => {
            report.drawn = cd_mut(game, caster)?.draw(*amount, rng);
        }
        DuelEffect::Gamble {
            win_shield,
            loss_damage,
            win_chance,
        } => {
            let won = rng.random_bool(win_chance.clamp(0.0, 1.0));
            report.gamble_won = Some(won);
            let p = game.participant_mut(caster)?;
            if won {
                p.shield_points = p.shield_points.saturating_add(*win_shield);
                report.shield_gained = *win_shield;
            } else {
                report.self_damage = Some(apply_damage(p, *loss_damage));
            }
        }
        DuelEffect::DiscardAndDraw { .. } => {
            let cd = cd_mut(game, caster)?;
            for code in discard {
                if let Some(i) = cd.hand.iter().position(|c| c == code) {
                    let card = cd.hand.remove(i);
                    cd.discard.push(card);
                    report.discarded.push(card);
                }
            }
            report.drawn = cd.draw(report.discarded.len() as u32, rng);
        }
        DuelEffect::SwapShield => {
            let mine = game.participant(caster)?.shield_points;
            let theirs = game.participant(opponent)?.shield_points;
            game.participant_mut(caster)?.shield_points = theirs;
            game.participant_mut(opponent)?.shield_points = mine;
        }
        DuelEffect::HealAndShield { heal, shield } => {
            report.healed = card_heal(game, caster, *heal)?;
            let p = game.participant_mut(caster)?;
            p.shield_points = p.shield_points.saturating_add(*shield);
            report.shield_gained = *shield;
        }
        DuelEffect::Antidote { heal, kinds } => {
            report.cleansed = statuses_mut(game, caster)?.cleanse(usize::MAX, kinds);
            report.healed = card_heal(game, caster, *heal)?;
        }
    }
    Ok(report)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndTurnOutcome {
    pub ended_by: ParticipantId,
    pub next: Option<ParticipantId>,
    pub tick: TickReport,
    pub drawn: u32,
    pub finished: bool,
    pub winner: Option<ParticipantId>,
}

/// Pass the turn: the next participant's statuses tick, their flags reset
/// (with Silence/Stun latched) and they draw.
pub fn end_turn(game: &mut Game, pid: ParticipantId, rng: &mut impl Rng) -> Result<EndTurnOutcome, DomainError> {
    require_card_duel(game, "end_turn")?;
    require_picks_complete(game)?;
    game.require_turn(pid)?;

    let mut outcome = EndTurnOutcome {
        ended_by: pid,
        next: None,
        tick: TickReport::default(),
        drawn: 0,
        finished: false,
        winner: None,
    };

    let Some(next) = game.advance_turn() else {
        outcome.finished = true;
        outcome.winner = game.winner;
        return Ok(outcome);
    };
    outcome.next = Some(next);

    let p = game.participant_mut(next)?;
    if let Some(cd) = p.card_duel.as_mut() {
        cd.turn_flags = TurnFlags::default();
    }
    let tick = tick_start_of_turn(p, Some(CARD_DUEL_MAX_HP));
    let died = tick.damage.died;
    if let Some(cd) = p.card_duel.as_mut() {
        cd.turn_flags.silenced = tick.silenced;
        cd.turn_flags.stunned = tick.stunned;
    }

    if tick.damage.taken + tick.damage.blocked > 0 || tick.healed > 0 {
        game.push_log(
            LogAction::StatusTick,
            Some(next),
            format!(
                "status tick: {} damage, {} healed",
                tick.damage.taken, tick.healed
            ),
        );
    }

    if died {
        game.push_log(LogAction::Elimination, Some(next), "eliminated by status damage");
        let alive = game.participant(pid)?.is_alive;
        game.finish(alive.then_some(pid));
    } else {
        outcome.drawn = cd_mut(game, next)?.draw(TURN_DRAW + tick.draw_bonus, rng);
    }

    outcome.tick = tick;
    outcome.finished = game.status == GameStatus::Finished;
    outcome.winner = game.winner;
    Ok(outcome)
}
