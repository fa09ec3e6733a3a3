//! Tile effect resolution.
//!
//! A landing is processed through a bounded work queue carried in
//! [`MoveContext`]: any effect that moves a participant (Warp, Mass Warp,
//! Portal excluded) enqueues that participant so the new tile fires too.
//! Mass Warp fires at most once per context and the queue is capped, so a
//! chain always terminates.

use std::collections::VecDeque;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::cards::{support_card, SupportCardCode};
use crate::domain::damage::{apply_damage, apply_heal, DamageResult};
use crate::domain::log::LogAction;
use crate::domain::pending::{
    DuelState, InteractionKind, PendingGun, PendingInteraction, PendingQuestion, PendingShop,
    ShopOffer,
};
use crate::domain::questions::generate_question;
use crate::domain::state::{DuelStyle, Game, GameMode, GameStatus, ParticipantId, BOARD_MAX_HP};
use crate::domain::tiles::{Tile, TileType};

/// Shop offers = base + shop level.
pub const SHOP_BASE_OFFERS: usize = 2;
/// Shuffle attempts when looking for a derangement.
pub const DERANGEMENT_ATTEMPTS: usize = 10;

/// Per-move shared context.
#[derive(Debug)]
pub struct MoveContext {
    /// Only this participant may open a pending interaction.
    pub actor: ParticipantId,
    queue: VecDeque<ParticipantId>,
    processed: usize,
    cap: usize,
    mass_warp_fired: bool,
    cap_hit: bool,
}

impl MoveContext {
    pub fn new(actor: ParticipantId, cap: usize) -> Self {
        Self {
            actor,
            queue: VecDeque::from([actor]),
            processed: 0,
            cap: cap.max(1),
            mass_warp_fired: false,
            cap_hit: false,
        }
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    fn enqueue(&mut self, pid: ParticipantId) {
        self.queue.push_back(pid);
    }
}

/// What one tile trigger did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileEffect {
    pub participant: ParticipantId,
    pub position: usize,
    pub tile_type: Option<TileType>,
    pub hp_delta: i64,
    pub coins_delta: i64,
    pub moved_to: Option<usize>,
    pub damage: Option<DamageResult>,
    pub opened: Option<InteractionKind>,
    /// Interactive tile reached outside the actor's own landing.
    pub skipped: bool,
    pub won: bool,
    pub mass_moved: Vec<ParticipantId>,
    pub duel_opponent: Option<ParticipantId>,
    pub duel_won: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingResolution {
    pub effects: Vec<TileEffect>,
    pub opened: Option<InteractionKind>,
    pub cap_hit: bool,
    pub eliminated: Vec<ParticipantId>,
    pub finished: bool,
}

/// Resolve the actor's landing and every chained re-trigger.
pub fn resolve_landing(game: &mut Game, actor: ParticipantId, rng: &mut impl Rng) -> LandingResolution {
    let mut ctx = MoveContext::new(actor, game.rules.mass_warp_cap);
    let mut out = LandingResolution::default();
    let alive_before = game.alive_ids();

    while let Some(pid) = ctx.queue.pop_front() {
        if game.status == GameStatus::Finished {
            break;
        }
        if ctx.processed >= ctx.cap {
            ctx.cap_hit = true;
            warn!(
                game_id = game.id,
                cap = ctx.cap,
                dropped = ctx.queue.len() + 1,
                "tile re-trigger cap reached; dropping remaining triggers"
            );
            break;
        }
        ctx.processed += 1;

        let alive = game.participants.get(pid as usize).map(|p| p.is_alive);
        if alive != Some(true) {
            continue;
        }

        let effect = apply_tile(game, pid, &mut ctx, rng);
        if effect.opened.is_some() {
            out.opened = effect.opened;
        }
        out.effects.push(effect);
    }

    out.eliminated = alive_before
        .into_iter()
        .filter(|&p| !game.participants[p as usize].is_alive)
        .collect();
    for &pid in &out.eliminated {
        game.push_log(LogAction::Elimination, Some(pid), "eliminated");
    }
    out.cap_hit = ctx.cap_hit;
    out.finished = game.finish_if_last_standing();
    out
}

/// Apply the tile under `pid`. Total over tile types: unknown types no-op.
pub fn apply_tile(
    game: &mut Game,
    pid: ParticipantId,
    ctx: &mut MoveContext,
    rng: &mut impl Rng,
) -> TileEffect {
    let position = game.participants[pid as usize].position;
    let mut effect = TileEffect {
        participant: pid,
        position,
        ..TileEffect::default()
    };
    let Some(tile) = game.tile_at(position).cloned() else {
        return effect;
    };
    effect.tile_type = Some(tile.tile_type);

    match tile.tile_type {
        TileType::Start | TileType::Safe => {}
        TileType::Finish => {
            if matches!(game.mode, GameMode::FinishLine | GameMode::Draft) {
                effect.won = true;
                game.push_log(LogAction::TileEffect, Some(pid), "reached the finish");
                game.finish(Some(pid));
            }
        }
        TileType::Portal => {
            let p = &mut game.participants[pid as usize];
            p.position = 0;
            let healed = apply_heal(p, 1, Some(BOARD_MAX_HP));
            effect.moved_to = Some(0);
            effect.hp_delta = healed as i64;
            game.push_log(LogAction::TileEffect, Some(pid), "portal: back to start, +1 HP");
        }
        TileType::Trap => {
            let amount = tile.trap_damage();
            let result = apply_damage(&mut game.participants[pid as usize], amount);
            effect.hp_delta = -(result.taken as i64);
            effect.damage = Some(result);
            game.push_log(
                LogAction::TileEffect,
                Some(pid),
                format!("trap: {amount} damage ({} blocked)", result.blocked),
            );
        }
        TileType::Heal => {
            let healed = apply_heal(&mut game.participants[pid as usize], tile.heal_amount(), Some(BOARD_MAX_HP));
            effect.hp_delta = healed as i64;
            game.push_log(LogAction::TileEffect, Some(pid), format!("heal: +{healed} HP"));
        }
        TileType::Bonus => {
            let coins = tile.bonus_coins();
            let p = &mut game.participants[pid as usize];
            p.coins = p.coins.saturating_add(coins);
            effect.coins_delta = coins as i64;
            game.push_log(LogAction::TileEffect, Some(pid), format!("bonus: +{coins} coins"));
        }
        TileType::Warp => {
            let target = game.clamp_position(position as i64 + tile.warp_offset() as i64);
            if target != position {
                game.participants[pid as usize].position = target;
                effect.moved_to = Some(target);
                ctx.enqueue(pid);
                game.push_log(LogAction::Move, Some(pid), format!("warp: {position} -> {target}"));
            }
        }
        TileType::MassWarp => {
            if ctx.mass_warp_fired {
                effect.skipped = true;
                debug!(game_id = game.id, participant_id = pid, "mass warp already fired this move");
            } else {
                ctx.mass_warp_fired = true;
                effect.mass_moved = mass_warp(game, ctx, rng);
                game.push_log(
                    LogAction::TileEffect,
                    Some(pid),
                    format!("mass warp moved {} participants", effect.mass_moved.len()),
                );
            }
        }
        TileType::Duel if game.rules.duel_style == DuelStyle::Instant => {
            instant_duel(game, pid, &tile, &mut effect, rng);
        }
        TileType::Question | TileType::Shop | TileType::Gun | TileType::Duel => {
            if pid != ctx.actor || game.pending.is_some() {
                effect.skipped = true;
            } else {
                effect.opened = open_interaction(game, pid, &tile, rng);
            }
        }
        TileType::Unknown => {
            warn!(game_id = game.id, position, "unknown tile type; treating as no-op");
        }
    }
    effect
}

/// Permute living participants' positions, preferring a derangement, and
/// enqueue everyone who actually moved.
fn mass_warp(game: &mut Game, ctx: &mut MoveContext, rng: &mut impl Rng) -> Vec<ParticipantId> {
    let alive = game.alive_ids();
    if alive.len() < 2 {
        return Vec::new();
    }
    let before: Vec<usize> = alive
        .iter()
        .map(|&p| game.participants[p as usize].position)
        .collect();

    let mut after = before.clone();
    for _ in 0..DERANGEMENT_ATTEMPTS {
        after.shuffle(rng);
        if after.iter().zip(&before).all(|(a, b)| a != b) {
            break;
        }
    }

    let mut moved = Vec::new();
    for (i, &pid) in alive.iter().enumerate() {
        if after[i] != before[i] {
            game.participants[pid as usize].position = after[i];
            moved.push(pid);
            ctx.enqueue(pid);
        }
    }
    moved
}

fn instant_duel(
    game: &mut Game,
    pid: ParticipantId,
    tile: &Tile,
    effect: &mut TileEffect,
    rng: &mut impl Rng,
) {
    let opponents: Vec<ParticipantId> = game.alive_ids().into_iter().filter(|&p| p != pid).collect();
    let Some(&opponent) = opponents.choose(rng) else {
        debug!(game_id = game.id, participant_id = pid, "duel tile: no opponent");
        return;
    };
    let won = rng.random_bool(0.5);
    let (winner, loser) = if won { (pid, opponent) } else { (opponent, pid) };
    let reward = tile.duel_reward();

    let w = &mut game.participants[winner as usize];
    w.coins = w.coins.saturating_add(reward);
    let result = apply_damage(&mut game.participants[loser as usize], tile.duel_penalty());

    effect.duel_opponent = Some(opponent);
    effect.duel_won = Some(won);
    if won {
        effect.coins_delta = reward as i64;
    } else {
        effect.hp_delta = -(result.taken as i64);
        effect.damage = Some(result);
    }
    game.push_log(
        LogAction::DuelResult,
        Some(winner),
        format!("won a duel against {loser} for {reward} coins"),
    );
}

fn open_interaction(
    game: &mut Game,
    pid: ParticipantId,
    tile: &Tile,
    rng: &mut impl Rng,
) -> Option<InteractionKind> {
    let has_opponent = game.alive_ids().iter().any(|&p| p != pid);
    let pending = match tile.tile_type {
        TileType::Question => {
            game.push_log(LogAction::QuestionStart, Some(pid), "question opened");
            PendingInteraction::Question(PendingQuestion {
                owner: pid,
                question: generate_question(rng),
                reward_coins: tile.question_reward(),
                changed_once: false,
            })
        }
        TileType::Shop => {
            let count = SHOP_BASE_OFFERS + tile.shop_level() as usize;
            let offers: Vec<ShopOffer> = SupportCardCode::ALL
                .choose_multiple(rng, count)
                .filter_map(|&code| support_card(code))
                .map(|def| ShopOffer {
                    code: def.code,
                    cost: def.cost,
                })
                .collect();
            if offers.is_empty() {
                warn!(game_id = game.id, "support catalog empty; shop not opened");
                return None;
            }
            game.push_log(LogAction::Shop, Some(pid), format!("shop opened with {} offers", offers.len()));
            PendingInteraction::Shop(PendingShop { owner: pid, offers })
        }
        TileType::Gun if has_opponent => {
            game.push_log(LogAction::Gun, Some(pid), "picked up a gun");
            PendingInteraction::Gun(PendingGun {
                owner: pid,
                damage: tile.gun_damage(),
            })
        }
        TileType::Duel if has_opponent => {
            game.push_log(LogAction::DuelStart, Some(pid), "duel: choose an opponent");
            PendingInteraction::Duel(DuelState::new(pid))
        }
        _ => return None,
    };
    let kind = pending.kind();
    game.pending = Some(pending);
    game.pin_turn_to(pid);
    Some(kind)
}
