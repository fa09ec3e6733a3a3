//! Timed buffs and debuffs attached to a Card-Duel participant.
//!
//! Two families live side by side:
//! - duration statuses tick at their owner's turn start and lose one turn each tick;
//! - consume-on-event statuses ignore ticks and leave the list the first time
//!   their trigger fires (see [`StatusKind::is_consumable`]).

use serde::{Deserialize, Serialize};

use crate::domain::damage::{apply_damage, apply_heal, DamageResult};
use crate::domain::state::Participant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Poison,
    Burn,
    Regen,
    Weaken,
    Vulnerable,
    Silence,
    Stun,
    ShieldBypass,
    CounterStance,
    AmplifyHeal,
    BattleFocus,
    WeakenCurse,
    Focus,
    Bless,
}

impl StatusKind {
    /// Default cleanse allow-list.
    pub const NEGATIVE: [StatusKind; 7] = [
        StatusKind::Poison,
        StatusKind::Burn,
        StatusKind::Weaken,
        StatusKind::Vulnerable,
        StatusKind::Silence,
        StatusKind::Stun,
        StatusKind::WeakenCurse,
    ];

    /// Removed by its trigger, never by ticking.
    pub fn is_consumable(self) -> bool {
        matches!(
            self,
            StatusKind::AmplifyHeal
                | StatusKind::CounterStance
                | StatusKind::Weaken
                | StatusKind::WeakenCurse
                | StatusKind::ShieldBypass
        )
    }
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

/// Numeric knobs; only the ones meaningful for the kind are non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusParams {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub tick_damage: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub tick_heal: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub damage_bonus: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub damage_down: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub damage_taken_up: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub damage_percent: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub reflect: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub heal_bonus: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub extra_draw: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub flat_reduction: u32,
}

impl StatusParams {
    fn merge_max(&mut self, other: &StatusParams) {
        self.tick_damage = self.tick_damage.max(other.tick_damage);
        self.tick_heal = self.tick_heal.max(other.tick_heal);
        self.damage_bonus = self.damage_bonus.max(other.damage_bonus);
        self.damage_down = self.damage_down.max(other.damage_down);
        self.damage_taken_up = self.damage_taken_up.max(other.damage_taken_up);
        self.damage_percent = self.damage_percent.max(other.damage_percent);
        self.reflect = self.reflect.max(other.reflect);
        self.heal_bonus = self.heal_bonus.max(other.heal_bonus);
        self.extra_draw = self.extra_draw.max(other.extra_draw);
        self.flat_reduction = self.flat_reduction.max(other.flat_reduction);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub stacks: u32,
    pub turns_left: u32,
    #[serde(default)]
    pub params: StatusParams,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, turns: u32) -> Self {
        Self {
            kind,
            stacks: 1,
            turns_left: turns,
            params: StatusParams::default(),
        }
    }

    pub fn with_params(mut self, params: StatusParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_stacks(mut self, stacks: u32) -> Self {
        self.stacks = stacks.max(1);
        self
    }
}

/// A participant's status list. At most one entry per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusList(Vec<StatusEffect>);

impl StatusList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.0.iter().find(|s| s.kind == kind)
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    /// Merge: stacks add, turns-left takes the max, params take the max.
    pub fn add(&mut self, effect: StatusEffect) {
        match self.0.iter_mut().find(|s| s.kind == effect.kind) {
            Some(existing) => {
                existing.stacks = existing.stacks.saturating_add(effect.stacks.max(1));
                existing.turns_left = existing.turns_left.max(effect.turns_left);
                existing.params.merge_max(&effect.params);
            }
            None => self.0.push(StatusEffect {
                stacks: effect.stacks.max(1),
                ..effect
            }),
        }
    }

    /// Remove the entry for `kind` if present, returning it.
    pub fn consume(&mut self, kind: StatusKind) -> Option<StatusEffect> {
        let idx = self.0.iter().position(|s| s.kind == kind)?;
        Some(self.0.remove(idx))
    }

    /// Remove up to `max` entries whose kind is in `kinds`; returns how many.
    pub fn cleanse(&mut self, max: usize, kinds: &[StatusKind]) -> usize {
        let mut removed = 0;
        self.0.retain(|s| {
            if removed < max && kinds.contains(&s.kind) {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Compute this turn's tick from the pre-decrement entries, then
    /// decrement duration statuses and drop the ones that ran out.
    pub fn tick(&mut self) -> StatusTick {
        let mut out = StatusTick::default();

        for s in self.0.iter().filter(|s| s.turns_left > 0 && !s.kind.is_consumable()) {
            let stacks = s.stacks.max(1);
            match s.kind {
                StatusKind::Poison | StatusKind::Burn => {
                    out.damage += s.params.tick_damage * stacks;
                }
                StatusKind::Regen => out.heal += s.params.tick_heal * stacks,
                StatusKind::Focus => out.draw_bonus += s.params.extra_draw * stacks,
                StatusKind::Bless => out.reduction += s.params.flat_reduction * stacks,
                StatusKind::Silence => out.silenced = true,
                StatusKind::Stun => out.stunned = true,
                _ => {}
            }
        }

        for s in self.0.iter_mut().filter(|s| !s.kind.is_consumable()) {
            s.turns_left = s.turns_left.saturating_sub(1);
        }
        self.0.retain(|s| {
            if !s.kind.is_consumable() && s.turns_left == 0 {
                out.expired.push(s.kind);
                false
            } else {
                true
            }
        });

        out
    }
}

/// Raw tick totals before they are applied to the participant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTick {
    pub damage: u32,
    pub heal: u32,
    pub draw_bonus: u32,
    pub reduction: u32,
    pub silenced: bool,
    pub stunned: bool,
    pub expired: Vec<StatusKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub damage: DamageResult,
    pub healed: u32,
    pub draw_bonus: u32,
    pub expired: Vec<StatusKind>,
    pub silenced: bool,
    pub stunned: bool,
}

/// Start-of-turn processing for a Card-Duel participant. Tick damage is
/// reduced by Bless first and then routed through the damage primitive.
pub fn tick_start_of_turn(participant: &mut Participant, heal_cap: Option<u32>) -> TickReport {
    let Some(cd) = participant.card_duel.as_mut() else {
        return TickReport::default();
    };
    let tick = cd.statuses.tick();

    let mut report = TickReport {
        draw_bonus: tick.draw_bonus,
        expired: tick.expired,
        silenced: tick.silenced,
        stunned: tick.stunned,
        ..TickReport::default()
    };

    let damage = tick.damage.saturating_sub(tick.reduction);
    if damage > 0 {
        report.damage = apply_damage(participant, damage);
    }
    if tick.heal > 0 && participant.is_alive {
        report.healed = apply_heal(participant, tick.heal, heal_cap);
    }
    report
}
