//! The single damage primitive. Every hp loss in the engine goes through here.

use serde::{Deserialize, Serialize};

use crate::domain::state::Participant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageResult {
    /// Absorbed by shield points.
    pub blocked: u32,
    /// Subtracted from hp.
    pub taken: u32,
    /// This hit flagged the target dead.
    pub died: bool,
}

/// Shield first, then hp (floored at 0). Reaching 0 hp eliminates.
pub fn apply_damage(target: &mut Participant, amount: u32) -> DamageResult {
    apply_damage_with(target, amount, false)
}

/// Same as [`apply_damage`], optionally ignoring the shield entirely.
pub fn apply_damage_with(target: &mut Participant, amount: u32, bypass_shield: bool) -> DamageResult {
    let blocked = if bypass_shield {
        0
    } else {
        amount.min(target.shield_points)
    };
    target.shield_points -= blocked;

    let remainder = amount - blocked;
    let taken = remainder.min(target.hp);
    target.hp -= taken;

    let died = if target.is_alive && target.hp == 0 && remainder > 0 {
        target.is_alive = false;
        true
    } else {
        false
    };

    DamageResult {
        blocked,
        taken,
        died,
    }
}

/// Heal, optionally capped.
pub fn apply_heal(target: &mut Participant, amount: u32, cap: Option<u32>) -> u32 {
    let before = target.hp;
    let raised = target.hp.saturating_add(amount);
    target.hp = match cap {
        Some(c) => raised.min(c.max(before)),
        None => raised,
    };
    target.hp - before
}
