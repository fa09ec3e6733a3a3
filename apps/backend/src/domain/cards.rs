//! Immutable card catalogs, loaded once and keyed by enum code.
//!
//! Two families:
//! - support cards, owned as instances in board modes (shop, draft, duel stakes);
//! - Card-Duel cards, referenced by code from deck, hand and discard.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::status::{StatusEffect, StatusKind, StatusParams};

// ---------------------------------------------------------------------------
// Support cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportCardCode {
    MoveExtra,
    Heal,
    Shield,
    Reroll,
    SwapPosition,
    ChangeQuestion,
    BonusCoin,
}

impl SupportCardCode {
    pub const ALL: [SupportCardCode; 7] = [
        SupportCardCode::MoveExtra,
        SupportCardCode::Heal,
        SupportCardCode::Shield,
        SupportCardCode::Reroll,
        SupportCardCode::SwapPosition,
        SupportCardCode::ChangeQuestion,
        SupportCardCode::BonusCoin,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SupportEffect {
    MoveExtra { steps: u32 },
    Heal { amount: u32 },
    Shield { amount: u32 },
    Reroll { rolls: u32 },
    SwapPosition,
    ChangeQuestion,
    BonusCoin { amount: u32 },
}

impl SupportEffect {
    pub fn needs_target(&self) -> bool {
        matches!(self, SupportEffect::SwapPosition)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SupportCardDef {
    pub code: SupportCardCode,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: u32,
    pub effect: SupportEffect,
}

impl SupportCardDef {
    /// Half the buy cost, rounded down, never below 1.
    pub fn sell_price(&self) -> u32 {
        (self.cost / 2).max(1)
    }
}

static SUPPORT_CATALOG: Lazy<HashMap<SupportCardCode, SupportCardDef>> = Lazy::new(|| {
    let defs = [
        SupportCardDef {
            code: SupportCardCode::MoveExtra,
            name: "Sprint",
            description: "Move 2 extra tiles forward.",
            cost: 3,
            effect: SupportEffect::MoveExtra { steps: 2 },
        },
        SupportCardDef {
            code: SupportCardCode::Heal,
            name: "Bandage",
            description: "Restore 1 HP.",
            cost: 2,
            effect: SupportEffect::Heal { amount: 1 },
        },
        SupportCardDef {
            code: SupportCardCode::Shield,
            name: "Buckler",
            description: "Gain 2 shield points.",
            cost: 3,
            effect: SupportEffect::Shield { amount: 2 },
        },
        SupportCardDef {
            code: SupportCardCode::Reroll,
            name: "Second Wind",
            description: "Roll again after this roll.",
            cost: 4,
            effect: SupportEffect::Reroll { rolls: 1 },
        },
        SupportCardDef {
            code: SupportCardCode::SwapPosition,
            name: "Switcheroo",
            description: "Swap board positions with another player.",
            cost: 4,
            effect: SupportEffect::SwapPosition,
        },
        SupportCardDef {
            code: SupportCardCode::ChangeQuestion,
            name: "Skip Question",
            description: "Replace your current question with a new one.",
            cost: 2,
            effect: SupportEffect::ChangeQuestion,
        },
        SupportCardDef {
            code: SupportCardCode::BonusCoin,
            name: "Lucky Coin",
            description: "Gain 3 coins.",
            cost: 2,
            effect: SupportEffect::BonusCoin { amount: 3 },
        },
    ];
    defs.into_iter().map(|d| (d.code, d)).collect()
});

pub fn support_card(code: SupportCardCode) -> Option<&'static SupportCardDef> {
    SUPPORT_CATALOG.get(&code)
}

// ---------------------------------------------------------------------------
// Card-Duel cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DuelCardCode {
    // Plus status
    BattleFocus,
    IronSkin,
    PurifyAura,
    RegenBrew,
    Heal,
    Blessing,
    // Minus status
    Poison,
    Burn,
    Weaken,
    Vulnerable,
    Silence,
    Stun,
    // Neutral
    Adrenaline,
    CardCycle,
    GuardSwap,
    QuickFix,
    WeakenCurse,
    // Bonus
    Amplify,
    AntidoteKit,
    CounterStance,
    GambleCoin,
    LuckyDraw,
    VenomStrike,
    FlameJab,
    HolyLight,
    CripplingShot,
    Sunder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelCardCategory {
    PlusStatus,
    MinusStatus,
    Neutral,
    Bonus,
}

/// Per-turn play slot. One card of each per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSlot {
    Action,
    Bonus,
}

impl DuelCardCategory {
    pub fn slot(self) -> CardSlot {
        match self {
            DuelCardCategory::Bonus => CardSlot::Bonus,
            _ => CardSlot::Action,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTarget {
    Caster,
    Opponent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DuelEffect {
    /// Hit the opponent; optional rider status lands on the opponent.
    Damage {
        amount: u32,
        rider: Option<StatusEffect>,
    },
    /// Heal the caster; optional rider status lands on the caster.
    Heal {
        amount: u32,
        rider: Option<StatusEffect>,
    },
    Shield {
        amount: u32,
    },
    ApplyStatus {
        status: StatusEffect,
        target: StatusTarget,
    },
    Cleanse {
        max: usize,
        kinds: Vec<StatusKind>,
    },
    Draw {
        amount: u32,
    },
    Gamble {
        win_shield: u32,
        loss_damage: u32,
        win_chance: f64,
    },
    DiscardAndDraw {
        max: usize,
    },
    SwapShield,
    HealAndShield {
        heal: u32,
        shield: u32,
    },
    Antidote {
        heal: u32,
        kinds: Vec<StatusKind>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct DuelCardDef {
    pub code: DuelCardCode,
    pub name: &'static str,
    pub description: &'static str,
    pub category: DuelCardCategory,
    pub effect: DuelEffect,
}

impl DuelCardDef {
    pub fn slot(&self) -> CardSlot {
        self.category.slot()
    }
}

fn status(kind: StatusKind, turns: u32, params: StatusParams) -> StatusEffect {
    StatusEffect::new(kind, turns).with_params(params)
}

fn p() -> StatusParams {
    StatusParams::default()
}

static DUEL_CATALOG: Lazy<Vec<DuelCardDef>> = Lazy::new(|| {
    use DuelCardCategory::{Bonus, MinusStatus, Neutral, PlusStatus};
    use DuelCardCode as C;

    let poison = status(StatusKind::Poison, 3, StatusParams { tick_damage: 1, ..p() });
    let burn = status(StatusKind::Burn, 2, StatusParams { tick_damage: 2, ..p() });
    let weaken = status(StatusKind::Weaken, 1, StatusParams { damage_down: 2, ..p() });

    vec![
        DuelCardDef {
            code: C::BattleFocus,
            name: "Battle Focus",
            description: "Gain Battle Focus: +2 damage for 2 turns.",
            category: PlusStatus,
            effect: DuelEffect::ApplyStatus {
                status: status(StatusKind::BattleFocus, 2, StatusParams { damage_bonus: 2, ..p() }),
                target: StatusTarget::Caster,
            },
        },
        DuelCardDef {
            code: C::IronSkin,
            name: "Iron Skin",
            description: "Gain 6 shield.",
            category: PlusStatus,
            effect: DuelEffect::Shield { amount: 6 },
        },
        DuelCardDef {
            code: C::PurifyAura,
            name: "Purify Aura",
            description: "Remove all negative effects from yourself.",
            category: PlusStatus,
            effect: DuelEffect::Cleanse {
                max: 100,
                kinds: StatusKind::NEGATIVE.to_vec(),
            },
        },
        DuelCardDef {
            code: C::RegenBrew,
            name: "Regen Brew",
            description: "Gain Regen: heal 2 at the start of your next 2 turns.",
            category: PlusStatus,
            effect: DuelEffect::ApplyStatus {
                status: status(StatusKind::Regen, 2, StatusParams { tick_heal: 2, ..p() }),
                target: StatusTarget::Caster,
            },
        },
        DuelCardDef {
            code: C::Heal,
            name: "Heal",
            description: "Restore 5 HP.",
            category: PlusStatus,
            effect: DuelEffect::Heal {
                amount: 5,
                rider: None,
            },
        },
        DuelCardDef {
            code: C::Blessing,
            name: "Blessing",
            description: "Reduce damage from Poison and Burn by 1 for 3 turns.",
            category: PlusStatus,
            effect: DuelEffect::ApplyStatus {
                status: status(StatusKind::Bless, 3, StatusParams { flat_reduction: 1, ..p() }),
                target: StatusTarget::Caster,
            },
        },
        DuelCardDef {
            code: C::Poison,
            name: "Poison",
            description: "Apply Poison: target takes 1 damage at the start of their next 3 turns.",
            category: MinusStatus,
            effect: DuelEffect::ApplyStatus {
                status: poison,
                target: StatusTarget::Opponent,
            },
        },
        DuelCardDef {
            code: C::Burn,
            name: "Burn",
            description: "Apply Burn: target takes 2 damage at the start of their next 2 turns.",
            category: MinusStatus,
            effect: DuelEffect::ApplyStatus {
                status: burn,
                target: StatusTarget::Opponent,
            },
        },
        DuelCardDef {
            code: C::Weaken,
            name: "Weaken",
            description: "Apply Weaken: target deals 2 less damage on their next attack card.",
            category: MinusStatus,
            effect: DuelEffect::ApplyStatus {
                status: weaken,
                target: StatusTarget::Opponent,
            },
        },
        DuelCardDef {
            code: C::Vulnerable,
            name: "Vulnerable",
            description: "Apply Vulnerable: target takes +1 damage for their next 2 turns.",
            category: MinusStatus,
            effect: DuelEffect::ApplyStatus {
                status: status(StatusKind::Vulnerable, 2, StatusParams { damage_taken_up: 1, ..p() }),
                target: StatusTarget::Opponent,
            },
        },
        DuelCardDef {
            code: C::Silence,
            name: "Silence Seal",
            description: "Apply Silence: target cannot play ANY card on their next turn.",
            category: MinusStatus,
            effect: DuelEffect::ApplyStatus {
                status: status(StatusKind::Silence, 1, p()),
                target: StatusTarget::Opponent,
            },
        },
        DuelCardDef {
            code: C::Stun,
            name: "Stun Shock",
            description: "Apply Stun: target cannot play an Action card on their next turn.",
            category: MinusStatus,
            effect: DuelEffect::ApplyStatus {
                status: status(StatusKind::Stun, 1, p()),
                target: StatusTarget::Opponent,
            },
        },
        DuelCardDef {
            code: C::Adrenaline,
            name: "Adrenaline",
            description: "Draw +1 card next turn.",
            category: Neutral,
            effect: DuelEffect::ApplyStatus {
                status: status(StatusKind::Focus, 1, StatusParams { extra_draw: 1, ..p() }),
                target: StatusTarget::Caster,
            },
        },
        DuelCardDef {
            code: C::CardCycle,
            name: "Card Cycle",
            description: "Replace up to 2 cards in your hand.",
            category: Neutral,
            effect: DuelEffect::DiscardAndDraw { max: 2 },
        },
        DuelCardDef {
            code: C::GuardSwap,
            name: "Guard Swap",
            description: "Swap shields between you and the enemy.",
            category: Neutral,
            effect: DuelEffect::SwapShield,
        },
        DuelCardDef {
            code: C::QuickFix,
            name: "Quick Fix",
            description: "Heal 2 and gain 2 shield.",
            category: Neutral,
            effect: DuelEffect::HealAndShield { heal: 2, shield: 2 },
        },
        DuelCardDef {
            code: C::WeakenCurse,
            name: "Weaken Curse",
            description: "Enemy deals 50% less damage (rounded down) on their next attack.",
            category: Neutral,
            effect: DuelEffect::ApplyStatus {
                status: status(StatusKind::WeakenCurse, 1, StatusParams { damage_percent: 50, ..p() }),
                target: StatusTarget::Opponent,
            },
        },
        DuelCardDef {
            code: C::Amplify,
            name: "Amplify",
            description: "Your next heal restores +3 additional HP.",
            category: Bonus,
            effect: DuelEffect::ApplyStatus {
                status: status(StatusKind::AmplifyHeal, 99, StatusParams { heal_bonus: 3, ..p() }),
                target: StatusTarget::Caster,
            },
        },
        DuelCardDef {
            code: C::AntidoteKit,
            name: "Antidote Kit",
            description: "Remove Poison and Burn effects, then heal 1 HP.",
            category: Bonus,
            effect: DuelEffect::Antidote {
                heal: 1,
                kinds: vec![StatusKind::Poison, StatusKind::Burn],
            },
        },
        DuelCardDef {
            code: C::CounterStance,
            name: "Counter Stance",
            description: "Reflect 3 damage once (the next time you take damage).",
            category: Bonus,
            effect: DuelEffect::ApplyStatus {
                status: status(StatusKind::CounterStance, 99, StatusParams { reflect: 3, ..p() }),
                target: StatusTarget::Caster,
            },
        },
        DuelCardDef {
            code: C::GambleCoin,
            name: "Gamble Coin",
            description: "50% chance to gain 8 shield, 50% chance to take 3 damage.",
            category: Bonus,
            effect: DuelEffect::Gamble {
                win_shield: 8,
                loss_damage: 3,
                win_chance: 0.5,
            },
        },
        DuelCardDef {
            code: C::LuckyDraw,
            name: "Lucky Draw",
            description: "Draw 2 cards.",
            category: Bonus,
            effect: DuelEffect::Draw { amount: 2 },
        },
        DuelCardDef {
            code: C::VenomStrike,
            name: "Venom Strike",
            description: "Deal 3 damage and apply Poison (1 dmg for 3 turns).",
            category: Bonus,
            effect: DuelEffect::Damage {
                amount: 3,
                rider: Some(poison),
            },
        },
        DuelCardDef {
            code: C::FlameJab,
            name: "Flame Jab",
            description: "Deal 3 damage and apply Burn (2 dmg for 2 turns).",
            category: Bonus,
            effect: DuelEffect::Damage {
                amount: 3,
                rider: Some(burn),
            },
        },
        DuelCardDef {
            code: C::HolyLight,
            name: "Holy Light",
            description: "Heal 3 and gain Regen (heal 1 for 3 turns).",
            category: Bonus,
            effect: DuelEffect::Heal {
                amount: 3,
                rider: Some(status(StatusKind::Regen, 3, StatusParams { tick_heal: 1, ..p() })),
            },
        },
        DuelCardDef {
            code: C::CripplingShot,
            name: "Crippling Shot",
            description: "Deal 4 damage and apply Weaken (-2 on next attack).",
            category: Bonus,
            effect: DuelEffect::Damage {
                amount: 4,
                rider: Some(weaken),
            },
        },
        DuelCardDef {
            code: C::Sunder,
            name: "Sunder",
            description: "Your next attack ignores the enemy's shield.",
            category: Bonus,
            effect: DuelEffect::ApplyStatus {
                status: status(StatusKind::ShieldBypass, 99, p()),
                target: StatusTarget::Caster,
            },
        },
    ]
});

static DUEL_INDEX: Lazy<HashMap<DuelCardCode, usize>> = Lazy::new(|| {
    DUEL_CATALOG
        .iter()
        .enumerate()
        .map(|(i, d)| (d.code, i))
        .collect()
});

pub fn duel_card(code: DuelCardCode) -> Option<&'static DuelCardDef> {
    DUEL_INDEX.get(&code).and_then(|&i| DUEL_CATALOG.get(i))
}

/// Every active code, in catalog order (category, then code).
pub fn duel_deck_codes() -> Vec<DuelCardCode> {
    DUEL_CATALOG.iter().map(|d| d.code).collect()
}
