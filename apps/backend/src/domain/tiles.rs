//! Board tile types and their frozen per-tile configuration.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    Start,
    Finish,
    /// Survival end tile: back to Start with a small heal.
    Portal,
    Safe,
    Trap,
    Heal,
    Bonus,
    Question,
    Warp,
    MassWarp,
    Duel,
    Shop,
    Gun,
    /// Anything a newer build wrote that this build does not know.
    #[serde(other)]
    Unknown,
}

impl TileType {
    /// Types eligible for the middle of a board.
    pub const MIDDLE: [TileType; 11] = [
        TileType::Safe,
        TileType::Trap,
        TileType::Heal,
        TileType::Bonus,
        TileType::Question,
        TileType::Warp,
        TileType::MassWarp,
        TileType::Duel,
        TileType::Shop,
        TileType::Gun,
        TileType::Portal,
    ];

    /// Landing opens a pending interaction (when allowed).
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            TileType::Question | TileType::Shop | TileType::Gun | TileType::Duel
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TileType::Start => "start",
            TileType::Finish => "finish",
            TileType::Portal => "portal",
            TileType::Safe => "safe",
            TileType::Trap => "trap",
            TileType::Heal => "heal",
            TileType::Bonus => "bonus",
            TileType::Question => "question",
            TileType::Warp => "warp",
            TileType::MassWarp => "mass_warp",
            TileType::Duel => "duel",
            TileType::Shop => "shop",
            TileType::Gun => "gun",
            TileType::Unknown => "unknown",
        }
    }

    /// Default enabled middle-tile set for new games. Portal is reserved for
    /// the Survival end tile.
    pub fn default_enabled() -> Vec<TileType> {
        TileType::MIDDLE
            .iter()
            .copied()
            .filter(|t| *t != TileType::Portal)
            .collect()
    }
}

/// Type-specific numbers rolled at generation time.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileConfig {
    pub hp_delta: Option<i32>,
    pub coins_delta: Option<u32>,
    pub reward_coins: Option<u32>,
    pub penalty_hp: Option<u32>,
    pub warp_offset: Option<i32>,
    pub shop_level: Option<u32>,
    pub damage: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub position: usize,
    pub tile_type: TileType,
    pub value: Option<i32>,
    pub label: String,
    #[serde(default)]
    pub config: TileConfig,
}

impl Tile {
    pub fn plain(position: usize, tile_type: TileType, label: &str) -> Self {
        Self {
            position,
            tile_type,
            value: None,
            label: label.to_string(),
            config: TileConfig::default(),
        }
    }

    /// Trap hp loss; a zero or missing config still costs 1.
    pub fn trap_damage(&self) -> u32 {
        let raw = self.config.hp_delta.or(self.value).unwrap_or(-1);
        match raw.unsigned_abs() {
            0 => 1,
            n => n,
        }
    }

    pub fn heal_amount(&self) -> u32 {
        let raw = self.config.hp_delta.or(self.value).unwrap_or(1);
        raw.max(1) as u32
    }

    pub fn bonus_coins(&self) -> u32 {
        let raw = self
            .config
            .coins_delta
            .or(self.value.map(|v| v.max(0) as u32))
            .unwrap_or(1);
        raw.max(1)
    }

    pub fn question_reward(&self) -> u32 {
        match self.config.reward_coins.unwrap_or(2) {
            0 => 2,
            n => n,
        }
    }

    pub fn warp_offset(&self) -> i32 {
        self.config.warp_offset.or(self.value).unwrap_or(2)
    }

    pub fn duel_reward(&self) -> u32 {
        self.config.reward_coins.unwrap_or(2)
    }

    pub fn duel_penalty(&self) -> u32 {
        self.config.penalty_hp.unwrap_or(1)
    }

    pub fn shop_level(&self) -> u32 {
        self.config.shop_level.unwrap_or(1).clamp(1, 3)
    }

    pub fn gun_damage(&self) -> u32 {
        self.config.damage.unwrap_or(1).max(1)
    }
}
