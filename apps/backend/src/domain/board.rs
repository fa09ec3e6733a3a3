//! Board generation: Start at 0, Finish (or Portal in Survival) at the end,
//! weighted random middle tiles with their numbers rolled and frozen.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::domain::state::{GameMode, SurvivalDifficulty};
use crate::domain::tiles::{Tile, TileConfig, TileType};

/// Relative frequency of each middle tile type for a mode/difficulty.
pub fn tile_weights(mode: GameMode, difficulty: SurvivalDifficulty) -> Vec<(TileType, u32)> {
    let mut weights = vec![
        (TileType::Safe, 6),
        (TileType::Trap, 3),
        (TileType::Heal, 3),
        (TileType::Bonus, 3),
        (TileType::Question, 2),
        (TileType::Warp, 1),
        (TileType::MassWarp, 1),
        (TileType::Duel, 1),
        (TileType::Shop, 1),
        (TileType::Gun, 1),
    ];
    if mode != GameMode::Survival {
        return weights;
    }
    for (t, w) in weights.iter_mut() {
        *w = match (difficulty, *t) {
            (SurvivalDifficulty::Hard, TileType::Trap) => 5,
            (SurvivalDifficulty::Hard, TileType::Question) => 3,
            (SurvivalDifficulty::Hard, TileType::Heal | TileType::Bonus) => 1,
            (SurvivalDifficulty::Easy, TileType::Trap | TileType::MassWarp) => 0,
            (SurvivalDifficulty::Easy, TileType::Heal | TileType::Bonus) => 5,
            _ => *w,
        };
    }
    weights
}

/// Build a fresh tile list. `length` is the total tile count including the
/// Start and end tiles.
pub fn generate_board(
    mode: GameMode,
    length: usize,
    enabled: &[TileType],
    difficulty: SurvivalDifficulty,
    rng: &mut impl Rng,
) -> Vec<Tile> {
    let length = length.max(2);
    let pool: Vec<(TileType, u32)> = tile_weights(mode, difficulty)
        .into_iter()
        .filter(|(t, w)| *w > 0 && enabled.contains(t))
        .collect();
    let dist = WeightedIndex::new(pool.iter().map(|(_, w)| *w)).ok();

    let mut tiles = Vec::with_capacity(length);
    tiles.push(Tile::plain(0, TileType::Start, "Start"));
    for pos in 1..length - 1 {
        let tile_type = match &dist {
            Some(d) => pool[d.sample(rng)].0,
            None => TileType::Safe,
        };
        tiles.push(roll_tile(pos, tile_type, mode, difficulty, rng));
    }
    let last = length - 1;
    if mode == GameMode::Survival {
        tiles.push(Tile::plain(last, TileType::Portal, "Portal"));
    } else {
        tiles.push(Tile::plain(last, TileType::Finish, "Finish"));
    }
    tiles
}

fn roll_tile(
    position: usize,
    tile_type: TileType,
    mode: GameMode,
    difficulty: SurvivalDifficulty,
    rng: &mut impl Rng,
) -> Tile {
    let mut tile = Tile::plain(position, tile_type, "");
    match tile_type {
        TileType::Trap => {
            let hard = mode == GameMode::Survival && difficulty == SurvivalDifficulty::Hard;
            let loss: i32 = if hard {
                rng.random_range(3..=5)
            } else {
                rng.random_range(1..=3)
            };
            tile.label = format!("-{loss} HP");
            tile.value = Some(-loss);
            tile.config.hp_delta = Some(-loss);
        }
        TileType::Heal => {
            let gain: i32 = rng.random_range(1..=3);
            tile.label = format!("+{gain} HP");
            tile.value = Some(gain);
            tile.config.hp_delta = Some(gain);
        }
        TileType::Bonus => {
            let coins: u32 = rng.random_range(1..=5);
            tile.label = format!("+{coins} C");
            tile.value = Some(coins as i32);
            tile.config.coins_delta = Some(coins);
        }
        TileType::Question => {
            let reward: u32 = rng.random_range(1..=4);
            tile.label = "?".to_string();
            tile.value = Some(reward as i32);
            tile.config.reward_coins = Some(reward);
        }
        TileType::Warp => {
            let offset = [-3, -2, -1, 1, 2, 3].choose(rng).copied().unwrap_or(2);
            tile.label = "Warp".to_string();
            tile.value = Some(offset);
            tile.config.warp_offset = Some(offset);
        }
        TileType::MassWarp => {
            tile.label = "Mass Warp".to_string();
        }
        TileType::Duel => {
            let reward: u32 = rng.random_range(1..=4);
            tile.label = "Duel".to_string();
            tile.value = Some(reward as i32);
            tile.config = TileConfig {
                reward_coins: Some(reward),
                penalty_hp: Some(1),
                ..TileConfig::default()
            };
        }
        TileType::Shop => {
            tile.label = "Shop".to_string();
            tile.config.shop_level = Some(rng.random_range(1..=3));
        }
        TileType::Gun => {
            let damage: u32 = rng.random_range(1..=2);
            tile.label = "Gun".to_string();
            tile.value = Some(damage as i32);
            tile.config.damage = Some(damage);
        }
        _ => {}
    }
    tile
}
