use crate::domain::effects::{resolve_landing, MoveContext};
use crate::domain::pending::{InteractionKind, PendingInteraction};
use crate::domain::state::{DuelStyle, GameMode, GameStatus, BOARD_MAX_HP};
use crate::domain::test_state_helpers::{board_game, rng};
use crate::domain::tiles::{TileConfig, TileType};

#[test]
fn trap_hits_shield_first() {
    let mut game = board_game(GameMode::FinishLine, 2, &[TileType::Trap, TileType::Safe]);
    game.tiles[1].config.hp_delta = Some(-2);
    game.participants[0].position = 1;
    game.participants[0].shield_points = 1;

    let res = resolve_landing(&mut game, 0, &mut rng(1));
    let effect = &res.effects[0];
    assert_eq!(effect.damage.map(|d| (d.blocked, d.taken)), Some((1, 1)));
    assert_eq!(game.participants[0].hp, 2);
    assert_eq!(game.participants[0].shield_points, 0);
}

#[test]
fn warp_chains_into_the_destination_tile() {
    let mut game = board_game(
        GameMode::FinishLine,
        2,
        &[TileType::Warp, TileType::Safe, TileType::Bonus, TileType::Safe],
    );
    game.tiles[1].config.warp_offset = Some(2);
    game.tiles[3].config.coins_delta = Some(4);
    game.participants[0].position = 1;

    let res = resolve_landing(&mut game, 0, &mut rng(1));
    assert_eq!(res.effects.len(), 2);
    assert_eq!(game.participants[0].position, 3);
    assert_eq!(game.participants[0].coins, 4);
}

#[test]
fn warp_onto_finish_wins() {
    let mut game = board_game(GameMode::FinishLine, 2, &[TileType::Safe, TileType::Warp]);
    game.tiles[2].config.warp_offset = Some(3);
    game.participants[1].position = 2;

    let res = resolve_landing(&mut game, 1, &mut rng(1));
    assert!(res.finished);
    assert_eq!(game.status, GameStatus::Finished);
    assert_eq!(game.winner, Some(1));
    assert_eq!(game.participants[1].position, 3);
}

#[test]
fn question_opens_for_actor_and_pins_turn() {
    let mut game = board_game(GameMode::FinishLine, 3, &[TileType::Question, TileType::Safe]);
    game.current_turn_index = 2;
    game.participants[2].position = 1;

    let res = resolve_landing(&mut game, 2, &mut rng(5));
    assert_eq!(res.opened, Some(InteractionKind::Question));
    assert!(matches!(game.pending, Some(PendingInteraction::Question(ref q)) if q.owner == 2));
    assert_eq!(game.current_participant_id(), Some(2));
}

#[test]
fn interactive_tile_is_skipped_while_something_is_pending() {
    let mut game = board_game(GameMode::FinishLine, 2, &[TileType::Shop, TileType::Gun]);
    game.participants[0].position = 1;
    resolve_landing(&mut game, 0, &mut rng(2));
    assert!(matches!(game.pending, Some(PendingInteraction::Shop(_))));

    game.participants[0].position = 2;
    let res = resolve_landing(&mut game, 0, &mut rng(3));
    assert!(res.effects[0].skipped);
    assert!(matches!(game.pending, Some(PendingInteraction::Shop(_))));
}

#[test]
fn shop_offers_scale_with_level() {
    let mut game = board_game(GameMode::FinishLine, 2, &[TileType::Shop]);
    game.tiles[1].config = TileConfig {
        shop_level: Some(3),
        ..TileConfig::default()
    };
    game.participants[0].position = 1;
    resolve_landing(&mut game, 0, &mut rng(4));
    match &game.pending {
        Some(PendingInteraction::Shop(s)) => assert_eq!(s.offers.len(), 5),
        other => panic!("expected shop, got {other:?}"),
    }
}

#[test]
fn mass_warp_moves_everyone_and_fires_once() {
    let mut game = board_game(
        GameMode::FinishLine,
        3,
        &[TileType::MassWarp, TileType::MassWarp, TileType::MassWarp, TileType::Safe],
    );
    game.participants[0].position = 1;
    game.participants[1].position = 2;
    game.participants[2].position = 3;

    let res = resolve_landing(&mut game, 0, &mut rng(8));
    let fired: Vec<_> = res.effects.iter().filter(|e| !e.mass_moved.is_empty()).collect();
    assert_eq!(fired.len(), 1);
    assert!(!res.cap_hit);
    let mut positions: Vec<usize> = game.participants.iter().map(|p| p.position).collect();
    positions.sort();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[test]
fn chain_cap_bounds_the_queue() {
    let mut game = board_game(GameMode::FinishLine, 2, &[TileType::Warp, TileType::Warp]);
    game.tiles[1].config.warp_offset = Some(1);
    game.tiles[2].config.warp_offset = Some(-1);
    game.rules.mass_warp_cap = 5;
    game.participants[0].position = 1;

    let res = resolve_landing(&mut game, 0, &mut rng(1));
    assert!(res.cap_hit);
    assert_eq!(res.effects.len(), 5);
}

#[test]
fn portal_returns_to_start_and_heals() {
    let mut game = board_game(GameMode::Survival, 2, &[TileType::Safe]);
    game.participants[0].position = 2;
    game.participants[0].hp = 2;
    let res = resolve_landing(&mut game, 0, &mut rng(1));
    assert_eq!(res.effects[0].moved_to, Some(0));
    assert_eq!(game.participants[0].position, 0);
    assert_eq!(game.participants[0].hp, 3);
    assert_eq!(game.status, GameStatus::Active);
}

#[test]
fn board_heals_stop_at_max_hp() {
    let mut game = board_game(GameMode::Survival, 2, &[TileType::Heal]);
    game.tiles[1].config.hp_delta = Some(4);
    game.participants[0].position = 1;
    game.participants[0].hp = BOARD_MAX_HP - 1;
    let res = resolve_landing(&mut game, 0, &mut rng(1));
    assert_eq!(res.effects[0].hp_delta, 1);
    assert_eq!(game.participants[0].hp, BOARD_MAX_HP);

    game.participants[0].position = 2;
    let res = resolve_landing(&mut game, 0, &mut rng(1));
    assert_eq!(res.effects[0].moved_to, Some(0));
    assert_eq!(res.effects[0].hp_delta, 0);
    assert_eq!(game.participants[0].hp, BOARD_MAX_HP);
}

#[test]
fn instant_duel_pays_winner_and_hurts_loser() {
    let mut game = board_game(GameMode::FinishLine, 2, &[TileType::Duel]);
    game.rules.duel_style = DuelStyle::Instant;
    game.tiles[1].config.reward_coins = Some(3);
    game.participants[0].position = 1;

    let res = resolve_landing(&mut game, 0, &mut rng(9));
    let effect = &res.effects[0];
    assert_eq!(effect.duel_opponent, Some(1));
    let coins: u32 = game.participants.iter().map(|p| p.coins).sum();
    let hp: u32 = game.participants.iter().map(|p| p.hp).sum();
    assert_eq!(coins, 3);
    assert_eq!(hp, 5);
    assert!(game.pending.is_none());
}

#[test]
fn duel_tile_without_opponents_opens_nothing() {
    let mut game = board_game(GameMode::FinishLine, 2, &[TileType::Duel, TileType::Safe]);
    game.participants[1].is_alive = false;
    game.participants[0].position = 1;
    let mut ctx = MoveContext::new(0, 10);
    let effect = crate::domain::effects::apply_tile(&mut game, 0, &mut ctx, &mut rng(1));
    assert_eq!(effect.opened, None);
    assert!(game.pending.is_none());
}

#[test]
fn unknown_tile_is_a_no_op() {
    let mut game = board_game(GameMode::FinishLine, 2, &[TileType::Unknown]);
    game.participants[0].position = 1;
    let before = game.participants.clone();
    let res = resolve_landing(&mut game, 0, &mut rng(1));
    assert_eq!(res.effects.len(), 1);
    assert_eq!(game.participants, before);
}
