use crate::domain::draft::{draft_pick, MAX_DRAFT_PICKS};
use crate::domain::lobby::{
    end_game, join, new_game, require_can_delete, resolve_config, start, GameConfig, GameDefaults,
};
use crate::domain::log::LogAction;
use crate::domain::ordering::{roll_for_order, OrderingProgress};
use crate::domain::state::{Game, GameMode, GameStatus};
use crate::domain::test_state_helpers::rng;
use crate::domain::tiles::TileType;
use crate::errors::domain::{DomainError, ValidationKind};

fn validation_kind(err: DomainError) -> ValidationKind {
    match err {
        DomainError::Validation(kind, _) => kind,
        other => panic!("expected validation error, got {other:?}"),
    }
}

fn lobby(mode: GameMode, seats: usize) -> Game {
    let mut config = GameConfig::new(mode);
    config.max_players = Some(seats);
    let settings = resolve_config(&config, &GameDefaults::default()).unwrap();
    new_game(1, "ABCDEF".into(), 10, settings, 99)
}

#[test]
fn host_is_seated_on_create() {
    let game = lobby(GameMode::FinishLine, 4);
    assert_eq!(game.status, GameStatus::Waiting);
    assert_eq!(game.participants.len(), 1);
    assert_eq!(game.participants[0].user_id, 10);
    assert_eq!(game.log[0].action, LogAction::Create);
}

#[test]
fn config_is_validated() {
    let defaults = GameDefaults::default();
    let mut config = GameConfig::new(GameMode::FinishLine);
    config.board_length = Some(3);
    let err = resolve_config(&config, &defaults).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InvalidConfig);

    config.board_length = None;
    config.max_players = Some(1);
    let err = resolve_config(&config, &defaults).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InvalidConfig);

    let mut duel = GameConfig::new(GameMode::CardDuel);
    duel.max_players = Some(6);
    assert_eq!(resolve_config(&duel, &defaults).unwrap().max_players, 2);
}

#[test]
fn enabled_tiles_are_filtered_to_middle_types() {
    let mut config = GameConfig::new(GameMode::FinishLine);
    config.enabled_tiles = Some(vec![TileType::Trap, TileType::Start, TileType::Trap, TileType::Finish]);
    let settings = resolve_config(&config, &GameDefaults::default()).unwrap();
    assert_eq!(settings.rules.enabled_tiles, vec![TileType::Trap]);
}

#[test]
fn join_rules() {
    let mut game = lobby(GameMode::FinishLine, 2);
    let err = join(&mut game, 10).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::AlreadyJoined);
    assert_eq!(join(&mut game, 11).unwrap().participant, 1);
    let err = join(&mut game, 12).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::GameFull);

    game.status = GameStatus::Active;
    let err = join(&mut game, 13).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::PhaseMismatch);
}

#[test]
fn start_is_host_only_and_needs_two() {
    let mut game = lobby(GameMode::FinishLine, 4);
    let err = start(&mut game, 10, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NotEnoughPlayers);
    join(&mut game, 11).unwrap();
    let err = start(&mut game, 11, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NotHost);
}

#[test]
fn finish_line_start_builds_board_and_orders() {
    let mut game = lobby(GameMode::FinishLine, 4);
    join(&mut game, 11).unwrap();
    join(&mut game, 12).unwrap();
    let out = start(&mut game, 10, &mut rng(5)).unwrap();
    assert_eq!(out.status, GameStatus::Ordering);
    assert_eq!(game.tiles.len(), game.board_length);
    assert_eq!(game.tiles[0].tile_type, TileType::Start);
    assert_eq!(game.tiles.last().map(|t| t.tile_type), Some(TileType::Finish));

    let mut seed = 0;
    while game.status == GameStatus::Ordering {
        let state = game.ordering.clone().unwrap();
        for pid in state.contenders.iter().copied().filter(|p| !state.rolled.contains(p)) {
            seed += 1;
            roll_for_order(&mut game, pid, &mut rng(seed)).unwrap();
        }
        assert!(seed < 200, "ordering should converge");
    }
    assert_eq!(game.status, GameStatus::Active);
    let mut orders: Vec<usize> = game.participants.iter().map(|p| p.turn_order).collect();
    orders.sort();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[test]
fn ordering_roll_twice_in_a_round_is_rejected() {
    let mut game = lobby(GameMode::Survival, 3);
    join(&mut game, 11).unwrap();
    join(&mut game, 12).unwrap();
    start(&mut game, 10, &mut rng(2)).unwrap();
    let first = roll_for_order(&mut game, 0, &mut rng(1)).unwrap();
    assert!(matches!(first.progress, OrderingProgress::Waiting { .. }));
    let err = roll_for_order(&mut game, 0, &mut rng(2)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::AlreadyCommitted);
    assert_eq!(game.tiles.last().map(|t| t.tile_type), Some(TileType::Portal));
}

#[test]
fn draft_runs_to_active() {
    let mut game = lobby(GameMode::Draft, 2);
    join(&mut game, 11).unwrap();
    start(&mut game, 10, &mut rng(3)).unwrap();
    assert_eq!(game.status, GameStatus::Drafting);

    let mut seed = 10;
    for _ in 0..MAX_DRAFT_PICKS {
        for pid in 0..2u32 {
            seed += 1;
            let option = game.participants[pid as usize].draft.as_ref().unwrap().options[0];
            draft_pick(&mut game, pid, option, &mut rng(seed)).unwrap();
        }
    }
    assert_eq!(game.status, GameStatus::Active);
    assert_eq!(game.current_participant_id(), Some(0));
    for p in &game.participants {
        assert_eq!(p.support_cards.len(), MAX_DRAFT_PICKS as usize);
    }
}

#[test]
fn draft_pick_must_be_dealt() {
    let mut game = lobby(GameMode::Draft, 2);
    join(&mut game, 11).unwrap();
    start(&mut game, 10, &mut rng(3)).unwrap();
    let dealt = game.participants[0].draft.as_ref().unwrap().options.clone();
    let missing = crate::domain::cards::SupportCardCode::ALL
        .into_iter()
        .find(|c| !dealt.contains(c))
        .unwrap();
    let err = draft_pick(&mut game, 0, missing, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::PickNotOffered);
}

#[test]
fn card_duel_starts_straight_into_play() {
    let mut game = lobby(GameMode::CardDuel, 2);
    join(&mut game, 11).unwrap();
    let out = start(&mut game, 10, &mut rng(4)).unwrap();
    assert_eq!(out.status, GameStatus::Active);
    assert_eq!(out.tiles, 0);
}

#[test]
fn end_and_delete_are_host_only() {
    let mut game = lobby(GameMode::FinishLine, 2);
    join(&mut game, 11).unwrap();
    assert!(require_can_delete(&game, 10).is_ok());
    let err = require_can_delete(&game, 11).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NotHost);

    game.status = GameStatus::Active;
    let err = require_can_delete(&game, 10).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::GameActive);
    let err = end_game(&mut game, 11).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NotHost);

    game.participants[1].is_alive = false;
    let out = end_game(&mut game, 10).unwrap();
    assert_eq!(out.winner, Some(0));
    assert_eq!(game.status, GameStatus::Finished);
    assert!(require_can_delete(&game, 10).is_ok());
}
