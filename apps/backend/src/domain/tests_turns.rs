use crate::domain::cards::SupportCardCode;
use crate::domain::pending::{PendingInteraction, PendingQuestion};
use crate::domain::questions::Question;
use crate::domain::state::{GameMode, GameStatus, BOARD_MAX_HP, SURVIVAL_ROUND_LIMIT};
use crate::domain::test_state_helpers::{board_game, rng, safe_board};
use crate::domain::tiles::TileType;
use crate::domain::turns::{roll_dice_and_move, use_support_card};
use crate::errors::domain::{DomainError, ValidationKind};

fn validation_kind(err: DomainError) -> ValidationKind {
    match err {
        DomainError::Validation(kind, _) => kind,
        other => panic!("expected validation error, got {other:?}"),
    }
}

fn pending_question(owner: u32) -> PendingInteraction {
    PendingInteraction::Question(PendingQuestion {
        owner,
        question: Question {
            prompt: "2 + 2 = ?".into(),
            choices: vec!["3".into(), "5".into(), "4".into(), "6".into()],
            correct_index: 2,
        },
        reward_coins: 2,
        changed_once: false,
    })
}

#[test]
fn roll_near_the_end_clamps_to_last_tile() {
    let mut game = board_game(GameMode::Survival, 2, &[TileType::Safe; 34]);
    assert_eq!(game.tiles.len(), 36);
    game.participants[0].position = 33;

    let out = roll_dice_and_move(&mut game, 0, &mut rng(11)).unwrap();
    assert_eq!(out.from, 33);
    assert_eq!(out.to, (33 + out.dice as usize).min(35));
    assert!(out.to <= 35);
}

#[test]
fn plain_roll_advances_turn() {
    let mut game = safe_board(3, 30);
    let out = roll_dice_and_move(&mut game, 0, &mut rng(1)).unwrap();
    assert!((1..=6).contains(&out.dice));
    assert_eq!(game.participants[0].position, out.dice as usize);
    assert_eq!(out.next_participant, Some(1));
    assert_eq!(game.current_participant_id(), Some(1));
}

#[test]
fn extra_roll_keeps_the_turn_once() {
    let mut game = safe_board(2, 30);
    game.participants[0].extra_rolls = 1;
    let first = roll_dice_and_move(&mut game, 0, &mut rng(1)).unwrap();
    assert!(first.extra_roll_used);
    assert_eq!(first.next_participant, Some(0));
    assert_eq!(game.participants[0].extra_rolls, 0);

    let second = roll_dice_and_move(&mut game, 0, &mut rng(2)).unwrap();
    assert!(!second.extra_roll_used);
    assert_eq!(second.next_participant, Some(1));
}

#[test]
fn out_of_turn_roll_is_rejected_without_change() {
    let mut game = safe_board(2, 10);
    let before = game.clone();
    let err = roll_dice_and_move(&mut game, 1, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::OutOfTurn);
    assert_eq!(game, before);
}

#[test]
fn roll_blocked_by_pending_interaction() {
    let mut game = safe_board(2, 10);
    game.pending = Some(pending_question(0));
    let err = roll_dice_and_move(&mut game, 0, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InteractionPending);

    game.pending = Some(pending_question(1));
    let err = roll_dice_and_move(&mut game, 0, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NotInteractionOwner);
}

#[test]
fn roll_rejected_outside_active() {
    let mut game = safe_board(2, 10);
    game.status = GameStatus::Ordering;
    let err = roll_dice_and_move(&mut game, 0, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::PhaseMismatch);
}

#[test]
fn landing_on_finish_wins() {
    let mut game = safe_board(2, 3);
    game.participants[0].position = 4;
    let out = roll_dice_and_move(&mut game, 0, &mut rng(3)).unwrap();
    assert!(out.finished);
    assert_eq!(out.winner, Some(0));
    assert_eq!(out.next_participant, None);
    assert_eq!(game.status, GameStatus::Finished);
}

#[test]
fn lethal_trap_on_last_rival_ends_survival() {
    let mut game = board_game(GameMode::Survival, 2, &[TileType::Trap; 8]);
    for t in game.tiles.iter_mut().filter(|t| t.tile_type == TileType::Trap) {
        t.config.hp_delta = Some(-3);
    }
    let out = roll_dice_and_move(&mut game, 0, &mut rng(4)).unwrap();
    assert_eq!(out.landing.eliminated, vec![0]);
    assert!(out.finished);
    assert_eq!(game.winner, Some(1));
}

#[test]
fn support_cards_apply_and_are_spent() {
    let mut game = safe_board(2, 20);
    let shield = game.grant_support_card(0, SupportCardCode::Shield).unwrap();
    let coin = game.grant_support_card(0, SupportCardCode::BonusCoin).unwrap();

    let out = use_support_card(&mut game, 0, shield, None, &mut rng(1)).unwrap();
    assert_eq!(out.shield_gained, 2);
    assert_eq!(out.next_participant, Some(0));
    use_support_card(&mut game, 0, coin, None, &mut rng(1)).unwrap();
    assert_eq!(game.participants[0].shield_points, 2);
    assert_eq!(game.participants[0].coins, 3);
    assert!(game.participants[0].support_cards.iter().all(|c| c.is_used));

    let err = use_support_card(&mut game, 0, shield, None, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::CardNotOwned);
}

#[test]
fn heal_card_respects_board_max_hp() {
    let mut game = safe_board(2, 20);
    game.participants[0].hp = BOARD_MAX_HP;
    let heal = game.grant_support_card(0, SupportCardCode::Heal).unwrap();
    let out = use_support_card(&mut game, 0, heal, None, &mut rng(1)).unwrap();
    assert_eq!(out.healed, 0);
    assert_eq!(game.participants[0].hp, BOARD_MAX_HP);
}

#[test]
fn survival_round_limit_ends_with_the_leader() {
    let mut game = board_game(GameMode::Survival, 3, &[TileType::Safe; 8]);
    game.participants[1].hp = 5;
    game.participants[2].is_alive = false;
    game.participants[2].hp = 0;
    game.rounds_played = SURVIVAL_ROUND_LIMIT - 1;
    game.current_turn_index = 1;

    assert_eq!(game.advance_turn(), None);
    assert_eq!(game.status, GameStatus::Finished);
    assert_eq!(game.winner, Some(1));
    assert_eq!(game.rounds_played, SURVIVAL_ROUND_LIMIT);
}

#[test]
fn round_limit_tie_has_no_winner() {
    let mut game = board_game(GameMode::Survival, 2, &[TileType::Safe; 8]);
    game.rounds_played = SURVIVAL_ROUND_LIMIT - 1;
    game.current_turn_index = 1;

    assert_eq!(game.advance_turn(), None);
    assert_eq!(game.status, GameStatus::Finished);
    assert_eq!(game.winner, None);
}

#[test]
fn rounds_do_not_end_other_modes() {
    let mut game = safe_board(2, 20);
    game.rounds_played = SURVIVAL_ROUND_LIMIT + 5;
    game.current_turn_index = 1;

    assert_eq!(game.advance_turn(), Some(0));
    assert_eq!(game.status, GameStatus::Active);
    assert_eq!(game.rounds_played, SURVIVAL_ROUND_LIMIT + 6);
}

#[test]
fn swap_position_needs_a_living_target() {
    let mut game = safe_board(3, 20);
    game.participants[1].position = 7;
    game.participants[2].is_alive = false;
    let card = game.grant_support_card(0, SupportCardCode::SwapPosition).unwrap();

    let err = use_support_card(&mut game, 0, card, Some(2), &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InvalidTarget);
    let err = use_support_card(&mut game, 0, card, None, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InvalidTarget);

    use_support_card(&mut game, 0, card, Some(1), &mut rng(1)).unwrap();
    assert_eq!(game.participants[0].position, 7);
    assert_eq!(game.participants[1].position, 0);
}

#[test]
fn move_extra_resolves_the_new_tile() {
    let mut game = board_game(GameMode::FinishLine, 2, &[TileType::Safe, TileType::Bonus, TileType::Safe]);
    game.tiles[2].config.coins_delta = Some(2);
    let card = game.grant_support_card(0, SupportCardCode::MoveExtra).unwrap();
    let out = use_support_card(&mut game, 0, card, None, &mut rng(1)).unwrap();
    assert_eq!(out.moved_to, Some(2));
    assert_eq!(game.participants[0].coins, 2);
    assert_eq!(game.current_participant_id(), Some(0));
}

#[test]
fn change_question_only_once_and_only_on_own_question() {
    let mut game = safe_board(2, 10);
    let a = game.grant_support_card(0, SupportCardCode::ChangeQuestion).unwrap();
    let b = game.grant_support_card(0, SupportCardCode::ChangeQuestion).unwrap();

    let err = use_support_card(&mut game, 0, a, None, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NoPendingInteraction);

    game.pending = Some(pending_question(0));
    let out = use_support_card(&mut game, 0, a, None, &mut rng(1)).unwrap();
    assert!(out.question_changed);
    match &game.pending {
        Some(PendingInteraction::Question(q)) => assert!(q.changed_once),
        other => panic!("expected question, got {other:?}"),
    }

    let err = use_support_card(&mut game, 0, b, None, &mut rng(2)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::QuestionAlreadyChanged);
}

#[test]
fn support_cards_are_board_only() {
    let mut game = crate::domain::test_state_helpers::card_duel_game([vec![], vec![]]);
    let card = game.grant_support_card(0, SupportCardCode::Heal).unwrap();
    let err = use_support_card(&mut game, 0, card, None, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::PhaseMismatch);
}
