use crate::domain::cards::SupportCardCode;
use crate::domain::duel::{choose_opponent, choose_reward, commit, duel_timeout, predict};
use crate::domain::pending::{DuelChoice, DuelPhase, DuelReward, DuelState, PendingInteraction};
use crate::domain::state::Game;
use crate::domain::test_state_helpers::{rng, safe_board};
use crate::errors::domain::{DomainError, ValidationKind};

fn validation_kind(err: DomainError) -> ValidationKind {
    match err {
        DomainError::Validation(kind, _) => kind,
        other => panic!("expected validation error, got {other:?}"),
    }
}

fn duel_game() -> Game {
    let mut game = safe_board(3, 10);
    game.pending = Some(PendingInteraction::Duel(DuelState::new(0)));
    game
}

fn duel(game: &Game) -> &DuelState {
    match &game.pending {
        Some(PendingInteraction::Duel(d)) => d,
        other => panic!("expected duel, got {other:?}"),
    }
}

/// Initiator attacks and reads the opponent's bluff: 2-0 win.
fn initiator_wins(game: &mut Game) {
    choose_opponent(game, 0, 1).unwrap();
    game.participants[1].support_cards.clear();
    game.grant_support_card(1, SupportCardCode::Heal).unwrap();
    commit(game, 0, DuelChoice::Attack).unwrap();
    commit(game, 1, DuelChoice::Bluff).unwrap();
    predict(game, 0, DuelChoice::Bluff).unwrap();
    let out = predict(game, 1, DuelChoice::Defend).unwrap();
    assert_eq!(out.phase, DuelPhase::WinnerChoice);
    assert_eq!(out.winner, Some(0));
}

#[test]
fn only_initiator_chooses_a_living_opponent() {
    let mut game = duel_game();
    game.participants[2].is_alive = false;
    let err = choose_opponent(&mut game, 1, 2).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NotInteractionOwner);
    let err = choose_opponent(&mut game, 0, 2).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InvalidTarget);
    let err = choose_opponent(&mut game, 0, 0).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InvalidTarget);

    choose_opponent(&mut game, 0, 1).unwrap();
    assert_eq!(duel(&game).phase, DuelPhase::Commit);
}

#[test]
fn bluff_without_cards_is_rejected_and_costs_nothing() {
    let mut game = duel_game();
    game.participants[0].coins = 2;
    choose_opponent(&mut game, 0, 1).unwrap();
    let before = game.clone();
    let err = commit(&mut game, 0, DuelChoice::Bluff).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NoCardsAvailable);
    assert_eq!(game, before);
}

#[test]
fn defend_costs_a_coin_and_bluff_burns_a_card() {
    let mut game = duel_game();
    choose_opponent(&mut game, 0, 1).unwrap();
    let err = commit(&mut game, 0, DuelChoice::Defend).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InsufficientCoins);

    game.participants[0].coins = 1;
    commit(&mut game, 0, DuelChoice::Defend).unwrap();
    assert_eq!(game.participants[0].coins, 0);
    let err = commit(&mut game, 0, DuelChoice::Attack).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::AlreadyCommitted);

    game.grant_support_card(1, SupportCardCode::Shield).unwrap();
    commit(&mut game, 1, DuelChoice::Bluff).unwrap();
    assert!(game.participants[1].support_cards[0].is_used);
    assert_eq!(duel(&game).phase, DuelPhase::Predict);
}

#[test]
fn outsider_cannot_touch_the_duel() {
    let mut game = duel_game();
    choose_opponent(&mut game, 0, 1).unwrap();
    let err = commit(&mut game, 2, DuelChoice::Attack).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NotInteractionOwner);
}

#[test]
fn predicting_before_commits_is_a_phase_mismatch() {
    let mut game = duel_game();
    choose_opponent(&mut game, 0, 1).unwrap();
    let err = predict(&mut game, 0, DuelChoice::Attack).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InteractionPhaseMismatch);
}

#[test]
fn equal_scores_draw_and_advance() {
    let mut game = duel_game();
    choose_opponent(&mut game, 0, 1).unwrap();
    commit(&mut game, 0, DuelChoice::Attack).unwrap();
    commit(&mut game, 1, DuelChoice::Attack).unwrap();
    predict(&mut game, 0, DuelChoice::Attack).unwrap();
    let err = predict(&mut game, 0, DuelChoice::Attack).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::AlreadyPredicted);
    let out = predict(&mut game, 1, DuelChoice::Attack).unwrap();
    assert!(out.draw);
    let reveal = out.reveal.unwrap();
    assert_eq!((reveal.initiator_score, reveal.opponent_score), (1, 1));
    assert!(game.pending.is_none());
    assert_eq!(game.current_participant_id(), Some(1));
}

#[test]
fn only_the_winner_picks_exactly_one_reward() {
    let mut game = duel_game();
    initiator_wins(&mut game);
    let err = choose_reward(&mut game, 1, DuelReward::Coins, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NotInteractionOwner);

    let out = choose_reward(&mut game, 0, DuelReward::Coins, &mut rng(1)).unwrap();
    assert_eq!(out.coins_gained, 3);
    assert_eq!(game.participants[0].coins, 3);
    assert!(game.pending.is_none());
    let err = choose_reward(&mut game, 0, DuelReward::Coins, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NoPendingInteraction);
}

#[test]
fn hp_reward_damages_loser() {
    let mut game = duel_game();
    initiator_wins(&mut game);
    let out = choose_reward(&mut game, 0, DuelReward::Hp, &mut rng(1)).unwrap();
    assert_eq!(out.damage.map(|d| d.taken), Some(1));
    assert_eq!(game.participants[1].hp, 2);
}

#[test]
fn push_back_floors_at_zero() {
    let mut game = duel_game();
    initiator_wins(&mut game);
    game.participants[1].position = 0;
    let out = choose_reward(&mut game, 0, DuelReward::PushBack, &mut rng(1)).unwrap();
    assert_eq!(out.pushed_to, Some(0));
}

#[test]
fn steal_card_moves_an_unused_instance() {
    let mut game = duel_game();
    initiator_wins(&mut game);
    let err = choose_reward(&mut game, 0, DuelReward::StealCard, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NoCardsAvailable);

    let card = game.grant_support_card(1, SupportCardCode::Reroll).unwrap();
    let out = choose_reward(&mut game, 0, DuelReward::StealCard, &mut rng(1)).unwrap();
    assert_eq!(out.stolen_card, Some(card));
    assert!(game.participants[0].support_cards.iter().any(|c| c.id == card));
    assert!(game.participants[1].support_cards.iter().all(|c| c.id != card));
}

#[test]
fn stalled_commit_times_out_without_reward() {
    let mut game = duel_game();
    choose_opponent(&mut game, 0, 1).unwrap();
    commit(&mut game, 0, DuelChoice::Attack).unwrap();
    let coins: Vec<u32> = game.participants.iter().map(|p| p.coins).collect();

    let err = duel_timeout(&mut game, 2).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NotInteractionOwner);

    let out = duel_timeout(&mut game, 1).unwrap();
    assert_eq!(out.phase, DuelPhase::Resolved);
    assert_eq!(out.winner, None);
    assert!(!out.draw);
    assert_eq!(out.next_participant, Some(1));
    assert!(game.pending.is_none());
    assert_eq!(game.current_participant_id(), Some(1));
    assert_eq!(game.participants.iter().map(|p| p.coins).collect::<Vec<_>>(), coins);

    let err = duel_timeout(&mut game, 0).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NoPendingInteraction);
}

#[test]
fn unanswered_challenge_can_be_closed_by_the_initiator() {
    let mut game = duel_game();
    let err = duel_timeout(&mut game, 1).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NotInteractionOwner);

    let out = duel_timeout(&mut game, 0).unwrap();
    assert_eq!(out.next_participant, Some(1));
    assert!(game.pending.is_none());
}

#[test]
fn winner_who_never_picks_forfeits_the_reward() {
    let mut game = duel_game();
    initiator_wins(&mut game);
    let hp = game.participants[1].hp;

    let out = duel_timeout(&mut game, 1).unwrap();
    assert!(out.reveal.is_some());
    assert_eq!(out.winner, None);
    assert_eq!(game.participants[1].hp, hp);
    assert!(game.pending.is_none());
}
