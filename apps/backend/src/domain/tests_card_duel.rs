use crate::domain::card_duel::{
    end_turn, pick_starting_card, play_card, start_card_duel, CARD_DUEL_START_HP, MAX_PICKS,
    PICK_OPTIONS,
};
use crate::domain::cards::{duel_deck_codes, CardSlot, DuelCardCode as C};
use crate::domain::lobby::{join, new_game, resolve_config, GameConfig, GameDefaults};
use crate::domain::state::{Game, GameMode, GameStatus};
use crate::domain::status::{StatusEffect, StatusKind, StatusParams};
use crate::domain::test_state_helpers::{card_duel_game, cd, cd_mut, rng};
use crate::errors::domain::{DomainError, ValidationKind};

fn validation_kind(err: DomainError) -> ValidationKind {
    match err {
        DomainError::Validation(kind, _) => kind,
        other => panic!("expected validation error, got {other:?}"),
    }
}

fn fresh_duel() -> Game {
    let settings =
        resolve_config(&GameConfig::new(GameMode::CardDuel), &GameDefaults::default()).unwrap();
    let mut game = new_game(9, "CD".into(), 1, settings, 1);
    join(&mut game, 2).unwrap();
    start_card_duel(&mut game, &mut rng(3));
    game
}

#[test]
fn start_resets_stats_and_reserves_pick_options() {
    let game = fresh_duel();
    assert_eq!(game.status, GameStatus::Active);
    assert!(game.tiles.is_empty());
    let total = duel_deck_codes().len();
    for p in &game.participants {
        assert_eq!(p.hp, CARD_DUEL_START_HP);
        let state = p.card_duel.as_ref().unwrap();
        assert_eq!(state.pick_options.len(), PICK_OPTIONS);
        assert_eq!(state.deck.len() + state.pick_options.len(), total);
    }
    let mut orders: Vec<usize> = game.participants.iter().map(|p| p.turn_order).collect();
    orders.sort();
    assert_eq!(orders, vec![0, 1]);
}

#[test]
fn starting_picks_build_a_hand_of_five() {
    let mut game = fresh_duel();
    let total = duel_deck_codes().len();
    for round in 0..MAX_PICKS {
        let option = cd(&game, 0).pick_options[0];
        let out = pick_starting_card(&mut game, 0, option, &mut rng(round as u64)).unwrap();
        assert_eq!(out.picks_done, round + 1);
        assert!(!out.all_ready);
    }
    let state = cd(&game, 0);
    assert_eq!(state.hand.len(), MAX_PICKS as usize);
    assert!(state.pick_options.is_empty());
    assert_eq!(state.hand.len() + state.deck.len(), total);

    let err = pick_starting_card(&mut game, 0, C::Poison, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::PicksComplete);
}

#[test]
fn pick_must_be_offered() {
    let mut game = fresh_duel();
    let offered = cd(&game, 1).pick_options.clone();
    let missing = duel_deck_codes()
        .into_iter()
        .find(|c| !offered.contains(c))
        .unwrap();
    let err = pick_starting_card(&mut game, 1, missing, &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::PickNotOffered);
}

#[test]
fn play_is_blocked_until_both_hands_are_built() {
    let mut game = fresh_duel();
    let first = game.current_participant_id().unwrap();
    let err = play_card(&mut game, first, C::Poison, &[], &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::PicksIncomplete);
}

#[test]
fn one_action_and_one_bonus_per_turn() {
    let mut game = card_duel_game([vec![C::Poison, C::Burn, C::LuckyDraw, C::Amplify], vec![]]);
    let out = play_card(&mut game, 0, C::Poison, &[], &mut rng(1)).unwrap();
    assert_eq!(out.slot, Some(CardSlot::Action));
    assert!(cd(&game, 1).statuses.has(StatusKind::Poison));

    let err = play_card(&mut game, 0, C::Burn, &[], &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::CardSlotUsed);

    play_card(&mut game, 0, C::LuckyDraw, &[], &mut rng(1)).unwrap();
    let err = play_card(&mut game, 0, C::Amplify, &[], &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::CardSlotUsed);
    assert_eq!(cd(&game, 0).discard, vec![C::Poison, C::LuckyDraw]);
}

#[test]
fn card_must_be_in_hand_and_turn_owned() {
    let mut game = card_duel_game([vec![C::Poison], vec![C::Burn]]);
    let err = play_card(&mut game, 0, C::Burn, &[], &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::CardNotInHand);
    let err = play_card(&mut game, 1, C::Burn, &[], &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::OutOfTurn);
}

#[test]
fn silence_blocks_everything_stun_blocks_actions() {
    let mut game = card_duel_game([vec![C::Silence, C::Stun], vec![C::Poison, C::LuckyDraw]]);
    play_card(&mut game, 0, C::Silence, &[], &mut rng(1)).unwrap();
    end_turn(&mut game, 0, &mut rng(2)).unwrap();
    assert!(cd(&game, 1).turn_flags.silenced);
    let err = play_card(&mut game, 1, C::LuckyDraw, &[], &mut rng(3)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::CardBlocked);
    end_turn(&mut game, 1, &mut rng(4)).unwrap();

    play_card(&mut game, 0, C::Stun, &[], &mut rng(5)).unwrap();
    end_turn(&mut game, 0, &mut rng(6)).unwrap();
    let flags = &cd(&game, 1).turn_flags;
    assert!(flags.stunned);
    assert!(!flags.silenced);
    let err = play_card(&mut game, 1, C::Poison, &[], &mut rng(7)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::CardBlocked);
    play_card(&mut game, 1, C::LuckyDraw, &[], &mut rng(8)).unwrap();
}

#[test]
fn end_turn_ticks_next_player_and_draws() {
    let mut game = card_duel_game([vec![C::Poison], vec![]]);
    play_card(&mut game, 0, C::Poison, &[], &mut rng(1)).unwrap();
    let out = end_turn(&mut game, 0, &mut rng(2)).unwrap();
    assert_eq!(out.next, Some(1));
    assert_eq!(out.tick.damage.taken, 1);
    assert_eq!(out.drawn, 1);
    assert_eq!(game.participants[1].hp, CARD_DUEL_START_HP - 1);
    assert_eq!(cd(&game, 1).hand.len(), 1);
    assert_eq!(game.current_participant_id(), Some(1));
}

#[test]
fn focus_adds_bonus_draws() {
    let mut game = card_duel_game([vec![], vec![]]);
    cd_mut(&mut game, 1).statuses.add(
        StatusEffect::new(StatusKind::Focus, 1).with_params(StatusParams {
            extra_draw: 2,
            ..StatusParams::default()
        }),
    );
    let out = end_turn(&mut game, 0, &mut rng(1)).unwrap();
    assert_eq!(out.drawn, 3);
}

#[test]
fn draw_reshuffles_discard_when_deck_is_empty() {
    let mut game = card_duel_game([vec![C::LuckyDraw], vec![]]);
    {
        let state = cd_mut(&mut game, 0);
        state.deck.clear();
        state.discard = vec![C::Burn];
    }
    let out = play_card(&mut game, 0, C::LuckyDraw, &[], &mut rng(1)).unwrap();
    assert_eq!(out.report.drawn, 1);
    let state = cd(&game, 0);
    assert_eq!(state.hand, vec![C::Burn]);
    assert_eq!(state.discard, vec![C::LuckyDraw]);
}

#[test]
fn attack_modifiers_stack_and_consume() {
    let mut game = card_duel_game([vec![C::VenomStrike], vec![]]);
    let p = StatusParams::default;
    cd_mut(&mut game, 0).statuses.add(
        StatusEffect::new(StatusKind::BattleFocus, 2).with_params(StatusParams { damage_bonus: 2, ..p() }),
    );
    cd_mut(&mut game, 0).statuses.add(
        StatusEffect::new(StatusKind::Weaken, 1).with_params(StatusParams { damage_down: 1, ..p() }),
    );
    cd_mut(&mut game, 1).statuses.add(
        StatusEffect::new(StatusKind::Vulnerable, 2).with_params(StatusParams { damage_taken_up: 1, ..p() }),
    );
    game.participants[1].shield_points = 2;

    // 3 base + 2 focus - 1 weaken + 1 vulnerable = 5, 2 blocked
    let out = play_card(&mut game, 0, C::VenomStrike, &[], &mut rng(1)).unwrap();
    let hit = out.report.damage.unwrap();
    assert_eq!((hit.blocked, hit.taken), (2, 3));
    assert_eq!(game.participants[1].hp, CARD_DUEL_START_HP - 3);
    assert!(!cd(&game, 0).statuses.has(StatusKind::Weaken));
    assert!(cd(&game, 0).statuses.has(StatusKind::BattleFocus));
    assert!(cd(&game, 1).statuses.has(StatusKind::Poison));
}

#[test]
fn weaken_curse_halves_and_sunder_pierces() {
    let mut game = card_duel_game([vec![C::Sunder, C::CripplingShot], vec![]]);
    cd_mut(&mut game, 0).statuses.add(
        StatusEffect::new(StatusKind::WeakenCurse, 1).with_params(StatusParams {
            damage_percent: 50,
            ..StatusParams::default()
        }),
    );
    game.participants[1].shield_points = 10;
    play_card(&mut game, 0, C::Sunder, &[], &mut rng(1)).unwrap();
    end_turn(&mut game, 0, &mut rng(2)).unwrap();
    end_turn(&mut game, 1, &mut rng(3)).unwrap();
    cd_mut(&mut game, 0).hand.push(C::CripplingShot);

    let out = play_card(&mut game, 0, C::CripplingShot, &[], &mut rng(4)).unwrap();
    let hit = out.report.damage.unwrap();
    assert_eq!((hit.blocked, hit.taken), (0, 2));
    assert_eq!(game.participants[1].shield_points, 10);
    assert!(cd(&game, 0).statuses.is_empty());
}

#[test]
fn counter_stance_reflects_once() {
    let mut game = card_duel_game([vec![C::FlameJab], vec![]]);
    cd_mut(&mut game, 1).statuses.add(
        StatusEffect::new(StatusKind::CounterStance, 99).with_params(StatusParams {
            reflect: 3,
            ..StatusParams::default()
        }),
    );
    let out = play_card(&mut game, 0, C::FlameJab, &[], &mut rng(1)).unwrap();
    assert_eq!(out.report.reflected.map(|r| r.taken), Some(3));
    assert_eq!(game.participants[0].hp, CARD_DUEL_START_HP - 3);
    assert!(!cd(&game, 1).statuses.has(StatusKind::CounterStance));
}

#[test]
fn amplify_boosts_the_next_card_heal_only() {
    let mut game = card_duel_game([vec![C::Amplify, C::Heal], vec![]]);
    game.participants[0].hp = 10;
    play_card(&mut game, 0, C::Amplify, &[], &mut rng(1)).unwrap();
    let out = play_card(&mut game, 0, C::Heal, &[], &mut rng(2)).unwrap();
    assert!(out.report.healed > 3);
    assert!(!cd(&game, 0).statuses.has(StatusKind::AmplifyHeal));
    assert!(game.participants[0].hp <= CARD_DUEL_START_HP);
}

#[test]
fn card_cycle_validates_discards() {
    let mut game = card_duel_game([vec![C::CardCycle, C::Poison, C::Burn, C::Stun], vec![]]);
    let err = play_card(&mut game, 0, C::CardCycle, &[C::Poison, C::Burn, C::Stun], &mut rng(1))
        .unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InvalidChoice);
    let err = play_card(&mut game, 0, C::CardCycle, &[C::Silence], &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::CardNotInHand);
    let err = play_card(&mut game, 0, C::CardCycle, &[C::CardCycle], &mut rng(1)).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::CardNotInHand);

    let out = play_card(&mut game, 0, C::CardCycle, &[C::Poison, C::Burn], &mut rng(1)).unwrap();
    assert_eq!(out.report.discarded, vec![C::Poison, C::Burn]);
    assert_eq!(out.report.drawn, 2);
    assert_eq!(cd(&game, 0).hand.len(), 3);
}

#[test]
fn guard_swap_trades_shields() {
    let mut game = card_duel_game([vec![C::GuardSwap], vec![]]);
    game.participants[0].shield_points = 1;
    game.participants[1].shield_points = 6;
    play_card(&mut game, 0, C::GuardSwap, &[], &mut rng(1)).unwrap();
    assert_eq!(game.participants[0].shield_points, 6);
    assert_eq!(game.participants[1].shield_points, 1);
}

#[test]
fn killing_blow_finishes_the_duel() {
    let mut game = card_duel_game([vec![C::CripplingShot], vec![]]);
    game.participants[1].hp = 4;
    let out = play_card(&mut game, 0, C::CripplingShot, &[], &mut rng(1)).unwrap();
    assert!(out.finished);
    assert_eq!(out.winner, Some(0));
    assert_eq!(game.status, GameStatus::Finished);
}

#[test]
fn lethal_tick_at_turn_start_finishes_for_the_other_side() {
    let mut game = card_duel_game([vec![], vec![]]);
    game.participants[1].hp = 1;
    cd_mut(&mut game, 1).statuses.add(
        StatusEffect::new(StatusKind::Burn, 2).with_params(StatusParams {
            tick_damage: 2,
            ..StatusParams::default()
        }),
    );
    let out = end_turn(&mut game, 0, &mut rng(1)).unwrap();
    assert!(out.finished);
    assert_eq!(out.winner, Some(0));
    assert_eq!(out.drawn, 0);
}
