use crate::domain::cards::{DuelCardCode, SupportCardCode};
use crate::domain::pending::{
    DuelChoice, DuelState, InteractionKind, PendingInteraction, PendingQuestion,
};
use crate::domain::questions::Question;
use crate::domain::snapshot::{snapshot, PendingDetail};
use crate::domain::state::{GameMode, GameStatus};
use crate::domain::test_state_helpers::{board_game, card_duel_game, safe_board};
use crate::domain::tiles::TileType;

fn question_game() -> crate::domain::state::Game {
    let mut game = safe_board(2, 10);
    game.pending = Some(PendingInteraction::Question(PendingQuestion {
        owner: 0,
        question: Question {
            prompt: "1 + 1 = ?".into(),
            choices: vec!["2".into(), "3".into(), "1".into(), "4".into()],
            correct_index: 0,
        },
        reward_coins: 2,
        changed_once: false,
    }));
    game
}

#[test]
fn owner_sees_question_but_never_the_answer() {
    let game = question_game();
    let snap = snapshot(&game, Some(100));
    let pending = snap.pending.unwrap();
    assert_eq!(pending.kind, InteractionKind::Question);
    assert!(matches!(pending.detail, Some(PendingDetail::Question { ref choices, .. }) if choices.len() == 4));

    let json = serde_json::to_string(&snapshot(&game, Some(100))).unwrap();
    assert!(!json.contains("correct_index"));
}

#[test]
fn others_see_an_opaque_active_flag() {
    let game = question_game();
    let snap = snapshot(&game, Some(101));
    let pending = snap.pending.unwrap();
    assert_eq!(pending.owner, 0);
    assert!(pending.active);
    assert!(pending.detail.is_none());

    let json = serde_json::to_value(snapshot(&game, None)).unwrap();
    assert_eq!(json["pending"], serde_json::json!({"kind": "question", "owner": 0, "active": true}));
}

#[test]
fn support_cards_are_private() {
    let mut game = safe_board(2, 10);
    game.grant_support_card(0, SupportCardCode::Heal).unwrap();
    let mine = snapshot(&game, Some(100));
    assert_eq!(mine.viewer.unwrap().support_cards.len(), 1);
    let theirs = snapshot(&game, Some(101));
    assert!(theirs.viewer.unwrap().support_cards.is_empty());
    assert_eq!(theirs.participants[0].unused_cards, 1);
    assert!(snapshot(&game, None).viewer.is_none());
}

#[test]
fn duel_commits_stay_private_until_reveal() {
    let mut game = safe_board(3, 10);
    let mut duel = DuelState::new(0);
    duel.opponent = Some(crate::domain::pending::DuelSide::new(1));
    duel.initiator.choice = Some(DuelChoice::Attack);
    duel.phase = crate::domain::pending::DuelPhase::Commit;
    game.pending = Some(PendingInteraction::Duel(duel));

    let Some(PendingDetail::Duel(view)) = snapshot(&game, Some(101)).pending.unwrap().detail else {
        panic!("opponent should see the duel");
    };
    assert_eq!(view.my_choice, None);
    assert!(view.initiator_committed);
    assert!(snapshot(&game, Some(102)).pending.unwrap().detail.is_none());
}

#[test]
fn card_duel_hand_only_for_its_owner() {
    let game = card_duel_game([vec![DuelCardCode::Poison, DuelCardCode::Burn], vec![]]);
    let mine = snapshot(&game, Some(200));
    assert_eq!(mine.viewer.unwrap().hand.len(), 2);
    let theirs = snapshot(&game, Some(201));
    assert!(theirs.viewer.unwrap().hand.is_empty());
    assert_eq!(theirs.participants[0].card_duel.as_ref().unwrap().hand_size, 2);
}

#[test]
fn leaderboard_only_once_finished() {
    let mut game = safe_board(3, 10);
    assert!(snapshot(&game, None).leaderboard.is_none());
    game.participants[2].position = 8;
    game.participants[1].position = 11;
    game.finish(Some(1));
    let board = snapshot(&game, None).leaderboard.unwrap();
    assert_eq!(board.iter().map(|e| e.participant).collect::<Vec<_>>(), vec![1, 2, 0]);
    assert_eq!(board[0].rank, 1);
    assert_eq!(snapshot(&game, None).status, GameStatus::Finished);
}

#[test]
fn survival_leaderboard_ranks_by_hp() {
    let mut game = board_game(GameMode::Survival, 3, &[TileType::Safe; 6]);
    game.participants[0].position = 6;
    game.participants[1].hp = 5;
    game.participants[2].hp = 4;
    let leader = game.ranked_leader();
    assert_eq!(leader, Some(1));
    game.finish(leader);
    let board = snapshot(&game, None).leaderboard.unwrap();
    assert_eq!(board.iter().map(|e| e.participant).collect::<Vec<_>>(), vec![1, 2, 0]);
}

#[test]
fn log_is_truncated_to_recent_entries() {
    let mut game = safe_board(2, 10);
    for i in 0..40 {
        game.push_log(crate::domain::log::LogAction::Move, Some(0), format!("m{i}"));
    }
    let log = snapshot(&game, None).log;
    assert_eq!(log.len(), crate::domain::log::SNAPSHOT_LOG_LEN);
    assert_eq!(log.last().map(|e| e.message.as_str()), Some("m39"));
}
