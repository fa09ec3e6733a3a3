//! Test-only game builders for domain unit tests.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::card_duel::{CardDuelState, CARD_DUEL_START_HP, MAX_PICKS};
use crate::domain::cards::{duel_deck_codes, DuelCardCode};
use crate::domain::lobby::{new_game, resolve_config, GameConfig, GameDefaults};
use crate::domain::state::{Game, GameMode, GameStatus, Participant, ParticipantId};
use crate::domain::tiles::{Tile, TileType};

pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Active board game, turn order = join order, participant 0 to act.
/// Tiles: Start, then `middle`, then Finish (Portal for Survival).
pub fn board_game(mode: GameMode, players: usize, middle: &[TileType]) -> Game {
    let settings = resolve_config(&GameConfig::new(mode), &GameDefaults::default())
        .expect("default config resolves");
    let mut game = new_game(1, "TESTCODE".into(), 100, settings, 42);
    game.max_players = players.max(2);
    for i in 1..players {
        game.participants
            .push(Participant::new(i as ParticipantId, 100 + i as i64, i));
    }

    let mut tiles = vec![Tile::plain(0, TileType::Start, "Start")];
    for (i, &t) in middle.iter().enumerate() {
        tiles.push(Tile::plain(i + 1, t, ""));
    }
    let end = if mode == GameMode::Survival {
        TileType::Portal
    } else {
        TileType::Finish
    };
    tiles.push(Tile::plain(middle.len() + 1, end, ""));
    game.board_length = tiles.len();
    game.tiles = tiles;
    game.status = GameStatus::Active;
    game
}

/// `n` plain Safe tiles between Start and Finish.
pub fn safe_board(players: usize, safe_tiles: usize) -> Game {
    board_game(GameMode::FinishLine, players, &vec![TileType::Safe; safe_tiles])
}

/// Active two-seat Card-Duel with picks finished and the given hands.
/// Participant 0 acts first; decks hold the rest of the catalog.
pub fn card_duel_game(hands: [Vec<DuelCardCode>; 2]) -> Game {
    let settings = resolve_config(&GameConfig::new(GameMode::CardDuel), &GameDefaults::default())
        .expect("default config resolves");
    let mut game = new_game(2, "DUELCODE".into(), 200, settings, 7);
    game.participants.push(Participant::new(1, 201, 1));
    for (p, hand) in game.participants.iter_mut().zip(hands) {
        p.hp = CARD_DUEL_START_HP;
        let mut deck = duel_deck_codes();
        for c in &hand {
            if let Some(i) = deck.iter().position(|d| d == c) {
                deck.remove(i);
            }
        }
        p.card_duel = Some(CardDuelState {
            deck,
            hand,
            picks_done: MAX_PICKS,
            ..CardDuelState::default()
        });
    }
    game.status = GameStatus::Active;
    game
}

pub fn cd(game: &Game, pid: ParticipantId) -> &CardDuelState {
    game.participants[pid as usize]
        .card_duel
        .as_ref()
        .expect("card duel state")
}

pub fn cd_mut(game: &mut Game, pid: ParticipantId) -> &mut CardDuelState {
    game.participants[pid as usize]
        .card_duel
        .as_mut()
        .expect("card duel state")
}
