//! Lobby lifecycle: create, join, host start, host end, delete gate.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::board::generate_board;
use crate::domain::card_duel::{start_card_duel, CARD_DUEL_SEATS};
use crate::domain::draft::begin_draft;
use crate::domain::log::LogAction;
use crate::domain::ordering::OrderingState;
use crate::domain::state::{
    DuelStyle, Game, GameId, GameMode, GameRules, GameStatus, Participant, ParticipantId,
    SurvivalDifficulty, UserId, BOARD_START_COINS, BOARD_START_HP,
};
use crate::domain::tiles::TileType;
use crate::errors::domain::{DomainError, ValidationKind};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_BOARD_LENGTH: usize = 200;
pub const MAX_SEATS: usize = 8;

/// Process-wide defaults a create request falls back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDefaults {
    pub board_length: usize,
    pub min_board_length: usize,
    pub max_players: usize,
    pub mass_warp_cap: usize,
    pub duel_style: DuelStyle,
}

impl Default for GameDefaults {
    fn default() -> Self {
        Self {
            board_length: 36,
            min_board_length: 8,
            max_players: 4,
            mass_warp_cap: 50,
            duel_style: DuelStyle::Prediction,
        }
    }
}

/// Create payload. Unset fields take the process defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub mode: GameMode,
    #[serde(default)]
    pub board_length: Option<usize>,
    #[serde(default)]
    pub max_players: Option<usize>,
    #[serde(default)]
    pub enabled_tiles: Option<Vec<TileType>>,
    #[serde(default)]
    pub difficulty: SurvivalDifficulty,
    #[serde(default)]
    pub duel_style: Option<DuelStyle>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            board_length: None,
            max_players: None,
            enabled_tiles: None,
            difficulty: SurvivalDifficulty::default(),
            duel_style: None,
            seed: None,
        }
    }
}

/// Validated creation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub mode: GameMode,
    pub board_length: usize,
    pub max_players: usize,
    pub rules: GameRules,
}

pub fn resolve_config(config: &GameConfig, defaults: &GameDefaults) -> Result<GameSettings, DomainError> {
    let board_length = config.board_length.unwrap_or(defaults.board_length);
    if board_length < defaults.min_board_length || board_length > MAX_BOARD_LENGTH {
        return Err(DomainError::validation(
            ValidationKind::InvalidConfig,
            format!(
                "board length {board_length} outside {}..={MAX_BOARD_LENGTH}",
                defaults.min_board_length
            ),
        ));
    }

    let max_players = if config.mode == GameMode::CardDuel {
        CARD_DUEL_SEATS
    } else {
        config.max_players.unwrap_or(defaults.max_players)
    };
    if !(MIN_PLAYERS..=MAX_SEATS).contains(&max_players) {
        return Err(DomainError::validation(
            ValidationKind::InvalidConfig,
            format!("max players {max_players} outside {MIN_PLAYERS}..={MAX_SEATS}"),
        ));
    }

    let enabled_tiles = match &config.enabled_tiles {
        Some(tiles) => {
            let mut tiles: Vec<TileType> = tiles
                .iter()
                .copied()
                .filter(|t| TileType::MIDDLE.contains(t))
                .collect();
            tiles.sort_by_key(|t| t.as_str());
            tiles.dedup();
            tiles
        }
        None => TileType::default_enabled(),
    };

    Ok(GameSettings {
        mode: config.mode,
        board_length,
        max_players,
        rules: GameRules {
            enabled_tiles,
            difficulty: config.difficulty,
            duel_style: config.duel_style.unwrap_or(defaults.duel_style),
            mass_warp_cap: defaults.mass_warp_cap,
        },
    })
}

/// A fresh game in Waiting with the host seated first.
pub fn new_game(id: GameId, join_code: String, host: UserId, settings: GameSettings, rng_seed: u64) -> Game {
    let mut game = Game {
        id,
        join_code,
        mode: settings.mode,
        status: GameStatus::Waiting,
        host,
        board_length: settings.board_length,
        max_players: settings.max_players,
        current_turn_index: 0,
        winner: None,
        rules: settings.rules,
        pending: None,
        ordering: None,
        tiles: Vec::new(),
        participants: vec![Participant::new(0, host, 0)],
        rng_seed,
        version: 0,
        next_card_id: 1,
        rounds_played: 0,
        log: Vec::new(),
    };
    game.push_log(LogAction::Create, Some(0), format!("{:?} game created", game.mode));
    game
}

fn require_host(game: &Game, user: UserId) -> Result<(), DomainError> {
    if game.host != user {
        return Err(DomainError::validation(
            ValidationKind::NotHost,
            format!("user {user} is not the host"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOutcome {
    pub participant: ParticipantId,
    pub seats_taken: usize,
    pub max_players: usize,
}

pub fn join(game: &mut Game, user: UserId) -> Result<JoinOutcome, DomainError> {
    game.require_status(GameStatus::Waiting, "join")?;
    if game.participant_for_user(user).is_some() {
        return Err(DomainError::validation(
            ValidationKind::AlreadyJoined,
            format!("user {user} already joined"),
        ));
    }
    if game.participants.len() >= game.max_players {
        return Err(DomainError::validation(
            ValidationKind::GameFull,
            format!("game is full ({} seats)", game.max_players),
        ));
    }
    let pid = game.participants.len() as ParticipantId;
    game.participants.push(Participant::new(pid, user, pid as usize));
    game.push_log(LogAction::Join, Some(pid), format!("user {user} joined"));
    Ok(JoinOutcome {
        participant: pid,
        seats_taken: game.participants.len(),
        max_players: game.max_players,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartOutcome {
    pub mode: GameMode,
    pub status: GameStatus,
    pub tiles: usize,
    pub participants: usize,
}

/// Host-only. Builds the board (board modes) and moves to the mode's
/// first phase: Ordering, Drafting, or straight to Active for Card-Duel.
pub fn start(game: &mut Game, user: UserId, rng: &mut impl Rng) -> Result<StartOutcome, DomainError> {
    game.require_status(GameStatus::Waiting, "start")?;
    require_host(game, user)?;
    if game.participants.len() < MIN_PLAYERS {
        return Err(DomainError::validation(
            ValidationKind::NotEnoughPlayers,
            format!("need at least {MIN_PLAYERS} participants"),
        ));
    }

    match game.mode {
        GameMode::FinishLine | GameMode::Survival | GameMode::Draft => {
            game.tiles = generate_board(
                game.mode,
                game.board_length,
                &game.rules.enabled_tiles,
                game.rules.difficulty,
                rng,
            );
            for p in game.participants.iter_mut() {
                p.position = 0;
                p.hp = BOARD_START_HP;
                p.coins = BOARD_START_COINS;
            }
            if game.mode == GameMode::Draft {
                begin_draft(game, rng);
            } else {
                let ids: Vec<ParticipantId> = game.participants.iter().map(|p| p.id).collect();
                game.ordering = Some(OrderingState::new(&ids));
                game.status = GameStatus::Ordering;
            }
        }
        GameMode::CardDuel => start_card_duel(game, rng),
    }

    game.push_log(LogAction::Start, None, format!("game started ({:?})", game.status));
    info!(game_id = game.id, mode = ?game.mode, status = ?game.status, "game started");
    Ok(StartOutcome {
        mode: game.mode,
        status: game.status,
        tiles: game.tiles.len(),
        participants: game.participants.len(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndOutcome {
    pub winner: Option<ParticipantId>,
}

/// Host force-end. A sole survivor is credited with the win.
pub fn end_game(game: &mut Game, user: UserId) -> Result<EndOutcome, DomainError> {
    require_host(game, user)?;
    game.require_status(GameStatus::Active, "end_game")?;
    let alive = game.alive_ids();
    let winner = match alive.as_slice() {
        [only] => Some(*only),
        _ => None,
    };
    game.finish(winner);
    Ok(EndOutcome { winner })
}

/// Only the host may delete, and never mid-play.
pub fn require_can_delete(game: &Game, user: UserId) -> Result<(), DomainError> {
    require_host(game, user)?;
    if game.status == GameStatus::Active {
        return Err(DomainError::validation(
            ValidationKind::GameActive,
            "cannot delete an active game",
        ));
    }
    Ok(())
}
