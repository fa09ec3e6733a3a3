//! Seeded game fixtures.
//!
//! Games are created with a fixed RNG seed so every run replays the same
//! boards, dice and decks. Users are numbered from [`HOST_USER`] upward.

use std::time::Duration;

use blitzquest::domain::lobby::GameConfig;
use blitzquest::domain::state::{GameId, GameMode, GameStatus, UserId};
use blitzquest::{AppError, EngineConfig, GameFlowService};

pub const HOST_USER: UserId = 1000;

/// Engine config for tests: defaults with a short lock timeout.
pub fn test_config() -> EngineConfig {
    EngineConfig {
        lock_timeout: Duration::from_millis(500),
        ..EngineConfig::default()
    }
}

pub fn test_service() -> GameFlowService {
    GameFlowService::new(test_config())
}

pub fn seeded_config(mode: GameMode, seed: u64) -> GameConfig {
    GameConfig {
        seed: Some(seed),
        ..GameConfig::new(mode)
    }
}

/// A created game and the users seated in it, host first.
#[derive(Debug, Clone)]
pub struct SeatedGame {
    pub game_id: GameId,
    pub join_code: String,
    pub users: Vec<UserId>,
}

impl SeatedGame {
    pub fn host(&self) -> UserId {
        self.users[0]
    }
}

/// Create a game from `config` and fill it with `players` users.
pub async fn seat_players(
    service: &GameFlowService,
    config: &GameConfig,
    players: usize,
) -> Result<SeatedGame, AppError> {
    let created = service.create_game(HOST_USER, config)?;
    let mut users = vec![HOST_USER];
    for i in 1..players {
        let user = HOST_USER + i as UserId;
        let resp = service.join(created.game_id, user).await?;
        if let Err(rejection) = resp.outcome {
            return Err(AppError::invalid(rejection.code, rejection.detail));
        }
        users.push(user);
    }
    Ok(SeatedGame {
        game_id: created.game_id,
        join_code: created.join_code,
        users,
    })
}

/// Seat `players`, start, and settle turn order so the game is Active.
/// Draft games stop in Drafting.
pub async fn started_game(
    service: &GameFlowService,
    mode: GameMode,
    players: usize,
    seed: u64,
) -> Result<SeatedGame, AppError> {
    let seated = seat_players(service, &seeded_config(mode, seed), players).await?;
    let resp = service.start(seated.game_id, seated.host()).await?;
    if let Err(rejection) = resp.outcome {
        return Err(AppError::invalid(rejection.code, rejection.detail));
    }

    // Ordering re-rolls ties; bounded so a bug cannot hang a test.
    for _ in 0..200 {
        let view = service.get_public_state(seated.game_id, None).await?;
        if view.status != GameStatus::Ordering {
            break;
        }
        let Some(ordering) = view.ordering else {
            break;
        };
        for pid in ordering.contenders.iter().filter(|p| !ordering.rolled.contains(p)) {
            let user = seated.users[*pid as usize];
            service.roll_for_order(seated.game_id, user).await?;
        }
    }
    Ok(seated)
}
