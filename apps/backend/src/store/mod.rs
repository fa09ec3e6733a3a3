//! In-process game store: one slot per game id, each behind its own async
//! mutex, plus a join-code index.

pub mod txn;

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::domain::state::{Game, GameId};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::utils::join_code::normalize_join_code;

/// `None` marks a deleted game; holders of a stale `Arc` see it gone.
pub type GameSlot = Arc<Mutex<Option<Game>>>;

pub struct GameStore {
    games: DashMap<GameId, GameSlot>,
    codes: DashMap<String, GameId>,
    next_id: AtomicI64,
    lock_timeout: Duration,
}

impl GameStore {
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            games: DashMap::new(),
            codes: DashMap::new(),
            next_id: AtomicI64::new(1),
            lock_timeout,
        }
    }

    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    pub fn allocate_id(&self) -> GameId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Store a freshly created game and publish its join code. The slot is
    /// in place before the code resolves; a taken code stores nothing.
    pub fn insert(&self, game: Game) -> Result<(), AppError> {
        match self.codes.entry(normalize_join_code(&game.join_code)) {
            Entry::Occupied(_) => Err(DomainError::conflict(
                ConflictKind::JoinCodeConflict,
                format!("join code {} already in use", game.join_code),
            )
            .into()),
            Entry::Vacant(v) => {
                let game_id = game.id;
                info!(game_id, join_code = %game.join_code, "game stored");
                self.games.insert(game_id, Arc::new(Mutex::new(Some(game))));
                v.insert(game_id);
                Ok(())
            }
        }
    }

    pub fn release_code(&self, code: &str) {
        self.codes.remove(&normalize_join_code(code));
    }

    pub fn id_for_code(&self, code: &str) -> Option<GameId> {
        self.codes.get(&normalize_join_code(code)).map(|e| *e.value())
    }

    pub fn slot(&self, game_id: GameId) -> Result<GameSlot, AppError> {
        self.games
            .get(&game_id)
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| game_not_found(game_id))
    }

    /// Lock a game's slot, giving up after the configured timeout.
    pub async fn lock<'a>(
        &self,
        game_id: GameId,
        slot: &'a GameSlot,
    ) -> Result<MutexGuard<'a, Option<Game>>, AppError> {
        match tokio::time::timeout(self.lock_timeout, slot.lock()).await {
            Ok(guard) => Ok(guard),
            Err(_) => {
                debug!(game_id, timeout_ms = self.lock_timeout.as_millis() as u64, "game lock timed out");
                Err(DomainError::conflict(
                    ConflictKind::LockTimeout,
                    format!("game {game_id} is busy, retry"),
                )
                .into())
            }
        }
    }

    /// Consistent copy of the current aggregate.
    pub async fn load(&self, game_id: GameId) -> Result<Game, AppError> {
        let slot = self.slot(game_id)?;
        let guard = self.lock(game_id, &slot).await?;
        guard.clone().ok_or_else(|| game_not_found(game_id))
    }

    /// Drop the index entries for a game whose slot was already emptied.
    pub(crate) fn forget(&self, game_id: GameId, join_code: &str) {
        self.games.remove(&game_id);
        self.release_code(join_code);
        info!(game_id, "game removed");
    }

    pub fn game_ids(&self) -> Vec<GameId> {
        let mut ids: Vec<GameId> = self.games.iter().map(|e| *e.key()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

pub(crate) fn game_not_found(game_id: GameId) -> AppError {
    DomainError::not_found(NotFoundKind::Game, format!("game {game_id}")).into()
}
