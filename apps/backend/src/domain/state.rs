use serde::{Deserialize, Serialize};

use crate::domain::card_duel::CardDuelState;
use crate::domain::draft::DraftState;
use crate::domain::log::{GameLogEntry, LogAction};
use crate::domain::ordering::OrderingState;
use crate::domain::pending::PendingInteraction;
use crate::domain::tiles::{Tile, TileType};
use crate::domain::cards::SupportCardCode;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

pub type GameId = i64;
pub type UserId = i64;
/// Stable seat identifier: the participant's join index within its game.
pub type ParticipantId = u32;
pub type CardInstanceId = u64;

/// Starting values for board modes.
pub const BOARD_START_HP: u32 = 3;
pub const BOARD_START_COINS: u32 = 0;
/// Heals on the board never raise HP past this.
pub const BOARD_MAX_HP: u32 = 6;
/// Survival ends by ranking once this many full rounds have been played.
pub const SURVIVAL_ROUND_LIMIT: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    FinishLine,
    Survival,
    Draft,
    CardDuel,
}

impl GameMode {
    /// Modes played on a generated board.
    pub fn uses_board(self) -> bool {
        !matches!(self, GameMode::CardDuel)
    }
}

/// Overall game progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Lobby: accepting joins.
    Waiting,
    /// Participants roll to settle turn order.
    Ordering,
    /// Draft mode: participants pick support cards.
    Drafting,
    /// Main play.
    Active,
    /// Terminal.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurvivalDifficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// How a Duel tile resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelStyle {
    /// Opens the prediction duel sub-machine.
    #[default]
    Prediction,
    /// Coin-flip against a random living opponent.
    Instant,
}

/// Per-game rule knobs frozen at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    pub enabled_tiles: Vec<TileType>,
    pub difficulty: SurvivalDifficulty,
    pub duel_style: DuelStyle,
    pub mass_warp_cap: usize,
}

/// Support card owned by a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportCardInstance {
    pub id: CardInstanceId,
    pub code: SupportCardCode,
    pub is_used: bool,
}

/// A user's seat in a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub user_id: UserId,
    /// 0-based, unique within the game.
    pub turn_order: usize,
    pub hp: u32,
    pub coins: u32,
    pub position: usize,
    pub shield_points: u32,
    pub extra_rolls: u32,
    pub is_alive: bool,
    pub support_cards: Vec<SupportCardInstance>,
    pub draft: Option<DraftState>,
    pub card_duel: Option<CardDuelState>,
}

impl Participant {
    pub fn new(id: ParticipantId, user_id: UserId, turn_order: usize) -> Self {
        Self {
            id,
            user_id,
            turn_order,
            hp: BOARD_START_HP,
            coins: BOARD_START_COINS,
            position: 0,
            shield_points: 0,
            extra_rolls: 0,
            is_alive: true,
            support_cards: Vec::new(),
            draft: None,
            card_duel: None,
        }
    }

    pub fn unused_cards(&self) -> impl Iterator<Item = &SupportCardInstance> {
        self.support_cards.iter().filter(|c| !c.is_used)
    }

    pub fn has_unused_card(&self) -> bool {
        self.unused_cards().next().is_some()
    }
}

/// The aggregate root: one match and everything it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub join_code: String,
    pub mode: GameMode,
    pub status: GameStatus,
    pub host: UserId,
    pub board_length: usize,
    pub max_players: usize,
    /// Index into `turn_sequence()`.
    pub current_turn_index: usize,
    pub winner: Option<ParticipantId>,
    pub rules: GameRules,
    pub pending: Option<PendingInteraction>,
    pub ordering: Option<OrderingState>,
    pub tiles: Vec<Tile>,
    /// Join order; `participants[i].id == i`.
    pub participants: Vec<Participant>,
    pub rng_seed: u64,
    /// Bumped once per committed mutation.
    pub version: u64,
    pub next_card_id: CardInstanceId,
    /// Completed passes through the turn sequence.
    #[serde(default)]
    pub rounds_played: u32,
    pub log: Vec<GameLogEntry>,
}

impl Game {
    pub fn last_tile_index(&self) -> usize {
        self.tiles.len().saturating_sub(1)
    }

    pub fn clamp_position(&self, pos: i64) -> usize {
        pos.clamp(0, self.last_tile_index() as i64) as usize
    }

    pub fn tile_at(&self, pos: usize) -> Option<&Tile> {
        self.tiles.get(pos)
    }

    /// Participant ids ordered by `turn_order`.
    pub fn turn_sequence(&self) -> Vec<ParticipantId> {
        let mut seq: Vec<&Participant> = self.participants.iter().collect();
        seq.sort_by_key(|p| (p.turn_order, p.id));
        seq.into_iter().map(|p| p.id).collect()
    }

    pub fn current_participant_id(&self) -> Option<ParticipantId> {
        if self.status != GameStatus::Active {
            return None;
        }
        let seq = self.turn_sequence();
        if seq.is_empty() {
            return None;
        }
        seq.get(self.current_turn_index % seq.len()).copied()
    }

    pub fn turn_index_of(&self, pid: ParticipantId) -> Option<usize> {
        self.turn_sequence().iter().position(|&p| p == pid)
    }

    /// Keep the turn index on the holder of a pending interaction.
    pub fn pin_turn_to(&mut self, pid: ParticipantId) {
        if let Some(idx) = self.turn_index_of(pid) {
            self.current_turn_index = idx;
        }
    }

    pub fn alive_ids(&self) -> Vec<ParticipantId> {
        self.participants
            .iter()
            .filter(|p| p.is_alive)
            .map(|p| p.id)
            .collect()
    }

    pub fn participant(&self, pid: ParticipantId) -> Result<&Participant, DomainError> {
        self.participants.get(pid as usize).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Participant, format!("participant {pid}"))
        })
    }

    pub fn participant_mut(&mut self, pid: ParticipantId) -> Result<&mut Participant, DomainError> {
        self.participants.get_mut(pid as usize).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Participant, format!("participant {pid}"))
        })
    }

    pub fn participant_for_user(&self, user: UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user)
    }

    pub fn require_status(&self, expected: GameStatus, ctx: &'static str) -> Result<(), DomainError> {
        if self.status != expected {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!("{ctx}: game is {:?}, expected {expected:?}", self.status),
            ));
        }
        Ok(())
    }

    pub fn require_mode(&self, ok: bool, ctx: &'static str) -> Result<(), DomainError> {
        if !ok {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!("{ctx} not available in {:?} mode", self.mode),
            ));
        }
        Ok(())
    }

    pub fn require_alive(&self, pid: ParticipantId) -> Result<(), DomainError> {
        if !self.participant(pid)?.is_alive {
            return Err(DomainError::validation(
                ValidationKind::ParticipantDead,
                format!("participant {pid} is eliminated"),
            ));
        }
        Ok(())
    }

    pub fn require_turn(&self, pid: ParticipantId) -> Result<(), DomainError> {
        if self.current_participant_id() != Some(pid) {
            return Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                "Out of turn",
            ));
        }
        Ok(())
    }

    /// Reject a target that is missing, eliminated, or the actor itself.
    pub fn require_valid_target(
        &self,
        actor: ParticipantId,
        target: ParticipantId,
    ) -> Result<(), DomainError> {
        if actor == target {
            return Err(DomainError::validation(
                ValidationKind::InvalidTarget,
                "cannot target yourself",
            ));
        }
        match self.participants.get(target as usize) {
            Some(p) if p.is_alive => Ok(()),
            Some(_) => Err(DomainError::validation(
                ValidationKind::InvalidTarget,
                format!("participant {target} is eliminated"),
            )),
            None => Err(DomainError::validation(
                ValidationKind::InvalidTarget,
                format!("participant {target} is not seated"),
            )),
        }
    }

    pub fn alloc_card_id(&mut self) -> CardInstanceId {
        let id = self.next_card_id;
        self.next_card_id += 1;
        id
    }

    pub fn grant_support_card(&mut self, pid: ParticipantId, code: SupportCardCode) -> Result<CardInstanceId, DomainError> {
        let id = self.alloc_card_id();
        self.participant_mut(pid)?.support_cards.push(SupportCardInstance {
            id,
            code,
            is_used: false,
        });
        Ok(id)
    }

    pub fn push_log(
        &mut self,
        action: LogAction,
        participant: Option<ParticipantId>,
        message: impl Into<String>,
    ) {
        let seq = self.log.last().map(|e| e.seq + 1).unwrap_or(0);
        self.log.push(GameLogEntry {
            seq,
            version: self.version,
            action,
            participant,
            message: message.into(),
        });
    }

    /// Transition to Finished. Clears any pending interaction.
    pub fn finish(&mut self, winner: Option<ParticipantId>) {
        if self.status == GameStatus::Finished {
            return;
        }
        self.status = GameStatus::Finished;
        self.winner = winner;
        self.pending = None;
        let msg = match winner {
            Some(w) => format!("game over, participant {w} wins"),
            None => "game over, no winner".to_string(),
        };
        self.push_log(LogAction::GameEnd, winner, msg);
    }

    /// Finish the game if at most one participant is still alive.
    /// Returns true when the game is (now) finished.
    pub fn finish_if_last_standing(&mut self) -> bool {
        if self.status == GameStatus::Finished {
            return true;
        }
        let alive = self.alive_ids();
        if alive.len() <= 1 {
            self.finish(alive.first().copied());
            return true;
        }
        false
    }

    /// Best-placed living participant: most HP, then coins, then furthest
    /// along. A tie at the top has no leader.
    pub fn ranked_leader(&self) -> Option<ParticipantId> {
        let mut ranked: Vec<&Participant> = self.participants.iter().filter(|p| p.is_alive).collect();
        ranked.sort_by_key(|p| std::cmp::Reverse((p.hp, p.coins, p.position)));
        match ranked.as_slice() {
            [first, second, ..] if (first.hp, first.coins, first.position) == (second.hp, second.coins, second.position) => None,
            [first, ..] => Some(first.id),
            [] => None,
        }
    }

    /// Scan forward from the current index for the next living participant.
    /// Finishes the game when nobody can take a turn, or when Survival hits
    /// its round limit.
    pub fn advance_turn(&mut self) -> Option<ParticipantId> {
        if self.finish_if_last_standing() {
            return None;
        }
        let seq = self.turn_sequence();
        let n = seq.len();
        let mut idx = self.current_turn_index % n;
        for _ in 0..n {
            idx = (idx + 1) % n;
            if idx == 0 {
                self.rounds_played += 1;
                if self.mode == GameMode::Survival && self.rounds_played >= SURVIVAL_ROUND_LIMIT {
                    self.push_log(
                        LogAction::GameEnd,
                        None,
                        format!("round limit {SURVIVAL_ROUND_LIMIT} reached"),
                    );
                    let leader = self.ranked_leader();
                    self.finish(leader);
                    return None;
                }
            }
            let pid = seq[idx];
            if self.participants[pid as usize].is_alive {
                self.current_turn_index = idx;
                return Some(pid);
            }
        }
        self.finish(None);
        None
    }
}
