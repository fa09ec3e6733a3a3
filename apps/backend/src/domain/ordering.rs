//! Tie-broken dice rolls that settle the turn order before play starts.
//!
//! Each contender rolls once per round. Identical roll sequences re-roll in
//! the next round (only among themselves); everyone else is settled. Once
//! nobody is tied, sequences sort descending (lexicographic) into turn order.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::log::LogAction;
use crate::domain::state::{Game, GameStatus, ParticipantId};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingEntry {
    pub participant: ParticipantId,
    pub rolls: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingState {
    pub round: u32,
    pub entries: Vec<OrderingEntry>,
    /// Who must roll this round.
    pub contenders: Vec<ParticipantId>,
    /// Contenders who already rolled this round.
    pub rolled: Vec<ParticipantId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OrderingProgress {
    /// Round still open.
    Waiting { remaining: Vec<ParticipantId> },
    /// Round closed with ties; these re-roll.
    Reroll { round: u32, tied: Vec<ParticipantId> },
    /// Strict order found, first to act first.
    Resolved { order: Vec<ParticipantId> },
}

impl OrderingState {
    pub fn new(participants: &[ParticipantId]) -> Self {
        Self {
            round: 1,
            entries: participants
                .iter()
                .map(|&p| OrderingEntry {
                    participant: p,
                    rolls: Vec::new(),
                })
                .collect(),
            contenders: participants.to_vec(),
            rolled: Vec::new(),
        }
    }

    pub fn rolls_of(&self, pid: ParticipantId) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.participant == pid)
            .map(|e| e.rolls.as_slice())
    }

    pub fn record_roll(&mut self, pid: ParticipantId, value: u8) -> Result<OrderingProgress, DomainError> {
        if !self.contenders.contains(&pid) {
            return Err(DomainError::validation(
                ValidationKind::OutOfTurn,
                format!("participant {pid} does not roll in round {}", self.round),
            ));
        }
        if self.rolled.contains(&pid) {
            return Err(DomainError::validation(
                ValidationKind::AlreadyCommitted,
                format!("participant {pid} already rolled in round {}", self.round),
            ));
        }
        if let Some(entry) = self.entries.iter_mut().find(|e| e.participant == pid) {
            entry.rolls.push(value);
        }
        self.rolled.push(pid);

        let remaining: Vec<ParticipantId> = self
            .contenders
            .iter()
            .copied()
            .filter(|p| !self.rolled.contains(p))
            .collect();
        if !remaining.is_empty() {
            return Ok(OrderingProgress::Waiting { remaining });
        }
        Ok(self.close_round())
    }

    fn close_round(&mut self) -> OrderingProgress {
        let tied: Vec<ParticipantId> = self
            .contenders
            .iter()
            .copied()
            .filter(|&p| {
                let mine = self.rolls_of(p);
                self.contenders
                    .iter()
                    .any(|&q| q != p && self.rolls_of(q) == mine)
            })
            .collect();

        self.rolled.clear();
        if tied.is_empty() {
            self.contenders.clear();
            let mut sorted: Vec<&OrderingEntry> = self.entries.iter().collect();
            sorted.sort_by(|a, b| b.rolls.cmp(&a.rolls));
            return OrderingProgress::Resolved {
                order: sorted.into_iter().map(|e| e.participant).collect(),
            };
        }

        self.round += 1;
        self.contenders = tied.clone();
        OrderingProgress::Reroll {
            round: self.round,
            tied,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRollOutcome {
    pub participant: ParticipantId,
    pub value: u8,
    pub progress: OrderingProgress,
}

/// One ordering roll. On resolution assigns turn_order and goes Active.
pub fn roll_for_order(
    game: &mut Game,
    pid: ParticipantId,
    rng: &mut impl Rng,
) -> Result<OrderRollOutcome, DomainError> {
    game.require_status(GameStatus::Ordering, "roll_for_order")?;
    let value: u8 = rng.random_range(1..=6);
    let state = game.ordering.as_mut().ok_or_else(|| {
        DomainError::validation_other("Invariant violated: ordering state must be set (roll_for_order)")
    })?;
    let progress = state.record_roll(pid, value)?;

    game.push_log(
        LogAction::OrderRoll,
        Some(pid),
        format!("rolled {value} for turn order"),
    );

    if let OrderingProgress::Resolved { order } = &progress {
        for (idx, &p) in order.iter().enumerate() {
            game.participant_mut(p)?.turn_order = idx;
        }
        game.ordering = None;
        game.status = GameStatus::Active;
        game.current_turn_index = 0;
        game.push_log(LogAction::Start, None, "turn order settled");
    }

    Ok(OrderRollOutcome {
        participant: pid,
        value,
        progress,
    })
}
