//! Bot trait and the action vocabulary bots speak.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::cards::{DuelCardCode, SupportCardCode};
use crate::domain::pending::{DuelChoice, DuelReward};
use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::{CardInstanceId, ParticipantId};
use crate::error::AppError;

/// Errors that can occur during bot decision-making.
#[derive(Debug)]
pub enum AiError {
    /// Bot encountered an internal error
    Internal(String),
    /// Bot produced an invalid move
    InvalidMove(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::Internal(msg) => write!(f, "bot internal error: {msg}"),
            AiError::InvalidMove(msg) => write!(f, "bot invalid move: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        AppError::internal(format!("bot error: {err}"))
    }
}

/// One game operation, as a value. Mirrors the service surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BotAction {
    RollForOrder,
    Roll,
    UseSupportCard {
        card_id: CardInstanceId,
        target: Option<ParticipantId>,
    },
    AnswerQuestion {
        choice: Option<usize>,
    },
    ShopBuy {
        code: SupportCardCode,
    },
    ShopSell {
        card_id: CardInstanceId,
    },
    ShopClose,
    GunAttack {
        target: ParticipantId,
    },
    GunSkip,
    DuelChooseOpponent {
        opponent: ParticipantId,
    },
    DuelCommit {
        choice: DuelChoice,
    },
    DuelPredict {
        prediction: DuelChoice,
    },
    DuelChooseReward {
        reward: DuelReward,
    },
    DuelTimeout,
    DraftPick {
        code: SupportCardCode,
    },
    PickStartingCard {
        code: DuelCardCode,
    },
    PlayCard {
        code: DuelCardCode,
        discard: Vec<DuelCardCode>,
    },
    EndTurn,
}

/// Trait for bot players.
///
/// Implementations receive the snapshot their own participant sees and
/// return the action to take, or None when nothing is theirs to do.
pub trait AiPlayer: Send + Sync {
    fn choose_action(&self, view: &GameSnapshot) -> Result<Option<BotAction>, AiError>;
}
