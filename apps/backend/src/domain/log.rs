use serde::{Deserialize, Serialize};

use crate::domain::state::ParticipantId;

/// How many entries a snapshot carries.
pub const SNAPSHOT_LOG_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    Create,
    Join,
    Start,
    OrderRoll,
    Roll,
    Move,
    TileEffect,
    QuestionStart,
    QuestionAnswer,
    Shop,
    DuelStart,
    DuelResult,
    Gun,
    DraftPick,
    CardUse,
    StatusTick,
    Elimination,
    GameEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLogEntry {
    pub seq: u64,
    pub version: u64,
    pub action: LogAction,
    pub participant: Option<ParticipantId>,
    pub message: String,
}
