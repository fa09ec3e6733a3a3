//! Per-game result records.

use std::time::Duration;

use blitzquest::domain::snapshot::GameSnapshot;
use blitzquest::domain::state::{GameMode, ParticipantId};
use blitzquest::BotRunSummary;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SeatResult {
    pub participant: ParticipantId,
    pub rank: Option<usize>,
    pub alive: bool,
    pub position: usize,
    pub hp: u32,
    pub coins: u32,
}

/// One JSONL line.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game: u32,
    pub seed: u64,
    pub mode: GameMode,
    pub board_length: usize,
    pub finished: bool,
    pub stalled: bool,
    pub winner: Option<ParticipantId>,
    pub steps: usize,
    pub rejected: usize,
    pub version: u64,
    pub duration_ms: f64,
    pub seats: Vec<SeatResult>,
}

impl GameRecord {
    pub fn build(game: u32, seed: u64, view: &GameSnapshot, summary: &BotRunSummary, elapsed: Duration) -> Self {
        let rank_of = |pid: ParticipantId| {
            view.leaderboard
                .as_ref()
                .and_then(|board| board.iter().find(|e| e.participant == pid))
                .map(|e| e.rank)
        };
        Self {
            game,
            seed,
            mode: view.mode,
            board_length: view.tiles.len(),
            finished: summary.finished,
            stalled: summary.stalled,
            winner: summary.winner,
            steps: summary.steps,
            rejected: summary.rejected,
            version: summary.version,
            duration_ms: elapsed.as_secs_f64() * 1000.0,
            seats: view
                .participants
                .iter()
                .map(|p| SeatResult {
                    participant: p.id,
                    rank: rank_of(p.id),
                    alive: p.is_alive,
                    position: p.position,
                    hp: p.hp,
                    coins: p.coins,
                })
                .collect(),
        }
    }
}
