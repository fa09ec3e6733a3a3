// apps/backend/src/domain/game_transition.rs

use serde::Serialize;

use crate::domain::state::{Game, GameStatus, ParticipantId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLifecycleView {
    pub version: u64,
    pub turn: Option<ParticipantId>,
    pub status: GameStatus,
    pub seated: usize,
}

impl GameLifecycleView {
    pub fn of(game: &Game) -> Self {
        Self {
            version: game.version,
            turn: game.current_participant_id(),
            status: game.status,
            seated: game.participants.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameTransition {
    /// Edge-triggered: the turn became a specific participant.
    TurnBecame { participant: ParticipantId },

    /// Edge-triggered: Game left Waiting for Ordering/Drafting/Active.
    GameStarted,

    /// Edge-triggered: Game moved to Finished.
    GameEnded,

    /// A seat was taken.
    PlayerJoined { participant: ParticipantId },
}

/// Derive domain transitions from before/after lifecycle state.
pub fn derive_game_transitions(
    before: &GameLifecycleView,
    after: &GameLifecycleView,
) -> Vec<GameTransition> {
    let mut transitions = Vec::new();

    for seat in before.seated..after.seated {
        transitions.push(GameTransition::PlayerJoined {
            participant: seat as ParticipantId,
        });
    }

    if before.status == GameStatus::Waiting
        && after.status != GameStatus::Waiting
        && after.status != GameStatus::Finished
    {
        transitions.push(GameTransition::GameStarted);
    }

    if let Some(participant) = after.turn {
        if before.turn != Some(participant) {
            transitions.push(GameTransition::TurnBecame { participant });
        }
    }

    if before.status != GameStatus::Finished && after.status == GameStatus::Finished {
        transitions.push(GameTransition::GameEnded);
    }

    transitions
}
