//! The game-level pending interaction: at most one lives on a game, and its
//! holder overrides normal turn gating until it is resolved.

use serde::{Deserialize, Serialize};

use crate::domain::cards::SupportCardCode;
use crate::domain::questions::Question;
use crate::domain::state::ParticipantId;
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingQuestion {
    pub owner: ParticipantId,
    pub question: Question,
    pub reward_coins: u32,
    pub changed_once: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopOffer {
    pub code: SupportCardCode,
    pub cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingShop {
    pub owner: ParticipantId,
    pub offers: Vec<ShopOffer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingGun {
    pub owner: ParticipantId,
    pub damage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelPhase {
    ChooseOpponent,
    Commit,
    Predict,
    WinnerChoice,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelChoice {
    Attack,
    Defend,
    Bluff,
}

impl DuelChoice {
    /// attack beats bluff, bluff beats defend, defend beats attack.
    pub fn beats(self, other: DuelChoice) -> bool {
        matches!(
            (self, other),
            (DuelChoice::Attack, DuelChoice::Bluff)
                | (DuelChoice::Bluff, DuelChoice::Defend)
                | (DuelChoice::Defend, DuelChoice::Attack)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelReward {
    Coins,
    Hp,
    PushBack,
    StealCard,
}

/// One side of a prediction duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelSide {
    pub participant: ParticipantId,
    pub choice: Option<DuelChoice>,
    pub prediction: Option<DuelChoice>,
}

impl DuelSide {
    pub fn new(participant: ParticipantId) -> Self {
        Self {
            participant,
            choice: None,
            prediction: None,
        }
    }
}

/// Public once both sides predicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelReveal {
    pub initiator_choice: DuelChoice,
    pub opponent_choice: DuelChoice,
    pub initiator_prediction: DuelChoice,
    pub opponent_prediction: DuelChoice,
    pub initiator_score: u8,
    pub opponent_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelState {
    pub phase: DuelPhase,
    pub initiator: DuelSide,
    pub opponent: Option<DuelSide>,
    pub reveal: Option<DuelReveal>,
    pub winner: Option<ParticipantId>,
    pub loser: Option<ParticipantId>,
}

impl DuelState {
    pub fn new(initiator: ParticipantId) -> Self {
        Self {
            phase: DuelPhase::ChooseOpponent,
            initiator: DuelSide::new(initiator),
            opponent: None,
            reveal: None,
            winner: None,
            loser: None,
        }
    }

    pub fn is_duelist(&self, pid: ParticipantId) -> bool {
        self.initiator.participant == pid
            || self.opponent.map(|o| o.participant) == Some(pid)
    }

    pub fn side_mut(&mut self, pid: ParticipantId) -> Option<&mut DuelSide> {
        if self.initiator.participant == pid {
            return Some(&mut self.initiator);
        }
        self.opponent.as_mut().filter(|o| o.participant == pid)
    }

    pub fn side(&self, pid: ParticipantId) -> Option<&DuelSide> {
        if self.initiator.participant == pid {
            return Some(&self.initiator);
        }
        self.opponent.as_ref().filter(|o| o.participant == pid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Question,
    Shop,
    Duel,
    Gun,
}

/// Tagged union: one case per interaction kind, each with only its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingInteraction {
    Question(PendingQuestion),
    Shop(PendingShop),
    Duel(DuelState),
    Gun(PendingGun),
}

impl PendingInteraction {
    pub fn kind(&self) -> InteractionKind {
        match self {
            PendingInteraction::Question(_) => InteractionKind::Question,
            PendingInteraction::Shop(_) => InteractionKind::Shop,
            PendingInteraction::Duel(_) => InteractionKind::Duel,
            PendingInteraction::Gun(_) => InteractionKind::Gun,
        }
    }

    /// The participant the turn index is pinned to.
    pub fn owner(&self) -> ParticipantId {
        match self {
            PendingInteraction::Question(q) => q.owner,
            PendingInteraction::Shop(s) => s.owner,
            PendingInteraction::Duel(d) => d.initiator.participant,
            PendingInteraction::Gun(g) => g.owner,
        }
    }

    /// Everyone allowed to act on it (duels have two).
    pub fn involves(&self, pid: ParticipantId) -> bool {
        match self {
            PendingInteraction::Duel(d) => d.is_duelist(pid),
            other => other.owner() == pid,
        }
    }
}

/// Reject a new turn action while any interaction is pending.
pub fn require_no_pending(
    pending: &Option<PendingInteraction>,
    actor: ParticipantId,
) -> Result<(), DomainError> {
    match pending {
        None => Ok(()),
        Some(p) if p.involves(actor) => Err(DomainError::validation(
            ValidationKind::InteractionPending,
            format!("resolve your pending {:?} first", p.kind()),
        )),
        Some(p) => Err(DomainError::validation(
            ValidationKind::NotInteractionOwner,
            format!("participant {} holds a pending {:?}", p.owner(), p.kind()),
        )),
    }
}

fn no_pending(kind: InteractionKind) -> DomainError {
    DomainError::validation(
        ValidationKind::NoPendingInteraction,
        format!("no pending {kind:?}"),
    )
}

fn not_owner(kind: InteractionKind) -> DomainError {
    DomainError::validation(
        ValidationKind::NotInteractionOwner,
        format!("pending {kind:?} belongs to someone else"),
    )
}

pub fn require_question(
    pending: &mut Option<PendingInteraction>,
    actor: ParticipantId,
) -> Result<&mut PendingQuestion, DomainError> {
    match pending.as_mut() {
        Some(PendingInteraction::Question(q)) if q.owner == actor => Ok(q),
        Some(PendingInteraction::Question(_)) => Err(not_owner(InteractionKind::Question)),
        _ => Err(no_pending(InteractionKind::Question)),
    }
}

pub fn require_shop(
    pending: &mut Option<PendingInteraction>,
    actor: ParticipantId,
) -> Result<&mut PendingShop, DomainError> {
    match pending.as_mut() {
        Some(PendingInteraction::Shop(s)) if s.owner == actor => Ok(s),
        Some(PendingInteraction::Shop(_)) => Err(not_owner(InteractionKind::Shop)),
        _ => Err(no_pending(InteractionKind::Shop)),
    }
}

pub fn require_gun(
    pending: &Option<PendingInteraction>,
    actor: ParticipantId,
) -> Result<PendingGun, DomainError> {
    match pending {
        Some(PendingInteraction::Gun(g)) if g.owner == actor => Ok(*g),
        Some(PendingInteraction::Gun(_)) => Err(not_owner(InteractionKind::Gun)),
        _ => Err(no_pending(InteractionKind::Gun)),
    }
}

/// Duel gate: the caller must be a duelist (or the initiator before an
/// opponent is chosen) and the duel must be in `phase`.
pub fn require_duel(
    pending: &mut Option<PendingInteraction>,
    actor: ParticipantId,
    phase: DuelPhase,
) -> Result<&mut DuelState, DomainError> {
    let duel = match pending.as_mut() {
        Some(PendingInteraction::Duel(d)) => d,
        _ => return Err(no_pending(InteractionKind::Duel)),
    };
    if !duel.is_duelist(actor) {
        return Err(not_owner(InteractionKind::Duel));
    }
    if duel.phase != phase {
        return Err(DomainError::validation(
            ValidationKind::InteractionPhaseMismatch,
            format!("duel is in {:?}, expected {phase:?}", duel.phase),
        ));
    }
    Ok(duel)
}
