//! Error codes for the BlitzQuest engine.
//!
//! This module defines all reason codes the engine can report. Add new codes
//! here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings a
//! transport layer puts on the wire.

use core::fmt;

use serde::{Serialize, Serializer};

/// Centralized, stable rejection reason codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lifecycle / gating
    /// Operation not valid for the game's current status
    PhaseMismatch,
    /// Not the acting participant's turn
    OutOfTurn,
    /// Caller is not seated in this game
    NotAParticipant,
    /// Host-only operation called by someone else
    NotHost,
    /// Acting or targeted participant is eliminated
    ParticipantDead,
    /// Not enough participants to start
    NotEnoughPlayers,
    /// No free seats left
    GameFull,
    /// User already seated in this game
    AlreadyJoined,
    /// Operation forbidden while the game is active
    GameActive,

    // Pending interaction gating
    /// Caller must resolve their own pending interaction first
    InteractionPending,
    /// A pending interaction belongs to someone else
    NotInteractionOwner,
    /// No pending interaction of the required kind
    NoPendingInteraction,
    /// Pending interaction is in a different phase
    InteractionPhaseMismatch,
    /// Duel choice already committed
    AlreadyCommitted,
    /// Duel prediction already submitted
    AlreadyPredicted,

    // Request validation
    /// Target participant is invalid (self, dead, not seated)
    InvalidTarget,
    /// Choice out of range or not allowed
    InvalidChoice,
    /// Game configuration is invalid
    InvalidConfig,
    /// Shop offer not available
    OfferNotAvailable,
    /// Picked card was not among the dealt options
    PickNotOffered,
    /// All picks already made
    PicksComplete,
    /// Picks must be completed first
    PicksIncomplete,
    /// Card not in hand
    CardNotInHand,
    /// Card instance not owned or already used
    CardNotOwned,
    /// Card blocked by a status effect
    CardBlocked,
    /// Card slot for this category already used this turn
    CardSlotUsed,
    /// Question was already swapped once
    QuestionAlreadyChanged,
    /// General validation error
    ValidationError,

    // Resources
    /// Not enough coins
    InsufficientCoins,
    /// No usable cards
    NoCardsAvailable,

    // Resource Not Found
    /// Game not found
    GameNotFound,
    /// Participant not found
    ParticipantNotFound,
    /// Card not found
    CardNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Join code already exists
    JoinCodeConflict,
    /// Optimistic lock conflict
    OptimisticLock,
    /// Could not acquire the per-game lock in time
    LockTimeout,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Operation timed out
    Timeout,
    /// Internal error
    Internal,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::NotAParticipant => "NOT_A_PARTICIPANT",
            Self::NotHost => "NOT_HOST",
            Self::ParticipantDead => "PARTICIPANT_DEAD",
            Self::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            Self::GameFull => "GAME_FULL",
            Self::AlreadyJoined => "ALREADY_JOINED",
            Self::GameActive => "GAME_ACTIVE",

            Self::InteractionPending => "INTERACTION_PENDING",
            Self::NotInteractionOwner => "NOT_INTERACTION_OWNER",
            Self::NoPendingInteraction => "NO_PENDING_INTERACTION",
            Self::InteractionPhaseMismatch => "INTERACTION_PHASE_MISMATCH",
            Self::AlreadyCommitted => "ALREADY_COMMITTED",
            Self::AlreadyPredicted => "ALREADY_PREDICTED",

            Self::InvalidTarget => "INVALID_TARGET",
            Self::InvalidChoice => "INVALID_CHOICE",
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::OfferNotAvailable => "OFFER_NOT_AVAILABLE",
            Self::PickNotOffered => "PICK_NOT_OFFERED",
            Self::PicksComplete => "PICKS_COMPLETE",
            Self::PicksIncomplete => "PICKS_INCOMPLETE",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::CardNotOwned => "CARD_NOT_OWNED",
            Self::CardBlocked => "CARD_BLOCKED",
            Self::CardSlotUsed => "CARD_SLOT_USED",
            Self::QuestionAlreadyChanged => "QUESTION_ALREADY_CHANGED",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::InsufficientCoins => "INSUFFICIENT_COINS",
            Self::NoCardsAvailable => "NO_CARDS_AVAILABLE",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::ParticipantNotFound => "PARTICIPANT_NOT_FOUND",
            Self::CardNotFound => "CARD_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::JoinCodeConflict => "JOIN_CODE_CONFLICT",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::LockTimeout => "LOCK_TIMEOUT",
            Self::Conflict => "CONFLICT",

            Self::Timeout => "TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
