//! Domain-level error type used across the engine and services.
//!
//! This error type is transport- and storage-agnostic. Services return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::errors::ErrorCode;

/// Validation kinds: precondition and resource violations that reject an
/// operation without touching state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    // Lifecycle / gating
    PhaseMismatch,
    OutOfTurn,
    NotAParticipant,
    NotHost,
    ParticipantDead,
    NotEnoughPlayers,
    GameFull,
    AlreadyJoined,
    GameActive,
    // Pending interaction gating
    InteractionPending,
    NotInteractionOwner,
    NoPendingInteraction,
    InteractionPhaseMismatch,
    AlreadyCommitted,
    AlreadyPredicted,
    // Targets and payloads
    InvalidTarget,
    InvalidChoice,
    InvalidConfig,
    OfferNotAvailable,
    PickNotOffered,
    PicksComplete,
    PicksIncomplete,
    CardNotInHand,
    CardNotOwned,
    CardBlocked,
    CardSlotUsed,
    QuestionAlreadyChanged,
    // Resources
    InsufficientCoins,
    NoCardsAvailable,
    Other(String),
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DataCorruption,
    Other(String),
}

/// Domain-level not found entities (minimal set; extend as needed)
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Game,
    Participant,
    Card,
    Other(String),
}

/// Domain-level conflict kinds (extend as needed)
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    JoinCodeConflict,
    OptimisticLock,
    LockTimeout,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    /// Stable reason code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::PhaseMismatch => ErrorCode::PhaseMismatch,
                ValidationKind::OutOfTurn => ErrorCode::OutOfTurn,
                ValidationKind::NotAParticipant => ErrorCode::NotAParticipant,
                ValidationKind::NotHost => ErrorCode::NotHost,
                ValidationKind::ParticipantDead => ErrorCode::ParticipantDead,
                ValidationKind::NotEnoughPlayers => ErrorCode::NotEnoughPlayers,
                ValidationKind::GameFull => ErrorCode::GameFull,
                ValidationKind::AlreadyJoined => ErrorCode::AlreadyJoined,
                ValidationKind::GameActive => ErrorCode::GameActive,
                ValidationKind::InteractionPending => ErrorCode::InteractionPending,
                ValidationKind::NotInteractionOwner => ErrorCode::NotInteractionOwner,
                ValidationKind::NoPendingInteraction => ErrorCode::NoPendingInteraction,
                ValidationKind::InteractionPhaseMismatch => ErrorCode::InteractionPhaseMismatch,
                ValidationKind::AlreadyCommitted => ErrorCode::AlreadyCommitted,
                ValidationKind::AlreadyPredicted => ErrorCode::AlreadyPredicted,
                ValidationKind::InvalidTarget => ErrorCode::InvalidTarget,
                ValidationKind::InvalidChoice => ErrorCode::InvalidChoice,
                ValidationKind::InvalidConfig => ErrorCode::InvalidConfig,
                ValidationKind::OfferNotAvailable => ErrorCode::OfferNotAvailable,
                ValidationKind::PickNotOffered => ErrorCode::PickNotOffered,
                ValidationKind::PicksComplete => ErrorCode::PicksComplete,
                ValidationKind::PicksIncomplete => ErrorCode::PicksIncomplete,
                ValidationKind::CardNotInHand => ErrorCode::CardNotInHand,
                ValidationKind::CardNotOwned => ErrorCode::CardNotOwned,
                ValidationKind::CardBlocked => ErrorCode::CardBlocked,
                ValidationKind::CardSlotUsed => ErrorCode::CardSlotUsed,
                ValidationKind::QuestionAlreadyChanged => ErrorCode::QuestionAlreadyChanged,
                ValidationKind::InsufficientCoins => ErrorCode::InsufficientCoins,
                ValidationKind::NoCardsAvailable => ErrorCode::NoCardsAvailable,
                ValidationKind::Other(_) => ErrorCode::ValidationError,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::JoinCodeConflict => ErrorCode::JoinCodeConflict,
                ConflictKind::OptimisticLock => ErrorCode::OptimisticLock,
                ConflictKind::LockTimeout => ErrorCode::LockTimeout,
                ConflictKind::Other(_) => ErrorCode::Conflict,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Game => ErrorCode::GameNotFound,
                NotFoundKind::Participant => ErrorCode::ParticipantNotFound,
                NotFoundKind::Card => ErrorCode::CardNotFound,
                NotFoundKind::Other(_) => ErrorCode::NotFound,
            },
            DomainError::Infra(kind, _) => match kind {
                InfraErrorKind::Timeout => ErrorCode::Timeout,
                InfraErrorKind::DataCorruption => ErrorCode::DataCorruption,
                InfraErrorKind::Other(_) => ErrorCode::Internal,
            },
        }
    }

    /// Human-readable detail string.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::Validation(_, d)
            | DomainError::Conflict(_, d)
            | DomainError::NotFound(_, d)
            | DomainError::Infra(_, d) => d,
        }
    }
}
