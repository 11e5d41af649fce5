//! Domain-level error type used across the engine, the room lifecycle and the
//! websocket edge.
//!
//! This error type is HTTP- and transport-agnostic. Handlers convert it to
//! `crate::error::AppError` (HTTP) or to a `ServerMsg::Error` frame (WS) at the
//! edge; nothing below the edge knows about either.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Rule and input violations. Rejected to the requester only; the room is
/// left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    NotYourTurn,
    BadBid,
    InvalidState,
    CardNotHeld,
    IllegalPlay,
    WrongPassword,
    NotSeated,
    BadConfig,
    ParseCard,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Room,
    Player,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    RoomFull,
    CodeExhausted,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input/user validation or game rule violation
    Validation(ValidationKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Semantic conflict (room full, code space exhausted)
    Conflict(ConflictKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
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

    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }

    pub fn not_your_turn() -> Self {
        Self::validation(ValidationKind::NotYourTurn, "Not your turn")
    }

    pub fn invalid_state(detail: impl Into<String>) -> Self {
        Self::validation(ValidationKind::InvalidState, detail)
    }

    pub fn bad_bid(detail: impl Into<String>) -> Self {
        Self::validation(ValidationKind::BadBid, detail)
    }

    /// Detail string without the kind prefix, for client-facing messages.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::Validation(_, d)
            | DomainError::NotFound(_, d)
            | DomainError::Conflict(_, d) => d,
        }
    }
}
