//! Error codes surfaced to clients.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP problem documents and websocket `error` frames.

use core::fmt;

use serde::{Serialize, Serializer};

use super::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Room lookup / admission
    /// Room code does not exist (or was destroyed)
    NotFound,
    /// Private room password mismatch
    WrongPassword,
    /// No free seat and spectators disabled
    Full,
    /// Player is not seated in the room
    NotSeated,
    /// Unknown player identity
    PlayerNotFound,

    // Game intents
    /// Acting out of turn
    NotYourTurn,
    /// Bid outside range, not a raise, or mode disabled
    BadBid,
    /// Intent does not fit the current phase
    InvalidState,
    /// Card is not in the player's hand
    CardNotHeld,
    /// Card breaks follow-suit / trump / overtrump rules
    IllegalPlay,
    /// Card id could not be parsed
    ParseCard,

    // Configuration / protocol
    /// Room settings or rule toggles rejected
    BadConfig,
    /// Malformed request
    BadRequest,
    /// Unsupported protocol step (e.g. intent before hello)
    BadProtocol,

    /// Room code space exhausted
    Conflict,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::WrongPassword => "WRONG_PASSWORD",
            Self::Full => "FULL",
            Self::NotSeated => "NOT_SEATED",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::BadBid => "BAD_BID",
            Self::InvalidState => "INVALID_STATE",
            Self::CardNotHeld => "CARD_NOT_HELD",
            Self::IllegalPlay => "ILLEGAL_PLAY",
            Self::ParseCard => "PARSE_CARD",
            Self::BadConfig => "BAD_CONFIG",
            Self::BadRequest => "BAD_REQUEST",
            Self::BadProtocol => "BAD_PROTOCOL",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    pub const ALL: [ErrorCode; 17] = [
        Self::NotFound,
        Self::WrongPassword,
        Self::Full,
        Self::NotSeated,
        Self::PlayerNotFound,
        Self::NotYourTurn,
        Self::BadBid,
        Self::InvalidState,
        Self::CardNotHeld,
        Self::IllegalPlay,
        Self::ParseCard,
        Self::BadConfig,
        Self::BadRequest,
        Self::BadProtocol,
        Self::Conflict,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<&DomainError> for ErrorCode {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::NotYourTurn => Self::NotYourTurn,
                ValidationKind::BadBid => Self::BadBid,
                ValidationKind::InvalidState => Self::InvalidState,
                ValidationKind::CardNotHeld => Self::CardNotHeld,
                ValidationKind::IllegalPlay => Self::IllegalPlay,
                ValidationKind::WrongPassword => Self::WrongPassword,
                ValidationKind::NotSeated => Self::NotSeated,
                ValidationKind::BadConfig => Self::BadConfig,
                ValidationKind::ParseCard => Self::ParseCard,
                ValidationKind::Other(_) => Self::BadRequest,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Room => Self::NotFound,
                NotFoundKind::Player => Self::PlayerNotFound,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::RoomFull => Self::Full,
                ConflictKind::CodeExhausted => Self::Conflict,
            },
        }
    }
}
