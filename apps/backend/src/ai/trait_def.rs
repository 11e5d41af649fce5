//! Bot player trait definition.

use std::fmt;

use crate::domain::bidding::Bid;
use crate::domain::player_view::SeatView;
use crate::domain::Card;
use crate::error::AppError;

/// Errors that can occur during bot decision-making.
#[derive(Debug)]
pub enum AiError {
    /// Bot encountered an internal error
    Internal(String),
    /// Bot could not find a legal move
    InvalidMove(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::Internal(msg) => write!(f, "AI internal error: {msg}"),
            AiError::InvalidMove(msg) => write!(f, "AI invalid move: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        AppError::internal(format!("AI error: {err}"))
    }
}

/// What a bot does on its auction turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidDecision {
    Bid(Bid),
    Pass,
}

/// Trait for bot players.
///
/// Implementations receive the [`SeatView`] of their seat and must choose a
/// legal action. Plays must come from `view.legal_plays`; the room submits
/// the decision through the same path a human intent takes.
pub trait AiPlayer: Send + Sync {
    /// Bid or pass. Only called while the auction is running.
    fn choose_bid(&self, view: &SeatView) -> Result<BidDecision, AiError>;

    /// Choose a card to play. Only called when it is this seat's turn.
    fn choose_play(&self, view: &SeatView) -> Result<Card, AiError>;
}
