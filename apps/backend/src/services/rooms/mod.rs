//! Rooms: the authoritative per-table state and its lifecycle.
//!
//! [`Room`] is a plain synchronous state machine. It is owned by exactly one
//! [`actor::RoomActor`], which serializes every mutation (human intents, bot
//! moves, timer expiries) onto its mailbox. Everything here takes `now` as a
//! parameter so it can be driven deterministically from tests.

pub mod actor;
pub mod player_actions;
pub mod registry;
pub mod round_lifecycle;
pub mod seats;
pub mod view;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ai::BotLevel;
use crate::domain::hand::HandState;
use crate::domain::rules::{RuleConfig, TargetScore};
use crate::domain::scoring::SettlementResult;
use crate::domain::{Contract, Phase, Seat, Team};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::services::identity::PlayerId;

pub type RoomCode = String;

pub const MIN_TURN_SECONDS: u32 = 5;
pub const MAX_TURN_SECONDS: u32 = 120;
pub const MAX_PASSWORD_CHARS: usize = 32;
pub const CHAT_HISTORY: usize = 100;
pub const CHAT_MAX_CHARS: usize = 300;
pub const BID_LOG_EXPOSED: usize = 30;

/// Per-room settings chosen by the creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomSettings {
    pub target_score: TargetScore,
    /// Advisory turn timer shown to clients.
    pub turn_seconds: u32,
    pub is_private: bool,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Refill a seat vacated by grace expiry with a bot.
    pub bot_backfill: bool,
    pub allow_spectators: bool,
    pub rules: RuleConfig,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            target_score: TargetScore::default(),
            turn_seconds: 20,
            is_private: false,
            password: None,
            bot_backfill: false,
            allow_spectators: true,
            rules: RuleConfig::default(),
        }
    }
}

impl RoomSettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(MIN_TURN_SECONDS..=MAX_TURN_SECONDS).contains(&self.turn_seconds) {
            return Err(DomainError::validation(
                ValidationKind::BadConfig,
                format!("turn_seconds must be {MIN_TURN_SECONDS}..={MAX_TURN_SECONDS}"),
            ));
        }
        let password = self.password.as_deref().unwrap_or("");
        if password.chars().count() > MAX_PASSWORD_CHARS {
            return Err(DomainError::validation(
                ValidationKind::BadConfig,
                "Password is too long",
            ));
        }
        if self.is_private && password.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::BadConfig,
                "Private rooms need a password",
            ));
        }
        self.rules.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatedHuman {
    pub player_id: PlayerId,
    pub name: String,
    pub avatar: Option<String>,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatedBot {
    pub name: String,
    pub level: BotLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SeatSlot {
    #[default]
    Empty,
    Human(SeatedHuman),
    Bot(SeatedBot),
}

impl SeatSlot {
    pub fn is_empty(&self) -> bool {
        matches!(self, SeatSlot::Empty)
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, SeatSlot::Bot(_))
    }

    pub fn player_id(&self) -> Option<&str> {
        match self {
            SeatSlot::Human(h) => Some(&h.player_id),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            SeatSlot::Human(h) => Some(&h.name),
            SeatSlot::Bot(b) => Some(&b.name),
            SeatSlot::Empty => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spectator {
    pub player_id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub text: String,
    /// Unix milliseconds.
    pub at_ms: i64,
}

/// Broadcast once per settled hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandSummary {
    pub hand_no: u32,
    pub contract: Contract,
    pub raw: [u32; 2],
    pub awarded: [u32; 2],
    pub made: bool,
    pub tricks_won: [u8; 2],
    pub card_points: [u16; 2],
    pub meld_points: [u16; 2],
    pub belote_points: [u16; 2],
    pub totals: [u32; 2],
    /// Set when this hand ended the match. `None` on a tie.
    pub winner: Option<Team>,
    pub match_over: bool,
}

impl HandSummary {
    pub(crate) fn from_result(
        hand_no: u32,
        settlement: &crate::domain::scoring::HandSettlement,
        result: &SettlementResult,
        totals: [u32; 2],
    ) -> Self {
        Self {
            hand_no,
            contract: settlement.contract,
            raw: result.raw,
            awarded: result.awarded,
            made: result.made,
            tricks_won: settlement.tricks_won,
            card_points: settlement.card_points,
            meld_points: settlement.meld_points,
            belote_points: settlement.belote_points,
            totals,
            winner: None,
            match_over: false,
        }
    }
}

/// One table: four seats, spectators, running totals and the current hand.
#[derive(Debug, Clone)]
pub struct Room {
    pub code: RoomCode,
    pub settings: RoomSettings,
    pub created_at: OffsetDateTime,
    pub phase: Phase,
    pub seats: [SeatSlot; 4],
    pub spectators: Vec<Spectator>,
    pub ready: [bool; 4],
    pub dealer: Seat,
    pub totals: [u32; 2],
    pub hand: Option<HandState>,
    /// Hands started this match. Redeals do not count.
    pub hand_no: u32,
    /// Deals made in this room, redeals included. Feeds seed derivation.
    pub deal_no: u32,
    pub seed: u64,
    pub last_settlement: Option<HandSummary>,
    pub winner: Option<Team>,
    pub chat: VecDeque<ChatEntry>,
    pub turn_deadline: Option<OffsetDateTime>,
    /// Bumped on every accepted mutation; stale timers compare against it.
    pub revision: u64,
}

impl Room {
    pub fn new(
        code: RoomCode,
        settings: RoomSettings,
        seed: u64,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        settings.validate()?;
        Ok(Self {
            code,
            settings,
            created_at: now,
            phase: Phase::Lobby,
            seats: Default::default(),
            spectators: Vec::new(),
            ready: [false; 4],
            dealer: 0,
            totals: [0, 0],
            hand: None,
            hand_no: 0,
            deal_no: 0,
            seed,
            last_settlement: None,
            winner: None,
            chat: VecDeque::new(),
            turn_deadline: None,
            revision: 0,
        })
    }

    pub fn seat_of(&self, player_id: &str) -> Option<Seat> {
        self.seats
            .iter()
            .position(|s| s.player_id() == Some(player_id))
            .map(|i| i as Seat)
    }

    pub fn is_spectator(&self, player_id: &str) -> bool {
        self.spectators.iter().any(|s| s.player_id == player_id)
    }

    pub fn open_seats(&self) -> usize {
        self.seats.iter().filter(|s| s.is_empty()).count()
    }

    pub fn human_count(&self) -> usize {
        self.seats.iter().filter(|s| s.player_id().is_some()).count()
    }

    /// Nobody human is left: no seated players, no spectators. Bots alone do
    /// not keep a room alive.
    pub fn is_abandoned(&self) -> bool {
        self.human_count() == 0 && self.spectators.is_empty()
    }

    pub(crate) fn touch(&mut self) {
        self.revision += 1;
    }
}

pub(crate) fn unix_ms(t: OffsetDateTime) -> i64 {
    (t.unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests_play;
