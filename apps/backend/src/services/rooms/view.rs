//! What each viewer is allowed to see of a room.
//!
//! A seated viewer gets their own cards; everyone else's hand shows only as a
//! count. Spectators see no cards at all.

use serde::Serialize;
use time::OffsetDateTime;

use super::{unix_ms, ChatEntry, HandSummary, Room, RoomCode, RoomSettings, SeatSlot, BID_LOG_EXPOSED};
use crate::ai::BotLevel;
use crate::domain::bidding::{Bid, BidLogEntry, ContraLevel, Contract};
use crate::domain::melds::MeldAward;
use crate::domain::rules::TargetScore;
use crate::domain::tricks::{CompletedTrick, TrickPlay};
use crate::domain::{Card, Phase, Seat, Team};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeatOccupant {
    Empty,
    Human {
        player_id: String,
        name: String,
        avatar: Option<String>,
        connected: bool,
    },
    Bot {
        name: String,
        level: BotLevel,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatPublic {
    pub seat: Seat,
    #[serde(flatten)]
    pub occupant: SeatOccupant,
    pub ready: bool,
    pub card_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuctionView {
    pub turn: Seat,
    pub highest: Option<Bid>,
    pub highest_bidder: Option<Seat>,
    pub consecutive_passes: u8,
    pub contra: ContraLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomView {
    pub code: RoomCode,
    pub phase: Phase,
    pub settings: RoomSettings,
    pub seats: Vec<SeatPublic>,
    /// Viewer's own seat; `None` for spectators.
    pub you: Option<Seat>,
    /// Viewer's own cards.
    pub hand: Vec<Card>,
    pub legal_plays: Vec<Card>,
    pub dealer: Seat,
    pub turn: Option<Seat>,
    /// Unix milliseconds; advisory unless the room auto-plays.
    pub turn_deadline_ms: Option<i64>,
    pub totals: [u32; 2],
    pub target_score: TargetScore,
    pub hand_no: u32,
    pub auction: Option<AuctionView>,
    pub contract: Option<Contract>,
    pub trick: Vec<TrickPlay>,
    pub last_trick: Option<CompletedTrick>,
    pub tricks_won: [u8; 2],
    pub bid_log: Vec<BidLogEntry>,
    pub melds: Option<MeldAward>,
    pub belote: Option<Team>,
    pub last_settlement: Option<HandSummary>,
    pub winner: Option<Team>,
    pub spectators: usize,
    pub chat: Vec<ChatEntry>,
    pub revision: u64,
}

/// Listing entry for the lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummary {
    pub code: RoomCode,
    pub is_private: bool,
    pub phase: Phase,
    pub target_score: TargetScore,
    pub players: Vec<String>,
    pub open_seats: usize,
    pub spectators: usize,
    pub totals: [u32; 2],
    pub created_at_ms: i64,
}

fn occupant(slot: &SeatSlot) -> SeatOccupant {
    match slot {
        SeatSlot::Empty => SeatOccupant::Empty,
        SeatSlot::Human(h) => SeatOccupant::Human {
            player_id: h.player_id.clone(),
            name: h.name.clone(),
            avatar: h.avatar.clone(),
            connected: h.connected,
        },
        SeatSlot::Bot(b) => SeatOccupant::Bot {
            name: b.name.clone(),
            level: b.level,
        },
    }
}

impl Room {
    /// State as seen from `seat` (`None` for a spectator).
    pub fn view_for(&self, seat: Option<Seat>) -> RoomView {
        let hand = self.hand.as_ref();
        let seats = (0..4u8)
            .map(|s| SeatPublic {
                seat: s,
                occupant: occupant(&self.seats[s as usize]),
                ready: self.ready[s as usize],
                card_count: hand.map_or(0, |h| h.hands[s as usize].len()),
            })
            .collect();

        let auction = hand.filter(|h| h.is_bidding()).map(|h| AuctionView {
            turn: h.bidding.turn,
            highest: h.bidding.highest,
            highest_bidder: h.bidding.highest_bidder,
            consecutive_passes: h.bidding.consecutive_passes,
            contra: h.bidding.contra_level,
        });
        let bid_log = hand
            .map(|h| {
                let skip = h.bid_log.len().saturating_sub(BID_LOG_EXPOSED);
                h.bid_log[skip..].to_vec()
            })
            .unwrap_or_default();

        RoomView {
            code: self.code.clone(),
            phase: self.phase,
            settings: self.settings.clone(),
            seats,
            you: seat,
            hand: match (hand, seat) {
                (Some(h), Some(s)) => h.hands[s as usize].clone(),
                _ => Vec::new(),
            },
            legal_plays: seat.map(|s| self.legal_plays(s)).unwrap_or_default(),
            dealer: self.dealer,
            turn: self.seat_to_act(),
            turn_deadline_ms: self.turn_deadline.map(unix_ms),
            totals: self.totals,
            target_score: self.settings.target_score,
            hand_no: self.hand_no,
            auction,
            contract: hand.and_then(|h| h.contract),
            trick: hand.map(|h| h.trick.plays.clone()).unwrap_or_default(),
            last_trick: hand.and_then(|h| h.last_trick.clone()),
            tricks_won: hand.map_or([0, 0], |h| h.tricks_won),
            bid_log,
            melds: hand.filter(|h| !h.is_bidding()).map(|h| h.melds.clone()),
            belote: hand.and_then(|h| h.belote.scored),
            last_settlement: self.last_settlement.clone(),
            winner: self.winner,
            spectators: self.spectators.len(),
            chat: self.chat.iter().cloned().collect(),
            revision: self.revision,
        }
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            code: self.code.clone(),
            is_private: self.settings.is_private,
            phase: self.phase,
            target_score: self.settings.target_score,
            players: self
                .seats
                .iter()
                .filter_map(|s| s.name().map(str::to_string))
                .collect(),
            open_seats: self.open_seats(),
            spectators: self.spectators.len(),
            totals: self.totals,
            created_at_ms: unix_ms(self.created_at),
        }
    }

    /// Whether the room's deadline for the current turn has passed.
    pub fn deadline_passed(&self, now: OffsetDateTime) -> bool {
        self.turn_deadline.is_some_and(|d| now >= d)
    }
}
