use serde::{Deserialize, Serialize};

pub type Seat = u8; // 0..=3

/// Room-level phases. A hand lives from BIDDING through SCORING.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Waiting for four ready seats.
    Lobby,
    /// Auction in progress.
    Bidding,
    /// Tricks being played.
    Trick,
    /// Hand settled; transient before LOBBY or FINISHED.
    Scoring,
    /// A team reached the target score.
    Finished,
}

impl Phase {
    /// Whether a hand is being played (cards are in hands).
    pub fn hand_in_progress(self) -> bool {
        matches!(self, Phase::Bidding | Phase::Trick)
    }
}

/// Fixed partnerships: seats {0,2} are team A, {1,3} team B.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn of(seat: Seat) -> Team {
        if seat % 2 == 0 {
            Team::A
        } else {
            Team::B
        }
    }

    pub fn other(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    /// Index into `[_; 2]` per-team arrays.
    pub fn index(self) -> usize {
        match self {
            Team::A => 0,
            Team::B => 1,
        }
    }
}

/// Seat / turn math helpers (4 fixed seats: 0..=3).
///
/// Clockwise direction is positive (+1).
#[inline]
pub fn seat_offset(seat: Seat, delta: i8) -> Seat {
    let seat_i = seat as i16;
    let delta_i = delta as i16;
    ((seat_i + delta_i).rem_euclid(4)) as Seat
}

/// Returns the next seat clockwise (0 → 1 → 2 → 3 → 0).
#[inline]
pub fn next_player(p: Seat) -> Seat {
    seat_offset(p, 1)
}

/// Round-start seat (player to the left of the dealer).
#[inline]
pub fn round_start_seat(dealer: Seat) -> Seat {
    next_player(dealer)
}

#[inline]
pub fn partner(seat: Seat) -> Seat {
    seat_offset(seat, 2)
}

#[inline]
pub fn same_team(a: Seat, b: Seat) -> bool {
    Team::of(a) == Team::of(b)
}
