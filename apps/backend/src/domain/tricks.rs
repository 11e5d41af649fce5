use serde::{Deserialize, Serialize};

use crate::domain::state::{same_team, seat_offset, Seat};
use crate::domain::{card_beats, is_trump, Card, Suit, Trump};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickPlay {
    pub seat: Seat,
    pub card: Card,
}

/// The trick being played. Reset after every fourth card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickState {
    pub leader: Seat,
    pub plays: Vec<TrickPlay>,
}

impl TrickState {
    pub fn new(leader: Seat) -> Self {
        Self {
            leader,
            plays: Vec::with_capacity(4),
        }
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|p| p.card.suit)
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == 4
    }

    /// Seat expected to play next into this trick.
    pub fn expected_actor(&self) -> Seat {
        seat_offset(self.leader, self.plays.len() as i8)
    }

    /// The play currently holding the trick, if any card is down.
    pub fn winning_play(&self, trump: Trump) -> Option<TrickPlay> {
        let lead = self.lead_suit()?;
        let mut best = *self.plays.first()?;
        for play in self.plays.iter().skip(1) {
            if card_beats(play.card, best.card, lead, trump) {
                best = *play;
            }
        }
        Some(best)
    }
}

/// A resolved trick, kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTrick {
    pub plays: Vec<TrickPlay>,
    pub winner: Seat,
}

/// Cards `seat` may legally play from `hand` into `trick` under `trump`.
///
/// Never empty for a non-empty hand. Rules, in order:
/// free lead; follow the lead suit (overtaking when the lead suit ranks as
/// trump); when void, trump over an opponent's winning card (overtrumping
/// when possible) unless the partner holds the trick or the player has no
/// trump. Under All Trumps and No Trumps a void player discards freely.
pub fn legal_plays(hand: &[Card], trick: &TrickState, seat: Seat, trump: Trump) -> Vec<Card> {
    let (Some(lead), Some(winner)) = (trick.lead_suit(), trick.winning_play(trump)) else {
        return sorted(hand.to_vec());
    };

    let follow: Vec<Card> = hand.iter().copied().filter(|c| c.suit == lead).collect();
    if !follow.is_empty() {
        let lead_is_trump = match trump {
            Trump::Suit(s) => s == lead,
            Trump::AllTrumps => true,
            Trump::NoTrumps => false,
        };
        if lead_is_trump {
            let higher: Vec<Card> = follow
                .iter()
                .copied()
                .filter(|&c| card_beats(c, winner.card, lead, trump))
                .collect();
            if !higher.is_empty() {
                return sorted(higher);
            }
        }
        return sorted(follow);
    }

    // Void in the lead suit. Only a suit contract can force a trump.
    let Trump::Suit(_) = trump else {
        return sorted(hand.to_vec());
    };
    let trumps: Vec<Card> = hand.iter().copied().filter(|&c| is_trump(c, trump)).collect();
    if trumps.is_empty() || same_team(winner.seat, seat) {
        return sorted(hand.to_vec());
    }
    let higher: Vec<Card> = trumps
        .iter()
        .copied()
        .filter(|&c| card_beats(c, winner.card, lead, trump))
        .collect();
    if higher.is_empty() {
        sorted(trumps)
    } else {
        sorted(higher)
    }
}

fn sorted(mut cards: Vec<Card>) -> Vec<Card> {
    cards.sort();
    cards
}

/// Winner of a complete trick.
pub fn resolve_trick(trick: &TrickState, trump: Trump) -> Option<Seat> {
    if !trick.is_complete() {
        return None;
    }
    trick.winning_play(trump).map(|p| p.seat)
}
