//! Player view of a hand - what information is visible to one seat.
//!
//! [`SeatView`] is the interface between the engine and bot players. It
//! carries the seat's own cards and the public auction/trick state, plus the
//! legal plays precomputed by the engine. Bots must pick from
//! [`SeatView::legal_plays`] rather than re-implementing the rules.

use crate::domain::bidding::{BidLevel, BiddingState, Contract};
use crate::domain::hand::HandState;
use crate::domain::rules::RuleConfig;
use crate::domain::state::{same_team, Seat};
use crate::domain::tricks::{TrickPlay, TrickState};
use crate::domain::Card;

#[derive(Debug, Clone)]
pub struct SeatView {
    /// Your seat (0-3). Partner is `seat + 2`.
    pub seat: Seat,
    pub dealer: Seat,
    /// Your current cards.
    pub hand: Vec<Card>,
    pub rules: RuleConfig,
    /// Auction state; meaningful while `contract` is `None`.
    pub bidding: BiddingState,
    pub contract: Option<Contract>,
    /// Cards played into the current trick.
    pub trick: TrickState,
    pub tricks_won: [u8; 2],
    /// Cards you may play now. Empty unless it is your turn in play.
    pub legal_plays: Vec<Card>,
}

impl SeatView {
    pub fn from_hand(hand: &HandState, seat: Seat, rules: &RuleConfig) -> Self {
        Self {
            seat,
            dealer: hand.dealer,
            hand: hand.hands[seat as usize].clone(),
            rules: rules.clone(),
            bidding: hand.bidding.clone(),
            contract: hand.contract,
            trick: hand.trick.clone(),
            tricks_won: hand.tricks_won,
            legal_plays: hand.legal_plays(seat),
        }
    }

    pub fn is_bidding(&self) -> bool {
        self.contract.is_none()
    }

    /// Smallest points bid the auction would accept right now.
    pub fn min_next_points(&self) -> Option<u16> {
        self.bidding.min_next_points(&self.rules)
    }

    pub fn capot_on_table(&self) -> bool {
        matches!(
            self.bidding.highest.map(|b| b.level),
            Some(BidLevel::Capot)
        )
    }

    /// Whether your partner holds the highest bid.
    pub fn partner_holds_bid(&self) -> bool {
        self.bidding
            .highest_bidder
            .is_some_and(|b| b != self.seat && same_team(b, self.seat))
    }

    /// The play currently winning the open trick.
    pub fn current_winner(&self) -> Option<TrickPlay> {
        let trump = self.contract?.trump;
        self.trick.winning_play(trump)
    }

    pub fn partner_winning(&self) -> bool {
        self.current_winner()
            .is_some_and(|w| w.seat != self.seat && same_team(w.seat, self.seat))
    }

    pub fn is_leading(&self) -> bool {
        self.contract.is_some() && self.trick.plays.is_empty()
    }
}
