//! Auction state machine: bids, passes, contra.
//!
//! Every transition validates fully before touching state, so a rejected
//! intent leaves the auction exactly as it was.

use serde::{Deserialize, Serialize};

use crate::domain::rules::{RuleConfig, BID_STEP};
use crate::domain::state::{next_player, round_start_seat, same_team, Seat, Team};
use crate::domain::Trump;
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidLevel {
    Points(u16),
    /// Win all eight tricks.
    Capot,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub trump: Trump,
    pub level: BidLevel,
}

impl Bid {
    pub fn points(trump: Trump, value: u16) -> Self {
        Self {
            trump,
            level: BidLevel::Points(value),
        }
    }

    pub fn capot(trump: Trump) -> Self {
        Self {
            trump,
            level: BidLevel::Capot,
        }
    }
}

/// Score multiplier: 1 normal, 2 after contra, 4 after redouble.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ContraLevel {
    #[default]
    None,
    Contra,
    Redouble,
}

impl ContraLevel {
    pub fn multiplier(self) -> u32 {
        match self {
            ContraLevel::None => 1,
            ContraLevel::Contra => 2,
            ContraLevel::Redouble => 4,
        }
    }
}

impl From<ContraLevel> for u8 {
    fn from(c: ContraLevel) -> Self {
        c.multiplier() as u8
    }
}

impl TryFrom<u8> for ContraLevel {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(ContraLevel::None),
            2 => Ok(ContraLevel::Contra),
            4 => Ok(ContraLevel::Redouble),
            other => Err(format!("invalid contra level {other}")),
        }
    }
}

/// The auction's result, carried through trick play into settlement.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub trump: Trump,
    pub level: BidLevel,
    pub declarer: Seat,
    pub contra: ContraLevel,
}

impl Contract {
    pub fn declarer_team(&self) -> Team {
        Team::of(self.declarer)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BidAction {
    Bid { bid: Bid },
    Pass,
    Contra,
    Redouble,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct BidLogEntry {
    pub seat: Seat,
    #[serde(flatten)]
    pub action: BidAction,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AuctionOutcome {
    /// Auction continues with `turn` to act.
    Continue,
    /// Auction closed; play begins under this contract.
    Ended(Contract),
    /// Four passes without a bid: throw the cards in and deal again.
    Redeal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiddingState {
    pub turn: Seat,
    pub highest: Option<Bid>,
    pub highest_bidder: Option<Seat>,
    pub consecutive_passes: u8,
    pub contra_level: ContraLevel,
}

impl BiddingState {
    pub fn new(dealer: Seat) -> Self {
        Self {
            turn: round_start_seat(dealer),
            highest: None,
            highest_bidder: None,
            consecutive_passes: 0,
            contra_level: ContraLevel::None,
        }
    }

    /// Smallest points bid that would currently be accepted, or `None` when
    /// a capot is on the table or the ceiling is reached.
    pub fn min_next_points(&self, rules: &RuleConfig) -> Option<u16> {
        let floor = match self.highest.map(|b| b.level) {
            None => rules.min_bid,
            Some(BidLevel::Capot) => return None,
            Some(BidLevel::Points(v)) => v + BID_STEP,
        };
        let floor = floor.max(rules.min_bid);
        (floor <= rules.max_bid).then_some(floor)
    }

    pub fn validate_bid(&self, seat: Seat, bid: Bid, rules: &RuleConfig) -> Result<(), DomainError> {
        if seat != self.turn {
            return Err(DomainError::not_your_turn());
        }
        if !rules.allowed_modes.allows(bid.trump) {
            return Err(DomainError::bad_bid("Contract mode not allowed in this room"));
        }
        match (bid.level, self.highest.map(|h| (h.trump, h.level))) {
            (BidLevel::Points(v), current) => {
                if v % BID_STEP != 0 || v < rules.min_bid || v > rules.max_bid {
                    return Err(DomainError::bad_bid(format!(
                        "Bid must be {}..{} in steps of {BID_STEP}",
                        rules.min_bid, rules.max_bid
                    )));
                }
                match current {
                    Some((_, BidLevel::Capot)) => {
                        Err(DomainError::bad_bid("Can't overcall a capot with points"))
                    }
                    Some((_, BidLevel::Points(cur))) if v <= cur => Err(DomainError::bad_bid(
                        format!("Bid must be higher than {cur}"),
                    )),
                    _ => Ok(()),
                }
            }
            (BidLevel::Capot, Some((cur_trump, BidLevel::Capot))) => {
                if rules.capot_overcall && cur_trump != bid.trump {
                    Ok(())
                } else {
                    Err(DomainError::bad_bid("A capot is already declared"))
                }
            }
            (BidLevel::Capot, _) => Ok(()),
        }
    }

    pub fn place_bid(
        &mut self,
        seat: Seat,
        bid: Bid,
        rules: &RuleConfig,
    ) -> Result<AuctionOutcome, DomainError> {
        self.validate_bid(seat, bid, rules)?;
        self.highest = Some(bid);
        self.highest_bidder = Some(seat);
        self.consecutive_passes = 0;
        self.turn = next_player(seat);
        Ok(AuctionOutcome::Continue)
    }

    pub fn pass(&mut self, seat: Seat) -> Result<AuctionOutcome, DomainError> {
        if seat != self.turn {
            return Err(DomainError::not_your_turn());
        }
        self.consecutive_passes += 1;
        self.turn = next_player(seat);

        match self.highest {
            None if self.consecutive_passes >= 4 => Ok(AuctionOutcome::Redeal),
            Some(_) if self.consecutive_passes >= 3 => Ok(AuctionOutcome::Ended(self.contract()?)),
            _ => Ok(AuctionOutcome::Continue),
        }
    }

    /// Opponents of the highest bidder double the contract. Any opponent may
    /// call it regardless of turn; it closes the auction immediately.
    pub fn contra(&mut self, seat: Seat, rules: &RuleConfig) -> Result<AuctionOutcome, DomainError> {
        if !rules.contra_enabled {
            return Err(DomainError::invalid_state("Contra is disabled in this room"));
        }
        let Some(bidder) = self.highest_bidder else {
            return Err(DomainError::invalid_state("No bid to contra"));
        };
        if same_team(seat, bidder) {
            return Err(DomainError::invalid_state("You can't contra your own team's bid"));
        }
        if self.contra_level != ContraLevel::None {
            return Err(DomainError::invalid_state("Contra already called"));
        }
        self.contra_level = ContraLevel::Contra;
        Ok(AuctionOutcome::Ended(self.contract()?))
    }

    fn contract(&self) -> Result<Contract, DomainError> {
        match (self.highest, self.highest_bidder) {
            (Some(bid), Some(declarer)) => Ok(Contract {
                trump: bid.trump,
                level: bid.level,
                declarer,
                contra: self.contra_level,
            }),
            _ => Err(DomainError::validation(
                ValidationKind::InvalidState,
                "Invariant violated: auction ended without a bid",
            )),
        }
    }
}
