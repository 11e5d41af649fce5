//! Heuristic bot - the `Normal` level, also used to act for timed-out humans.
//!
//! Bidding:
//! - Score each allowed trump by the honours held in it (J 5, 9 4, A 3,
//!   10 2, K/Q 1).
//! - Bid only at or above a threshold, starting at 80 and adding 10 per point
//!   over it, capped at 140 and never above the configured maximum.
//! - Pass when that value does not reach the next legal bid.
//! - Never bid over a partner or over a capot.
//!
//! Play:
//! - Partner winning: throw the most valuable legal card.
//! - Leading: random legal card weighted by point value.
//! - Otherwise: cheapest card that takes the trick, else the cheapest card.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use super::trait_def::{AiError, AiPlayer, BidDecision};
use crate::domain::cards_logic::strength;
use crate::domain::player_view::SeatView;
use crate::domain::{card_beats, card_points, Bid, Card, Rank, Suit, Trump};

pub const NORMAL_BID_THRESHOLD: u32 = 6;
pub const EASY_BID_THRESHOLD: u32 = 8;
const OPENING_BID: u16 = 80;
const HEURISTIC_BID_CAP: u16 = 140;

fn honour_score(rank: Rank) -> u32 {
    match rank {
        Rank::Jack => 5,
        Rank::Nine => 4,
        Rank::Ace => 3,
        Rank::Ten => 2,
        Rank::King | Rank::Queen => 1,
        Rank::Eight | Rank::Seven => 0,
    }
}

fn suit_score(hand: &[Card], suit: Suit) -> u32 {
    hand.iter()
        .filter(|c| c.suit == suit)
        .map(|c| honour_score(c.rank))
        .sum()
}

/// Strength of a hand played under `trump`.
fn trump_score(hand: &[Card], trump: Trump) -> u32 {
    match trump {
        Trump::Suit(s) => suit_score(hand, s),
        Trump::AllTrumps => Suit::ALL.iter().map(|&s| suit_score(hand, s)).sum::<u32>() / 2,
        Trump::NoTrumps => {
            hand.iter()
                .map(|c| match c.rank {
                    Rank::Ace => 3,
                    Rank::Ten => 2,
                    _ => 0,
                })
                .sum::<u32>()
                / 2
        }
    }
}

/// Suit-strength auction decision shared by every bot level.
pub(crate) fn suit_strength_bid(view: &SeatView, threshold: u32) -> BidDecision {
    if view.capot_on_table() || view.partner_holds_bid() {
        return BidDecision::Pass;
    }
    let modes = &view.rules.allowed_modes;
    let candidates = Suit::ALL
        .iter()
        .map(|&s| Trump::Suit(s))
        .chain([Trump::AllTrumps, Trump::NoTrumps])
        .filter(|&t| modes.allows(t));

    let mut best: Option<(Trump, u32)> = None;
    for trump in candidates {
        let score = trump_score(&view.hand, trump);
        if best.is_none_or(|(_, b)| score > b) {
            best = Some((trump, score));
        }
    }
    let Some((trump, score)) = best else {
        return BidDecision::Pass;
    };
    if score < threshold {
        return BidDecision::Pass;
    }
    let Some(floor) = view.min_next_points() else {
        return BidDecision::Pass;
    };

    let over = (score - NORMAL_BID_THRESHOLD.min(score)) as u16;
    let value = (OPENING_BID + over * 10).min(HEURISTIC_BID_CAP);
    if value < floor || value > view.rules.max_bid {
        return BidDecision::Pass;
    }
    BidDecision::Bid(Bid::points(trump, value))
}

pub struct Heuristic {
    rng: Mutex<StdRng>,
}

impl Heuristic {
    pub const NAME: &'static str = "Heuristic";

    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn lead_card(&self, view: &SeatView, trump: Trump) -> Result<Card, AiError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AiError::Internal(format!("RNG lock poisoned: {e}")))?;
        view.legal_plays
            .choose_weighted(&mut *rng, |&c| u32::from(card_points(c, trump)) + 1)
            .copied()
            .map_err(|e| AiError::Internal(format!("weighted choice failed: {e}")))
    }
}

/// Sort key for "cheapest": fewest points, then weakest.
fn cost(card: Card, trump: Trump) -> (u16, u8) {
    (card_points(card, trump), strength(card, trump))
}

impl AiPlayer for Heuristic {
    fn choose_bid(&self, view: &SeatView) -> Result<BidDecision, AiError> {
        Ok(suit_strength_bid(view, NORMAL_BID_THRESHOLD))
    }

    fn choose_play(&self, view: &SeatView) -> Result<Card, AiError> {
        let legal = &view.legal_plays;
        let trump = view
            .contract
            .map(|c| c.trump)
            .ok_or_else(|| AiError::InvalidMove("No contract yet".into()))?;
        match legal.as_slice() {
            [] => return Err(AiError::InvalidMove("No legal plays available".into())),
            [only] => return Ok(*only),
            _ => {}
        }

        if view.partner_winning() {
            return legal
                .iter()
                .copied()
                .max_by_key(|&c| cost(c, trump))
                .ok_or_else(|| AiError::Internal("empty legal set".into()));
        }
        if view.is_leading() {
            return self.lead_card(view, trump);
        }

        let winners: Vec<Card> = match (view.current_winner(), view.trick.lead_suit()) {
            (Some(w), Some(lead)) => legal
                .iter()
                .copied()
                .filter(|&c| card_beats(c, w.card, lead, trump))
                .collect(),
            _ => Vec::new(),
        };
        let pool = if winners.is_empty() { legal } else { &winners };
        pool.iter()
            .copied()
            .min_by_key(|&c| cost(c, trump))
            .ok_or_else(|| AiError::Internal("empty legal set".into()))
    }
}
