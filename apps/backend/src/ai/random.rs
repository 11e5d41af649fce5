//! Random bot - the `Easy` level.
//!
//! Bids with the shared suit-strength heuristic at a higher threshold and
//! plays a uniformly random legal card. Also the fallback whenever another
//! bot fails, so it must never fail while a legal card exists.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use super::heuristic::{suit_strength_bid, EASY_BID_THRESHOLD};
use super::trait_def::{AiError, AiPlayer, BidDecision};
use crate::domain::player_view::SeatView;
use crate::domain::Card;

pub struct RandomPlayer {
    /// `AiPlayer` methods take `&self`; the RNG needs mutable access.
    rng: Mutex<StdRng>,
}

impl RandomPlayer {
    pub const NAME: &'static str = "RandomPlayer";

    /// `Some(seed)` for reproducible choices, `None` for OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl AiPlayer for RandomPlayer {
    fn choose_bid(&self, view: &SeatView) -> Result<BidDecision, AiError> {
        Ok(suit_strength_bid(view, EASY_BID_THRESHOLD))
    }

    fn choose_play(&self, view: &SeatView) -> Result<Card, AiError> {
        if view.legal_plays.is_empty() {
            return Err(AiError::InvalidMove("No legal plays available".into()));
        }
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AiError::Internal(format!("RNG lock poisoned: {e}")))?;
        view.legal_plays
            .choose(&mut *rng)
            .copied()
            .ok_or_else(|| AiError::Internal("Failed to choose random card".into()))
    }
}
