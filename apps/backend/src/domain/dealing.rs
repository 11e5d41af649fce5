//! Deterministic card dealing logic.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

pub const DECK_SIZE: usize = 32;
pub const HAND_SIZE: usize = 8;

/// The 32-card deck in stable order (suit, then natural rank).
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card { suit, rank });
        }
    }
    deck
}

/// Shuffle and deal four hands of eight. Same seed, same hands.
///
/// Hands are sorted for convenience.
pub fn deal_hands(seed: u64) -> [Vec<Card>; 4] {
    let mut deck = full_deck();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    deck.shuffle(&mut rng);
    split_into_hands(&deck)
}

/// Deal from an explicit card order: cards 0..8 go to seat 0, 8..16 to seat 1,
/// and so on. Rejects anything that is not a permutation of the deck.
pub fn deal_ordered(order: &[Card]) -> Result<[Vec<Card>; 4], DomainError> {
    if order.len() != DECK_SIZE {
        return Err(DomainError::validation(
            ValidationKind::Other("BAD_DECK".into()),
            format!("Deck must contain {DECK_SIZE} cards, got {}", order.len()),
        ));
    }
    let mut seen = order.to_vec();
    seen.sort();
    seen.dedup();
    if seen.len() != DECK_SIZE {
        return Err(DomainError::validation(
            ValidationKind::Other("BAD_DECK".into()),
            "Deck contains duplicate cards",
        ));
    }
    Ok(split_into_hands(order))
}

fn split_into_hands(deck: &[Card]) -> [Vec<Card>; 4] {
    let mut hands: [Vec<Card>; 4] = Default::default();
    for (seat, chunk) in deck.chunks(HAND_SIZE).take(4).enumerate() {
        let mut hand = chunk.to_vec();
        hand.sort();
        hands[seat] = hand;
    }
    hands
}
