//! Card game logic: ranking tables, point tables, comparing card strength

use super::cards_types::{Card, Rank, Suit, Trump};

/// Trump ranking, strongest first.
pub const TRUMP_ORDER: [Rank; 8] = [
    Rank::Jack,
    Rank::Nine,
    Rank::Ace,
    Rank::Ten,
    Rank::King,
    Rank::Queen,
    Rank::Eight,
    Rank::Seven,
];

/// Plain-suit ranking, strongest first.
pub const PLAIN_ORDER: [Rank; 8] = [
    Rank::Ace,
    Rank::Ten,
    Rank::King,
    Rank::Queen,
    Rank::Jack,
    Rank::Nine,
    Rank::Eight,
    Rank::Seven,
];

pub const LAST_TRICK_BONUS: u16 = 10;

pub fn trump_points(rank: Rank) -> u16 {
    match rank {
        Rank::Jack => 20,
        Rank::Nine => 14,
        Rank::Ace => 11,
        Rank::Ten => 10,
        Rank::King => 4,
        Rank::Queen => 3,
        Rank::Eight | Rank::Seven => 0,
    }
}

pub fn plain_points(rank: Rank) -> u16 {
    match rank {
        Rank::Ace => 11,
        Rank::Ten => 10,
        Rank::King => 4,
        Rank::Queen => 3,
        Rank::Jack => 2,
        Rank::Nine | Rank::Eight | Rank::Seven => 0,
    }
}

/// Whether `card` ranks and scores with the trump tables under `trump`.
pub fn is_trump(card: Card, trump: Trump) -> bool {
    match trump {
        Trump::Suit(s) => card.suit == s,
        Trump::AllTrumps => true,
        Trump::NoTrumps => false,
    }
}

pub fn card_points(card: Card, trump: Trump) -> u16 {
    if is_trump(card, trump) {
        trump_points(card.rank)
    } else {
        plain_points(card.rank)
    }
}

/// Strength within a suit: higher beats lower. 8 for the strongest card.
pub fn strength(card: Card, trump: Trump) -> u8 {
    let order = if is_trump(card, trump) {
        &TRUMP_ORDER
    } else {
        &PLAIN_ORDER
    };
    let idx = order.iter().position(|&r| r == card.rank).unwrap_or(7);
    8 - idx as u8
}

pub fn hand_has_suit(hand: &[Card], suit: Suit) -> bool {
    hand.iter().any(|c| c.suit == suit)
}

/// Whether `a` beats `b` in a trick led with `lead`.
///
/// Only a suit contract lets an off-suit card win (by trumping). Under
/// All Trumps and No Trumps only lead-suit cards compare.
pub fn card_beats(a: Card, b: Card, lead: Suit, trump: Trump) -> bool {
    if let Trump::Suit(trump_suit) = trump {
        let a_trump = a.suit == trump_suit;
        let b_trump = b.suit == trump_suit;
        if a_trump && !b_trump {
            return true;
        }
        if b_trump && !a_trump {
            return false;
        }
        if a_trump && b_trump {
            return strength(a, trump) > strength(b, trump);
        }
    }

    let a_follows = a.suit == lead;
    let b_follows = b.suit == lead;
    match (a_follows, b_follows) {
        (true, false) => true,
        (false, true) => false,
        (true, true) => strength(a, trump) > strength(b, trump),
        (false, false) => false,
    }
}
