//! Core card-related types: Card, Rank, Suit, Trump

use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];
}

/// Ranks in natural sequence order (7 lowest, A highest). This is the order
/// used for meld runs; trick strength uses the tables in `cards_logic`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// 0-based position in the natural sequence 7,8,9,10,J,Q,K,A.
    pub fn natural_index(self) -> u8 {
        self as u8
    }
}

/// Contract mode chosen at the end of the auction.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Trump {
    /// One suit is trump.
    Suit(Suit),
    /// Every suit ranks and scores as trump.
    AllTrumps,
    /// No suit receives trump ranking.
    NoTrumps,
}

impl From<Suit> for Trump {
    fn from(suit: Suit) -> Self {
        Trump::Suit(suit)
    }
}

impl TryFrom<Trump> for Suit {
    type Error = DomainError;

    fn try_from(trump: Trump) -> Result<Self, Self::Error> {
        match trump {
            Trump::Suit(s) => Ok(s),
            Trump::AllTrumps | Trump::NoTrumps => Err(DomainError::validation(
                ValidationKind::Other("INVALID_TRUMP_CONVERSION".into()),
                "Cannot convert a suitless contract to Suit",
            )),
        }
    }
}

impl Trump {
    /// The single trump suit, if this is a suit contract.
    pub fn suit(self) -> Option<Suit> {
        match self {
            Trump::Suit(s) => Some(s),
            Trump::AllTrumps | Trump::NoTrumps => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }
}

// Note: Ord/Eq on Card is only for stable sorting: suit order S<H<D<C then natural rank.
// Do not use for trick resolution or game logic comparisons involving trump/lead.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.suit.cmp(&other.suit) {
            std::cmp::Ordering::Equal => self.rank.cmp(&other.rank),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
