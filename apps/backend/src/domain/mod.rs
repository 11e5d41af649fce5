//! Domain layer: pure game logic types and helpers.

pub mod bidding;
pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod dealing;
pub mod hand;
pub mod melds;
pub mod player_view;
pub mod rules;
pub mod scoring;
pub mod seed_derivation;
pub mod state;
pub mod tricks;

#[cfg(test)]
mod tests_hand;
#[cfg(test)]
mod tests_props_bidding;
#[cfg(test)]
mod tests_scoring;

// Re-exports for ergonomics
pub use bidding::{AuctionOutcome, Bid, BidLevel, ContraLevel, Contract};
pub use cards_logic::{card_beats, card_points, hand_has_suit, is_trump, LAST_TRICK_BONUS};
pub use cards_types::{Card, Rank, Suit, Trump};
pub use dealing::{deal_hands, deal_ordered, full_deck};
pub use hand::{HandState, PlayCardResult};
pub use player_view::SeatView;
pub use rules::{RuleConfig, TargetScore};
pub use seed_derivation::derive_dealing_seed;
pub use state::{Phase, Seat, Team};
