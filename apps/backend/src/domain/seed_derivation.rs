//! RNG seed derivation utilities for deterministic dealing.
//!
//! Every room carries one base seed; each deal (including redeals) gets its
//! own seed derived from it.

/// Derive a seed for dealing the `deal_no`-th deal of a room.
///
/// # Arguments
///
/// * `room_seed` - Base RNG seed of the room
/// * `deal_no` - Deal counter (increments on every deal, redeals included)
pub fn derive_dealing_seed(room_seed: u64, deal_no: u32) -> u64 {
    room_seed
        .wrapping_add((deal_no as u64).wrapping_mul(1_000_003))
        .wrapping_add(2)
}

/// Derive a seed for a bot's random choices at a given seat and deal.
pub fn derive_bot_seed(room_seed: u64, deal_no: u32, seat: u8) -> u64 {
    derive_dealing_seed(room_seed, deal_no)
        .wrapping_mul(31)
        .wrapping_add(seat as u64 + 1)
}
