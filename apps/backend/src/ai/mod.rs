//! Bot players - automated seats that act through the same intents as humans.
//!
//! - `Easy`: [`RandomPlayer`], cautious bidding and random legal play
//! - `Normal`: [`Heuristic`], suit-strength bidding and point-aware play

mod heuristic;
mod random;
mod trait_def;

use std::time::Duration;

pub use heuristic::Heuristic;
pub use random::RandomPlayer;
use serde::{Deserialize, Serialize};
pub use trait_def::{AiError, AiPlayer, BidDecision};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotLevel {
    #[default]
    Easy,
    Normal,
}

const BOT_NAMES: [&str; 8] = [
    "Bot Aram",
    "Bot Ani",
    "Bot Vardan",
    "Bot Narek",
    "Bot Lilit",
    "Bot Saro",
    "Bot Tatev",
    "Bot Levon",
];

/// Roster name for a bot; `pick` is any number, wrapped onto the roster.
pub fn bot_name(pick: usize) -> &'static str {
    BOT_NAMES[pick % BOT_NAMES.len()]
}

/// Build a bot for `level`. `seed` makes its random choices reproducible.
pub fn create_ai(level: BotLevel, seed: Option<u64>) -> Box<dyn AiPlayer> {
    match level {
        BotLevel::Easy => Box::new(RandomPlayer::new(seed)),
        BotLevel::Normal => Box::new(Heuristic::new(seed)),
    }
}

/// Simulated think time before a bot acts.
pub fn think_delay(level: BotLevel, base: Duration) -> Duration {
    match level {
        BotLevel::Easy => base,
        BotLevel::Normal => base + Duration::from_millis(200),
    }
}
