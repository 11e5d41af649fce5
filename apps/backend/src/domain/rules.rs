use serde::{Deserialize, Serialize};

use crate::domain::Trump;
use crate::errors::domain::{DomainError, ValidationKind};

pub const PLAYERS: usize = 4;
pub const TRICKS_PER_HAND: u8 = 8;
pub const BID_STEP: u16 = 10;
/// Highest `max_bid` a room may configure.
pub const MAX_BID_CEILING: u16 = 180;
pub const BELOTE_BONUS: u16 = 20;

/// Allowed match lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TargetScore {
    S151,
    #[default]
    S301,
    S501,
    S1001,
}

impl TargetScore {
    pub const fn points(self) -> u32 {
        match self {
            TargetScore::S151 => 151,
            TargetScore::S301 => 301,
            TargetScore::S501 => 501,
            TargetScore::S1001 => 1001,
        }
    }
}

impl TryFrom<u32> for TargetScore {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            151 => Ok(TargetScore::S151),
            301 => Ok(TargetScore::S301),
            501 => Ok(TargetScore::S501),
            1001 => Ok(TargetScore::S1001),
            other => Err(DomainError::validation(
                ValidationKind::BadConfig,
                format!("Target score must be one of 151, 301, 501, 1001 (got {other})"),
            )),
        }
    }
}

impl From<TargetScore> for u32 {
    fn from(t: TargetScore) -> Self {
        t.points()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeldScoring {
    /// Only the team with the strictly better best meld scores; tie zeroes both.
    #[default]
    BetterTeamOnly,
    /// Each team keeps its own meld total.
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnTimeout {
    /// The deadline is published for display only.
    #[default]
    Advisory,
    /// The room acts for a human seat whose deadline expired.
    AutoPlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowedModes {
    pub suits: bool,
    pub all_trumps: bool,
    pub no_trumps: bool,
}

impl Default for AllowedModes {
    fn default() -> Self {
        Self {
            suits: true,
            all_trumps: false,
            no_trumps: false,
        }
    }
}

impl AllowedModes {
    pub fn allows(&self, trump: Trump) -> bool {
        match trump {
            Trump::Suit(_) => self.suits,
            Trump::AllTrumps => self.all_trumps,
            Trump::NoTrumps => self.no_trumps,
        }
    }

    fn any(&self) -> bool {
        self.suits || self.all_trumps || self.no_trumps
    }
}

/// Per-room rule toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub min_bid: u16,
    pub max_bid: u16,
    pub allowed_modes: AllowedModes,
    pub contra_enabled: bool,
    pub melds_enabled: bool,
    pub meld_scoring: MeldScoring,
    /// A capot may be replaced by a capot in a different trump.
    pub capot_overcall: bool,
    pub turn_timeout: TurnTimeout,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            min_bid: 80,
            max_bid: 160,
            allowed_modes: AllowedModes::default(),
            contra_enabled: true,
            melds_enabled: true,
            meld_scoring: MeldScoring::default(),
            capot_overcall: false,
            turn_timeout: TurnTimeout::default(),
        }
    }
}

impl RuleConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        let bad = |msg: String| Err(DomainError::validation(ValidationKind::BadConfig, msg));
        if self.min_bid % BID_STEP != 0 || self.max_bid % BID_STEP != 0 {
            return bad(format!("Bid bounds must be multiples of {BID_STEP}"));
        }
        if self.min_bid < BID_STEP {
            return bad(format!("min_bid must be at least {BID_STEP}"));
        }
        if self.min_bid > self.max_bid {
            return bad(format!(
                "min_bid {} exceeds max_bid {}",
                self.min_bid, self.max_bid
            ));
        }
        if self.max_bid > MAX_BID_CEILING {
            return bad(format!("max_bid may not exceed {MAX_BID_CEILING}"));
        }
        if !self.allowed_modes.any() {
            return bad("At least one contract mode must be allowed".to_string());
        }
        Ok(())
    }
}
