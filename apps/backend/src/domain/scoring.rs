//! Contract settlement at hand end.

use serde::{Deserialize, Serialize};

use crate::domain::bidding::{BidLevel, Contract};
use crate::domain::rules::TRICKS_PER_HAND;
use crate::domain::state::Team;

/// Snapshot of a finished hand, consumed once by `settle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandSettlement {
    pub contract: Contract,
    /// Card points per team, last-trick bonus included.
    pub card_points: [u16; 2],
    pub last_trick_team: Team,
    /// Meld points actually awarded per team.
    pub meld_points: [u16; 2],
    pub belote_points: [u16; 2],
    pub tricks_won: [u8; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub raw: [u32; 2],
    pub awarded: [u32; 2],
    pub made: bool,
}

impl HandSettlement {
    /// Per-team cards + bonus + melds + belote, before contract rules.
    pub fn raw_points(&self) -> [u32; 2] {
        [0, 1].map(|i| {
            self.card_points[i] as u32 + self.meld_points[i] as u32 + self.belote_points[i] as u32
        })
    }

    pub fn made(&self) -> bool {
        let declarer = self.contract.declarer_team().index();
        match self.contract.level {
            BidLevel::Capot => self.tricks_won[declarer] == TRICKS_PER_HAND,
            BidLevel::Points(value) => self.raw_points()[declarer] >= value as u32,
        }
    }

    /// Success: each team keeps its raw points. Failure: defenders take the
    /// whole pool. Either way scaled by the contra multiplier.
    pub fn settle(&self) -> SettlementResult {
        let raw = self.raw_points();
        let made = self.made();
        let mult = self.contract.contra.multiplier();
        let declarer = self.contract.declarer_team();

        let mut awarded = [0u32; 2];
        if made {
            awarded = raw.map(|p| p * mult);
        } else {
            awarded[declarer.other().index()] = (raw[0] + raw[1]) * mult;
        }

        SettlementResult { raw, awarded, made }
    }
}
