//! Meld (declaration) detection and cross-team comparison.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::rules::{MeldScoring, RuleConfig};
use crate::domain::state::{Seat, Team};
use crate::domain::{Card, Rank, Suit, Trump};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Meld {
    /// Run of `len` >= 3 consecutive ranks in one suit, ending at `top`.
    Sequence { suit: Suit, len: u8, top: Rank },
    /// Four cards of a scoring rank.
    Four { rank: Rank },
}

impl Meld {
    pub fn points(&self) -> u16 {
        match self {
            Meld::Sequence { len, .. } => match len {
                0..=2 => 0,
                3 => 20,
                4 => 50,
                _ => 100,
            },
            Meld::Four { rank } => four_points(*rank),
        }
    }

    /// Comparison key: any four beats any sequence; fours by points then
    /// rank; sequences by length then top card.
    fn key(&self) -> (u8, u16, u8) {
        match self {
            Meld::Four { rank } => (1, four_points(*rank), rank.natural_index()),
            Meld::Sequence { len, top, .. } => (0, *len as u16, top.natural_index()),
        }
    }

    pub fn compare(&self, other: &Meld) -> Ordering {
        self.key().cmp(&other.key())
    }
}

fn four_points(rank: Rank) -> u16 {
    match rank {
        Rank::Jack => 200,
        Rank::Nine => 150,
        Rank::Ace | Rank::Ten | Rank::King | Rank::Queen => 100,
        Rank::Eight | Rank::Seven => 0,
    }
}

/// All melds in one hand: every maximal run of three or more and every
/// scoring four-of-a-kind.
pub fn detect_melds(hand: &[Card]) -> Vec<Meld> {
    let mut melds = Vec::new();

    for suit in Suit::ALL {
        let mut present = [false; 8];
        for c in hand.iter().filter(|c| c.suit == suit) {
            present[c.rank.natural_index() as usize] = true;
        }
        let mut run = 0u8;
        for (idx, &has) in present.iter().enumerate() {
            if has {
                run += 1;
            }
            let run_ends = !has || idx == present.len() - 1;
            if run_ends {
                if run >= 3 {
                    let top_idx = if has { idx } else { idx - 1 };
                    melds.push(Meld::Sequence {
                        suit,
                        len: run,
                        top: Rank::ALL[top_idx],
                    });
                }
                run = 0;
            }
        }
    }

    for rank in Rank::ALL {
        if four_points(rank) == 0 {
            continue;
        }
        if hand.iter().filter(|c| c.rank == rank).count() == 4 {
            melds.push(Meld::Four { rank });
        }
    }

    melds
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredMeld {
    pub seat: Seat,
    #[serde(flatten)]
    pub meld: Meld,
    pub points: u16,
}

/// Meld outcome of a hand, fixed when the auction ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeldAward {
    /// Melds held by each team (index by `Team::index`).
    pub declared: [Vec<DeclaredMeld>; 2],
    /// Points each team actually scores from melds.
    pub points: [u16; 2],
    /// Team holding the strictly better best meld; `None` on a tie or when
    /// nobody melds.
    pub better_team: Option<Team>,
}

fn best_of(melds: &[DeclaredMeld]) -> Option<Meld> {
    melds
        .iter()
        .map(|d| d.meld)
        .max_by(|a, b| a.compare(b))
}

/// Which team's best meld is strictly better.
pub fn compare_teams(a: &[DeclaredMeld], b: &[DeclaredMeld]) -> Option<Team> {
    match (best_of(a), best_of(b)) {
        (None, None) => None,
        (Some(_), None) => Some(Team::A),
        (None, Some(_)) => Some(Team::B),
        (Some(x), Some(y)) => match x.compare(&y) {
            Ordering::Greater => Some(Team::A),
            Ordering::Less => Some(Team::B),
            Ordering::Equal => None,
        },
    }
}

pub fn award_melds(hands: &[Vec<Card>; 4], rules: &RuleConfig) -> MeldAward {
    if !rules.melds_enabled {
        return MeldAward::default();
    }

    let mut declared: [Vec<DeclaredMeld>; 2] = Default::default();
    for (seat, hand) in hands.iter().enumerate() {
        let seat = seat as Seat;
        for meld in detect_melds(hand) {
            declared[Team::of(seat).index()].push(DeclaredMeld {
                seat,
                meld,
                points: meld.points(),
            });
        }
    }

    let better_team = compare_teams(&declared[0], &declared[1]);
    let totals = [
        declared[0].iter().map(|d| d.points).sum::<u16>(),
        declared[1].iter().map(|d| d.points).sum::<u16>(),
    ];
    let points = match rules.meld_scoring {
        MeldScoring::Both => totals,
        MeldScoring::BetterTeamOnly => match better_team {
            Some(Team::A) => [totals[0], 0],
            Some(Team::B) => [0, totals[1]],
            None => [0, 0],
        },
    };

    MeldAward {
        declared,
        points,
        better_team,
    }
}

/// Seat holding both king and queen of the trump suit (suit contracts only).
pub fn belote_holder(hands: &[Vec<Card>; 4], trump: Trump) -> Option<Seat> {
    let suit = trump.suit()?;
    let king = Card::new(Rank::King, suit);
    let queen = Card::new(Rank::Queen, suit);
    hands
        .iter()
        .position(|h| h.contains(&king) && h.contains(&queen))
        .map(|s| s as Seat)
}

/// Tracks the belote pair through play. Credited once, when the holder has
/// played both cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeloteTracker {
    pub holder: Option<Seat>,
    pub played: u8,
    pub scored: Option<Team>,
}

impl BeloteTracker {
    pub fn new(holder: Option<Seat>) -> Self {
        Self {
            holder,
            played: 0,
            scored: None,
        }
    }

    /// Record a play. Returns the team credited if this play completes the pair.
    pub fn on_play(&mut self, seat: Seat, card: Card, trump: Trump) -> Option<Team> {
        let suit = trump.suit()?;
        if self.holder != Some(seat) || card.suit != suit || self.scored.is_some() {
            return None;
        }
        if matches!(card.rank, Rank::King | Rank::Queen) {
            self.played += 1;
            if self.played == 2 {
                self.scored = Some(Team::of(seat));
                return self.scored;
            }
        }
        None
    }
}
