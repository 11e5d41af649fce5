//! One hand of play: dealt cards, auction, tricks, melds and belote.
//!
//! `HandState` is owned by the room. The room decides which phase is active;
//! each method here re-checks that the hand is in the matching stage, so a
//! mis-routed intent is rejected without touching state.

use crate::domain::bidding::{
    AuctionOutcome, Bid, BidAction, BidLogEntry, BiddingState, ContraLevel, Contract,
};
use crate::domain::melds::{award_melds, belote_holder, BeloteTracker, MeldAward};
use crate::domain::rules::{RuleConfig, BELOTE_BONUS, TRICKS_PER_HAND};
use crate::domain::scoring::HandSettlement;
use crate::domain::state::{round_start_seat, Seat, Team};
use crate::domain::tricks::{legal_plays, resolve_trick, CompletedTrick, TrickPlay, TrickState};
use crate::domain::{card_points, Card, LAST_TRICK_BONUS};
use crate::errors::domain::{DomainError, ValidationKind};

/// Result of playing a card, describing what state changes occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayCardResult {
    /// Whether a trick was completed (4 cards played).
    pub trick_completed: bool,
    /// Winner of the completed trick, if one was completed.
    pub trick_winner: Option<Seat>,
    /// The eighth trick resolved; the hand is ready to settle.
    pub hand_completed: bool,
    /// Team credited with belote by this play.
    pub belote_scored: Option<Team>,
}

#[derive(Debug, Clone)]
pub struct HandState {
    pub dealer: Seat,
    pub hands: [Vec<Card>; 4],
    pub bidding: BiddingState,
    /// Set when the auction ends; `None` while bidding.
    pub contract: Option<Contract>,
    pub trick: TrickState,
    pub tricks_won: [u8; 2],
    pub cards_won: [Vec<Card>; 2],
    pub last_trick: Option<CompletedTrick>,
    pub melds: MeldAward,
    pub belote: BeloteTracker,
    pub cards_played: u8,
    pub bid_log: Vec<BidLogEntry>,
}

impl HandState {
    pub fn new(dealer: Seat, hands: [Vec<Card>; 4]) -> Self {
        Self {
            dealer,
            hands,
            bidding: BiddingState::new(dealer),
            contract: None,
            trick: TrickState::new(round_start_seat(dealer)),
            tricks_won: [0; 2],
            cards_won: Default::default(),
            last_trick: None,
            melds: MeldAward::default(),
            belote: BeloteTracker::default(),
            cards_played: 0,
            bid_log: Vec::new(),
        }
    }

    pub fn is_bidding(&self) -> bool {
        self.contract.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.tricks_won[0] + self.tricks_won[1] == TRICKS_PER_HAND
    }

    /// Seat expected to act next, if any.
    pub fn turn(&self) -> Option<Seat> {
        if self.is_bidding() {
            Some(self.bidding.turn)
        } else if self.is_complete() {
            None
        } else {
            Some(self.trick.expected_actor())
        }
    }

    fn require_bidding(&self) -> Result<(), DomainError> {
        if self.is_bidding() {
            Ok(())
        } else {
            Err(DomainError::invalid_state("The auction is over"))
        }
    }

    fn require_contract(&self) -> Result<Contract, DomainError> {
        self.contract
            .ok_or_else(|| DomainError::invalid_state("The auction is still running"))
    }

    pub fn bid(
        &mut self,
        seat: Seat,
        bid: Bid,
        rules: &RuleConfig,
    ) -> Result<AuctionOutcome, DomainError> {
        self.require_bidding()?;
        let outcome = self.bidding.place_bid(seat, bid, rules)?;
        self.log(seat, BidAction::Bid { bid });
        Ok(outcome)
    }

    pub fn pass(&mut self, seat: Seat, rules: &RuleConfig) -> Result<AuctionOutcome, DomainError> {
        self.require_bidding()?;
        let outcome = self.bidding.pass(seat)?;
        self.log(seat, BidAction::Pass);
        self.apply_outcome(outcome, rules);
        Ok(outcome)
    }

    pub fn contra(&mut self, seat: Seat, rules: &RuleConfig) -> Result<AuctionOutcome, DomainError> {
        self.require_bidding()?;
        let outcome = self.bidding.contra(seat, rules)?;
        self.log(seat, BidAction::Contra);
        self.apply_outcome(outcome, rules);
        Ok(outcome)
    }

    /// Declarer's team answers a contra, before the first card is played.
    pub fn redouble(&mut self, seat: Seat) -> Result<(), DomainError> {
        let contract = self.require_contract()?;
        if contract.contra != ContraLevel::Contra {
            return Err(DomainError::invalid_state("No contra to redouble"));
        }
        if Team::of(seat) != contract.declarer_team() {
            return Err(DomainError::invalid_state("Only the declaring team can redouble"));
        }
        if self.cards_played > 0 {
            return Err(DomainError::invalid_state("Too late: play has started"));
        }
        if let Some(c) = self.contract.as_mut() {
            c.contra = ContraLevel::Redouble;
        }
        self.log(seat, BidAction::Redouble);
        Ok(())
    }

    fn log(&mut self, seat: Seat, action: BidAction) {
        self.bid_log.push(BidLogEntry { seat, action });
    }

    fn apply_outcome(&mut self, outcome: AuctionOutcome, rules: &RuleConfig) {
        if let AuctionOutcome::Ended(contract) = outcome {
            self.begin_play(contract, rules);
        }
    }

    /// Fix melds and the belote holder from the full hands, then hand the
    /// lead to the seat left of the dealer.
    fn begin_play(&mut self, contract: Contract, rules: &RuleConfig) {
        self.melds = award_melds(&self.hands, rules);
        self.belote = BeloteTracker::new(belote_holder(&self.hands, contract.trump));
        self.trick = TrickState::new(round_start_seat(self.dealer));
        self.contract = Some(contract);
    }

    /// Legal cards for `seat`. Empty unless it is that seat's turn in play.
    pub fn legal_plays(&self, seat: Seat) -> Vec<Card> {
        let Some(contract) = self.contract else {
            return Vec::new();
        };
        if self.turn() != Some(seat) {
            return Vec::new();
        }
        legal_plays(&self.hands[seat as usize], &self.trick, seat, contract.trump)
    }

    pub fn play(&mut self, seat: Seat, card: Card) -> Result<PlayCardResult, DomainError> {
        let contract = self.require_contract()?;
        if self.turn() != Some(seat) {
            return Err(DomainError::not_your_turn());
        }
        let hand = &self.hands[seat as usize];
        let Some(pos) = hand.iter().position(|&c| c == card) else {
            return Err(DomainError::validation(
                ValidationKind::CardNotHeld,
                format!("You don't hold {card}"),
            ));
        };
        if !legal_plays(hand, &self.trick, seat, contract.trump).contains(&card) {
            return Err(DomainError::validation(
                ValidationKind::IllegalPlay,
                "Illegal play (follow suit / trump / overtrump rules)",
            ));
        }

        self.hands[seat as usize].remove(pos);
        self.trick.plays.push(TrickPlay { seat, card });
        self.cards_played += 1;
        let belote_scored = self.belote.on_play(seat, card, contract.trump);

        let mut result = PlayCardResult {
            trick_completed: false,
            trick_winner: None,
            hand_completed: false,
            belote_scored,
        };

        let Some(winner) = resolve_trick(&self.trick, contract.trump) else {
            return Ok(result);
        };
        let team = Team::of(winner).index();
        self.tricks_won[team] += 1;
        self.cards_won[team].extend(self.trick.plays.iter().map(|p| p.card));
        let finished = std::mem::replace(&mut self.trick, TrickState::new(winner));
        self.last_trick = Some(CompletedTrick {
            plays: finished.plays,
            winner,
        });

        result.trick_completed = true;
        result.trick_winner = Some(winner);
        result.hand_completed = self.is_complete();
        Ok(result)
    }

    /// Points each team has taken in tricks so far, bonus excluded.
    pub fn trick_points(&self) -> [u16; 2] {
        let Some(contract) = self.contract else {
            return [0, 0];
        };
        [0, 1].map(|i| {
            self.cards_won[i]
                .iter()
                .map(|&c| card_points(c, contract.trump))
                .sum()
        })
    }

    /// Snapshot for settlement. Only valid once all eight tricks are played.
    pub fn settlement(&self) -> Result<HandSettlement, DomainError> {
        let contract = self.require_contract()?;
        let last_winner = match (&self.last_trick, self.is_complete()) {
            (Some(t), true) => t.winner,
            _ => return Err(DomainError::invalid_state("Hand is not complete")),
        };
        let last_trick_team = Team::of(last_winner);
        let mut card_points = self.trick_points();
        card_points[last_trick_team.index()] += LAST_TRICK_BONUS;

        let mut belote_points = [0u16; 2];
        if let Some(team) = self.belote.scored {
            belote_points[team.index()] = BELOTE_BONUS;
        }

        Ok(HandSettlement {
            contract,
            card_points,
            last_trick_team,
            meld_points: self.melds.points,
            belote_points,
            tricks_won: self.tricks_won,
        })
    }

    /// Cards still held plus cards in the open trick plus cards won.
    pub fn card_count(&self) -> usize {
        self.hands.iter().map(Vec::len).sum::<usize>()
            + self.trick.plays.len()
            + self.cards_won.iter().map(Vec::len).sum::<usize>()
    }
}
