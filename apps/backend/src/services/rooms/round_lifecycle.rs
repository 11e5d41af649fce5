//! Hand lifecycle: ready-up, dealing, redeal, settlement, match end and
//! abandonment.

use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use super::{HandSummary, Room};
use crate::domain::hand::HandState;
use crate::domain::state::next_player;
use crate::domain::{deal_hands, derive_dealing_seed, Phase, Seat, Team};
use crate::errors::domain::{DomainError, ValidationKind};

impl Room {
    /// Mark a seated human ready or not. When all four seats are occupied
    /// and ready, the next hand starts. Returns whether a hand started.
    pub fn set_ready(
        &mut self,
        player_id: &str,
        ready: bool,
        now: OffsetDateTime,
    ) -> Result<bool, DomainError> {
        let seat = self.seat_of(player_id).ok_or_else(|| {
            DomainError::validation(ValidationKind::NotSeated, "Only seated players can ready up")
        })?;
        if !matches!(self.phase, Phase::Lobby | Phase::Finished) {
            return Err(DomainError::invalid_state("A hand is already in progress"));
        }
        self.ready[seat as usize] = ready;
        self.touch();
        Ok(self.maybe_start(now))
    }

    /// Start a hand if every seat is filled and ready.
    pub fn maybe_start(&mut self, now: OffsetDateTime) -> bool {
        let all_ready = self
            .seats
            .iter()
            .zip(self.ready)
            .all(|(slot, ready)| !slot.is_empty() && ready);
        if !all_ready || !matches!(self.phase, Phase::Lobby | Phase::Finished) {
            return false;
        }
        self.start_hand(now);
        true
    }

    fn start_hand(&mut self, now: OffsetDateTime) {
        if self.phase == Phase::Finished {
            info!(room = %self.code, "[ROOM] new match");
            self.totals = [0, 0];
            self.hand_no = 0;
            self.winner = None;
            self.last_settlement = None;
        }
        self.hand_no += 1;
        self.deal(now);
        info!(room = %self.code, hand_no = self.hand_no, dealer = self.dealer, "[ROOM] hand started");
    }

    fn deal(&mut self, now: OffsetDateTime) {
        self.deal_no += 1;
        let seed = derive_dealing_seed(self.seed, self.deal_no);
        self.hand = Some(HandState::new(self.dealer, deal_hands(seed)));
        self.phase = Phase::Bidding;
        self.refresh_deadline(now);
        self.touch();
    }

    /// Four passes: the dealer moves on and the cards are dealt again. Not
    /// counted as a hand.
    pub(crate) fn redeal(&mut self, now: OffsetDateTime) {
        self.dealer = next_player(self.dealer);
        info!(room = %self.code, deal_no = self.deal_no + 1, dealer = self.dealer, "[ROOM] all passed, redealing");
        self.deal(now);
    }

    /// Drop the hand in progress and go back to the lobby. Totals and the
    /// dealer are kept; humans must ready up again.
    pub fn abandon_hand(&mut self, reason: &str) {
        if self.hand.take().is_some() {
            warn!(room = %self.code, hand_no = self.hand_no, reason, "[ROOM] hand abandoned");
        }
        self.phase = Phase::Lobby;
        self.turn_deadline = None;
        self.reset_human_ready();
        self.touch();
    }

    /// Settle the finished hand into the running totals and move to the
    /// lobby or, when a team reached the target, to FINISHED.
    pub(crate) fn finish_hand(&mut self) -> Result<HandSummary, DomainError> {
        let hand = self
            .hand
            .as_ref()
            .ok_or_else(|| DomainError::invalid_state("No hand to settle"))?;
        let settlement = hand.settlement()?;
        self.phase = Phase::Scoring;

        let result = settlement.settle();
        for (total, award) in self.totals.iter_mut().zip(result.awarded) {
            *total += award;
        }
        let mut summary = HandSummary::from_result(self.hand_no, &settlement, &result, self.totals);
        info!(
            room = %self.code,
            hand_no = self.hand_no,
            made = result.made,
            awarded_a = result.awarded[0],
            awarded_b = result.awarded[1],
            "[ROOM] hand settled"
        );

        self.hand = None;
        self.turn_deadline = None;
        let target = self.settings.target_score.points();
        if self.totals.iter().any(|&t| t >= target) {
            self.phase = Phase::Finished;
            self.winner = match self.totals[0].cmp(&self.totals[1]) {
                std::cmp::Ordering::Greater => Some(Team::A),
                std::cmp::Ordering::Less => Some(Team::B),
                std::cmp::Ordering::Equal => None,
            };
            summary.winner = self.winner;
            summary.match_over = true;
            info!(room = %self.code, totals = ?self.totals, winner = ?self.winner, "[ROOM] match finished");
        } else {
            self.phase = Phase::Lobby;
        }
        self.dealer = next_player(self.dealer);
        self.reset_human_ready();
        self.last_settlement = Some(summary.clone());
        self.touch();
        Ok(summary)
    }

    fn reset_human_ready(&mut self) {
        for (slot, ready) in self.seats.iter().zip(self.ready.iter_mut()) {
            *ready = slot.is_bot();
        }
    }

    /// Seat whose action the room is waiting for.
    pub fn seat_to_act(&self) -> Option<Seat> {
        if !self.phase.hand_in_progress() {
            return None;
        }
        self.hand.as_ref().and_then(HandState::turn)
    }

    pub(crate) fn refresh_deadline(&mut self, now: OffsetDateTime) {
        self.turn_deadline = self
            .seat_to_act()
            .map(|_| now + Duration::seconds(i64::from(self.settings.turn_seconds)));
        debug!(room = %self.code, deadline = ?self.turn_deadline, "[ROOM] turn deadline");
    }
}
