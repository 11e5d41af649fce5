//! Game intents routed by phase: auction intents to the bidding machine,
//! plays to the trick engine. Also bot and auto-play decisions, which go
//! through the very same entry point.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use super::{unix_ms, ChatEntry, HandSummary, Room, SeatSlot, CHAT_HISTORY, CHAT_MAX_CHARS};
use crate::ai::{create_ai, AiPlayer, BidDecision, BotLevel, Heuristic, RandomPlayer};
use crate::domain::player_view::SeatView;
use crate::domain::seed_derivation::derive_bot_seed;
use crate::domain::{AuctionOutcome, Bid, Card, Phase, Seat};
use crate::errors::domain::{DomainError, ValidationKind};

/// An in-hand action by the seat holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GameIntent {
    Bid { bid: Bid },
    Pass,
    Contra,
    Redouble,
    Play { card: Card },
}

/// Side effects of an accepted intent the caller may want to announce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentOutcome {
    pub redealt: bool,
    pub auction_ended: bool,
    pub trick_winner: Option<Seat>,
    pub hand_scored: Option<HandSummary>,
}

impl Room {
    /// Apply `intent` for `seat`. Nothing changes when it is rejected.
    pub fn apply_intent(
        &mut self,
        seat: Seat,
        intent: GameIntent,
        now: OffsetDateTime,
    ) -> Result<IntentOutcome, DomainError> {
        let rules = self.settings.rules.clone();
        let phase = self.phase;
        let hand = self
            .hand
            .as_mut()
            .filter(|_| phase.hand_in_progress())
            .ok_or_else(|| DomainError::invalid_state("No hand in progress"))?;

        let mut outcome = IntentOutcome::default();
        match (phase, intent) {
            (Phase::Bidding, GameIntent::Bid { bid }) => {
                hand.bid(seat, bid, &rules)?;
            }
            (Phase::Bidding, GameIntent::Pass) => match hand.pass(seat, &rules)? {
                AuctionOutcome::Redeal => outcome.redealt = true,
                AuctionOutcome::Ended(_) => outcome.auction_ended = true,
                AuctionOutcome::Continue => {}
            },
            (Phase::Bidding, GameIntent::Contra) => {
                if let AuctionOutcome::Ended(_) = hand.contra(seat, &rules)? {
                    outcome.auction_ended = true;
                }
            }
            (Phase::Trick, GameIntent::Redouble) => hand.redouble(seat)?,
            (Phase::Trick, GameIntent::Play { card }) => {
                let played = hand.play(seat, card)?;
                outcome.trick_winner = played.trick_winner;
                if let Some(team) = played.belote_scored {
                    info!(room = %self.code, seat, ?team, "[ROOM] belote");
                }
                if played.hand_completed {
                    outcome.hand_scored = Some(self.finish_hand()?);
                }
            }
            (Phase::Bidding, _) => {
                return Err(DomainError::invalid_state("The auction is still running"))
            }
            _ => return Err(DomainError::invalid_state("The auction is over")),
        }

        if outcome.redealt {
            self.redeal(now);
        } else if outcome.auction_ended {
            self.phase = Phase::Trick;
            if let Some(contract) = self.hand.as_ref().and_then(|h| h.contract) {
                info!(
                    room = %self.code,
                    declarer = contract.declarer,
                    trump = ?contract.trump,
                    level = ?contract.level,
                    contra = ?contract.contra,
                    "[ROOM] auction ended"
                );
            }
        }
        if outcome.hand_scored.is_none() {
            self.refresh_deadline(now);
        }
        self.touch();
        Ok(outcome)
    }

    /// Legal cards for `seat`. Empty unless it is that seat's turn to play.
    pub fn legal_plays(&self, seat: Seat) -> Vec<Card> {
        match (&self.hand, self.phase) {
            (Some(hand), Phase::Trick) => hand.legal_plays(seat),
            _ => Vec::new(),
        }
    }

    pub fn seat_view(&self, seat: Seat) -> Option<SeatView> {
        let hand = self.hand.as_ref()?;
        Some(SeatView::from_hand(hand, seat, &self.settings.rules))
    }

    /// Bot level sitting at `seat`, if it is a bot.
    pub fn bot_at(&self, seat: Seat) -> Option<BotLevel> {
        match &self.seats[seat as usize] {
            SeatSlot::Bot(b) => Some(b.level),
            _ => None,
        }
    }

    /// Decide the action for `seat` with `ai`, falling back to a legal
    /// default if the bot fails or proposes something the room rejects.
    pub fn decide_for(&self, seat: Seat, ai: &dyn AiPlayer) -> Option<GameIntent> {
        let view = self.seat_view(seat)?;
        let decided = if view.is_bidding() {
            ai.choose_bid(&view).map(|d| match d {
                BidDecision::Bid(bid) => GameIntent::Bid { bid },
                BidDecision::Pass => GameIntent::Pass,
            })
        } else {
            ai.choose_play(&view).map(|card| GameIntent::Play { card })
        };
        match decided {
            Ok(intent) => Some(intent),
            Err(e) => {
                warn!(room = %self.code, seat, error = %e, "[ROOM] bot failed, using fallback");
                let fallback = RandomPlayer::new(Some(self.bot_seed(seat)));
                if view.is_bidding() {
                    Some(GameIntent::Pass)
                } else {
                    fallback
                        .choose_play(&view)
                        .ok()
                        .map(|card| GameIntent::Play { card })
                }
            }
        }
    }

    /// Let the bot at `seat` act, if it is its turn.
    pub fn run_bot_turn(&mut self, seat: Seat, now: OffsetDateTime) -> Option<IntentOutcome> {
        let level = self.bot_at(seat)?;
        if self.seat_to_act() != Some(seat) {
            return None;
        }
        let ai = create_ai(level, Some(self.bot_seed(seat)));
        self.act_for(seat, ai.as_ref(), now)
    }

    /// Act for a human whose turn deadline expired.
    pub fn auto_play(&mut self, seat: Seat, now: OffsetDateTime) -> Option<IntentOutcome> {
        if self.seat_to_act() != Some(seat) {
            return None;
        }
        info!(room = %self.code, seat, "[ROOM] turn expired, auto-playing");
        let ai = Heuristic::new(Some(self.bot_seed(seat)));
        self.act_for(seat, &ai, now)
    }

    fn act_for(
        &mut self,
        seat: Seat,
        ai: &dyn AiPlayer,
        now: OffsetDateTime,
    ) -> Option<IntentOutcome> {
        let intent = self.decide_for(seat, ai)?;
        debug!(room = %self.code, seat, ?intent, "[ROOM] bot decision");
        match self.apply_intent(seat, intent, now) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(room = %self.code, seat, error = %e, "[ROOM] bot intent rejected, using fallback");
                let fallback = match intent {
                    GameIntent::Bid { .. } => Some(GameIntent::Pass),
                    _ => self
                        .legal_plays(seat)
                        .first()
                        .map(|&card| GameIntent::Play { card }),
                }?;
                self.apply_intent(seat, fallback, now).ok()
            }
        }
    }

    fn bot_seed(&self, seat: Seat) -> u64 {
        let played = self.hand.as_ref().map_or(0, |h| u64::from(h.cards_played));
        derive_bot_seed(self.seed, self.deal_no, seat).wrapping_add(played)
    }

    /// Append a chat line from a seated player or spectator.
    pub fn chat(
        &mut self,
        player_id: &str,
        text: &str,
        now: OffsetDateTime,
    ) -> Result<ChatEntry, DomainError> {
        let name = if let Some(seat) = self.seat_of(player_id) {
            self.seats[seat as usize].name().unwrap_or_default().to_string()
        } else if let Some(s) = self.spectators.iter().find(|s| s.player_id == player_id) {
            s.name.clone()
        } else {
            return Err(DomainError::validation(
                ValidationKind::NotSeated,
                "You are not in this room",
            ));
        };
        let text: String = text.trim().chars().take(CHAT_MAX_CHARS).collect();
        if text.is_empty() {
            return Err(DomainError::validation_other("Empty chat message"));
        }
        let entry = ChatEntry {
            player_id: player_id.to_string(),
            name,
            text,
            at_ms: unix_ms(now),
        };
        self.chat.push_back(entry.clone());
        while self.chat.len() > CHAT_HISTORY {
            self.chat.pop_front();
        }
        Ok(entry)
    }
}
