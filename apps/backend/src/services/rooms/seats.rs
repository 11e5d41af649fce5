//! Seat admission, leaving, disconnect/reconnect and bot backfill.

use tracing::{info, warn};

use super::{Room, SeatSlot, SeatedBot, SeatedHuman, Spectator};
use crate::ai::{bot_name, BotLevel};
use crate::domain::{Phase, Seat};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::services::identity::PlayerIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Seated(Seat),
    /// The player already held this seat and has reclaimed it.
    Resumed(Seat),
    Spectating,
}

impl JoinOutcome {
    pub fn seat(self) -> Option<Seat> {
        match self {
            JoinOutcome::Seated(s) | JoinOutcome::Resumed(s) => Some(s),
            JoinOutcome::Spectating => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    Seat(Seat),
    Spectator,
}

/// What happened when a seat was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatCleared {
    pub seat: Seat,
    /// An in-progress hand was thrown away.
    pub abandoned_hand: bool,
    /// A bot took the seat.
    pub backfilled: bool,
}

impl Room {
    /// Admit a player. Seated players rejoining (by player id) reclaim their
    /// seat without a password check.
    pub fn join(
        &mut self,
        player: &PlayerIdentity,
        password: Option<&str>,
    ) -> Result<JoinOutcome, DomainError> {
        if let Some(seat) = self.seat_of(&player.player_id) {
            if let SeatSlot::Human(h) = &mut self.seats[seat as usize] {
                h.connected = true;
                h.name = player.name.clone();
                h.avatar = player.avatar.clone();
            }
            self.touch();
            info!(room = %self.code, seat, player_id = %player.player_id, "[ROOM] seat resumed");
            return Ok(JoinOutcome::Resumed(seat));
        }
        if self.is_spectator(&player.player_id) {
            return Ok(JoinOutcome::Spectating);
        }

        if self.settings.is_private {
            let expected = self.settings.password.as_deref().unwrap_or("");
            if password.unwrap_or("") != expected {
                return Err(DomainError::validation(
                    ValidationKind::WrongPassword,
                    "Wrong room password",
                ));
            }
        }

        let open = if self.phase.hand_in_progress() {
            None
        } else {
            self.seats.iter().position(SeatSlot::is_empty)
        };
        if let Some(idx) = open {
            self.seats[idx] = SeatSlot::Human(SeatedHuman {
                player_id: player.player_id.clone(),
                name: player.name.clone(),
                avatar: player.avatar.clone(),
                connected: true,
            });
            self.ready[idx] = false;
            self.touch();
            info!(room = %self.code, seat = idx, player_id = %player.player_id, "[ROOM] player seated");
            return Ok(JoinOutcome::Seated(idx as Seat));
        }

        if !self.settings.allow_spectators {
            return Err(DomainError::conflict(ConflictKind::RoomFull, "Room is full"));
        }
        self.spectators.push(Spectator {
            player_id: player.player_id.clone(),
            name: player.name.clone(),
        });
        self.touch();
        info!(room = %self.code, player_id = %player.player_id, "[ROOM] spectator joined");
        Ok(JoinOutcome::Spectating)
    }

    /// Explicit leave. A seated leave abandons any hand in progress.
    pub fn leave(&mut self, player_id: &str) -> Result<Departure, DomainError> {
        if let Some(seat) = self.seat_of(player_id) {
            self.clear_seat(seat, "left");
            info!(room = %self.code, seat, player_id, "[ROOM] player left");
            return Ok(Departure::Seat(seat));
        }
        let before = self.spectators.len();
        self.spectators.retain(|s| s.player_id != player_id);
        if self.spectators.len() == before {
            return Err(DomainError::validation(
                ValidationKind::NotSeated,
                "You are not in this room",
            ));
        }
        self.touch();
        Ok(Departure::Spectator)
    }

    /// The player's connection dropped. Seated players keep their seat (the
    /// caller starts the grace timer); spectators are simply removed.
    pub fn mark_disconnected(&mut self, player_id: &str) -> Option<Departure> {
        if let Some(seat) = self.seat_of(player_id) {
            if let SeatSlot::Human(h) = &mut self.seats[seat as usize] {
                h.connected = false;
            }
            self.touch();
            info!(room = %self.code, seat, player_id, "[ROOM] player disconnected");
            return Some(Departure::Seat(seat));
        }
        let before = self.spectators.len();
        self.spectators.retain(|s| s.player_id != player_id);
        if self.spectators.len() != before {
            self.touch();
            return Some(Departure::Spectator);
        }
        None
    }

    /// Grace period ran out. Clears the seat only if its owner is still
    /// disconnected; a reconnect in the meantime makes this a no-op.
    pub fn expire_grace(&mut self, player_id: &str) -> Option<SeatCleared> {
        let seat = self.seat_of(player_id)?;
        match &self.seats[seat as usize] {
            SeatSlot::Human(h) if !h.connected => {}
            _ => return None,
        }
        let abandoned_hand = self.clear_seat(seat, "grace period expired");
        warn!(room = %self.code, seat, player_id, abandoned_hand, "[ROOM] reconnect grace expired");

        let backfilled = self.settings.bot_backfill;
        if backfilled {
            self.seat_bot(seat as usize, BotLevel::Normal);
        }
        Some(SeatCleared {
            seat,
            abandoned_hand,
            backfilled,
        })
    }

    /// Seat bots in every empty seat. Only between hands.
    pub fn fill_with_bots(&mut self, level: BotLevel) -> Result<Vec<Seat>, DomainError> {
        if !matches!(self.phase, Phase::Lobby | Phase::Finished) {
            return Err(DomainError::invalid_state(
                "Bots can only join between hands",
            ));
        }
        let empty: Vec<usize> = (0..4).filter(|&i| self.seats[i].is_empty()).collect();
        for &i in &empty {
            self.seat_bot(i, level);
        }
        if !empty.is_empty() {
            self.touch();
        }
        Ok(empty.into_iter().map(|i| i as Seat).collect())
    }

    fn seat_bot(&mut self, idx: usize, level: BotLevel) {
        let taken: Vec<&str> = self.seats.iter().filter_map(SeatSlot::name).collect();
        let name = (0..8)
            .map(|i| bot_name(idx + i))
            .find(|n| !taken.contains(n))
            .unwrap_or_else(|| bot_name(idx));
        info!(room = %self.code, seat = idx, bot = name, ?level, "[ROOM] bot seated");
        self.seats[idx] = SeatSlot::Bot(SeatedBot {
            name: name.to_string(),
            level,
        });
        // bots are always ready
        self.ready[idx] = true;
    }

    /// Vacate `seat`, abandoning a hand in progress. Returns whether a hand
    /// was abandoned.
    fn clear_seat(&mut self, seat: Seat, reason: &str) -> bool {
        self.seats[seat as usize] = SeatSlot::Empty;
        self.ready[seat as usize] = false;
        let abandoned = self.phase.hand_in_progress();
        if abandoned {
            self.abandon_hand(reason);
        }
        self.touch();
        abandoned
    }
}
