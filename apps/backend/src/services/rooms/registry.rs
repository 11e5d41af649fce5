//! Owned map of live rooms.
//!
//! The registry only holds each room's actor address and its latest
//! [`RoomSummary`]; the room state itself lives inside the actor. Summaries
//! are pushed by the actor after every mutation so listing never has to
//! round-trip through a room's mailbox.

use std::sync::Arc;
use std::time::Duration;

use actix::{Actor, Addr};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::Rng;
use time::OffsetDateTime;
use tracing::info;

use super::actor::RoomActor;
use super::view::RoomSummary;
use super::{Room, RoomCode, RoomSettings};
use crate::config::server::ServerConfig;
use crate::domain::Phase;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::utils::join_code::{generate_room_code, normalize_room_code};

const CODE_ATTEMPTS: usize = 32;

/// Timer settings handed to every room actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomTimings {
    pub reconnect_grace: Duration,
    pub bot_delay: Duration,
}

impl From<&ServerConfig> for RoomTimings {
    fn from(cfg: &ServerConfig) -> Self {
        Self {
            reconnect_grace: cfg.reconnect_grace,
            bot_delay: cfg.bot_delay,
        }
    }
}

struct RoomEntry {
    addr: Addr<RoomActor>,
    summary: RoomSummary,
}

pub struct RoomRegistry {
    rooms: DashMap<RoomCode, RoomEntry>,
    timings: RoomTimings,
}

impl RoomRegistry {
    pub fn new(timings: RoomTimings) -> Self {
        Self {
            rooms: DashMap::new(),
            timings,
        }
    }

    /// Validate `settings`, pick a free code and start the room's actor.
    ///
    /// Must be called from within a running actix system.
    pub fn create(
        self: &Arc<Self>,
        settings: RoomSettings,
    ) -> Result<(RoomCode, Addr<RoomActor>), DomainError> {
        settings.validate()?;
        let seed: u64 = rand::rng().random();
        for _ in 0..CODE_ATTEMPTS {
            let code = generate_room_code();
            let Entry::Vacant(slot) = self.rooms.entry(code.clone()) else {
                continue;
            };
            let room = Room::new(code.clone(), settings, seed, OffsetDateTime::now_utc())?;
            let summary = room.summary();
            let addr = RoomActor::new(room, Arc::clone(self), self.timings).start();
            slot.insert(RoomEntry {
                addr: addr.clone(),
                summary,
            });
            info!(room = %code, "[REGISTRY] room created");
            return Ok((code, addr));
        }
        Err(DomainError::conflict(
            ConflictKind::CodeExhausted,
            "Could not allocate a room code",
        ))
    }

    pub fn find(&self, code: &str) -> Result<Addr<RoomActor>, DomainError> {
        let code = normalize_room_code(code);
        self.rooms
            .get(&code)
            .map(|e| e.addr.clone())
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Room, "Room not found"))
    }

    pub fn destroy(&self, code: &str) -> bool {
        let removed = self.rooms.remove(code).is_some();
        if removed {
            info!(room = %code, "[REGISTRY] room destroyed");
        }
        removed
    }

    pub fn update_summary(&self, summary: RoomSummary) {
        if let Some(mut entry) = self.rooms.get_mut(&summary.code) {
            entry.summary = summary;
        }
    }

    pub fn summary(&self, code: &str) -> Option<RoomSummary> {
        self.rooms.get(code).map(|e| e.summary.clone())
    }

    /// Public rooms, newest first.
    pub fn list_public(&self, limit: usize) -> Vec<RoomSummary> {
        let mut list: Vec<RoomSummary> = self
            .rooms
            .iter()
            .filter(|e| !e.summary.is_private)
            .map(|e| e.summary.clone())
            .collect();
        list.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
        list.truncate(limit);
        list
    }

    /// Newest public room waiting in the lobby with a free seat.
    pub fn quick_match_candidate(&self) -> Option<(RoomCode, Addr<RoomActor>)> {
        self.rooms
            .iter()
            .filter(|e| {
                !e.summary.is_private && e.summary.phase == Phase::Lobby && e.summary.open_seats > 0
            })
            .max_by_key(|e| e.summary.created_at_ms)
            .map(|e| (e.key().clone(), e.addr.clone()))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
