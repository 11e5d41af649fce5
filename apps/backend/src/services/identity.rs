//! Player identities keyed by a stable reconnect token.
//!
//! Identity-provider verification happens outside the server; a client that
//! says `hello` either presents a token minted here earlier or gets a new
//! one. The token, not the websocket connection, is what reclaims a seat.
//!
//! Sessions attach to and detach from an identity; one with no session for
//! longer than the idle TTL is dropped by [`IdentityRegistry::sweep`]. The
//! TTL must outlast the reconnect grace so a swept player never still holds
//! a seat.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};
use ulid::Ulid;
use uuid::Uuid;

use crate::errors::domain::{DomainError, NotFoundKind};

pub type PlayerId = String;

pub const MAX_NAME_CHARS: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerIdentity {
    pub player_id: PlayerId,
    pub name: String,
    pub avatar: Option<String>,
    /// 32 lowercase hex characters.
    pub token: String,
    /// Room the player was last admitted to, for resume on `hello`.
    #[serde(skip)]
    pub last_room: Option<String>,
}

struct Entry {
    identity: PlayerIdentity,
    sessions: u32,
    /// Set while no session is attached.
    idle_since: Option<Instant>,
}

#[derive(Default)]
struct Inner {
    by_token: HashMap<String, Entry>,
    token_of: HashMap<PlayerId, String>,
}

impl Inner {
    fn entry_mut(&mut self, player_id: &str) -> Option<&mut Entry> {
        let token = self.token_of.get(player_id)?;
        self.by_token.get_mut(token)
    }
}

#[derive(Default)]
pub struct IdentityRegistry {
    inner: RwLock<Inner>,
}

/// Trim and cap a display name; `None` when nothing usable remains.
pub fn clean_name(raw: &str) -> Option<String> {
    let trimmed: String = raw.trim().chars().take(MAX_NAME_CHARS).collect();
    let trimmed = trimmed.trim_end().to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn default_name(token: &str) -> String {
    format!("Player-{}", &token[..4])
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve or mint an identity.
    ///
    /// A known token returns the same player id; a supplied name or avatar
    /// replaces the stored one. An unknown or absent token mints a fresh
    /// identity.
    pub fn hello(
        &self,
        token: Option<&str>,
        name: Option<&str>,
        avatar: Option<&str>,
    ) -> PlayerIdentity {
        let name = name.and_then(clean_name);
        let avatar = avatar.map(str::trim).filter(|a| !a.is_empty());
        let mut inner = self.inner.write();

        if let Some(entry) = token.and_then(|t| inner.by_token.get_mut(t)) {
            let existing = &mut entry.identity;
            if let Some(n) = name {
                existing.name = n;
            }
            if let Some(a) = avatar {
                existing.avatar = Some(a.to_string());
            }
            debug!(player_id = %existing.player_id, "[IDENTITY] resumed");
            return existing.clone();
        }

        let token = Uuid::new_v4().simple().to_string();
        let identity = PlayerIdentity {
            player_id: Ulid::new().to_string(),
            name: name.unwrap_or_else(|| default_name(&token)),
            avatar: avatar.map(str::to_string),
            token: token.clone(),
            last_room: None,
        };
        inner
            .token_of
            .insert(identity.player_id.clone(), token.clone());
        inner.by_token.insert(
            token,
            Entry {
                identity: identity.clone(),
                sessions: 0,
                idle_since: Some(Instant::now()),
            },
        );
        info!(player_id = %identity.player_id, name = %identity.name, "[IDENTITY] minted");
        identity
    }

    pub fn get(&self, player_id: &str) -> Result<PlayerIdentity, DomainError> {
        let inner = self.inner.read();
        inner
            .token_of
            .get(player_id)
            .and_then(|t| inner.by_token.get(t))
            .map(|e| e.identity.clone())
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, "Unknown player"))
    }

    /// Record (or clear) the room a player is in.
    pub fn set_last_room(&self, player_id: &str, room: Option<String>) {
        if let Some(entry) = self.inner.write().entry_mut(player_id) {
            entry.identity.last_room = room;
        }
    }

    /// A session now speaks for this player.
    pub fn attach(&self, player_id: &str) {
        if let Some(entry) = self.inner.write().entry_mut(player_id) {
            entry.sessions += 1;
            entry.idle_since = None;
        }
    }

    /// A session for this player ended.
    pub fn detach(&self, player_id: &str, now: Instant) {
        if let Some(entry) = self.inner.write().entry_mut(player_id) {
            entry.sessions = entry.sessions.saturating_sub(1);
            if entry.sessions == 0 {
                entry.idle_since = Some(now);
            }
        }
    }

    /// Drop identities idle for longer than `ttl`. Returns how many went.
    pub fn sweep(&self, now: Instant, ttl: Duration) -> usize {
        let mut inner = self.inner.write();
        let expired: Vec<(String, PlayerId)> = inner
            .by_token
            .iter()
            .filter(|(_, e)| {
                e.sessions == 0
                    && e.idle_since
                        .is_some_and(|since| now.saturating_duration_since(since) > ttl)
            })
            .map(|(token, e)| (token.clone(), e.identity.player_id.clone()))
            .collect();
        for (token, player_id) in &expired {
            inner.by_token.remove(token);
            inner.token_of.remove(player_id);
        }
        if !expired.is_empty() {
            debug!(count = expired.len(), "[IDENTITY] swept idle identities");
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.inner.read().by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
