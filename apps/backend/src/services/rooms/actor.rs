//! Single-writer room actor.
//!
//! Every inbound intent, bot move and timer expiry for one room is a message
//! or a scheduled closure on this actor, so room mutations never overlap.
//! Bot think-time, reconnect grace and auto-play deadlines are `run_later`
//! closures on the same context; each one re-checks the room revision (or
//! the seat owner's connection) before acting, so a stale timer is a no-op.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use actix::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use super::player_actions::{GameIntent, IntentOutcome};
use super::registry::{RoomRegistry, RoomTimings};
use super::seats::{Departure, JoinOutcome};
use super::view::RoomView;
use super::{ChatEntry, HandSummary, Room, RoomCode};
use crate::ai::{think_delay, BotLevel};
use crate::domain::rules::TurnTimeout;
use crate::domain::{Card, Seat};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::services::identity::{PlayerId, PlayerIdentity};

/// Pushed from a room to each connected member.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub enum RoomPush {
    State(Box<RoomView>),
    HandScored(HandSummary),
    Chat(ChatEntry),
    /// The member is no longer in this room.
    Closed { code: RoomCode },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinReply {
    pub outcome: JoinOutcome,
    pub view: RoomView,
}

#[derive(Message)]
#[rtype(result = "Result<JoinReply, DomainError>")]
pub struct Join {
    pub player: PlayerIdentity,
    pub password: Option<String>,
    pub conn_id: Uuid,
    pub recipient: Recipient<RoomPush>,
}

/// Reattach a player who still holds a seat here. Anything else, including
/// a player whose seat was cleared by grace expiry, is `NotSeated`.
#[derive(Message)]
#[rtype(result = "Result<JoinReply, DomainError>")]
pub struct Resume {
    pub player: PlayerIdentity,
    pub conn_id: Uuid,
    pub recipient: Recipient<RoomPush>,
}

#[derive(Message)]
#[rtype(result = "Result<(), DomainError>")]
pub struct Leave {
    pub player_id: PlayerId,
}

/// A member's connection went away. Ignored if the player has since
/// attached through a newer connection.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ConnectionLost {
    pub player_id: PlayerId,
    pub conn_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    Ready(bool),
    FillBots(BotLevel),
    Game(GameIntent),
    Chat(String),
}

#[derive(Message)]
#[rtype(result = "Result<(), DomainError>")]
pub struct Act {
    pub player_id: PlayerId,
    pub action: PlayerAction,
}

#[derive(Message)]
#[rtype(result = "Result<Vec<Card>, DomainError>")]
pub struct QueryLegal {
    pub player_id: PlayerId,
}

/// Copy of the full room state.
#[derive(Message)]
#[rtype(result = "Room")]
pub struct Inspect;

struct Member {
    conn_id: Uuid,
    recipient: Recipient<RoomPush>,
}

pub struct RoomActor {
    room: Room,
    registry: Arc<RoomRegistry>,
    timings: RoomTimings,
    members: HashMap<PlayerId, Member>,
    grace_timers: HashMap<PlayerId, SpawnHandle>,
    turn_timer: Option<SpawnHandle>,
}

fn not_seated() -> DomainError {
    DomainError::validation(ValidationKind::NotSeated, "You are not seated in this room")
}

impl RoomActor {
    pub fn new(room: Room, registry: Arc<RoomRegistry>, timings: RoomTimings) -> Self {
        Self {
            room,
            registry,
            timings,
            members: HashMap::new(),
            grace_timers: HashMap::new(),
            turn_timer: None,
        }
    }

    /// Broadcast, publish the summary, tear down an empty room, and arm the
    /// next bot or auto-play timer. Runs after every accepted mutation.
    fn after_change(&mut self, ctx: &mut Context<Self>, outcome: Option<IntentOutcome>) {
        if let Some(summary) = outcome.and_then(|o| o.hand_scored) {
            self.push_all(&RoomPush::HandScored(summary));
        }
        self.broadcast_state();

        if self.room.is_abandoned() {
            self.registry.destroy(&self.room.code);
            ctx.stop();
            return;
        }
        self.registry.update_summary(self.room.summary());
        self.schedule_turn(ctx);
    }

    fn push_all(&self, push: &RoomPush) {
        for member in self.members.values() {
            // best effort: a dead session must not block the others
            member.recipient.do_send(push.clone());
        }
    }

    fn broadcast_state(&self) {
        for (player_id, member) in &self.members {
            let view = self.room.view_for(self.room.seat_of(player_id));
            member.recipient.do_send(RoomPush::State(Box::new(view)));
        }
    }

    fn schedule_turn(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.turn_timer.take() {
            ctx.cancel_future(handle);
        }
        let Some(seat) = self.room.seat_to_act() else {
            return;
        };
        let revision = self.room.revision;

        if let Some(level) = self.room.bot_at(seat) {
            let delay = think_delay(level, self.timings.bot_delay);
            self.turn_timer = Some(ctx.run_later(delay, move |act, ctx| {
                act.turn_timer = None;
                if act.room.revision != revision {
                    return;
                }
                let outcome = act.room.run_bot_turn(seat, OffsetDateTime::now_utc());
                if outcome.is_some() {
                    act.after_change(ctx, outcome);
                }
            }));
            return;
        }

        if self.room.settings.rules.turn_timeout == TurnTimeout::AutoPlay {
            let delay = Duration::from_secs(u64::from(self.room.settings.turn_seconds));
            self.turn_timer = Some(ctx.run_later(delay, move |act, ctx| {
                act.turn_timer = None;
                if act.room.revision != revision {
                    return;
                }
                let outcome = act.room.auto_play(seat, OffsetDateTime::now_utc());
                if outcome.is_some() {
                    act.after_change(ctx, outcome);
                }
            }));
        }
    }

    fn start_grace(&mut self, player_id: PlayerId, ctx: &mut Context<Self>) {
        let grace = self.timings.reconnect_grace;
        let pid = player_id.clone();
        let handle = ctx.run_later(grace, move |act, ctx| {
            act.grace_timers.remove(&pid);
            if act.room.expire_grace(&pid).is_some() {
                act.after_change(ctx, None);
            }
        });
        if let Some(old) = self.grace_timers.insert(player_id, handle) {
            ctx.cancel_future(old);
        }
    }

    fn cancel_grace(&mut self, player_id: &str, ctx: &mut Context<Self>) {
        if let Some(handle) = self.grace_timers.remove(player_id) {
            ctx.cancel_future(handle);
            debug!(room = %self.room.code, player_id, "[ROOM] grace timer cancelled");
        }
    }
}

impl Actor for RoomActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(room = %self.room.code, "[ROOM] actor started");
        // a room nobody ever joins is collected after one grace period
        ctx.run_later(self.timings.reconnect_grace, |act, ctx| {
            if act.room.is_abandoned() {
                act.registry.destroy(&act.room.code);
                ctx.stop();
            }
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!(room = %self.room.code, "[ROOM] actor stopped");
    }
}

impl Handler<Join> for RoomActor {
    type Result = Result<JoinReply, DomainError>;

    fn handle(&mut self, msg: Join, ctx: &mut Self::Context) -> Self::Result {
        let outcome = self
            .room
            .join(&msg.player, msg.password.as_deref())?;
        if let JoinOutcome::Resumed(_) = outcome {
            self.cancel_grace(&msg.player.player_id, ctx);
        }
        self.members.insert(
            msg.player.player_id.clone(),
            Member {
                conn_id: msg.conn_id,
                recipient: msg.recipient,
            },
        );
        self.after_change(ctx, None);
        Ok(JoinReply {
            outcome,
            view: self.room.view_for(outcome.seat()),
        })
    }
}

impl Handler<Resume> for RoomActor {
    type Result = Result<JoinReply, DomainError>;

    fn handle(&mut self, msg: Resume, ctx: &mut Self::Context) -> Self::Result {
        if self.room.seat_of(&msg.player.player_id).is_none() {
            return Err(not_seated());
        }
        <Self as Handler<Join>>::handle(
            self,
            Join {
                player: msg.player,
                password: None,
                conn_id: msg.conn_id,
                recipient: msg.recipient,
            },
            ctx,
        )
    }
}

impl Handler<Leave> for RoomActor {
    type Result = Result<(), DomainError>;

    fn handle(&mut self, msg: Leave, ctx: &mut Self::Context) -> Self::Result {
        self.room.leave(&msg.player_id)?;
        self.cancel_grace(&msg.player_id, ctx);
        if let Some(member) = self.members.remove(&msg.player_id) {
            member.recipient.do_send(RoomPush::Closed {
                code: self.room.code.clone(),
            });
        }
        self.after_change(ctx, None);
        Ok(())
    }
}

impl Handler<ConnectionLost> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: ConnectionLost, ctx: &mut Self::Context) {
        match self.members.get(&msg.player_id) {
            Some(m) if m.conn_id == msg.conn_id => {}
            _ => return,
        }
        self.members.remove(&msg.player_id);
        match self.room.mark_disconnected(&msg.player_id) {
            Some(Departure::Seat(_)) => self.start_grace(msg.player_id, ctx),
            Some(Departure::Spectator) => {}
            None => return,
        }
        self.after_change(ctx, None);
    }
}

impl Handler<Act> for RoomActor {
    type Result = Result<(), DomainError>;

    fn handle(&mut self, msg: Act, ctx: &mut Self::Context) -> Self::Result {
        let now = OffsetDateTime::now_utc();
        let outcome = match msg.action {
            PlayerAction::Ready(ready) => {
                self.room.set_ready(&msg.player_id, ready, now)?;
                None
            }
            PlayerAction::FillBots(level) => {
                self.room.seat_of(&msg.player_id).ok_or_else(not_seated)?;
                self.room.fill_with_bots(level)?;
                self.room.maybe_start(now);
                None
            }
            PlayerAction::Game(intent) => {
                let seat: Seat = self.room.seat_of(&msg.player_id).ok_or_else(not_seated)?;
                Some(self.room.apply_intent(seat, intent, now)?)
            }
            PlayerAction::Chat(text) => {
                let entry = self.room.chat(&msg.player_id, &text, now)?;
                self.push_all(&RoomPush::Chat(entry));
                return Ok(());
            }
        };
        self.after_change(ctx, outcome);
        Ok(())
    }
}

impl Handler<QueryLegal> for RoomActor {
    type Result = Result<Vec<Card>, DomainError>;

    fn handle(&mut self, msg: QueryLegal, _ctx: &mut Self::Context) -> Self::Result {
        let seat = self.room.seat_of(&msg.player_id).ok_or_else(not_seated)?;
        Ok(self.room.legal_plays(seat))
    }
}

impl Handler<Inspect> for RoomActor {
    type Result = MessageResult<Inspect>;

    fn handle(&mut self, _msg: Inspect, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.room.clone())
    }
}
