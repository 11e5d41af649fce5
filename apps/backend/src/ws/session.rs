use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;
use crate::services::identity::PlayerIdentity;
use crate::services::rooms::actor::{
    Act, ConnectionLost, Join, JoinReply, Leave, PlayerAction, QueryLegal, Resume, RoomActor,
    RoomPush,
};
use crate::services::rooms::player_actions::GameIntent;
use crate::services::rooms::seats::JoinOutcome;
use crate::services::rooms::{RoomCode, RoomSettings};
use crate::state::app_state::AppState;
use crate::ws::protocol::{ClientMsg, ServerMsg};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(Uuid::new_v4(), app_state);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    app_state: web::Data<AppState>,
    identity: Option<PlayerIdentity>,
    room: Option<(RoomCode, Addr<RoomActor>)>,

    last_heartbeat: Instant,
    heartbeat_handle: Option<actix::SpawnHandle>,
}

impl WsSession {
    fn new(conn_id: Uuid, app_state: web::Data<AppState>) -> Self {
        Self {
            conn_id,
            app_state,
            identity: None,
            room: None,
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error(ctx: &mut ws::WebsocketContext<Self>, code: ErrorCode, message: &str) {
        Self::send_json(ctx, &ServerMsg::error(code, message));
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        Self::send_json(ctx, &ServerMsg::error(code, message));
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }

    fn player_id(&self) -> Option<String> {
        self.identity.as_ref().map(|i| i.player_id.clone())
    }

    /// Send `msg` to the room actor and run `on_ok` with its reply. Domain
    /// errors go back to this client only.
    fn request<M, T>(
        &mut self,
        ctx: &mut ws::WebsocketContext<Self>,
        addr: &Addr<RoomActor>,
        msg: M,
        on_ok: impl FnOnce(&mut Self, &mut ws::WebsocketContext<Self>, T) + 'static,
    ) where
        M: Message<Result = Result<T, DomainError>> + Send + 'static,
        T: Send + 'static,
        RoomActor: Handler<M>,
    {
        self.request_with(ctx, addr, msg, on_ok, |_, ctx, err| {
            Self::send_json(ctx, &ServerMsg::from(&err));
        });
    }

    fn request_with<M, T>(
        &mut self,
        ctx: &mut ws::WebsocketContext<Self>,
        addr: &Addr<RoomActor>,
        msg: M,
        on_ok: impl FnOnce(&mut Self, &mut ws::WebsocketContext<Self>, T) + 'static,
        on_err: impl FnOnce(&mut Self, &mut ws::WebsocketContext<Self>, DomainError) + 'static,
    ) where
        M: Message<Result = Result<T, DomainError>> + Send + 'static,
        T: Send + 'static,
        RoomActor: Handler<M>,
    {
        ctx.spawn(addr.send(msg).into_actor(self).map(
            move |res, actor, ctx| match res {
                Ok(Ok(value)) => on_ok(actor, ctx, value),
                Ok(Err(err)) => {
                    debug!(conn_id = %actor.conn_id, error = %err, "[WS SESSION] intent rejected");
                    on_err(actor, ctx, err);
                }
                Err(err) => {
                    warn!(conn_id = %actor.conn_id, error = %err, "[WS SESSION] room mailbox unavailable");
                    actor.room = None;
                    Self::send_error(ctx, ErrorCode::NotFound, "Room is gone");
                }
            },
        ));
    }

    fn welcome(&self, resume: Option<RoomCode>) -> Option<ServerMsg> {
        let identity = self.identity.as_ref()?;
        Some(ServerMsg::Welcome {
            player_id: identity.player_id.clone(),
            name: identity.name.clone(),
            token: identity.token.clone(),
            resume,
        })
    }

    /// Forget `code` if it is the room this session is entering or in.
    fn drop_room(&mut self, code: &str) {
        if self.room.as_ref().is_some_and(|(c, _)| c == code) {
            self.room = None;
        }
    }

    fn on_joined(
        &mut self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: RoomCode,
        reply: JoinReply,
    ) {
        if let Some(pid) = self.player_id() {
            self.app_state
                .identities
                .set_last_room(&pid, Some(code.clone()));
        }
        Self::send_json(
            ctx,
            &ServerMsg::RoomJoined {
                code,
                seat: reply.outcome.seat(),
                spectator: reply.outcome == JoinOutcome::Spectating,
                resumed: matches!(reply.outcome, JoinOutcome::Resumed(_)),
            },
        );
        Self::send_json(
            ctx,
            &ServerMsg::State {
                state: Box::new(reply.view),
            },
        );
    }

    /// The room is recorded before the request goes out, so a second join
    /// is refused and a close in the meantime still reaches the room.
    fn join(
        &mut self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: RoomCode,
        addr: Addr<RoomActor>,
        password: Option<String>,
    ) {
        let Some(player) = self.identity.clone() else {
            return;
        };
        let msg = Join {
            player,
            password,
            conn_id: self.conn_id,
            recipient: ctx.address().recipient::<RoomPush>(),
        };
        self.room = Some((code.clone(), addr.clone()));
        let failed_code = code.clone();
        self.request_with(
            ctx,
            &addr,
            msg,
            move |actor, ctx, reply: JoinReply| actor.on_joined(ctx, code, reply),
            move |actor, ctx, err| {
                actor.drop_room(&failed_code);
                Self::send_json(ctx, &ServerMsg::from(&err));
            },
        );
    }

    /// Answer `hello`. A player whose last room still seats them is
    /// reattached before the welcome goes out; otherwise the stale room is
    /// forgotten and the welcome carries no resume.
    fn greet(&mut self, ctx: &mut ws::WebsocketContext<Self>, identity: PlayerIdentity) {
        self.app_state.identities.attach(&identity.player_id);
        self.identity = Some(identity.clone());

        let resume = identity
            .last_room
            .clone()
            .and_then(|code| self.app_state.rooms.find(&code).ok().map(|a| (code, a)));
        let Some((code, addr)) = resume else {
            if identity.last_room.is_some() {
                self.app_state
                    .identities
                    .set_last_room(&identity.player_id, None);
            }
            if let Some(msg) = self.welcome(None) {
                Self::send_json(ctx, &msg);
            }
            return;
        };

        let msg = Resume {
            player: identity,
            conn_id: self.conn_id,
            recipient: ctx.address().recipient::<RoomPush>(),
        };
        self.room = Some((code.clone(), addr.clone()));
        ctx.spawn(addr.send(msg).into_actor(self).map(move |res, actor, ctx| {
            if let Ok(Ok(reply)) = res {
                if let Some(msg) = actor.welcome(Some(code.clone())) {
                    Self::send_json(ctx, &msg);
                }
                actor.on_joined(ctx, code, reply);
                return;
            }
            debug!(conn_id = %actor.conn_id, room = %code, "[WS SESSION] nothing to resume");
            actor.drop_room(&code);
            if let Some(pid) = actor.player_id() {
                actor.app_state.identities.set_last_room(&pid, None);
            }
            if let Some(msg) = actor.welcome(None) {
                Self::send_json(ctx, &msg);
            }
        }));
    }

    fn create_and_join(&mut self, ctx: &mut ws::WebsocketContext<Self>, settings: RoomSettings) {
        match self.app_state.rooms.create(settings) {
            Ok((code, addr)) => self.join(ctx, code, addr, None),
            Err(err) => Self::send_json(ctx, &ServerMsg::from(&err)),
        }
    }

    fn act(&mut self, ctx: &mut ws::WebsocketContext<Self>, action: PlayerAction) {
        let (Some(player_id), Some((_, addr))) = (self.player_id(), self.room.clone()) else {
            Self::send_error(ctx, ErrorCode::NotSeated, "Join a room first");
            return;
        };
        self.request(ctx, &addr, Act { player_id, action }, |_, _, ()| {});
    }

    fn handle_client(&mut self, cmd: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        if !matches!(cmd, ClientMsg::Hello { .. }) && self.identity.is_none() {
            self.send_error_and_close(ctx, ErrorCode::BadProtocol, "Must send hello first");
            return;
        }
        let in_room = self.room.is_some();

        match cmd {
            ClientMsg::Hello { .. } if self.identity.is_some() => {
                Self::send_error(ctx, ErrorCode::BadProtocol, "Already said hello");
            }
            ClientMsg::Hello {
                token,
                name,
                avatar,
            } => {
                let identity = self.app_state.identities.hello(
                    token.as_deref(),
                    name.as_deref(),
                    avatar.as_deref(),
                );
                info!(conn_id = %self.conn_id, player_id = %identity.player_id, "[WS SESSION] hello");
                self.greet(ctx, identity);
            }
            ClientMsg::ListRooms => {
                let rooms = self
                    .app_state
                    .rooms
                    .list_public(self.app_state.config.max_public_rooms_listed);
                Self::send_json(ctx, &ServerMsg::Rooms { rooms });
            }
            ClientMsg::CreateRoom { .. } | ClientMsg::JoinRoom { .. } | ClientMsg::QuickMatch { .. }
                if in_room =>
            {
                Self::send_error(ctx, ErrorCode::InvalidState, "Leave your current room first");
            }
            ClientMsg::CreateRoom { settings } => self.create_and_join(ctx, settings),
            ClientMsg::JoinRoom { code, password } => match self.app_state.rooms.find(&code) {
                Ok(addr) => {
                    let code = crate::utils::join_code::normalize_room_code(&code);
                    self.join(ctx, code, addr, password);
                }
                Err(err) => Self::send_json(ctx, &ServerMsg::from(&err)),
            },
            ClientMsg::QuickMatch { settings } => {
                match self.app_state.rooms.quick_match_candidate() {
                    Some((code, addr)) => self.join(ctx, code, addr, None),
                    None => self.create_and_join(ctx, RoomSettings {
                        is_private: false,
                        password: None,
                        ..settings
                    }),
                }
            }
            ClientMsg::LeaveRoom => {
                let (Some(player_id), Some((code, addr))) = (self.player_id(), self.room.clone())
                else {
                    Self::send_error(ctx, ErrorCode::NotSeated, "You are not in a room");
                    return;
                };
                self.request(ctx, &addr, Leave { player_id }, move |actor, ctx, ()| {
                    actor.room = None;
                    if let Some(pid) = actor.player_id() {
                        actor.app_state.identities.set_last_room(&pid, None);
                    }
                    Self::send_json(ctx, &ServerMsg::RoomLeft { code });
                });
            }
            ClientMsg::Ready { ready } => self.act(ctx, PlayerAction::Ready(ready)),
            ClientMsg::FillBots { level } => self.act(ctx, PlayerAction::FillBots(level)),
            ClientMsg::Bid { bid } => {
                self.act(ctx, PlayerAction::Game(GameIntent::Bid { bid }));
            }
            ClientMsg::Pass => self.act(ctx, PlayerAction::Game(GameIntent::Pass)),
            ClientMsg::Contra => self.act(ctx, PlayerAction::Game(GameIntent::Contra)),
            ClientMsg::Redouble => self.act(ctx, PlayerAction::Game(GameIntent::Redouble)),
            ClientMsg::Play { card } => {
                self.act(ctx, PlayerAction::Game(GameIntent::Play { card }));
            }
            ClientMsg::Chat { text } => self.act(ctx, PlayerAction::Chat(text)),
            ClientMsg::Legal => {
                let (Some(player_id), Some((_, addr))) = (self.player_id(), self.room.clone())
                else {
                    Self::send_error(ctx, ErrorCode::NotSeated, "Join a room first");
                    return;
                };
                self.request(ctx, &addr, QueryLegal { player_id }, |_, ctx, cards| {
                    Self::send_json(ctx, &ServerMsg::Legal { cards });
                });
            }
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(player_id) = self.player_id() {
            // also covers a join still in flight: the room sees the join first
            if let Some((_, addr)) = self.room.take() {
                addr.do_send(ConnectionLost {
                    player_id: player_id.clone(),
                    conn_id: self.conn_id,
                });
            }
            self.app_state
                .identities
                .detach(&player_id, Instant::now());
        }
        info!(conn_id = %self.conn_id, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let parsed: Result<ClientMsg, _> = serde_json::from_str(&text);
                match parsed {
                    Ok(cmd) => self.handle_client(cmd, ctx),
                    Err(err) => {
                        debug!(conn_id = %self.conn_id, error = %err, "[WS SESSION] bad message");
                        Self::send_error(ctx, ErrorCode::BadRequest, "Malformed message");
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<RoomPush> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: RoomPush, ctx: &mut Self::Context) -> Self::Result {
        match msg {
            RoomPush::State(state) => Self::send_json(ctx, &ServerMsg::State { state }),
            RoomPush::HandScored(summary) => {
                Self::send_json(ctx, &ServerMsg::HandScored { summary });
            }
            RoomPush::Chat(entry) => Self::send_json(ctx, &ServerMsg::Chat { entry }),
            RoomPush::Closed { code } => self.drop_room(&code),
        }
    }
}
