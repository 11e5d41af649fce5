//! Websocket wire protocol. JSON objects tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::ai::BotLevel;
use crate::domain::{Bid, Card, Seat};
use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;
use crate::services::rooms::view::{RoomSummary, RoomView};
use crate::services::rooms::{ChatEntry, HandSummary, RoomCode, RoomSettings};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello {
        #[serde(default)]
        token: Option<String>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        avatar: Option<String>,
    },
    ListRooms,
    CreateRoom {
        #[serde(default)]
        settings: RoomSettings,
    },
    JoinRoom {
        code: String,
        #[serde(default)]
        password: Option<String>,
    },
    QuickMatch {
        #[serde(default)]
        settings: RoomSettings,
    },
    LeaveRoom,
    Ready {
        #[serde(default = "default_true")]
        ready: bool,
    },
    FillBots {
        #[serde(default)]
        level: BotLevel,
    },
    Bid {
        bid: Bid,
    },
    Pass,
    Contra,
    Redouble,
    Play {
        card: Card,
    },
    Legal,
    Chat {
        text: String,
    },
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    Welcome {
        player_id: String,
        name: String,
        token: String,
        /// Room the player is still seated in, if any.
        resume: Option<RoomCode>,
    },
    Rooms {
        rooms: Vec<RoomSummary>,
    },
    RoomJoined {
        code: RoomCode,
        seat: Option<Seat>,
        spectator: bool,
        resumed: bool,
    },
    RoomLeft {
        code: RoomCode,
    },
    State {
        state: Box<RoomView>,
    },
    HandScored {
        summary: HandSummary,
    },
    Legal {
        cards: Vec<Card>,
    },
    Chat {
        entry: ChatEntry,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}

impl ServerMsg {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMsg::Error {
            code,
            message: message.into(),
        }
    }
}

impl From<&DomainError> for ServerMsg {
    fn from(err: &DomainError) -> Self {
        ServerMsg::error(ErrorCode::from(err), err.detail())
    }
}
