use serde::{Deserialize, Serialize};

use super::{
    action::NightAction,
    chat::ChatMessage,
    player::PlayerId,
    role::{Faction, Role},
    room::{Room, RoomState, SettingsPatch},
};

/// Requests a connected client may send.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    CreateRoom {
        #[serde(default)]
        name: Option<String>,
    },
    JoinRoom {
        code: String,
        #[serde(default)]
        name: Option<String>,
    },
    BecomeBot {
        code: String,
        #[serde(default)]
        bot_name: Option<String>,
    },
    LeaveRoom {
        code: String,
    },
    SetReady {
        code: String,
        ready: bool,
    },
    UpdateSettings {
        code: String,
        settings: SettingsPatch,
    },
    StartGame {
        code: String,
    },
    NightAction {
        code: String,
        action: NightAction,
    },
    Vote {
        code: String,
        target: PlayerId,
    },
    Chat {
        code: String,
        msg: String,
    },
}

/// Everything the server pushes to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerEvent {
    Welcome {
        player_id: PlayerId,
    },
    Ack {
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
    Error {
        kind: String,
        message: String,
    },
    RoomUpdate {
        room: Room,
    },
    YourRole {
        role: Role,
    },
    PhaseStarted {
        phase: RoomState,
        duration: u64,
    },
    InspectResult {
        target: PlayerId,
        role: Role,
    },
    VotesUpdate {
        count: usize,
    },
    GameOver {
        winner: Faction,
    },
    Chat {
        message: ChatMessage,
    },
}

impl ServerEvent {
    pub fn snapshot(room: &Room) -> Self {
        ServerEvent::RoomUpdate { room: room.clone() }
    }
}
