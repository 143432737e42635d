use serde::{Deserialize, Serialize};

use crate::game::PlayerSide;

// The wire format is fixed: `{"event": <name>, "data": <payload>}` with the
// event names below. Any change to names or payload shapes is breaking.

/// Move declared by a client. `room_id` addresses routing only; `from`, `to`
/// and `fen` are opaque to the relay.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveEvent {
    pub room_id: String,
    pub from: String,
    pub to: String,
    pub fen: String,
}

/// A move with the routing stripped, as forwarded to the rest of the room.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct RelayedMove {
    pub from: String,
    pub to: String,
    pub fen: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "joinRoom")]
    JoinRoom(String),
    #[serde(rename = "move")]
    Move(MoveEvent),
    #[serde(rename = "gameOver")]
    GameOver(String),
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    // Answers `joinRoom`; sent to the joining connection only.
    #[serde(rename = "roomJoined")]
    RoomJoined { side: PlayerSide },
    #[serde(rename = "opponentJoined")]
    OpponentJoined,
    #[serde(rename = "opponentMove")]
    OpponentMove(RelayedMove),
    #[serde(rename = "gameOver")]
    GameOver,
}
