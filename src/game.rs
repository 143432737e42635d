use serde::{Deserialize, Serialize};

/// Side assignment, decided by the relay when a connection joins a room.
/// The first member of a room is White and moves first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerSide {
    White,
    Black,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TurnOwner {
    Local,
    Remote,
}

/// Local view of the shared game. `position` is the display-authoritative
/// serialization (for remote moves it comes verbatim from the opponent);
/// the rules engine keeps its own internal state alongside.
///
/// Invariant: `turn_owner` flips to `Remote` exactly when a locally
/// validated move is recorded and back to `Local` exactly when a remote
/// move is recorded. Once `terminal` is set it never clears and all further
/// local input is dropped.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GameState {
    position: String,
    turn_owner: TurnOwner,
    terminal: bool,
}

impl GameState {
    pub fn new(turn_owner: TurnOwner, position: String) -> Self {
        GameState { position, turn_owner, terminal: false }
    }

    pub fn position(&self) -> &str { &self.position }
    pub fn turn_owner(&self) -> TurnOwner { self.turn_owner }
    pub fn terminal(&self) -> bool { self.terminal }

    pub fn can_move_locally(&self) -> bool {
        self.turn_owner == TurnOwner::Local && !self.terminal
    }

    pub(crate) fn record_local_move(&mut self, position: String) {
        self.position = position;
        self.turn_owner = TurnOwner::Remote;
    }

    pub(crate) fn record_remote_move(&mut self, position: String) {
        self.position = position;
        self.turn_owner = TurnOwner::Local;
    }

    pub(crate) fn set_terminal(&mut self) { self.terminal = true; }
}
