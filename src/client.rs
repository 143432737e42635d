use std::collections::VecDeque;

use crate::event::{ClientEvent, MoveEvent, RelayedMove, ServerEvent};
use crate::game::{GameState, PlayerSide, TurnOwner};
use crate::rules::Rules;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveAttemptOutcome {
    /// Validated, applied locally and queued for the relay.
    Played,
    /// Rejected by the rules engine. Nothing was sent.
    Illegal,
    /// Dropped without consulting the engine: not this side's turn, game
    /// over, or no game in progress.
    Ignored,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    None,
    Joined(PlayerSide),
    OpponentJoined,
    OpponentMoved,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EventError {
    CannotApplyEvent(String),
    /// A relayed move failed the local legality replay: the two boards no
    /// longer agree, and there is no way back.
    Desynchronized { from: String, to: String },
}

#[derive(Debug)]
pub enum SessionStage {
    /// Connected, not in a room.
    Idle,
    /// `joinRoom` sent, side assignment pending.
    Joining { room_id: String },
    Playing { room_id: String, side: PlayerSide, game: GameState },
}

/// Client-side session: owns the local game state, gates input by turn and
/// reconciles the board with relayed opponent moves. Outgoing events are
/// staged in a queue the driver drains via `next_outgoing_event`.
pub struct ParticipantState {
    engine: Box<dyn Rules>,
    stage: SessionStage,
    opponent_present: bool,
    outgoing: VecDeque<ClientEvent>,
}

impl ParticipantState {
    pub fn new(engine: Box<dyn Rules>) -> Self {
        ParticipantState {
            engine,
            stage: SessionStage::Idle,
            opponent_present: false,
            outgoing: VecDeque::new(),
        }
    }

    pub fn stage(&self) -> &SessionStage { &self.stage }
    pub fn is_joined(&self) -> bool { !matches!(self.stage, SessionStage::Idle) }
    pub fn opponent_present(&self) -> bool { self.opponent_present }

    pub fn game(&self) -> Option<&GameState> {
        match &self.stage {
            SessionStage::Playing { game, .. } => Some(game),
            _ => None,
        }
    }

    /// Events queued for the relay, in send order.
    pub fn next_outgoing_event(&mut self) -> Option<ClientEvent> { self.outgoing.pop_front() }

    pub fn join(&mut self, room_id: String) {
        self.outgoing.push_back(ClientEvent::JoinRoom(room_id.clone()));
        self.stage = SessionStage::Joining { room_id };
    }

    pub fn attempt_move(&mut self, from: &str, to: &str) -> MoveAttemptOutcome {
        let SessionStage::Playing { room_id, game, .. } = &mut self.stage else {
            return MoveAttemptOutcome::Ignored;
        };
        if !game.can_move_locally() {
            return MoveAttemptOutcome::Ignored;
        }
        let Ok(fen) = self.engine.try_move(from, to) else {
            return MoveAttemptOutcome::Illegal;
        };
        game.record_local_move(fen.clone());
        self.outgoing.push_back(ClientEvent::Move(MoveEvent {
            room_id: room_id.clone(),
            from: from.to_owned(),
            to: to.to_owned(),
            fen,
        }));
        if self.engine.is_terminal() {
            game.set_terminal();
            self.outgoing.push_back(ClientEvent::GameOver(room_id.clone()));
        }
        MoveAttemptOutcome::Played
    }

    pub fn process_server_event(&mut self, event: ServerEvent) -> Result<NotableEvent, EventError> {
        match event {
            ServerEvent::RoomJoined { side } => {
                let SessionStage::Joining { room_id } = &self.stage else {
                    return Err(EventError::CannotApplyEvent(
                        "roomJoined outside of a join handshake".to_owned(),
                    ));
                };
                let turn_owner = match side {
                    PlayerSide::White => TurnOwner::Local,
                    PlayerSide::Black => TurnOwner::Remote,
                };
                self.stage = SessionStage::Playing {
                    room_id: room_id.clone(),
                    side,
                    game: GameState::new(turn_owner, self.engine.position()),
                };
                Ok(NotableEvent::Joined(side))
            }
            ServerEvent::OpponentJoined => {
                self.opponent_present = true;
                Ok(NotableEvent::OpponentJoined)
            }
            ServerEvent::OpponentMove(RelayedMove { from, to, fen }) => {
                self.apply_remote_move(from, to, fen)
            }
            ServerEvent::GameOver => {
                let SessionStage::Playing { game, .. } = &mut self.stage else {
                    return Err(EventError::CannotApplyEvent(
                        "gameOver before a game started".to_owned(),
                    ));
                };
                if game.terminal() {
                    // Our own declaration, echoed back by the relay.
                    return Ok(NotableEvent::None);
                }
                game.set_terminal();
                Ok(NotableEvent::GameOver)
            }
        }
    }

    fn apply_remote_move(
        &mut self, from: String, to: String, fen: String,
    ) -> Result<NotableEvent, EventError> {
        let SessionStage::Playing { game, .. } = &mut self.stage else {
            return Err(EventError::CannotApplyEvent(
                "opponentMove before a game started".to_owned(),
            ));
        };
        if game.terminal() {
            return Err(EventError::CannotApplyEvent("opponentMove after game over".to_owned()));
        }
        // Replay through the local engine rather than trusting the payload.
        // A rejected replay means the two boards have diverged.
        if self.engine.try_move(&from, &to).is_err() {
            return Err(EventError::Desynchronized { from, to });
        }
        // The sender's serialization stays authoritative for display.
        game.record_remote_move(fen);
        if self.engine.is_terminal() {
            game.set_terminal();
        }
        Ok(NotableEvent::OpponentMoved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::ScriptedRules;

    fn playing_participant(side: PlayerSide) -> ParticipantState {
        let mut state = ParticipantState::new(Box::new(ScriptedRules::new()));
        state.join("abc".to_owned());
        assert_eq!(state.next_outgoing_event(), Some(ClientEvent::JoinRoom("abc".to_owned())));
        state.process_server_event(ServerEvent::RoomJoined { side }).unwrap();
        state
    }

    #[test]
    fn join_marks_the_session_before_any_server_answer() {
        let mut state = ParticipantState::new(Box::new(ScriptedRules::new()));
        assert!(!state.is_joined());
        state.join("abc".to_owned());
        assert!(state.is_joined());
        assert!(state.game().is_none());
    }

    #[test]
    fn input_is_ignored_until_a_side_is_assigned() {
        let mut state = ParticipantState::new(Box::new(ScriptedRules::new()));
        assert_eq!(state.attempt_move("e2", "e4"), MoveAttemptOutcome::Ignored);
        state.join("abc".to_owned());
        state.next_outgoing_event();
        assert_eq!(state.attempt_move("e2", "e4"), MoveAttemptOutcome::Ignored);
        assert!(state.next_outgoing_event().is_none());
    }

    #[test]
    fn side_assignment_sets_the_first_mover() {
        let state = playing_participant(PlayerSide::White);
        assert_eq!(state.game().unwrap().turn_owner(), TurnOwner::Local);
        let state = playing_participant(PlayerSide::Black);
        assert_eq!(state.game().unwrap().turn_owner(), TurnOwner::Remote);
    }

    #[test]
    fn game_events_before_joining_are_errors() {
        let mut state = ParticipantState::new(Box::new(ScriptedRules::new()));
        let remote_move = ServerEvent::OpponentMove(RelayedMove {
            from: "e2".to_owned(),
            to: "e4".to_owned(),
            fen: "pos-1".to_owned(),
        });
        assert!(matches!(
            state.process_server_event(remote_move),
            Err(EventError::CannotApplyEvent(_))
        ));
        assert!(matches!(
            state.process_server_event(ServerEvent::GameOver),
            Err(EventError::CannotApplyEvent(_))
        ));
    }

    #[test]
    fn opponent_presence_is_a_display_flag_only() {
        let mut state = playing_participant(PlayerSide::White);
        assert!(!state.opponent_present());
        assert_eq!(
            state.process_server_event(ServerEvent::OpponentJoined),
            Ok(NotableEvent::OpponentJoined)
        );
        assert!(state.opponent_present());
        assert_eq!(state.game().unwrap().turn_owner(), TurnOwner::Local);
    }
}
