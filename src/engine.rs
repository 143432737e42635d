use std::str::FromStr;

use chess::{ChessMove, Game, Piece, Square};

use crate::rules::{MoveRejected, Rules};

/// Rules engine backed by the `chess` crate.
pub struct ChessEngine {
    game: Game,
}

impl ChessEngine {
    pub fn new() -> Self { ChessEngine { game: Game::new() } }
}

impl Rules for ChessEngine {
    fn try_move(&mut self, from: &str, to: &str) -> Result<String, MoveRejected> {
        let from = Square::from_str(from).map_err(|_| MoveRejected)?;
        let to = Square::from_str(to).map_err(|_| MoveRejected)?;
        // A bare from/to pair carries no promotion choice; promote to a
        // queen, like the drag-and-drop boards this input comes from.
        for promotion in [None, Some(Piece::Queen)] {
            if self.game.make_move(ChessMove::new(from, to, promotion)) {
                return Ok(self.position());
            }
        }
        Err(MoveRejected)
    }

    fn is_terminal(&self) -> bool { self.game.result().is_some() }

    fn position(&self) -> String { self.game.current_position().to_string() }
}
