// Test doubles that cannot live in the "tests" folder, because unit tests
// use them too.

use std::collections::HashSet;

use crate::rules::{MoveRejected, Rules};

/// Scripted stand-in for the rules engine. Accepts every move that was not
/// explicitly rejected, numbering positions "pos-0", "pos-1", ... so tests
/// can assert which serialization ended up where.
pub struct ScriptedRules {
    moves_applied: usize,
    rejects: HashSet<(String, String)>,
    terminal_after: Option<usize>,
}

impl ScriptedRules {
    pub fn new() -> Self {
        ScriptedRules { moves_applied: 0, rejects: HashSet::new(), terminal_after: None }
    }

    /// Marks `from` -> `to` as illegal.
    pub fn rejecting(mut self, from: &str, to: &str) -> Self {
        self.rejects.insert((from.to_owned(), to.to_owned()));
        self
    }

    /// Declares the game terminal once this many moves have been applied.
    pub fn terminal_after(mut self, moves: usize) -> Self {
        self.terminal_after = Some(moves);
        self
    }
}

impl Rules for ScriptedRules {
    fn try_move(&mut self, from: &str, to: &str) -> Result<String, MoveRejected> {
        if self.is_terminal() || self.rejects.contains(&(from.to_owned(), to.to_owned())) {
            return Err(MoveRejected);
        }
        self.moves_applied += 1;
        Ok(self.position())
    }

    fn is_terminal(&self) -> bool {
        self.terminal_after.is_some_and(|moves| self.moves_applied >= moves)
    }

    fn position(&self) -> String { format!("pos-{}", self.moves_applied) }
}
