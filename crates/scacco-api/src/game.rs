//! The game session facade consumed by the UI layer.

use tracing::debug;

use scacco_core::{Color, GameStatus, Move, Position, Square, Undo};
use scacco_engine::{SearchLimits, choose_move, easy_move};

use crate::error::GameError;
use crate::san::format_san;

/// One game session: a position plus the undo stack of played moves.
///
/// The facade owns all stack discipline: every played move pushes its
/// undo record, and [`Game::undo`] pops strictly in reverse order, so
/// UI callers can never revert out of order.
pub struct Game {
    position: Position,
    undo_stack: Vec<Undo>,
}

impl Game {
    /// Start a game from the standard starting position.
    pub fn new() -> Game {
        Game {
            position: Position::starting_position(),
            undo_stack: Vec::new(),
        }
    }

    /// Start a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Game, GameError> {
        let position: Position = fen.parse()?;
        debug!(fen, "game created from position string");
        Ok(Game {
            position,
            undo_stack: Vec::new(),
        })
    }

    /// Replace the current position with one parsed from `fen`.
    ///
    /// The parse is staged: on any error the current position and undo
    /// stack are left exactly as they were. On success the undo stack
    /// is cleared, since its records belong to the abandoned line.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), GameError> {
        let position: Position = fen.parse()?;
        debug!(fen, "position loaded");
        self.position = position;
        self.undo_stack.clear();
        Ok(())
    }

    /// Export the current position as a six-field FEN string.
    pub fn export_fen(&self) -> String {
        self.position.to_string()
    }

    /// Read-only access to the underlying position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    /// Whether the side to move is in check.
    pub fn in_check(&self) -> bool {
        self.position.in_check(self.position.side_to_move())
    }

    /// Classify the current position (ongoing, mate, or a draw rule).
    pub fn status(&mut self) -> GameStatus {
        self.position.status()
    }

    /// Every legal move for the side to move.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let stm = self.position.side_to_move();
        self.position.legal_moves(stm)
    }

    /// Every legal move for the given color, whether or not that side
    /// is to move.
    pub fn legal_moves_for(&mut self, color: Color) -> Vec<Move> {
        self.position.legal_moves(color)
    }

    /// Legal moves of the piece on `from`; empty for a vacant square.
    /// This is the query a UI uses to highlight destinations.
    pub fn legal_moves_from(&mut self, from: Square) -> Vec<Move> {
        self.position.legal_moves_from(from)
    }

    /// Play a move, recording it for repetition counting and undo.
    ///
    /// The move must come from the current legal-move list; anything
    /// else is a caller bug.
    pub fn play(&mut self, mv: Move) {
        debug_assert!(
            self.legal_moves().contains(&mv),
            "played move {mv} is not legal here"
        );
        debug!(mv = %mv, "move played");
        let undo = self.position.apply(mv);
        self.undo_stack.push(undo);
    }

    /// Take back the most recently played move. Returns `false` when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(undo) => {
                debug!(mv = %undo.applied_move(), "move taken back");
                self.position.revert(undo);
                true
            }
            None => false,
        }
    }

    /// Number of moves that can be taken back.
    pub fn moves_played(&self) -> usize {
        self.undo_stack.len()
    }

    /// How many times the current position has occurred, counting itself.
    pub fn repetition_count(&self) -> u32 {
        self.position.repetition_count()
    }

    /// Pick a move by time-bounded search. `None` only in terminal positions.
    pub fn engine_move(&mut self, limits: &SearchLimits) -> Option<Move> {
        choose_move(&mut self.position, limits).best_move
    }

    /// Pick a capture-preferring random move. `None` only in terminal positions.
    pub fn easy_move(&mut self) -> Option<Move> {
        easy_move(&mut self.position)
    }

    /// Format a legal move in standard algebraic notation.
    pub fn san(&mut self, mv: Move) -> String {
        format_san(&mut self.position, mv)
    }

    /// Find a legal move by its long-algebraic name (e.g. "e2e4",
    /// "e7e8q"). Convenient for UIs that track squares, not moves.
    pub fn find_move(&mut self, uci: &str) -> Option<Move> {
        self.legal_moves().into_iter().find(|m| m.to_uci() == uci)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
