//! Move representation.
//!
//! A [`Move`] is a plain value describing one transition: it carries
//! everything apply/revert and the UI need, but owns no board state.

use std::fmt;

use crate::castle_rights::CastleSide;
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

/// A candidate or applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Origin square.
    pub from: Square,
    /// Destination square (for castling, the king's destination).
    pub to: Square,
    /// The moving piece.
    pub piece: Piece,
    /// The captured piece, if any. For en passant the victim does not
    /// stand on `to`; see [`Move::capture_square`].
    pub captured: Option<Piece>,
    /// Promotion target, set only for pawn moves reaching the back rank.
    pub promotion: Option<PieceKind>,
    /// Castling side, set only for castling moves.
    pub castle: Option<CastleSide>,
    /// `true` for en passant captures.
    pub is_en_passant: bool,
    /// `true` for two-square pawn advances; the applier uses this to
    /// set the next position's en passant target.
    pub is_double_push: bool,
}

impl Move {
    /// Create a quiet (non-capturing, non-special) move.
    pub const fn quiet(from: Square, to: Square, piece: Piece) -> Move {
        Move {
            from,
            to,
            piece,
            captured: None,
            promotion: None,
            castle: None,
            is_en_passant: false,
            is_double_push: false,
        }
    }

    /// Create a capture of the piece standing on `to`.
    pub const fn capture(from: Square, to: Square, piece: Piece, captured: Piece) -> Move {
        let mut mv = Move::quiet(from, to, piece);
        mv.captured = Some(captured);
        mv
    }

    /// Create a two-square pawn advance.
    pub const fn double_push(from: Square, to: Square, piece: Piece) -> Move {
        let mut mv = Move::quiet(from, to, piece);
        mv.is_double_push = true;
        mv
    }

    /// Create an en passant capture; the victim is the enemy pawn
    /// standing beside the origin, not on `to`.
    pub const fn en_passant(from: Square, to: Square, piece: Piece) -> Move {
        let mut mv = Move::quiet(from, to, piece);
        mv.captured = Some(Piece::new(PieceKind::Pawn, piece.color.flip()));
        mv.is_en_passant = true;
        mv
    }

    /// Create a promotion, optionally capturing on the back rank.
    pub const fn promotion(
        from: Square,
        to: Square,
        piece: Piece,
        target: PieceKind,
        captured: Option<Piece>,
    ) -> Move {
        let mut mv = Move::quiet(from, to, piece);
        mv.captured = captured;
        mv.promotion = Some(target);
        mv
    }

    /// Create a castling move for the given color and side.
    pub const fn castle(color: Color, side: CastleSide) -> Move {
        let mut mv = Move::quiet(
            color.king_home(),
            side.king_to(color),
            Piece::new(PieceKind::King, color),
        );
        mv.castle = Some(side);
        mv
    }

    /// Return `true` if this move captures a piece (including en passant).
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.captured.is_some()
    }

    /// The square the captured piece stands on, if any.
    ///
    /// For ordinary captures this is `to`; for en passant it is the
    /// square on `to`'s file at the origin's rank (directly behind the
    /// target from the mover's point of view).
    pub fn capture_square(self) -> Option<Square> {
        self.captured?;
        if self.is_en_passant {
            Square::from_row_col(self.from.row(), self.to.col())
        } else {
            Some(self.to)
        }
    }

    /// Return the long-algebraic string (e.g. "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        match self.promotion {
            Some(target) => format!("{}{}{}", self.from, self.to, target.fen_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(target) = self.promotion {
            write!(f, "{}", target.fen_char())?;
        }
        Ok(())
    }
}
