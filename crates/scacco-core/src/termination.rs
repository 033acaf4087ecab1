//! Game termination classification.

use crate::color::Color;
use crate::piece::PieceKind;
use crate::position::Position;
use crate::square::Square;

/// The outcome classification of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// The side to move has at least one legal move and no draw rule applies.
    Ongoing,
    /// The side to move has no legal moves and is in check.
    Checkmate {
        /// The side that delivered mate.
        winner: Color,
    },
    /// The side to move has no legal moves and is not in check.
    Stalemate,
    /// Halfmove clock reached 100 (fifty full moves without pawn move or capture).
    FiftyMoveDraw,
    /// The current position hash has been recorded three or more times.
    ThreefoldRepetition,
    /// Neither side retains mating material.
    InsufficientMaterial,
}

impl GameStatus {
    /// Return `true` unless the game is still ongoing.
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

impl Position {
    /// Classify the position for the side to move.
    ///
    /// Checkmate and stalemate take precedence: the draw rules are
    /// consulted only when legal moves remain.
    pub fn status(&mut self) -> GameStatus {
        let stm = self.side_to_move();

        if self.legal_moves(stm).is_empty() {
            return if self.in_check(stm) {
                GameStatus::Checkmate {
                    winner: stm.flip(),
                }
            } else {
                GameStatus::Stalemate
            };
        }

        if self.halfmove_clock() >= 100 {
            return GameStatus::FiftyMoveDraw;
        }
        if self.repetition_count() >= 3 {
            return GameStatus::ThreefoldRepetition;
        }
        if self.insufficient_material() {
            return GameStatus::InsufficientMaterial;
        }

        GameStatus::Ongoing
    }

    /// Return `true` if any rule-based draw applies, regardless of
    /// whether legal moves remain. Used by the search, which already
    /// knows the move list is non-empty.
    pub fn is_rule_draw(&self) -> bool {
        self.halfmove_clock() >= 100
            || self.repetition_count() >= 3
            || self.insufficient_material()
    }

    /// Neither side can mate: no pawns, rooks, or queens anywhere, and
    /// neither side's minor pieces reach the mating threshold (two
    /// bishops, bishop plus knight, or three knights).
    ///
    /// Deliberately conservative: same-colored-bishop draws are not
    /// detected.
    fn insufficient_material(&self) -> bool {
        let mut bishops = [0u32; 2];
        let mut knights = [0u32; 2];

        for sq in Square::all() {
            let Some(piece) = self.piece_on(sq) else {
                continue;
            };
            match piece.kind {
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
                PieceKind::Bishop => bishops[piece.color.index()] += 1,
                PieceKind::Knight => knights[piece.color.index()] += 1,
                PieceKind::King => {}
            }
        }

        let can_mate = |color: Color| {
            let b = bishops[color.index()];
            let n = knights[color.index()];
            b >= 2 || (b >= 1 && n >= 1) || n >= 3
        };

        !can_mate(Color::White) && !can_mate(Color::Black)
    }
}
