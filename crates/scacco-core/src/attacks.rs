//! The attack oracle: is a square attacked by a given side?
//!
//! Leaping pieces (pawn, knight, king) are tested with fixed
//! (row, column) delta sets; sliders walk outward along each ray until
//! a blocker or the edge. All stepping goes through
//! [`Square::offset`], so edge wraparound is impossible by
//! construction.

use crate::color::Color;
use crate::piece::PieceKind;
use crate::position::Position;
use crate::square::Square;

/// Knight jump deltas.
pub(crate) const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// King step deltas.
pub(crate) const KING_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The four diagonal ray directions (bishop, half of queen).
pub(crate) const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// The four orthogonal ray directions (rook, half of queen).
pub(crate) const ROOK_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl Position {
    /// Return `true` if `sq` is attacked by any piece of `by_color`.
    ///
    /// Pure query; the position is not modified.
    pub fn is_attacked(&self, sq: Square, by_color: Color) -> bool {
        // Knights.
        for (dr, dc) in KNIGHT_DELTAS {
            if let Some(from) = sq.offset(dr, dc)
                && matches!(self.piece_on(from), Some(p) if p.color == by_color && p.kind == PieceKind::Knight)
            {
                return true;
            }
        }

        // The enemy king.
        for (dr, dc) in KING_DELTAS {
            if let Some(from) = sq.offset(dr, dc)
                && matches!(self.piece_on(from), Some(p) if p.color == by_color && p.kind == PieceKind::King)
            {
                return true;
            }
        }

        // Pawns: a pawn attacks diagonally forward, so an attacker of
        // `sq` stands one row behind it (relative to the pawn's own
        // direction of travel) on an adjacent file.
        for dc in [-1, 1] {
            if let Some(from) = sq.offset(-by_color.forward(), dc)
                && matches!(self.piece_on(from), Some(p) if p.color == by_color && p.kind == PieceKind::Pawn)
            {
                return true;
            }
        }

        // Orthogonal sliders: rooks and queens.
        if self.ray_hits(sq, by_color, &ROOK_DIRS, PieceKind::Rook) {
            return true;
        }

        // Diagonal sliders: bishops and queens.
        if self.ray_hits(sq, by_color, &BISHOP_DIRS, PieceKind::Bishop) {
            return true;
        }

        false
    }

    /// Walk each ray from `sq` until a blocker; report whether the
    /// first piece hit is a `slider`-or-queen of `by_color`.
    fn ray_hits(
        &self,
        sq: Square,
        by_color: Color,
        dirs: &[(i8, i8); 4],
        slider: PieceKind,
    ) -> bool {
        for &(dr, dc) in dirs {
            let mut current = sq;
            while let Some(next) = current.offset(dr, dc) {
                match self.piece_on(next) {
                    Some(piece) => {
                        if piece.color == by_color
                            && (piece.kind == slider || piece.kind == PieceKind::Queen)
                        {
                            return true;
                        }
                        break;
                    }
                    None => current = next,
                }
            }
        }
        false
    }

    /// Return `true` if the given side's king is attacked.
    #[inline]
    pub fn in_check(&self, color: Color) -> bool {
        self.is_attacked(self.king_square(color), color.flip())
    }
}
