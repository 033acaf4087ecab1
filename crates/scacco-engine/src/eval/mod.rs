//! Static evaluation: material, piece placement, and mobility.

pub mod material;
pub mod pst;

use scacco_core::{Color, Position, Square};

use material::piece_value;
use pst::pst_value;

/// How far the mobility difference may swing the score, in moves.
const MOBILITY_CLAMP: i32 = 20;

/// Centipawns per clamped move of mobility advantage.
const MOBILITY_WEIGHT: i32 = 2;

/// Score the position from `perspective`'s point of view, in
/// centipawns. Positive means `perspective` is better off.
///
/// Sums material and piece-square values over all occupied squares
/// (negated for the opponent's pieces), then adds a mobility term: the
/// legal-move-count difference clamped to ±20 and scaled by 2.
pub fn evaluate(position: &mut Position, perspective: Color) -> i32 {
    let mut score = 0;

    for sq in Square::all() {
        if let Some(piece) = position.piece_on(sq) {
            let value = piece_value(piece.kind) + pst_value(piece.kind, sq, piece.color);
            if piece.color == perspective {
                score += value;
            } else {
                score -= value;
            }
        }
    }

    let own = position.legal_moves(perspective).len() as i32;
    let opponent = position.legal_moves(perspective.flip()).len() as i32;
    score + (own - opponent).clamp(-MOBILITY_CLAMP, MOBILITY_CLAMP) * MOBILITY_WEIGHT
}
