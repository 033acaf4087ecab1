//! The "easy" policy: no search, just a uniformly random choice that
//! prefers captures when any exist.

use rand::prelude::IndexedRandom;

use scacco_core::{Move, Position};

/// Pick a random legal move, choosing uniformly among captures if the
/// side to move has any, otherwise among all legal moves. Returns
/// `None` only when no legal move exists.
pub fn easy_move(position: &mut Position) -> Option<Move> {
    let moves = position.legal_moves(position.side_to_move());
    if moves.is_empty() {
        return None;
    }

    let captures: Vec<Move> = moves.iter().copied().filter(|m| m.is_capture()).collect();
    let pool = if captures.is_empty() { &moves } else { &captures };

    let mut rng = rand::rng();
    pool.choose(&mut rng).copied()
}
