//! Perft (performance test) for move generation correctness verification.

use crate::position::Position;

/// Count the number of leaf nodes at the given depth.
///
/// Depth 0 returns 1 (the current position). Depth 1 returns the
/// number of legal moves (bulk counting, no recursion).
pub fn perft(position: &mut Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = position.legal_moves(position.side_to_move());

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for mv in moves {
        let undo = position.apply_unrecorded(mv);
        nodes += perft(position, depth - 1);
        position.revert(undo);
    }
    nodes
}

/// Run perft with a per-move breakdown (useful for debugging).
///
/// Returns `(uci_move, node_count)` pairs sorted alphabetically.
pub fn divide(position: &mut Position, depth: usize) -> Vec<(String, u64)> {
    let moves = position.legal_moves(position.side_to_move());
    let mut results: Vec<(String, u64)> = moves
        .into_iter()
        .map(|mv| {
            let undo = position.apply_unrecorded(mv);
            let count = if depth <= 1 {
                1
            } else {
                perft(position, depth - 1)
            };
            position.revert(undo);
            (mv.to_uci(), count)
        })
        .collect();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
