//! Deadline-aborting negamax with alpha-beta pruning.

use scacco_core::Position;

use crate::eval::evaluate;
use crate::search::control::DeadlineClock;
use crate::search::ordering::order_moves;

/// Score representing an unreachable upper/lower bound.
pub const INF: i32 = 1_000_000;

/// Base score for checkmate, reduced by the ply it takes to reach it
/// so shallower mates score higher.
pub const MATE_SCORE: i32 = 100_000;

/// Scores beyond this threshold indicate a forced mate.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1_000;

/// Search state threaded through the recursion.
pub(super) struct SearchContext<'a> {
    /// Total nodes visited.
    pub nodes: u64,
    /// Cooperative wall-clock deadline.
    pub clock: &'a DeadlineClock,
}

/// Negamax over `position` to the remaining `depth`.
///
/// Returns the score for the side to move, or `None` once the deadline
/// has passed — the abort unwinds the whole in-flight depth through
/// `?`, discarding partial work. Termination is classified before
/// anything else: mate scores `-(MATE_SCORE - ply)` for the side being
/// mated, every draw scores zero. Exhausted depth falls back to the
/// static evaluation for the side to move.
pub(super) fn negamax(
    position: &mut Position,
    depth: u8,
    ply: u8,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_>,
) -> Option<i32> {
    if ctx.clock.expired() {
        return None;
    }
    ctx.nodes += 1;

    let stm = position.side_to_move();
    let mut moves = position.legal_moves(stm);

    if moves.is_empty() {
        return Some(if position.in_check(stm) {
            -(MATE_SCORE - ply as i32)
        } else {
            0
        });
    }

    if position.is_rule_draw() {
        return Some(0);
    }

    if depth == 0 {
        return Some(evaluate(position, stm));
    }

    order_moves(&mut moves);

    let mut best = -INF;
    for mv in moves {
        let undo = position.apply_unrecorded(mv);
        let result = negamax(position, depth - 1, ply + 1, -beta, -alpha, ctx);
        position.revert(undo);
        let score = -result?;

        if score > best {
            best = score;
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    Some(best)
}
