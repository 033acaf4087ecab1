//! Iterative-deepening search under a wall-clock budget.

pub mod control;
pub mod negamax;
pub mod ordering;

use tracing::debug;

use scacco_core::{Move, Position};

use control::{DeadlineClock, SearchLimits};
use negamax::{INF, SearchContext, negamax};
use ordering::order_moves;

/// Result of a completed search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best move found, `None` only when the position has no legal moves.
    pub best_move: Option<Move>,
    /// Score of `best_move` in centipawns from the mover's perspective.
    pub score: i32,
    /// Deepest fully completed iteration.
    pub depth: u8,
    /// Total nodes visited.
    pub nodes: u64,
}

/// Choose a move by iterative deepening within `limits`.
///
/// Each depth evaluates every root move via negamax at `depth - 1` and
/// is adopted only if it ran to completion; when the deadline fires
/// mid-depth, that depth's partial result is discarded and the
/// previous depth's answer stands. Never fails: with legal moves on
/// the board some move is always returned, falling back to the first
/// ordered root move if not even depth 1 completed.
pub fn choose_move(position: &mut Position, limits: &SearchLimits) -> SearchOutcome {
    let clock = DeadlineClock::start(limits.time_budget);
    let stm = position.side_to_move();

    let mut root_moves = position.legal_moves(stm);
    if root_moves.is_empty() {
        return SearchOutcome {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
        };
    }
    order_moves(&mut root_moves);

    let mut ctx = SearchContext {
        nodes: 0,
        clock: &clock,
    };
    let mut completed: Option<(Move, i32)> = None;
    let mut completed_depth = 0u8;

    'deepening: for depth in 1..=limits.max_depth.max(1) {
        let mut best_this_depth: Option<(Move, i32)> = None;
        let mut alpha = -INF;

        for &mv in &root_moves {
            let undo = position.apply_unrecorded(mv);
            let result = negamax(position, depth - 1, 1, -INF, -alpha, &mut ctx);
            position.revert(undo);

            let Some(reply_score) = result else {
                debug!(depth, "deadline reached, discarding unfinished depth");
                break 'deepening;
            };
            let score = -reply_score;

            if best_this_depth.is_none_or(|(_, best)| score > best) {
                best_this_depth = Some((mv, score));
            }
            if score > alpha {
                alpha = score;
            }
        }

        if let Some((mv, score)) = best_this_depth {
            completed = Some((mv, score));
            completed_depth = depth;
            debug!(depth, score, nodes = ctx.nodes, best = %mv, "depth completed");
        }
    }

    // Degrade gracefully: if not even depth 1 finished in time, fall
    // back to the first ordered root move rather than no move at all.
    let (best_move, score) = completed.unwrap_or((root_moves[0], 0));
    SearchOutcome {
        best_move: Some(best_move),
        score,
        depth: completed_depth,
        nodes: ctx.nodes,
    }
}
