//! Standard algebraic notation, built as a thin formatting pass over
//! the legal-move data the core already exposes.

use scacco_core::{CastleSide, Move, PieceKind, Position};

/// Format a legal move in SAN for the given position.
///
/// Disambiguation follows the usual rules (file first, then rank, then
/// both); the check/mate suffix is derived by trial-applying the move.
/// The move must come from the position's legal-move list.
pub(crate) fn format_san(position: &mut Position, mv: Move) -> String {
    let mut san = String::new();

    match mv.castle {
        Some(CastleSide::KingSide) => san.push_str("O-O"),
        Some(CastleSide::QueenSide) => san.push_str("O-O-O"),
        None => {
            if mv.piece.kind == PieceKind::Pawn {
                if mv.is_capture() {
                    san.push(mv.from.file_char());
                }
            } else {
                san.push(mv.piece.kind.fen_char().to_ascii_uppercase());
                disambiguate(position, mv, &mut san);
            }

            if mv.is_capture() {
                san.push('x');
            }
            san.push_str(&mv.to.to_string());

            if let Some(target) = mv.promotion {
                san.push('=');
                san.push(target.fen_char().to_ascii_uppercase());
            }
        }
    }

    // '+' for check, '#' when the opponent has no reply.
    let undo = position.apply_unrecorded(mv);
    let opponent = mv.piece.color.flip();
    if position.in_check(opponent) {
        if position.legal_moves(opponent).is_empty() {
            san.push('#');
        } else {
            san.push('+');
        }
    }
    position.revert(undo);

    san
}

/// Append the origin hint needed to tell this move apart from other
/// legal moves of the same piece kind to the same destination.
fn disambiguate(position: &mut Position, mv: Move, san: &mut String) {
    let rivals: Vec<Move> = position
        .legal_moves(mv.piece.color)
        .into_iter()
        .filter(|other| {
            other.piece.kind == mv.piece.kind && other.to == mv.to && other.from != mv.from
        })
        .collect();
    if rivals.is_empty() {
        return;
    }

    let file_unique = rivals.iter().all(|o| o.from.file_char() != mv.from.file_char());
    let rank_unique = rivals.iter().all(|o| o.from.rank_char() != mv.from.rank_char());

    if file_unique {
        san.push(mv.from.file_char());
    } else if rank_unique {
        san.push(mv.from.rank_char());
    } else {
        san.push(mv.from.file_char());
        san.push(mv.from.rank_char());
    }
}

#[cfg(test)]
mod tests {
    use super::format_san;
    use scacco_core::Position;

    /// Format the legal move named by `uci`.
    fn san_of(fen: &str, uci: &str) -> String {
        let mut position: Position = fen.parse().unwrap();
        let stm = position.side_to_move();
        let mv = position
            .legal_moves(stm)
            .into_iter()
            .find(|m| m.to_uci() == uci)
            .unwrap_or_else(|| panic!("{uci} is not legal in {fen}"));
        format_san(&mut position, mv)
    }

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn pawn_pushes_are_bare_destinations() {
        assert_eq!(san_of(START, "e2e4"), "e4");
        assert_eq!(san_of(START, "d2d3"), "d3");
    }

    #[test]
    fn piece_moves_carry_the_piece_letter() {
        assert_eq!(san_of(START, "g1f3"), "Nf3");
    }

    #[test]
    fn pawn_captures_name_the_origin_file() {
        assert_eq!(
            san_of("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", "e4d5"),
            "exd5"
        );
    }

    #[test]
    fn en_passant_reads_as_a_pawn_capture() {
        assert_eq!(
            san_of("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 3", "e5d6"),
            "exd6"
        );
    }

    #[test]
    fn castling_both_sides() {
        let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1";
        assert_eq!(san_of(fen, "e1g1"), "O-O");
        assert_eq!(san_of(fen, "e1c1"), "O-O-O");
    }

    #[test]
    fn promotion_with_suffix() {
        assert_eq!(
            san_of("3k4/4P3/8/8/8/8/8/4K3 w - - 0 1", "e7e8q"),
            "e8=Q+"
        );
        assert_eq!(
            san_of("3k4/4P3/8/8/8/8/8/4K3 w - - 0 1", "e7e8n"),
            "e8=N"
        );
    }

    #[test]
    fn file_disambiguation() {
        // Two rooks on the d-file... on d1 and a1, both reaching c1.
        assert_eq!(
            san_of("4k3/8/8/8/8/8/8/R2R2K1 w - - 0 1", "a1c1"),
            "Rac1"
        );
        assert_eq!(
            san_of("4k3/8/8/8/8/8/8/R2R2K1 w - - 0 1", "d1c1"),
            "Rdc1"
        );
    }

    #[test]
    fn rank_disambiguation() {
        // Rooks on a1 and a5 both reach a3.
        assert_eq!(
            san_of("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1", "a1a3"),
            "R1a3"
        );
        assert_eq!(
            san_of("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1", "a5a3"),
            "R5a3"
        );
    }

    #[test]
    fn check_and_mate_suffixes() {
        // Rook to e8 row gives check from a distance.
        assert_eq!(
            san_of("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", "a1a8"),
            "Ra8+"
        );
        // Back-rank mate.
        assert_eq!(
            san_of("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "a1a8"),
            "Ra8#"
        );
    }

    #[test]
    fn knight_capture_with_letter_and_x() {
        assert_eq!(
            san_of("4k3/8/8/3p4/8/4N3/8/4K3 w - - 0 1", "e3d5"),
            "Nxd5"
        );
    }
}
