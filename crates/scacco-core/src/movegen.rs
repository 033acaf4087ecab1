//! Pseudo-legal and legal move generation.
//!
//! Legality is decided by trial application: a pseudo-legal candidate
//! survives iff the mover is not in check immediately after it. There
//! is no separate pin detector; pins fall out of this filter.

use crate::attacks::{BISHOP_DIRS, KING_DELTAS, KNIGHT_DELTAS, ROOK_DIRS};
use crate::castle_rights::CastleSide;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::position::Position;
use crate::square::Square;

impl Position {
    /// Generate every move of `color` that obeys per-piece movement
    /// rules, ignoring whether it leaves the mover's king in check.
    pub fn pseudo_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);

        for sq in Square::all() {
            let Some(piece) = self.piece_on(sq) else {
                continue;
            };
            if piece.color != color {
                continue;
            }
            match piece.kind {
                PieceKind::Pawn => self.pawn_moves(sq, piece, &mut moves),
                PieceKind::Knight => self.leaper_moves(sq, piece, &KNIGHT_DELTAS, &mut moves),
                PieceKind::King => self.leaper_moves(sq, piece, &KING_DELTAS, &mut moves),
                PieceKind::Bishop => self.slider_moves(sq, piece, &BISHOP_DIRS, &mut moves),
                PieceKind::Rook => self.slider_moves(sq, piece, &ROOK_DIRS, &mut moves),
                PieceKind::Queen => {
                    self.slider_moves(sq, piece, &BISHOP_DIRS, &mut moves);
                    self.slider_moves(sq, piece, &ROOK_DIRS, &mut moves);
                }
            }
        }

        self.castling_moves(color, &mut moves);
        moves
    }

    /// Generate every legal move of `color`: pseudo-legal moves that do
    /// not leave `color`'s own king attacked.
    pub fn legal_moves(&mut self, color: Color) -> Vec<Move> {
        let pseudo = self.pseudo_moves(color);
        let mut legal = Vec::with_capacity(pseudo.len());

        for mv in pseudo {
            let undo = self.apply_unrecorded(mv);
            if !self.in_check(color) {
                legal.push(mv);
            }
            self.revert(undo);
        }

        legal
    }

    /// Legal moves of the piece standing on `from`, empty if the square
    /// is vacant.
    pub fn legal_moves_from(&mut self, from: Square) -> Vec<Move> {
        match self.piece_on(from) {
            Some(piece) => self
                .legal_moves(piece.color)
                .into_iter()
                .filter(|m| m.from == from)
                .collect(),
            None => Vec::new(),
        }
    }

    fn pawn_moves(&self, from: Square, piece: Piece, moves: &mut Vec<Move>) {
        let color = piece.color;
        let dir = color.forward();

        // Single push onto an empty square, with the double push stacked
        // behind it from the start row.
        if let Some(to) = from.offset(dir, 0)
            && !self.is_occupied(to)
        {
            self.pawn_advance(from, to, piece, moves);

            if from.row() == color.pawn_start_row()
                && let Some(two) = from.offset(dir * 2, 0)
                && !self.is_occupied(two)
            {
                moves.push(Move::double_push(from, two, piece));
            }
        }

        // Diagonal captures, onto enemy pieces or the en passant target.
        for dc in [-1, 1] {
            let Some(to) = from.offset(dir, dc) else {
                continue;
            };
            match self.piece_on(to) {
                Some(target) if target.color != color => {
                    if to.row() == color.promotion_row() {
                        for promo in PieceKind::PROMOTIONS {
                            moves.push(Move::promotion(from, to, piece, promo, Some(target)));
                        }
                    } else {
                        moves.push(Move::capture(from, to, piece, target));
                    }
                }
                None if self.en_passant() == Some(to) => {
                    // The window belongs to the side to move; when
                    // generating for the idle color the bypassing pawn
                    // is on the wrong side of the target, so check it
                    // is really there before emitting a capture.
                    let victim = Square::from_row_col(from.row(), to.col())
                        .and_then(|sq| self.piece_on(sq));
                    if matches!(victim, Some(p) if p.kind == PieceKind::Pawn && p.color != color) {
                        moves.push(Move::en_passant(from, to, piece));
                    }
                }
                _ => {}
            }
        }
    }

    /// Emit a non-capturing pawn advance, fanning out into the four
    /// promotion variants on the back rank.
    fn pawn_advance(&self, from: Square, to: Square, piece: Piece, moves: &mut Vec<Move>) {
        if to.row() == piece.color.promotion_row() {
            for promo in PieceKind::PROMOTIONS {
                moves.push(Move::promotion(from, to, piece, promo, None));
            }
        } else {
            moves.push(Move::quiet(from, to, piece));
        }
    }

    fn leaper_moves(
        &self,
        from: Square,
        piece: Piece,
        deltas: &[(i8, i8); 8],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, dc) in deltas {
            let Some(to) = from.offset(dr, dc) else {
                continue;
            };
            match self.piece_on(to) {
                None => moves.push(Move::quiet(from, to, piece)),
                Some(target) if target.color != piece.color => {
                    moves.push(Move::capture(from, to, piece, target));
                }
                Some(_) => {}
            }
        }
    }

    fn slider_moves(
        &self,
        from: Square,
        piece: Piece,
        dirs: &[(i8, i8); 4],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, dc) in dirs {
            let mut current = from;
            while let Some(to) = current.offset(dr, dc) {
                match self.piece_on(to) {
                    None => {
                        moves.push(Move::quiet(from, to, piece));
                        current = to;
                    }
                    Some(target) if target.color != piece.color => {
                        moves.push(Move::capture(from, to, piece, target));
                        break;
                    }
                    Some(_) => break,
                }
            }
        }
    }

    /// Emit the castling variants whose five conditions all hold: right
    /// retained with the king at home, empty span, rook at home, king
    /// not in check, transit and destination squares unattacked.
    fn castling_moves(&self, color: Color, moves: &mut Vec<Move>) {
        let home = color.king_home();
        if self.piece_on(home) != Some(Piece::new(PieceKind::King, color)) || self.in_check(color)
        {
            return;
        }

        let enemy = color.flip();
        for side in CastleSide::ALL {
            if !self.castling().has(color, side) {
                continue;
            }
            if self.piece_on(side.rook_from(color)) != Some(Piece::new(PieceKind::Rook, color)) {
                continue;
            }
            if side.between(color).iter().any(|&sq| self.is_occupied(sq)) {
                continue;
            }
            if self.is_attacked(side.rook_to(color), enemy)
                || self.is_attacked(side.king_to(color), enemy)
            {
                continue;
            }
            moves.push(Move::castle(color, side));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::castle_rights::CastleSide;
    use crate::chess_move::Move;
    use crate::color::Color;
    use crate::piece::PieceKind;
    use crate::position::Position;
    use crate::square::Square;

    fn uci_set(moves: &[Move]) -> Vec<String> {
        moves.iter().map(|m| m.to_uci()).collect()
    }

    fn castles(moves: &[Move]) -> Vec<CastleSide> {
        moves.iter().filter_map(|m| m.castle).collect()
    }

    #[test]
    fn starting_position_has_twenty_moves() {
        let mut position = Position::starting_position();
        assert_eq!(position.pseudo_moves(Color::White).len(), 20);
        assert_eq!(position.legal_moves(Color::White).len(), 20);
        assert_eq!(position.legal_moves(Color::Black).len(), 20);
    }

    #[test]
    fn pinned_pawn_cannot_move() {
        // Bishop a5 pins the d2 pawn against the e1 king.
        let mut position: Position = "4k3/8/8/b7/8/8/3P4/4K3 w - - 0 1".parse().unwrap();

        let pseudo = uci_set(&position.pseudo_moves(Color::White));
        assert!(pseudo.contains(&"d2d3".to_string()));
        assert!(pseudo.contains(&"d2d4".to_string()));

        let legal = uci_set(&position.legal_moves(Color::White));
        assert!(!legal.contains(&"d2d3".to_string()));
        assert!(!legal.contains(&"d2d4".to_string()));
    }

    #[test]
    fn every_legal_move_is_check_safe() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            // The b5 pawn is pinned along the fifth rank here.
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ] {
            let mut position: Position = fen.parse().unwrap();
            let legal = position.legal_moves(Color::White);
            let pseudo = position.pseudo_moves(Color::White);

            for mv in &pseudo {
                let undo = position.apply_unrecorded(*mv);
                let exposed = position.in_check(Color::White);
                position.revert(undo);
                assert_eq!(
                    legal.contains(mv),
                    !exposed,
                    "legality of {mv} disagrees with the check filter in {fen}"
                );
            }
        }
    }

    #[test]
    fn rank_pinned_pawn_is_rejected_by_the_filter() {
        let mut position: Position = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"
            .parse()
            .unwrap();
        let pseudo = uci_set(&position.pseudo_moves(Color::White));
        let legal = uci_set(&position.legal_moves(Color::White));
        assert!(pseudo.contains(&"b5b6".to_string()));
        assert!(!legal.contains(&"b5b6".to_string()));
    }

    #[test]
    fn promotion_fans_out_into_four_variants() {
        let mut position: Position = "4k3/4P3/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let promotions: Vec<Move> = position
            .legal_moves(Color::White)
            .into_iter()
            .filter(|m| m.promotion.is_some())
            .collect();
        assert_eq!(promotions.len(), 4);
        let targets: Vec<PieceKind> = promotions.iter().filter_map(|m| m.promotion).collect();
        assert_eq!(
            targets,
            [
                PieceKind::Queen,
                PieceKind::Rook,
                PieceKind::Bishop,
                PieceKind::Knight
            ]
        );
    }

    #[test]
    fn en_passant_capture_is_generated() {
        let mut position: Position = "4k3/8/8/8/4pP2/8/8/4K3 b - f3 0 1".parse().unwrap();
        let legal = position.legal_moves(Color::Black);
        let ep: Vec<&Move> = legal.iter().filter(|m| m.is_en_passant).collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to_uci(), "e4f3");
        assert_eq!(ep[0].capture_square(), Some(Square::F4));
    }

    #[test]
    fn en_passant_window_closes_after_one_reply() {
        // 1.e4 a6 2.e5 d5 opens the d6 window for White.
        let mut position = Position::starting_position();
        for uci in ["e2e4", "a7a6", "e4e5", "d7d5"] {
            let stm = position.side_to_move();
            let mv = position
                .legal_moves(stm)
                .into_iter()
                .find(|m| m.to_uci() == uci)
                .unwrap();
            position.apply(mv);
        }
        assert_eq!(position.en_passant(), Some(Square::D6));
        assert!(uci_set(&position.legal_moves(Color::White)).contains(&"e5d6".to_string()));

        // Any other move closes it again.
        let quiet = position
            .legal_moves(Color::White)
            .into_iter()
            .find(|m| m.to_uci() == "h2h3")
            .unwrap();
        position.apply(quiet);
        assert_eq!(position.en_passant(), None);
        assert!(!uci_set(&position.legal_moves(Color::White)).contains(&"e5d6".to_string()));
    }

    #[test]
    fn stale_ep_target_is_invisible_to_the_idle_color() {
        // After 1.e4 the e3 target belongs to Black; White's own d2/f2
        // pawns sit diagonally behind it and must not capture "onto" it.
        let mut position: Position =
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
                .parse()
                .unwrap();
        let reference = position.clone();

        let white = position.legal_moves(Color::White);
        assert!(white.iter().all(|m| !m.is_en_passant));
        assert!(position == reference, "idle-color probe must not disturb the board");
    }

    // ── castling gating ──────────────────────────────────────────────

    const CASTLE_READY: &str = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn both_castles_available_when_all_conditions_hold() {
        let mut position: Position = CASTLE_READY.parse().unwrap();
        let white = castles(&position.legal_moves(Color::White));
        assert!(white.contains(&CastleSide::KingSide));
        assert!(white.contains(&CastleSide::QueenSide));
        let black = castles(&position.legal_moves(Color::Black));
        assert_eq!(black.len(), 2);
    }

    #[test]
    fn occupied_transit_square_blocks_exactly_that_side() {
        // Bishop parked on f1.
        let mut position: Position = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3KB1R w KQkq - 0 1"
            .parse()
            .unwrap();
        let white = castles(&position.legal_moves(Color::White));
        assert_eq!(white, vec![CastleSide::QueenSide]);
        assert_eq!(castles(&position.legal_moves(Color::Black)).len(), 2);
    }

    #[test]
    fn cleared_right_blocks_exactly_that_side() {
        let mut position: Position = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w Qkq - 0 1"
            .parse()
            .unwrap();
        let white = castles(&position.legal_moves(Color::White));
        assert_eq!(white, vec![CastleSide::QueenSide]);
        assert_eq!(castles(&position.legal_moves(Color::Black)).len(), 2);
    }

    #[test]
    fn missing_rook_blocks_exactly_that_side() {
        // Knight on h1 where the rook should be; the right bit is still set.
        let mut position: Position = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2N w KQkq - 0 1"
            .parse()
            .unwrap();
        let white = castles(&position.legal_moves(Color::White));
        assert_eq!(white, vec![CastleSide::QueenSide]);
    }

    #[test]
    fn king_in_check_blocks_castling() {
        // Knight on c2 gives check without touching any castling square.
        let mut position: Position = "r3k2r/pppppppp/8/8/8/8/PPnPPPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        assert!(position.in_check(Color::White));
        assert!(castles(&position.legal_moves(Color::White)).is_empty());
        // Black's castling is untouched.
        assert_eq!(castles(&position.legal_moves(Color::Black)).len(), 2);
    }

    #[test]
    fn attacked_transit_square_blocks_exactly_that_side() {
        // Open f-file: the f8 rook covers f1.
        let mut position: Position = "r3kr2/ppppp1pp/8/8/8/8/PPPPP1PP/R3K2R w KQq - 0 1"
            .parse()
            .unwrap();
        let white = castles(&position.legal_moves(Color::White));
        assert_eq!(white, vec![CastleSide::QueenSide]);
    }

    #[test]
    fn attacked_destination_square_blocks_exactly_that_side() {
        // Open g-file: the g8 rook covers g1.
        let mut position: Position = "r3k1r1/pppppp1p/8/8/8/8/PPPPPP1P/R3K2R w KQq - 0 1"
            .parse()
            .unwrap();
        let white = castles(&position.legal_moves(Color::White));
        assert_eq!(white, vec![CastleSide::QueenSide]);
    }

    #[test]
    fn legal_moves_from_filters_by_origin() {
        let mut position = Position::starting_position();
        let knight_moves = position.legal_moves_from(Square::G1);
        assert_eq!(uci_set(&knight_moves), ["g1f3", "g1h3"]);

        assert!(position.legal_moves_from(Square::E4).is_empty());
        assert_eq!(position.legal_moves_from(Square::E2).len(), 2);
    }

    #[test]
    fn check_evasions_only_when_in_check() {
        // Rook e2 checks the e1 king; king must move or the check be blocked.
        let mut position: Position = "4k3/8/8/8/8/8/4r3/R3K3 w - - 0 1".parse().unwrap();
        let legal = position.legal_moves(Color::White);
        for mv in &legal {
            let undo = position.apply_unrecorded(*mv);
            assert!(!position.in_check(Color::White));
            position.revert(undo);
        }
        let ucis = uci_set(&legal);
        // Kxe2 and the a1-rook block on e-file... a1e1 is illegal (king
        // there); blocking requires reaching the e-file between e1/e2,
        // impossible, so only king moves survive.
        assert!(ucis.contains(&"e1e2".to_string()));
        assert!(!ucis.contains(&"a1b1".to_string()));
    }
}
