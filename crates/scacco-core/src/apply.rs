//! Transactional move execution: apply a move, get an [`Undo`], revert it.
//!
//! Applies and reverts on one position must nest strictly (last in,
//! first out). Reverting with anything other than the record produced
//! by the matching apply is a caller bug, guarded only by debug
//! assertions.

use crate::castle_rights::CastleRights;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::position::Position;
use crate::square::Square;
use crate::zobrist;

/// Maps each square index to the castling rights revoked when that
/// square is the origin or destination of any move: king moves clear
/// both of that color's rights, rook moves (or captures landing on a
/// rook home square) clear the matching one.
const RIGHTS_REVOKED: [CastleRights; 64] = {
    let mut table = [CastleRights::NONE; 64];
    table[Square::A8.index()] = CastleRights::BLACK_QUEEN;
    table[Square::E8.index()] = CastleRights::BLACK_BOTH;
    table[Square::H8.index()] = CastleRights::BLACK_KING;
    table[Square::A1.index()] = CastleRights::WHITE_QUEEN;
    table[Square::E1.index()] = CastleRights::WHITE_BOTH;
    table[Square::H1.index()] = CastleRights::WHITE_KING;
    table
};

/// Snapshot produced by an apply and consumed exactly once by the
/// matching revert.
#[derive(Debug, Clone)]
pub struct Undo {
    mv: Move,
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    hash: u64,
    king_squares: [Square; 2],
    recorded: bool,
}

impl Undo {
    /// The move this record undoes.
    #[inline]
    pub fn applied_move(&self) -> Move {
        self.mv
    }
}

impl Position {
    /// Apply a move and record the resulting position in the
    /// repetition ledger. Used for moves actually played.
    pub fn apply(&mut self, mv: Move) -> Undo {
        self.apply_inner(mv, true)
    }

    /// Apply a move without touching the repetition ledger. Used for
    /// speculative moves (legality probing, search) so they cannot
    /// pollute repetition bookkeeping.
    pub fn apply_unrecorded(&mut self, mv: Move) -> Undo {
        self.apply_inner(mv, false)
    }

    fn apply_inner(&mut self, mv: Move, record: bool) -> Undo {
        debug_assert_eq!(
            self.piece_on(mv.from),
            Some(mv.piece),
            "move {mv} does not match the board"
        );

        let undo = Undo {
            mv,
            side_to_move: self.side_to_move(),
            castling: self.castling(),
            en_passant: self.en_passant(),
            halfmove_clock: self.halfmove_clock(),
            fullmove_number: self.fullmove_number(),
            hash: self.hash(),
            king_squares: self.king_squares(),
            recorded: record,
        };

        let us = mv.piece.color;
        let mut hash = self.hash();

        // XOR out the pre-move en passant and castling contributions.
        if let Some(ep) = self.en_passant() {
            hash ^= zobrist::KEYS.en_passant_file[ep.col() as usize];
        }
        hash ^= zobrist::KEYS.castling[self.castling().bits() as usize];

        // Lift the mover off its origin.
        self.set_cell(mv.from, None);
        hash ^= zobrist::piece_key(mv.piece, mv.from);

        // Remove the captured piece, which for en passant does not
        // stand on the destination.
        if let (Some(captured), Some(cap_sq)) = (mv.captured, mv.capture_square()) {
            self.set_cell(cap_sq, None);
            hash ^= zobrist::piece_key(captured, cap_sq);
        }

        // Place the resulting piece: the promotion target or the mover.
        let placed = match mv.promotion {
            Some(target) => Piece::new(target, us),
            None => mv.piece,
        };
        self.set_cell(mv.to, Some(placed));
        hash ^= zobrist::piece_key(placed, mv.to);

        if mv.piece.kind == PieceKind::King {
            self.set_king_square(us, mv.to);
        }

        // Castling also relocates the rook.
        if let Some(side) = mv.castle {
            let rook = Piece::new(PieceKind::Rook, us);
            let rook_from = side.rook_from(us);
            let rook_to = side.rook_to(us);
            self.set_cell(rook_from, None);
            self.set_cell(rook_to, Some(rook));
            hash ^= zobrist::piece_key(rook, rook_from);
            hash ^= zobrist::piece_key(rook, rook_to);
        }

        // Revoke rights touched by either endpoint; XOR the new
        // configuration back in. Rights only ever shrink.
        let rights = self
            .castling()
            .remove(RIGHTS_REVOKED[mv.from.index()])
            .remove(RIGHTS_REVOKED[mv.to.index()]);
        self.set_castling(rights);
        hash ^= zobrist::KEYS.castling[rights.bits() as usize];

        // A double push opens an en passant window; anything else
        // closes it.
        let ep = if mv.is_double_push {
            mv.from.offset(us.forward(), 0)
        } else {
            None
        };
        self.set_en_passant(ep);
        if let Some(target) = ep {
            hash ^= zobrist::KEYS.en_passant_file[target.col() as usize];
        }

        // Clocks.
        if mv.piece.kind == PieceKind::Pawn || mv.is_capture() {
            self.set_halfmove_clock(0);
        } else {
            self.set_halfmove_clock(undo.halfmove_clock + 1);
        }
        if us == Color::Black {
            self.set_fullmove_number(undo.fullmove_number + 1);
        }

        // Flip the side to move.
        self.set_side_to_move(us.flip());
        hash ^= zobrist::KEYS.side_black;

        self.set_hash(hash);

        if record {
            self.record_hash();
        }

        undo
    }

    /// Revert the most recent apply using its [`Undo`] record.
    pub fn revert(&mut self, undo: Undo) {
        let mv = undo.mv;

        if undo.recorded {
            self.unrecord_hash();
        }

        // Clear the destination before restoring the victim: for plain
        // captures the victim returns to that same square.
        self.set_cell(mv.to, None);
        self.set_cell(mv.from, Some(mv.piece));
        if let (Some(captured), Some(cap_sq)) = (mv.captured, mv.capture_square()) {
            self.set_cell(cap_sq, Some(captured));
        }
        if let Some(side) = mv.castle {
            let us = mv.piece.color;
            self.set_cell(side.rook_to(us), None);
            self.set_cell(side.rook_from(us), Some(Piece::new(PieceKind::Rook, us)));
        }

        // Snapshot fields are restored verbatim.
        self.set_side_to_move(undo.side_to_move);
        self.set_castling(undo.castling);
        self.set_en_passant(undo.en_passant);
        self.set_halfmove_clock(undo.halfmove_clock);
        self.set_fullmove_number(undo.fullmove_number);
        self.set_king_squares(undo.king_squares);
        self.set_hash(undo.hash);
    }
}

#[cfg(test)]
mod tests {
    use crate::castle_rights::{CastleRights, CastleSide};
    use crate::chess_move::Move;
    use crate::color::Color;
    use crate::piece::{Piece, PieceKind};
    use crate::position::Position;
    use crate::square::Square;
    use crate::zobrist;

    fn wp(kind: PieceKind) -> Piece {
        Piece::new(kind, Color::White)
    }

    fn bp(kind: PieceKind) -> Piece {
        Piece::new(kind, Color::Black)
    }

    /// Look a legal move up by its long-algebraic name.
    fn find_move(position: &mut Position, uci: &str) -> Move {
        let stm = position.side_to_move();
        position
            .legal_moves(stm)
            .into_iter()
            .find(|m| m.to_uci() == uci)
            .unwrap_or_else(|| panic!("move {uci} not legal in {position:?}"))
    }

    #[test]
    fn pawn_push_e2e4_opens_ep_window() {
        let mut position = Position::starting_position();
        let mv = Move::double_push(Square::E2, Square::E4, wp(PieceKind::Pawn));
        position.apply(mv);

        assert_eq!(position.piece_on(Square::E4), Some(wp(PieceKind::Pawn)));
        assert_eq!(position.piece_on(Square::E2), None);
        assert_eq!(position.en_passant(), Some(Square::E3));
        assert_eq!(position.side_to_move(), Color::Black);
        assert_eq!(position.halfmove_clock(), 0);
    }

    #[test]
    fn capture_resets_clock() {
        // 1.e4 d5 2.exd5
        let mut position = Position::starting_position();
        position.apply(Move::double_push(Square::E2, Square::E4, wp(PieceKind::Pawn)));
        position.apply(Move::double_push(Square::D7, Square::D5, bp(PieceKind::Pawn)));
        position.apply(Move::capture(
            Square::E4,
            Square::D5,
            wp(PieceKind::Pawn),
            bp(PieceKind::Pawn),
        ));

        assert_eq!(position.piece_on(Square::D5), Some(wp(PieceKind::Pawn)));
        assert_eq!(position.piece_on(Square::E4), None);
        assert_eq!(position.halfmove_clock(), 0);
    }

    #[test]
    fn en_passant_removes_bypassing_pawn() {
        let mut position: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 3".parse().unwrap();
        let mv = find_move(&mut position, "e5d6");
        assert!(mv.is_en_passant);
        position.apply(mv);

        assert_eq!(position.piece_on(Square::D6), Some(wp(PieceKind::Pawn)));
        assert_eq!(position.piece_on(Square::D5), None, "victim removed");
        assert_eq!(position.piece_on(Square::E5), None);
    }

    #[test]
    fn promotion_places_chosen_piece() {
        let mut position: Position = "4k3/4P3/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let mv = Move::promotion(
            Square::E7,
            Square::E8,
            wp(PieceKind::Pawn),
            PieceKind::Queen,
            None,
        );
        position.apply(mv);

        assert_eq!(position.piece_on(Square::E8), Some(wp(PieceKind::Queen)));
        assert_eq!(position.piece_on(Square::E7), None);
    }

    #[test]
    fn kingside_castling_white() {
        let mut position: Position = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        position.apply(Move::castle(Color::White, CastleSide::KingSide));

        assert_eq!(position.piece_on(Square::G1), Some(wp(PieceKind::King)));
        assert_eq!(position.piece_on(Square::F1), Some(wp(PieceKind::Rook)));
        assert_eq!(position.piece_on(Square::E1), None);
        assert_eq!(position.piece_on(Square::H1), None);
        assert_eq!(position.king_square(Color::White), Square::G1);
        // White rights gone, black rights preserved.
        assert!(!position.castling().contains(CastleRights::WHITE_KING));
        assert!(!position.castling().contains(CastleRights::WHITE_QUEEN));
        assert!(position.castling().contains(CastleRights::BLACK_BOTH));
    }

    #[test]
    fn queenside_castling_black() {
        let mut position: Position = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b KQkq - 0 1"
            .parse()
            .unwrap();
        position.apply(Move::castle(Color::Black, CastleSide::QueenSide));

        assert_eq!(position.piece_on(Square::C8), Some(bp(PieceKind::King)));
        assert_eq!(position.piece_on(Square::D8), Some(bp(PieceKind::Rook)));
        assert_eq!(position.piece_on(Square::A8), None);
        assert_eq!(position.king_square(Color::Black), Square::C8);
    }

    #[test]
    fn rook_move_revokes_one_right() {
        let mut position: Position = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        position.apply(Move::quiet(Square::H1, Square::G1, wp(PieceKind::Rook)));

        assert!(!position.castling().contains(CastleRights::WHITE_KING));
        assert!(position.castling().contains(CastleRights::WHITE_QUEEN));
    }

    #[test]
    fn capture_on_rook_home_revokes_right() {
        // White bishop on g7 takes the h8 rook.
        let mut position: Position = "r3k2r/ppppppBp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        let mv = find_move(&mut position, "g7h8");
        position.apply(mv);

        assert!(!position.castling().contains(CastleRights::BLACK_KING));
        assert!(position.castling().contains(CastleRights::BLACK_QUEEN));
    }

    #[test]
    fn clocks_and_fullmove() {
        let mut position = Position::starting_position();
        assert_eq!(position.fullmove_number(), 1);

        position.apply(Move::quiet(Square::G1, Square::F3, wp(PieceKind::Knight)));
        assert_eq!(position.halfmove_clock(), 1);
        assert_eq!(position.fullmove_number(), 1);

        position.apply(Move::quiet(Square::G8, Square::F6, bp(PieceKind::Knight)));
        assert_eq!(position.halfmove_clock(), 2);
        assert_eq!(position.fullmove_number(), 2);
    }

    #[test]
    fn apply_revert_identity_over_kiwipete() {
        let mut position: Position =
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
                .parse()
                .unwrap();
        let reference = position.clone();

        let moves = position.legal_moves(Color::White);
        assert!(!moves.is_empty());
        for mv in moves {
            let undo = position.apply_unrecorded(mv);
            let restored_hash = zobrist::hash_from_scratch(&position);
            assert_eq!(position.hash(), restored_hash, "incremental hash for {mv}");
            position.revert(undo);
            assert!(position == reference, "apply/revert mismatch for {mv}");
        }
    }

    #[test]
    fn incremental_hash_special_moves() {
        // En passant.
        let mut position: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 3".parse().unwrap();
        let ep = find_move(&mut position, "e5d6");
        position.apply(ep);
        assert_eq!(position.hash(), zobrist::hash_from_scratch(&position));

        // Castling, both colors.
        for fen in [
            "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1",
            "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b KQkq - 0 1",
        ] {
            let mut position: Position = fen.parse().unwrap();
            let stm = position.side_to_move();
            for side in CastleSide::ALL {
                let undo = position.apply_unrecorded(Move::castle(stm, side));
                assert_eq!(position.hash(), zobrist::hash_from_scratch(&position));
                position.revert(undo);
            }
        }

        // Promotion, every target.
        let mut position: Position = "4k3/4P3/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        for target in PieceKind::PROMOTIONS {
            let mv = Move::promotion(Square::E7, Square::E8, wp(PieceKind::Pawn), target, None);
            let undo = position.apply_unrecorded(mv);
            assert_eq!(
                position.hash(),
                zobrist::hash_from_scratch(&position),
                "hash mismatch promoting to {target}"
            );
            position.revert(undo);
        }
    }

    #[test]
    fn transpositions_share_a_hash() {
        // 1.Nf3 Nf6 2.Nc3 Nc6 and 1.Nc3 Nc6 2.Nf3 Nf6 transpose.
        let mut path_a = Position::starting_position();
        path_a.apply(Move::quiet(Square::G1, Square::F3, wp(PieceKind::Knight)));
        path_a.apply(Move::quiet(Square::G8, Square::F6, bp(PieceKind::Knight)));
        path_a.apply(Move::quiet(Square::B1, Square::C3, wp(PieceKind::Knight)));
        path_a.apply(Move::quiet(Square::B8, Square::C6, bp(PieceKind::Knight)));

        let mut path_b = Position::starting_position();
        path_b.apply(Move::quiet(Square::B1, Square::C3, wp(PieceKind::Knight)));
        path_b.apply(Move::quiet(Square::B8, Square::C6, bp(PieceKind::Knight)));
        path_b.apply(Move::quiet(Square::G1, Square::F3, wp(PieceKind::Knight)));
        path_b.apply(Move::quiet(Square::G8, Square::F6, bp(PieceKind::Knight)));

        assert_eq!(path_a.hash(), path_b.hash());
    }

    #[test]
    fn recorded_apply_moves_the_ledger() {
        let mut position = Position::starting_position();
        assert_eq!(position.history_len(), 1);

        let undo = position.apply(Move::quiet(Square::G1, Square::F3, wp(PieceKind::Knight)));
        assert_eq!(position.history_len(), 2);
        assert_eq!(position.repetition_count(), 1);

        position.revert(undo);
        assert_eq!(position.history_len(), 1);
        assert_eq!(position.repetition_count(), 1);
    }

    #[test]
    fn unrecorded_apply_leaves_the_ledger_alone() {
        let mut position = Position::starting_position();
        let undo =
            position.apply_unrecorded(Move::quiet(Square::G1, Square::F3, wp(PieceKind::Knight)));
        assert_eq!(position.history_len(), 1);
        position.revert(undo);
        assert_eq!(position.history_len(), 1);
    }
}
