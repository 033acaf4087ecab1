//! The position: piece placement, side to move, castling, en passant,
//! move counters, cached king squares, and the repetition ledger.

use std::collections::HashMap;
use std::fmt;

use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::FenError;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;
use crate::zobrist;

/// Complete game state.
///
/// The sole mutable entity of the engine. A single `Position` must not
/// be driven by two logical operations at once; callers wanting
/// concurrent exploration clone it and work on the copies.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    /// One cell per square, indexed top-left (a8) to bottom-right (h1).
    board: [Option<Piece>; 64],
    /// Which side moves next.
    side_to_move: Color,
    /// Current castling rights.
    castling: CastleRights,
    /// En passant target square, set only immediately after a double pawn push.
    en_passant: Option<Square>,
    /// Halfmoves since the last pawn move or capture (fifty-move rule).
    halfmove_clock: u16,
    /// Fullmove number (starts at 1, incremented after Black moves).
    fullmove_number: u16,
    /// Cached king location per side, indexed by [`Color::index()`].
    king_squares: [Square; 2],
    /// Zobrist hash of the position.
    hash: u64,
    /// Hash of every recorded position since game start or last load,
    /// in order. Seeded with the initial position's own hash.
    history: Vec<u64>,
    /// Occurrence count per hash in `history`, kept in lockstep so
    /// repetition queries are O(1).
    repetitions: HashMap<u64, u32>,
}

impl Position {
    /// Return the standard starting position.
    pub fn starting_position() -> Position {
        let mut board = [None; 64];

        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (col, &kind) in back_rank.iter().enumerate() {
            board[Square::from_row_col(0, col as u8).unwrap().index()] =
                Some(Piece::new(kind, Color::Black));
            board[Square::from_row_col(7, col as u8).unwrap().index()] =
                Some(Piece::new(kind, Color::White));
        }
        for col in 0..8u8 {
            board[Square::from_row_col(1, col).unwrap().index()] =
                Some(Piece::new(PieceKind::Pawn, Color::Black));
            board[Square::from_row_col(6, col).unwrap().index()] =
                Some(Piece::new(PieceKind::Pawn, Color::White));
        }

        Position::from_parts(board, Color::White, CastleRights::ALL, None, 0, 1)
            .expect("starting position is structurally valid")
    }

    /// Assemble a position from parsed fields, validating structure.
    ///
    /// Computes the king cache and hash, and seeds the repetition
    /// ledger with the position's own hash. Used by FEN import, which
    /// relies on this running before any prior state is replaced.
    pub(crate) fn from_parts(
        board: [Option<Piece>; 64],
        side_to_move: Color,
        castling: CastleRights,
        en_passant: Option<Square>,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) -> Result<Position, FenError> {
        let king_squares = find_kings(&board)?;

        let mut position = Position {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            king_squares,
            hash: 0,
            history: Vec::new(),
            repetitions: HashMap::new(),
        };
        position.validate()?;
        position.hash = zobrist::hash_from_scratch(&position);
        position.history.push(position.hash);
        position.repetitions.insert(position.hash, 1);
        Ok(position)
    }

    /// Return the piece on the given square, if any.
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.board[sq.index()]
    }

    /// Return `true` if the given square is occupied.
    #[inline]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self.board[sq.index()].is_some()
    }

    /// Return the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Return the current castling rights.
    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    /// Return the en passant target square, if any.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Return the halfmove clock.
    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Return the fullmove number.
    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Return the cached square of the given side's king.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    /// Return the Zobrist hash of the position.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// How many times the current position has been recorded, counting
    /// itself. 3 or more means draw by threefold repetition.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.get(&self.hash).copied().unwrap_or(0)
    }

    /// Number of recorded positions since game start or last load.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // ── mutators used by the move applier ────────────────────────────

    #[inline]
    pub(crate) fn set_cell(&mut self, sq: Square, cell: Option<Piece>) {
        self.board[sq.index()] = cell;
    }

    #[inline]
    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline]
    pub(crate) fn set_castling(&mut self, rights: CastleRights) {
        self.castling = rights;
    }

    #[inline]
    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        self.en_passant = sq;
    }

    #[inline]
    pub(crate) fn set_halfmove_clock(&mut self, clock: u16) {
        self.halfmove_clock = clock;
    }

    #[inline]
    pub(crate) fn set_fullmove_number(&mut self, number: u16) {
        self.fullmove_number = number;
    }

    #[inline]
    pub(crate) fn set_king_square(&mut self, color: Color, sq: Square) {
        self.king_squares[color.index()] = sq;
    }

    #[inline]
    pub(crate) fn set_king_squares(&mut self, squares: [Square; 2]) {
        self.king_squares = squares;
    }

    #[inline]
    pub(crate) fn set_hash(&mut self, hash: u64) {
        self.hash = hash;
    }

    #[inline]
    pub(crate) fn king_squares(&self) -> [Square; 2] {
        self.king_squares
    }

    /// Append the current hash to the repetition ledger.
    pub(crate) fn record_hash(&mut self) {
        self.history.push(self.hash);
        *self.repetitions.entry(self.hash).or_insert(0) += 1;
    }

    /// Pop the most recent ledger entry, which must be the current hash.
    pub(crate) fn unrecord_hash(&mut self) {
        let popped = self.history.pop();
        debug_assert_eq!(popped, Some(self.hash), "ledger out of sync with position");
        if let Some(count) = self.repetitions.get_mut(&self.hash) {
            if *count <= 1 {
                self.repetitions.remove(&self.hash);
            } else {
                *count -= 1;
            }
        }
    }

    /// Validate the structural integrity of the position.
    ///
    /// Checks the king census, pawn placement, and that the king cache
    /// agrees with the board.
    pub fn validate(&self) -> Result<(), FenError> {
        let kings = find_kings(&self.board)?;
        for color in Color::ALL {
            debug_assert_eq!(
                kings[color.index()],
                self.king_squares[color.index()],
                "king cache out of sync"
            );
        }

        for col in 0..8u8 {
            for row in [0u8, 7u8] {
                let sq = Square::from_row_col(row, col).unwrap();
                if matches!(self.board[sq.index()], Some(p) if p.kind == PieceKind::Pawn) {
                    return Err(FenError::PawnsOnBackRank);
                }
            }
        }

        Ok(())
    }

    /// Return a pretty-printable wrapper for this position.
    pub fn pretty(&self) -> PrettyPosition<'_> {
        PrettyPosition(self)
    }
}

/// Locate both kings, failing unless each side has exactly one.
fn find_kings(board: &[Option<Piece>; 64]) -> Result<[Square; 2], FenError> {
    let mut kings = [None; 2];
    let mut counts = [0usize; 2];

    for sq in Square::all() {
        if let Some(piece) = board[sq.index()]
            && piece.kind == PieceKind::King
        {
            counts[piece.color.index()] += 1;
            kings[piece.color.index()] = Some(sq);
        }
    }

    for color in Color::ALL {
        if counts[color.index()] != 1 {
            let color_name = match color {
                Color::White => "white",
                Color::Black => "black",
            };
            return Err(FenError::KingCount {
                color: color_name,
                count: counts[color.index()],
            });
        }
    }

    Ok([kings[0].unwrap(), kings[1].unwrap()])
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{}\")", self)
    }
}

/// Wrapper for pretty-printing a position as an 8x8 grid.
pub struct PrettyPosition<'a>(&'a Position);

impl fmt::Display for PrettyPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0u8..8 {
            write!(f, "{}  ", 8 - row)?;
            for col in 0u8..8 {
                let sq = Square::from_row_col(row, col).unwrap();
                let c = match self.0.piece_on(sq) {
                    Some(piece) => piece.fen_char(),
                    None => '.',
                };
                if col < 7 {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
