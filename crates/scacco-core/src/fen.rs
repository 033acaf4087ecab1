//! FEN parsing and serialization for [`Position`].
//!
//! Import is staged: the whole string parses into a candidate position
//! which is validated before being returned, so a failed import can
//! never leave a previously valid position half-mutated.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::FenError;
use crate::piece::Piece;
use crate::position::Position;
use crate::square::Square;

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl FromStr for Position {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        // Placement, side, castling, and en passant are mandatory; the
        // two clock fields are tolerated absent and default below.
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::WrongFieldCount {
                found: fields.len(),
            });
        }

        // Piece placement: ranks run 8 down to 1, matching board order.
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount {
                found: ranks.len(),
            });
        }

        let mut board = [None; 64];
        for (rank_index, rank_str) in ranks.iter().enumerate() {
            let mut col: u8 = 0;
            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(FenError::InvalidPieceChar { character: c });
                    }
                    col += digit as u8;
                    if col > 8 {
                        return Err(FenError::BadRankLength {
                            rank_index,
                            length: col as usize,
                        });
                    }
                } else {
                    let piece =
                        Piece::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
                    if col >= 8 {
                        return Err(FenError::BadRankLength {
                            rank_index,
                            length: col as usize + 1,
                        });
                    }
                    let sq = Square::from_row_col(rank_index as u8, col).unwrap();
                    board[sq.index()] = Some(piece);
                    col += 1;
                }
            }
            if col != 8 {
                return Err(FenError::BadRankLength {
                    rank_index,
                    length: col as usize,
                });
            }
        }

        // Active color.
        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidColor {
                    found: other.to_string(),
                });
            }
        };

        // Castling rights.
        let castling = CastleRights::from_fen(fields[2])?;

        // En passant target.
        let en_passant = if fields[3] == "-" {
            None
        } else {
            Some(
                Square::from_algebraic(fields[3]).ok_or_else(|| FenError::InvalidEnPassant {
                    found: fields[3].to_string(),
                })?,
            )
        };

        // Clock fields default when absent or unparsable.
        let halfmove_clock = fields
            .get(4)
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(0);
        let fullmove_number = fields
            .get(5)
            .and_then(|s| s.parse::<u16>().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(1);

        let position = Position::from_parts(
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        )?;
        trace!(fen, "position imported");
        Ok(position)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Piece placement, top rank first (board order).
        for row in 0u8..8 {
            let mut empty_run = 0u8;
            for col in 0u8..8 {
                let sq = Square::from_row_col(row, col).unwrap();
                match self.piece_on(sq) {
                    Some(piece) => {
                        if empty_run > 0 {
                            write!(f, "{empty_run}")?;
                            empty_run = 0;
                        }
                        write!(f, "{piece}")?;
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                write!(f, "{empty_run}")?;
            }
            if row < 7 {
                write!(f, "/")?;
            }
        }

        write!(
            f,
            " {} {} ",
            self.side_to_move(),
            self.castling()
        )?;
        match self.en_passant() {
            Some(sq) => write!(f, "{sq}")?,
            None => write!(f, "-")?,
        }
        write!(f, " {} {}", self.halfmove_clock(), self.fullmove_number())
    }
}
