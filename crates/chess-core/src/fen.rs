//! Position description (FEN-style) parsing.
//!
//! A description has four space-separated fields: piece placement, side to
//! move, castling rights and en passant square. Two trailing clock fields
//! are tolerated and ignored.
//!
//! Structural problems are [`FenError`]s. Problems confined to the castling
//! or en passant fields are [`DecodeWarning`]s: the field is ignored and
//! decoding carries on.

use crate::{Color, PieceKind, Square};
use thiserror::Error;

/// Errors that make a position description unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid position description: expected 4 to 6 fields, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid side to move: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),
}

/// Non-fatal problems found while decoding a position description.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    #[error("unknown castling token '{0}'")]
    UnknownCastlingToken(char),

    #[error("castling token '{0}' has no unmoved king and rook on their home squares")]
    CastlingPiecesMissing(char),

    #[error("invalid en passant square '{0}'")]
    InvalidEnPassantSquare(String),

    #[error("no pawn can be taken en passant via {0}")]
    NoEnPassantPawn(Square),
}

/// The side of the board a castling move heads towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wing {
    King,
    Queen,
}

/// One castling right named by the castling field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingToken {
    pub color: Color,
    pub wing: Wing,
}

impl CastlingToken {
    /// Parses a castling letter: the side is the letter case, the wing its
    /// identity (`k` king-side, `q` queen-side).
    pub const fn from_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let wing = match c.to_ascii_lowercase() {
            'k' => Wing::King,
            'q' => Wing::Queen,
            _ => return None,
        };
        Some(CastlingToken { color, wing })
    }

    /// Returns the castling letter for this right.
    pub const fn to_char(self) -> char {
        let c = match self.wing {
            Wing::King => 'k',
            Wing::Queen => 'q',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Home square of the king this right belongs to.
    pub const fn king_square(self) -> Square {
        match self.color {
            Color::White => Square::E1,
            Color::Black => Square::E8,
        }
    }

    /// Corner square of the rook this right belongs to.
    pub const fn rook_square(self) -> Square {
        match (self.color, self.wing) {
            (Color::White, Wing::King) => Square::H1,
            (Color::White, Wing::Queen) => Square::A1,
            (Color::Black, Wing::King) => Square::H8,
            (Color::Black, Wing::Queen) => Square::A8,
        }
    }
}

/// Parsed position description.
///
/// This struct holds the validated description fields. The engine is
/// responsible for turning them into pieces on a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Piece placement string (e.g., "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR")
    pub piece_placement: String,
    /// Side to move
    pub side_to_move: Color,
    /// Castling field (e.g., "KQkq", "-")
    pub castling: String,
    /// En passant field (e.g., "e3", "-")
    pub en_passant: String,
}

/// Tokens meaning "nothing here" in the castling and en passant fields.
const NONE_TOKENS: [&str; 2] = ["-", "\u{2013}"];

impl FenParser {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a position description.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if !(4..=6).contains(&parts.len()) {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let piece_placement = parts[0];
        Self::validate_piece_placement(piece_placement)?;

        let side_to_move = Color::from_token(parts[1])
            .ok_or_else(|| FenError::InvalidActiveColor(parts[1].to_string()))?;

        Ok(FenParser {
            piece_placement: piece_placement.to_string(),
            side_to_move,
            castling: parts[2].to_string(),
            en_passant: parts[3].to_string(),
        })
    }

    fn validate_piece_placement(placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (i, rank) in ranks.iter().enumerate() {
            let mut squares = 0;
            for c in rank.chars() {
                if let Some(run) = c.to_digit(10) {
                    squares += run;
                } else if PieceKind::from_fen_char(c).is_some() {
                    squares += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - i
                    )));
                }
            }
            if squares != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - i,
                    squares
                )));
            }
        }

        Ok(())
    }

    /// Walks the placement field left-to-right, top-to-bottom, yielding
    /// every piece with its square.
    pub fn placements(&self) -> Vec<(Square, PieceKind, Color)> {
        let mut out = Vec::with_capacity(32);
        let (mut file, mut rank) = (0u8, 0u8);

        for c in self.piece_placement.chars() {
            if c == '/' {
                file = 0;
                rank += 1;
            } else if let Some(run) = c.to_digit(10) {
                file += run as u8;
            } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                if let Some(sq) = Square::new(file, rank) {
                    out.push((sq, kind, color));
                }
                file += 1;
            }
        }

        out
    }

    /// Splits the castling field into rights. Unknown letters come back as
    /// warnings in their place.
    pub fn castling_tokens(&self) -> Vec<Result<CastlingToken, DecodeWarning>> {
        if NONE_TOKENS.contains(&self.castling.as_str()) {
            return Vec::new();
        }
        self.castling
            .chars()
            .map(|c| CastlingToken::from_char(c).ok_or(DecodeWarning::UnknownCastlingToken(c)))
            .collect()
    }

    /// Resolves the en passant field to a square.
    pub fn en_passant_square(&self) -> Result<Option<Square>, DecodeWarning> {
        if NONE_TOKENS.contains(&self.en_passant.as_str()) {
            return Ok(None);
        }
        Square::from_algebraic(&self.en_passant)
            .map(Some)
            .ok_or_else(|| DecodeWarning::InvalidEnPassantSquare(self.en_passant.clone()))
    }
}

impl Default for FenParser {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}
