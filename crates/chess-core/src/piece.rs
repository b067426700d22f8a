//! Piece kinds and piece identity.

use crate::Color;
use std::fmt;

/// The six kinds of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    King = 0,
    Queen = 1,
    Rook = 2,
    Bishop = 3,
    Knight = 4,
    Pawn = 5,
}

impl PieceKind {
    /// Kinds a pawn may promote to, in the order a chooser usually offers them.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
    ];

    /// Returns the description letter for this kind with the given side.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Pawn => 'p',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a description letter into a kind and side.
    ///
    /// The kind is the case-insensitive letter; upper case is White.
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => return None,
        };
        Some((kind, color))
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::King => "King",
            PieceKind::Queen => "Queen",
            PieceKind::Rook => "Rook",
            PieceKind::Bishop => "Bishop",
            PieceKind::Knight => "Knight",
            PieceKind::Pawn => "Pawn",
        };
        write!(f, "{}", name)
    }
}

/// Stable identity of a piece: its side plus its slot in that side's
/// ordered piece collection.
///
/// Pieces are never removed from their collection, so an id stays valid
/// for the lifetime of a position even after the piece is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId {
    color: Color,
    index: u8,
}

impl PieceId {
    #[inline]
    pub const fn new(color: Color, index: u8) -> Self {
        PieceId { color, index }
    }

    #[inline]
    pub const fn color(self) -> Color {
        self.color
    }

    /// Slot in the side's piece collection.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.color, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_to_fen() {
        assert_eq!(PieceKind::Pawn.to_fen_char(Color::White), 'P');
        assert_eq!(PieceKind::Pawn.to_fen_char(Color::Black), 'p');
        assert_eq!(PieceKind::King.to_fen_char(Color::White), 'K');
        assert_eq!(PieceKind::Knight.to_fen_char(Color::Black), 'n');
    }

    #[test]
    fn kind_from_fen() {
        assert_eq!(
            PieceKind::from_fen_char('P'),
            Some((PieceKind::Pawn, Color::White))
        );
        assert_eq!(
            PieceKind::from_fen_char('q'),
            Some((PieceKind::Queen, Color::Black))
        );
        assert_eq!(PieceKind::from_fen_char('x'), None);
        assert_eq!(PieceKind::from_fen_char('3'), None);
    }

    #[test]
    fn piece_ids_order_by_side_then_slot() {
        let mut ids = vec![
            PieceId::new(Color::Black, 0),
            PieceId::new(Color::White, 5),
            PieceId::new(Color::White, 1),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                PieceId::new(Color::White, 1),
                PieceId::new(Color::White, 5),
                PieceId::new(Color::Black, 0),
            ]
        );
    }

    #[test]
    fn piece_id() {
        let id = PieceId::new(Color::Black, 3);
        assert_eq!(id.color(), Color::Black);
        assert_eq!(id.index(), 3);
        assert_eq!(id.to_string(), "Black#3");
    }
}
