//! Piece entities.

use chess_core::{Color, PieceKind, Square};

/// A piece on (or taken from) the board.
///
/// Captured pieces keep their last square and are only flagged, so move
/// records can keep pointing at them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub(crate) kind: PieceKind,
    pub(crate) color: Color,
    pub(crate) square: Square,
    pub(crate) captured: bool,
    pub(crate) has_moved: bool,
}

impl Piece {
    pub(crate) const fn new(kind: PieceKind, color: Color, square: Square, has_moved: bool) -> Self {
        Piece {
            kind,
            color,
            square,
            captured: false,
            has_moved,
        }
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Current square, or the square it was taken on if captured.
    #[inline]
    pub const fn square(&self) -> Square {
        self.square
    }

    #[inline]
    pub const fn is_captured(&self) -> bool {
        self.captured
    }

    /// Whether the piece has moved. Only meaningful for kings, rooks and
    /// pawns: it gates castling and the pawn double step.
    #[inline]
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Returns true if this piece is of the given kind and side.
    #[inline]
    pub fn is(&self, kind: PieceKind, color: Color) -> bool {
        self.kind == kind && self.color == color
    }
}
