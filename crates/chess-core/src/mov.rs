//! Move records.

use crate::{PieceId, PieceKind, Square};
use std::fmt;

/// Flags for special move types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Normal move (no special action).
    Normal = 0,
    /// Pawn double push from its starting rank.
    DoublePush = 1,
    /// King-side castling (O-O).
    CastleKingside = 2,
    /// Queen-side castling (O-O-O).
    CastleQueenside = 3,
    /// En passant capture.
    EnPassant = 4,
    /// Pawn promotion to knight.
    PromoteKnight = 5,
    /// Pawn promotion to bishop.
    PromoteBishop = 6,
    /// Pawn promotion to rook.
    PromoteRook = 7,
    /// Pawn promotion to queen.
    PromoteQueen = 8,
}

impl MoveFlag {
    /// Returns the flag recording a promotion to `kind`, if `kind` is a
    /// valid promotion target.
    pub const fn promotion(kind: PieceKind) -> Option<Self> {
        match kind {
            PieceKind::Knight => Some(MoveFlag::PromoteKnight),
            PieceKind::Bishop => Some(MoveFlag::PromoteBishop),
            PieceKind::Rook => Some(MoveFlag::PromoteRook),
            PieceKind::Queen => Some(MoveFlag::PromoteQueen),
            PieceKind::King | PieceKind::Pawn => None,
        }
    }

    /// Returns the promotion kind if this is a promotion move.
    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceKind> {
        match self {
            MoveFlag::PromoteKnight => Some(PieceKind::Knight),
            MoveFlag::PromoteBishop => Some(PieceKind::Bishop),
            MoveFlag::PromoteRook => Some(PieceKind::Rook),
            MoveFlag::PromoteQueen => Some(PieceKind::Queen),
            _ => None,
        }
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// One executed ply.
///
/// A `Move` is created exactly once when a ply is committed and is never
/// mutated afterwards; all fields are read-only. Piece references are
/// [`PieceId`]s, which stay valid after capture, so `captured` points at
/// the exact instance that was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    piece: PieceId,
    from: Square,
    to: Square,
    captured: Option<PieceId>,
    flag: MoveFlag,
}

impl Move {
    /// Creates a move record.
    #[inline]
    pub const fn new(
        piece: PieceId,
        from: Square,
        to: Square,
        captured: Option<PieceId>,
        flag: MoveFlag,
    ) -> Self {
        Move {
            piece,
            from,
            to,
            captured,
            flag,
        }
    }

    /// The piece that moved (for castling, the king).
    #[inline]
    pub const fn piece(&self) -> PieceId {
        self.piece
    }

    /// Origin square.
    #[inline]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// Destination square.
    #[inline]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The piece taken by this ply, including an en passant victim.
    #[inline]
    pub const fn captured(&self) -> Option<PieceId> {
        self.captured
    }

    #[inline]
    pub const fn flag(&self) -> MoveFlag {
        self.flag
    }

    /// True if this ply was a castling move.
    #[inline]
    pub const fn castle(&self) -> bool {
        self.flag.is_castling()
    }

    /// Returns the coordinate notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_coordinate(&self) -> String {
        let promo = match self.flag {
            MoveFlag::PromoteKnight => "n",
            MoveFlag::PromoteBishop => "b",
            MoveFlag::PromoteRook => "r",
            MoveFlag::PromoteQueen => "q",
            _ => "",
        };
        format!("{}{}{}", self.from, self.to, promo)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coordinate())
    }
}
