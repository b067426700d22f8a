//! Movement patterns and square attack detection.

use crate::Position;
use chess_core::{Color, PieceKind, Square};

/// `(file, rank)` steps a knight can jump.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// `(file, rank)` steps to the eight neighbouring squares.
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];

pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// Pushes the squares reachable by single steps, skipping squares held by
/// `color`'s own pieces.
pub(crate) fn step_targets(
    position: &Position,
    from: Square,
    color: Color,
    offsets: &[(i8, i8)],
    out: &mut Vec<Square>,
) {
    for &(df, dr) in offsets {
        if let Some(to) = from.offset(df, dr) {
            if position.occupant(to).map_or(true, |p| p.color() != color) {
                out.push(to);
            }
        }
    }
}

/// Pushes the squares along each ray until the board edge or the first
/// occupied square, which is included only when it holds an enemy piece.
pub(crate) fn ray_targets(
    position: &Position,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    out: &mut Vec<Square>,
) {
    for &(df, dr) in directions {
        let mut cursor = from;
        while let Some(to) = cursor.offset(df, dr) {
            match position.occupant(to) {
                None => out.push(to),
                Some(p) => {
                    if p.color() != color {
                        out.push(to);
                    }
                    break;
                }
            }
            cursor = to;
        }
    }
}

/// Returns the first occupied square's piece kind and side along a ray.
fn first_along(position: &Position, from: Square, (df, dr): (i8, i8)) -> Option<(PieceKind, Color)> {
    let mut cursor = from;
    while let Some(to) = cursor.offset(df, dr) {
        if let Some(p) = position.occupant(to) {
            return Some((p.kind(), p.color()));
        }
        cursor = to;
    }
    None
}

/// Returns true if the given square is attacked by any piece of `by_color`.
///
/// Pawns attack only their forward diagonals and kings only their
/// neighbours; sliders attack up to and including the first occupied
/// square on each ray.
pub fn is_square_attacked(position: &Position, sq: Square, by_color: Color) -> bool {
    let holds = |target: Option<Square>, kind: PieceKind| {
        target
            .and_then(|t| position.occupant(t))
            .is_some_and(|p| p.is(kind, by_color))
    };

    // Pawn attacks come from one rank behind the square, seen from the attacker.
    let back = -by_color.pawn_direction();
    if holds(sq.offset(-1, back), PieceKind::Pawn) || holds(sq.offset(1, back), PieceKind::Pawn) {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(df, dr)| holds(sq.offset(df, dr), PieceKind::Knight))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(df, dr)| holds(sq.offset(df, dr), PieceKind::King))
    {
        return true;
    }

    let slides = |directions: &[(i8, i8)], kind: PieceKind| {
        directions.iter().any(|&dir| {
            matches!(
                first_along(position, sq, dir),
                Some((k, c)) if c == by_color && (k == kind || k == PieceKind::Queen)
            )
        })
    };

    slides(&ROOK_DIRECTIONS, PieceKind::Rook) || slides(&BISHOP_DIRECTIONS, PieceKind::Bishop)
}

/// Returns true if the king of the given side is attacked.
pub fn is_king_attacked(position: &Position, king_color: Color) -> bool {
    is_square_attacked(position, position.king_square(king_color), king_color.opposite())
}
