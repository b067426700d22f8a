//! Move generation.
//!
//! Generation is per piece: [`pseudo_legal`] produces the candidate
//! destinations a piece's movement rule allows, ignoring whether its own
//! king ends up attacked. [`legal`] narrows those candidates to legal moves.

mod attacks;
pub mod legal;
pub mod perft;

use crate::{Piece, Position};
use chess_core::{PieceId, PieceKind, Square};

pub use attacks::{
    is_king_attacked, is_square_attacked, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS,
    QUEEN_DIRECTIONS, ROOK_DIRECTIONS,
};
pub use legal::{has_legal_move, is_legal, legal_destinations, legal_moves};

use attacks::{ray_targets, step_targets};

/// Generates the pseudo-legal destinations of a piece.
///
/// Captured pieces and ids foreign to the position have none.
/// Destinations held by a friendly piece are never produced.
pub fn pseudo_legal(position: &Position, id: PieceId) -> Vec<Square> {
    let mut out = Vec::with_capacity(28);
    if !position.contains(id) {
        return out;
    }
    let piece = position.piece(id);
    if piece.is_captured() {
        return out;
    }

    let (from, color) = (piece.square(), piece.color());
    match piece.kind() {
        PieceKind::King => {
            step_targets(position, from, color, &KING_OFFSETS, &mut out);
            generate_castling_moves(position, piece, &mut out);
        }
        PieceKind::Queen => ray_targets(position, from, color, &QUEEN_DIRECTIONS, &mut out),
        PieceKind::Rook => ray_targets(position, from, color, &ROOK_DIRECTIONS, &mut out),
        PieceKind::Bishop => ray_targets(position, from, color, &BISHOP_DIRECTIONS, &mut out),
        PieceKind::Knight => step_targets(position, from, color, &KNIGHT_OFFSETS, &mut out),
        PieceKind::Pawn => generate_pawn_moves(position, piece, &mut out),
    }

    out
}

/// Pushes castling destinations: two files towards an unmoved friendly
/// rook in a corner of the king's rank, with nothing standing in between.
///
/// Attacks on the king's path are checked by the legality filter.
fn generate_castling_moves(position: &Position, king: &Piece, out: &mut Vec<Square>) {
    if king.has_moved() {
        return;
    }
    let from = king.square();

    for (corner, step) in [(0u8, -1i8), (7, 1)] {
        let rook_ready = Square::new(corner, from.rank())
            .and_then(|sq| position.occupant(sq))
            .is_some_and(|rook| rook.is(PieceKind::Rook, king.color()) && !rook.has_moved());
        if !rook_ready {
            continue;
        }

        let (low, high) = if corner < from.file() {
            (corner + 1, from.file())
        } else {
            (from.file() + 1, corner)
        };
        let clear = (low..high)
            .filter_map(|file| Square::new(file, from.rank()))
            .all(|sq| position.is_empty(sq));

        if clear {
            if let Some(to) = from.offset(2 * step, 0) {
                out.push(to);
            }
        }
    }
}

/// Pushes pawn destinations: single and double pushes onto empty squares,
/// diagonal captures of enemy pieces and the en passant target.
fn generate_pawn_moves(position: &Position, pawn: &Piece, out: &mut Vec<Square>) {
    let (from, color) = (pawn.square(), pawn.color());
    let dir = color.pawn_direction();

    if let Some(one) = from.offset(0, dir).filter(|&sq| position.is_empty(sq)) {
        out.push(one);
        if !pawn.has_moved() {
            if let Some(two) = from.offset(0, 2 * dir).filter(|&sq| position.is_empty(sq)) {
                out.push(two);
            }
        }
    }

    let en_passant = position
        .en_passant()
        .filter(|&id| id.color() != color)
        .and_then(|_| position.en_passant_target());

    for df in [-1, 1] {
        let Some(diagonal) = from.offset(df, dir) else {
            continue;
        };
        let capturable = match position.occupant(diagonal) {
            Some(target) => target.color() != color,
            None => en_passant == Some(diagonal),
        };
        if capturable {
            out.push(diagonal);
        }
    }
}

/// Returns true if moving `id` to `to` is a castling move.
pub fn is_castling(position: &Position, id: PieceId, to: Square) -> bool {
    position.contains(id) && {
        let piece = position.piece(id);
        piece.kind() == PieceKind::King && piece.square().file().abs_diff(to.file()) == 2
    }
}
