//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! Each promotion choice counts as its own move.

use super::legal_moves;
use crate::Position;
use chess_core::{Color, PieceId, PieceKind, Square};

/// Applies a legal move to a copy of the position and hands the turn over,
/// once per promotion choice when the move promotes.
fn successors(position: &Position, id: PieceId, to: Square) -> Vec<(Position, Option<PieceKind>)> {
    let mut next = position.clone();
    let applied = next.apply(id, to);
    next.pass_turn();

    if !applied.promotion_due {
        return vec![(next, None)];
    }

    PieceKind::PROMOTIONS
        .iter()
        .map(|&kind| {
            let mut promoted = next.clone();
            promoted.set_kind(id, kind);
            (promoted, Some(kind))
        })
        .collect()
}

/// Counts the number of leaf nodes at the given depth.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0u64;
    for (id, to) in legal_moves(position, position.turn()) {
        for (next, _) in successors(position, id, to) {
            nodes += perft(&next, depth - 1);
        }
    }
    nodes
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    let mut results = Vec::new();

    for (id, to) in legal_moves(position, position.turn()) {
        let from = position.piece(id).square();
        for (next, promotion) in successors(position, id, to) {
            let suffix = promotion
                .map(|kind| kind.to_fen_char(Color::Black).to_string())
                .unwrap_or_default();
            let nodes = if depth > 1 { perft(&next, depth - 1) } else { 1 };
            results.push((format!("{}{}{}", from, to, suffix), nodes));
        }
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
