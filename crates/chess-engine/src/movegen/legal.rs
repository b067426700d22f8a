//! Legality filtering.
//!
//! A pseudo-legal candidate is tried on a scratch copy of the position and
//! kept only if the mover's king is not attacked afterwards. The real
//! position is never touched.

use super::{is_castling, is_king_attacked, is_square_attacked, pseudo_legal};
use crate::Position;
use chess_core::{Color, PieceId, Square};

/// Returns true if moving `id` to `to` is a legal move in `position`.
///
/// `to` must be one of the piece's pseudo-legal destinations. Captured
/// pieces and ids foreign to the position never move legally.
pub fn is_legal(position: &Position, id: PieceId, to: Square) -> bool {
    if !position.contains(id) || position.piece(id).is_captured() {
        return false;
    }
    let color = id.color();
    let them = color.opposite();

    if to == position.king_square(them) {
        return false;
    }

    if is_castling(position, id, to) {
        let from = position.piece(id).square();
        let step = if to.file() > from.file() { 1 } else { -1 };
        let transit = from.offset(step, 0);
        if is_square_attacked(position, from, them)
            || transit.map_or(true, |sq| is_square_attacked(position, sq, them))
        {
            return false;
        }
    }

    let mut trial = position.clone();
    trial.apply(id, to);
    !is_king_attacked(&trial, color)
}

/// Generates the legal destinations of a piece.
pub fn legal_destinations(position: &Position, id: PieceId) -> Vec<Square> {
    let mut moves = pseudo_legal(position, id);
    moves.retain(|&to| is_legal(position, id, to));
    moves
}

/// Generates every legal `(piece, destination)` pair for a side.
pub fn legal_moves(position: &Position, color: Color) -> Vec<(PieceId, Square)> {
    position
        .live(color)
        .flat_map(|(id, _)| {
            legal_destinations(position, id)
                .into_iter()
                .map(move |to| (id, to))
        })
        .collect()
}

/// Returns true if the side has at least one legal move.
pub fn has_legal_move(position: &Position, color: Color) -> bool {
    position.live(color).any(|(id, _)| {
        pseudo_legal(position, id)
            .into_iter()
            .any(|to| is_legal(position, id, to))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::PieceKind;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn legal_from(position: &Position, from: &str) -> Vec<String> {
        let id = position.piece_at(sq(from)).unwrap();
        let mut squares: Vec<String> = legal_destinations(position, id)
            .into_iter()
            .map(|s| s.to_algebraic())
            .collect();
        squares.sort();
        squares
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let pos = Position::startpos();
        assert_eq!(legal_moves(&pos, Color::White).len(), 20);
        assert_eq!(legal_moves(&pos, Color::Black).len(), 20);
    }

    #[test]
    fn pinned_piece_stays_on_the_pin_line() {
        // The e2 rook is pinned by the e8 rook.
        let pos = Position::from_fen("4r1k1/8/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
        assert_eq!(
            legal_from(&pos, "e2"),
            vec!["e3", "e4", "e5", "e6", "e7", "e8"]
        );
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let pos = Position::from_fen("3rk3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(legal_from(&pos, "e1"), vec!["e2", "f1", "f2"]);
    }

    #[test]
    fn king_cannot_capture_defended_piece() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/3q4/3rK3 w - - 0 1").unwrap();
        // Queen on d2 is defended by the rook on d1; rook on d1 by the queen.
        let moves = legal_from(&pos, "e1");
        assert!(!moves.contains(&"d2".to_string()));
        assert!(!moves.contains(&"d1".to_string()));
    }

    #[test]
    fn must_answer_check() {
        // Rook gives check along the e-file; only blocks, captures or king moves remain.
        let pos = Position::from_fen("4r1k1/8/8/8/8/8/3B4/R3K3 w Q - 0 1").unwrap();
        for (id, to) in legal_moves(&pos, Color::White) {
            let mut trial = pos.clone();
            trial.apply(id, to);
            assert!(!is_king_attacked(&trial, Color::White));
        }
        // No castling out of check.
        assert!(!legal_from(&pos, "e1").contains(&"c1".to_string()));
        // The bishop can interpose on e3 only.
        assert_eq!(legal_from(&pos, "d2"), vec!["e3"]);
    }

    #[test]
    fn castling_through_attacked_square_is_illegal() {
        // Black rook on f8 covers f1; king-side castling must disappear.
        let pos = Position::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let moves = legal_from(&pos, "e1");
        assert!(!moves.contains(&"g1".to_string()));
        assert!(moves.contains(&"c1".to_string()));
    }

    #[test]
    fn castling_onto_attacked_square_is_illegal() {
        let pos = Position::from_fen("4k1r1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let moves = legal_from(&pos, "e1");
        assert!(!moves.contains(&"g1".to_string()));
        assert!(moves.contains(&"c1".to_string()));
    }

    #[test]
    fn queen_side_b_file_may_be_attacked() {
        // Only the king's path matters; the rook may cross an attacked b1.
        let pos = Position::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert!(legal_from(&pos, "e1").contains(&"c1".to_string()));
    }

    #[test]
    fn en_passant_cannot_expose_king() {
        // Taking en passant would clear the fifth rank between rook and king.
        let pos = Position::from_fen("8/8/8/KpP4r/8/8/8/7k w - b6 0 1").unwrap();
        assert_eq!(legal_from(&pos, "c5"), vec!["c6"]);
    }

    #[test]
    fn en_passant_is_legal_when_safe() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(legal_from(&pos, "e5"), vec!["d6", "e6"]);
    }

    #[test]
    fn enemy_king_is_never_a_destination() {
        // Black to move but white is already in check: the king may not be taken.
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        let black_rook = pos.piece_at(Square::A1).unwrap();
        let black = Position::from_fen("4k3/8/8/8/8/8/8/r3K3 b - - 0 1").unwrap();
        assert!(!legal_destinations(&black, black_rook).contains(&Square::E1));
        assert_eq!(pos.piece(black_rook).kind(), PieceKind::Rook);
    }

    #[test]
    fn foreign_and_captured_ids_are_never_legal() {
        let mut pos = Position::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let ghost = PieceId::new(Color::Black, 9);
        assert!(legal_destinations(&pos, ghost).is_empty());
        assert!(!is_legal(&pos, ghost, sq("e7")));

        let pawn = pos.piece_at(sq("e4")).unwrap();
        let victim = pos.piece_at(sq("d5")).unwrap();
        pos.apply(pawn, sq("d5"));
        pos.pass_turn();
        assert!(!is_legal(&pos, victim, sq("d4")));
        assert!(legal_destinations(&pos, victim).is_empty());
    }

    #[test]
    fn has_legal_move_matches_generation() {
        let pos = Position::startpos();
        assert!(has_legal_move(&pos, Color::White));
        let mated = Position::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert!(!has_legal_move(&mated, Color::Black));
        assert!(legal_moves(&mated, Color::Black).is_empty());
    }
}
