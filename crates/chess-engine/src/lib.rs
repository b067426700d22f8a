//! Legal-play chess rules engine.
//!
//! This crate provides:
//! - [`Position`] - Piece sets with stable identities, square occupancy,
//!   side to move and en passant memory, decoded from a FEN-like description
//! - [`Board`] - Selection, move and promotion state machine with move history
//! - Move generation and legality filtering in [`movegen`]
//! - Check, checkmate and stalemate detection in [`rules`]
//!
//! # Architecture
//!
//! Pieces are never removed: a capture flags the piece and takes it off its
//! square, so a [`PieceId`](chess_core::PieceId) stays valid for the whole
//! game. Legality is decided by trying each candidate move on a scratch copy
//! of the position and asking whether the mover's king is attacked.
//!
//! # Example
//!
//! ```
//! use chess_engine::{Board, MoveOutcome};
//! use chess_core::Square;
//!
//! let mut board = Board::new();
//! let pawn = board.piece_at(Square::from_algebraic("e2").unwrap()).unwrap();
//! board.select(pawn).unwrap();
//! let outcome = board.move_to(Square::from_algebraic("e4").unwrap()).unwrap();
//! assert!(matches!(outcome, MoveOutcome::Committed(_)));
//! assert_eq!(board.en_passant(), Some(pawn));
//! ```

mod board;
pub mod movegen;
mod piece;
mod position;
pub mod rules;

pub use board::{Board, BoardError, BoardState, MoveOutcome, PendingPromotion, Selection};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{
    has_legal_move, is_king_attacked, is_legal, is_square_attacked, legal_destinations,
    legal_moves, pseudo_legal,
};
pub use piece::Piece;
pub use position::{Decoded, Position, PositionError};
pub use rules::GameStatus;
