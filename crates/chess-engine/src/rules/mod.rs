//! Check, checkmate and stalemate detection.

use crate::movegen::{has_legal_move, is_king_attacked};
use crate::Position;
use chess_core::Color;

/// Status of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Not in check, with at least one legal move.
    Ongoing,
    /// In check, with at least one legal move.
    Check,
    /// In check, with no legal move. The other side has won.
    Checkmate,
    /// Not in check, with no legal move. The game is drawn.
    Stalemate,
}

impl GameStatus {
    /// Returns true if the game has ended.
    #[inline]
    pub const fn is_over(self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

/// Returns true if the given side's king is attacked by any enemy piece.
pub fn is_in_check(position: &Position, color: Color) -> bool {
    is_king_attacked(position, color)
}

/// Returns true if the given side is in check and has no legal move.
pub fn is_checkmate(position: &Position, color: Color) -> bool {
    is_in_check(position, color) && !has_legal_move(position, color)
}

/// Returns true if the given side is not in check but has no legal move.
pub fn is_stalemate(position: &Position, color: Color) -> bool {
    !is_in_check(position, color) && !has_legal_move(position, color)
}

/// Returns the status of the side to move.
pub fn status(position: &Position) -> GameStatus {
    let color = position.turn();
    match (is_in_check(position, color), has_legal_move(position, color)) {
        (false, true) => GameStatus::Ongoing,
        (true, true) => GameStatus::Check,
        (true, false) => GameStatus::Checkmate,
        (false, false) => GameStatus::Stalemate,
    }
}
