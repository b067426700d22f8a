//! Core types for chess.
//!
//! This crate provides the vocabulary shared by the rules engine and its
//! consumers:
//! - [`Color`] for the two sides
//! - [`Square`] for board coordinates
//! - [`PieceKind`] and [`PieceId`] for piece kinds and stable piece identity
//! - [`Move`] for the immutable record of an executed ply
//! - position description parsing ([`FenParser`])

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{CastlingToken, DecodeWarning, FenError, FenParser, Wing};
pub use mov::{Move, MoveFlag};
pub use piece::{PieceId, PieceKind};
pub use square::Square;
