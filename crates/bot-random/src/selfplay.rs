//! Random self-play through the board's move surface.

use chess_core::{Color, Move, PieceKind};
use chess_engine::{Board, BoardError, GameStatus, MoveOutcome, PositionError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors that abort a self-play game.
#[derive(Error, Debug)]
pub enum SelfPlayError {
    /// The start position could not be loaded.
    #[error("Invalid start position: {0}")]
    Position(#[from] PositionError),
    /// The board declined a move taken from its own legal move list.
    #[error("Board rejected a legal move: {0}")]
    Board(#[from] BoardError),
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    WhiteWins,
    BlackWins,
    Stalemate,
    PlyLimit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outcome::WhiteWins => "white wins by checkmate",
            Outcome::BlackWins => "black wins by checkmate",
            Outcome::Stalemate => "draw by stalemate",
            Outcome::PlyLimit => "unfinished (ply limit)",
        };
        f.write_str(text)
    }
}

/// Summary of one finished game.
#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    /// 1-based game number within the run.
    pub game: u32,
    /// Position description the game started from.
    pub start_position: String,
    /// Warnings raised while decoding the start position.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Plies in coordinate notation (`e2e4`, `e7e8q`).
    pub plies: Vec<String>,
    pub outcome: Outcome,
}

fn winner(loser: Color) -> Outcome {
    match loser {
        Color::White => Outcome::BlackWins,
        Color::Black => Outcome::WhiteWins,
    }
}

/// Plays one game of uniformly random legal moves from `start_position`.
///
/// A pawn reaching its last rank is promoted to a random kind while the
/// board is frozen, the way an interactive host would hold the board during
/// a promotion choice.
pub fn play_game<R: Rng + ?Sized>(
    game: u32,
    start_position: &str,
    max_plies: u32,
    rng: &mut R,
) -> Result<GameSummary, SelfPlayError> {
    let mut board = Board::new();
    let warnings = board.load_position(start_position)?;

    let outcome = loop {
        match board.status() {
            GameStatus::Checkmate => break winner(board.turn()),
            GameStatus::Stalemate => break Outcome::Stalemate,
            GameStatus::Ongoing | GameStatus::Check => {}
        }
        if board.moves().len() >= max_plies as usize {
            break Outcome::PlyLimit;
        }

        let moves = board.legal_moves();
        let Some(&(piece, to)) = moves.choose(rng) else {
            break Outcome::Stalemate;
        };
        board.select(piece)?;
        if let MoveOutcome::PromotionPending(pending) = board.move_to(to)? {
            let kind = *PieceKind::PROMOTIONS
                .choose(rng)
                .unwrap_or(&PieceKind::Queen);
            board.set_frozen(true);
            let promoted = board.promote(pending.pawn(), kind);
            board.set_frozen(false);
            promoted?;
        }
    };

    tracing::info!(game, plies = board.moves().len(), %outcome, "game finished");

    Ok(GameSummary {
        game,
        start_position: start_position.to_string(),
        warnings: warnings.iter().map(ToString::to_string).collect(),
        plies: board.moves().iter().map(Move::to_coordinate).collect(),
        outcome,
    })
}
