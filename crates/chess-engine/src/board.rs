//! Board orchestration.
//!
//! [`Board`] owns a [`Position`] and drives it through a small state
//! machine:
//!
//! ```text
//! Idle --select--> PieceSelected --move_to--> Idle
//!                        |
//!                        +--move_to (last rank)--> AwaitingPromotion --promote--> Idle
//! ```
//!
//! Every rejected transition leaves the board exactly as it was.

use crate::movegen::{legal_destinations, legal_moves};
use crate::rules::{self, GameStatus};
use crate::{Decoded, Piece, Position, PositionError};
use chess_core::{Color, DecodeWarning, Move, MoveFlag, PieceId, PieceKind, Square};
use thiserror::Error;

/// Reasons a board transition is declined.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("board is frozen")]
    Frozen,

    #[error("unknown piece {0}")]
    UnknownPiece(PieceId),

    #[error("piece {0} has been captured")]
    PieceCaptured(PieceId),

    #[error("it is {turn}'s turn, cannot select {piece}")]
    WrongTurn { piece: PieceId, turn: Color },

    #[error("no piece is selected")]
    NoSelection,

    #[error("{to} is not a legal destination for {piece}")]
    IllegalDestination { piece: PieceId, to: Square },

    #[error("a promotion choice is pending")]
    PromotionPending,

    #[error("no promotion is pending")]
    NoPendingPromotion,

    #[error("piece {0} is not the pawn awaiting promotion")]
    WrongPromotionPawn(PieceId),

    #[error("cannot promote to {0}")]
    InvalidPromotionKind(PieceKind),
}

/// The selected piece and its legal destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    piece: PieceId,
    destinations: Vec<Square>,
}

impl Selection {
    #[inline]
    pub fn piece(&self) -> PieceId {
        self.piece
    }

    #[inline]
    pub fn destinations(&self) -> &[Square] {
        &self.destinations
    }
}

/// A pawn that reached its last rank and waits for its new kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPromotion {
    pawn: PieceId,
    from: Square,
    square: Square,
    captured: Option<PieceId>,
}

impl PendingPromotion {
    #[inline]
    pub fn pawn(&self) -> PieceId {
        self.pawn
    }

    /// Square the pawn now stands on.
    #[inline]
    pub fn square(&self) -> Square {
        self.square
    }
}

/// Where the board is in its selection / promotion cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardState {
    Idle,
    PieceSelected(PieceId),
    AwaitingPromotion(PendingPromotion),
}

/// Result of a successful [`Board::move_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The ply is complete and recorded.
    Committed(Move),
    /// The pawn reached its last rank; call [`Board::promote`] to finish the ply.
    PromotionPending(PendingPromotion),
}

/// A game board: position, move history and the interaction state a UI or
/// bot drives it through.
#[derive(Debug, Clone)]
pub struct Board {
    /// Current position.
    position: Position,
    /// Committed plies in play order.
    moves: Vec<Move>,
    /// Selected piece awaiting a destination.
    selected: Option<Selection>,
    /// Pawn move held open for a promotion choice.
    pending: Option<PendingPromotion>,
    /// The en passant pawn of the previous ply.
    last_en_passant: Option<PieceId>,
    /// Host-controlled lock rejecting `select` and `move_to`.
    frozen: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Logs a declined transition and returns it as an error.
fn reject<T>(err: BoardError) -> Result<T, BoardError> {
    tracing::trace!(%err, "board transition rejected");
    Err(err)
}

impl Board {
    /// Creates a board with the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    /// Creates a board from an already decoded position.
    pub fn from_position(position: Position) -> Self {
        Board {
            position,
            moves: Vec::new(),
            selected: None,
            pending: None,
            last_en_passant: None,
            frozen: false,
        }
    }

    /// Creates a board from a position description.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Position::from_fen(fen).map(Self::from_position)
    }

    /// Loads a new position, discarding the current game.
    ///
    /// The piece sets, history, selection and pending promotion are all
    /// reset; the frozen flag is kept. On error the board is unchanged.
    pub fn load_position(&mut self, fen: &str) -> Result<Vec<DecodeWarning>, PositionError> {
        let Decoded { position, warnings } = Position::decode(fen)?;
        let frozen = self.frozen;
        *self = Self::from_position(position);
        self.frozen = frozen;
        tracing::debug!(fen, warnings = warnings.len(), "position loaded");
        Ok(warnings)
    }

    /// Returns a reference to the current position.
    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the side to move.
    #[inline]
    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// Returns the committed plies in play order.
    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Returns the current selection, if any.
    #[inline]
    pub fn selected(&self) -> Option<&Selection> {
        self.selected.as_ref()
    }

    /// Returns the pawn awaiting a promotion choice, if any.
    #[inline]
    pub fn pending_promotion(&self) -> Option<PendingPromotion> {
        self.pending
    }

    /// Returns the pawn capturable en passant on this ply.
    #[inline]
    pub fn en_passant(&self) -> Option<PieceId> {
        self.position.en_passant()
    }

    /// Returns the en passant pawn as it stood before the last move.
    #[inline]
    pub fn last_en_passant(&self) -> Option<PieceId> {
        self.last_en_passant
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freezes or unfreezes the board. A frozen board declines `select`
    /// and `move_to`; `promote` and all queries still work.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    pub fn state(&self) -> BoardState {
        match (&self.pending, &self.selected) {
            (Some(pending), _) => BoardState::AwaitingPromotion(*pending),
            (None, Some(selection)) => BoardState::PieceSelected(selection.piece),
            (None, None) => BoardState::Idle,
        }
    }

    /// Returns the piece with the given id, if it belongs to this board.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.position.contains(id).then(|| self.position.piece(id))
    }

    /// Returns the piece standing on the given square.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<PieceId> {
        self.position.piece_at(sq)
    }

    /// Returns all pieces of a side, captured ones included.
    #[inline]
    pub fn pieces(&self, color: Color) -> &[Piece] {
        self.position.pieces(color)
    }

    #[inline]
    pub fn king(&self, color: Color) -> PieceId {
        self.position.king(color)
    }

    /// Returns the legal destinations of a piece; empty for unknown or
    /// captured pieces.
    pub fn legal_destinations(&self, id: PieceId) -> Vec<Square> {
        if !self.position.contains(id) {
            return Vec::new();
        }
        legal_destinations(&self.position, id)
    }

    /// Returns every legal move of the side to move. Empty while a
    /// promotion is pending.
    pub fn legal_moves(&self) -> Vec<(PieceId, Square)> {
        if self.pending.is_some() {
            return Vec::new();
        }
        legal_moves(&self.position, self.turn())
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        rules::is_in_check(&self.position, color)
    }

    pub fn is_checkmate(&self, color: Color) -> bool {
        rules::is_checkmate(&self.position, color)
    }

    pub fn is_stalemate(&self, color: Color) -> bool {
        rules::is_stalemate(&self.position, color)
    }

    /// Returns the status of the side to move.
    ///
    /// While a promotion is pending the ply is unfinished: this reports
    /// [`GameStatus::Ongoing`] and [`legal_moves`](Board::legal_moves) stays
    /// empty until [`promote`](Board::promote) completes it.
    pub fn status(&self) -> GameStatus {
        if self.pending.is_some() {
            return GameStatus::Ongoing;
        }
        rules::status(&self.position)
    }

    /// Selects a piece of the side to move and computes its legal
    /// destinations.
    pub fn select(&mut self, id: PieceId) -> Result<&[Square], BoardError> {
        if self.frozen {
            return reject(BoardError::Frozen);
        }
        if self.pending.is_some() {
            return reject(BoardError::PromotionPending);
        }
        if !self.position.contains(id) {
            return reject(BoardError::UnknownPiece(id));
        }
        if self.position.piece(id).is_captured() {
            return reject(BoardError::PieceCaptured(id));
        }
        if id.color() != self.turn() {
            return reject(BoardError::WrongTurn {
                piece: id,
                turn: self.turn(),
            });
        }

        let destinations = legal_destinations(&self.position, id);
        let selection = self.selected.insert(Selection {
            piece: id,
            destinations,
        });
        Ok(selection.destinations.as_slice())
    }

    /// Clears the selection. Never changes the game and never fails.
    ///
    /// `piece` names the piece the caller believes is selected; the
    /// selection is cleared whichever piece it holds.
    pub fn deselect(&mut self, piece: PieceId) {
        if let Some(selection) = self.selected.take() {
            if selection.piece != piece {
                tracing::trace!(%piece, selected = %selection.piece, "deselected a different piece");
            }
        }
    }

    /// Moves the selected piece to `to`.
    ///
    /// `to` must be one of the selection's legal destinations. A pawn move
    /// onto its last rank is held open until [`promote`](Board::promote):
    /// the move is not recorded and the turn does not pass until then.
    pub fn move_to(&mut self, to: Square) -> Result<MoveOutcome, BoardError> {
        if self.frozen {
            return reject(BoardError::Frozen);
        }
        if self.pending.is_some() {
            return reject(BoardError::PromotionPending);
        }
        let Some(selection) = &self.selected else {
            return reject(BoardError::NoSelection);
        };
        let id = selection.piece;
        if !selection.destinations.contains(&to) {
            return reject(BoardError::IllegalDestination { piece: id, to });
        }

        self.selected = None;
        self.last_en_passant = self.position.en_passant();
        let applied = self.position.apply(id, to);

        if applied.promotion_due {
            let pending = PendingPromotion {
                pawn: id,
                from: applied.from,
                square: to,
                captured: applied.captured,
            };
            self.pending = Some(pending);
            tracing::debug!(pawn = %id, square = %to, "awaiting promotion");
            return Ok(MoveOutcome::PromotionPending(pending));
        }

        let record = Move::new(id, applied.from, to, applied.captured, applied.flag);
        Ok(MoveOutcome::Committed(self.commit(record)))
    }

    /// Completes a pending promotion by giving the pawn its new kind.
    pub fn promote(&mut self, pawn: PieceId, kind: PieceKind) -> Result<Move, BoardError> {
        let Some(pending) = self.pending else {
            return reject(BoardError::NoPendingPromotion);
        };
        if pending.pawn != pawn {
            return reject(BoardError::WrongPromotionPawn(pawn));
        }
        let Some(flag) = MoveFlag::promotion(kind) else {
            return reject(BoardError::InvalidPromotionKind(kind));
        };

        self.position.set_kind(pawn, kind);
        self.pending = None;
        let record = Move::new(pawn, pending.from, pending.square, pending.captured, flag);
        Ok(self.commit(record))
    }

    /// Records a finished ply and hands the move to the other side.
    fn commit(&mut self, record: Move) -> Move {
        self.moves.push(record);
        self.position.pass_turn();
        tracing::debug!(ply = self.moves.len(), mv = %record, "move committed");
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn play(board: &mut Board, from: &str, to: &str) -> MoveOutcome {
        let id = board.piece_at(sq(from)).unwrap();
        board.select(id).unwrap();
        board.move_to(sq(to)).unwrap()
    }

    #[test]
    fn new_board() {
        let board = Board::new();
        assert_eq!(board.turn(), Color::White);
        assert!(board.moves().is_empty());
        assert_eq!(board.state(), BoardState::Idle);
        assert_eq!(board.status(), GameStatus::Ongoing);
        assert!(!board.is_frozen());
    }

    #[test]
    fn select_exposes_destinations() {
        let mut board = Board::new();
        let pawn = board.piece_at(sq("e2")).unwrap();
        let mut destinations = board.select(pawn).unwrap().to_vec();
        destinations.sort();
        assert_eq!(destinations, vec![sq("e4"), sq("e3")]);
        assert_eq!(board.state(), BoardState::PieceSelected(pawn));
        assert_eq!(board.selected().unwrap().piece(), pawn);
    }

    #[test]
    fn select_wrong_side_is_declined() {
        let mut board = Board::new();
        let pawn = board.piece_at(sq("e7")).unwrap();
        assert_eq!(
            board.select(pawn),
            Err(BoardError::WrongTurn {
                piece: pawn,
                turn: Color::White
            })
        );
        assert_eq!(board.state(), BoardState::Idle);
    }

    #[test]
    fn select_unknown_piece_is_declined() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let ghost = PieceId::new(Color::White, 9);
        assert_eq!(board.select(ghost), Err(BoardError::UnknownPiece(ghost)));
        assert!(board.piece(ghost).is_none());
        assert!(board.legal_destinations(ghost).is_empty());
    }

    #[test]
    fn deselect_keeps_turn() {
        let mut board = Board::new();
        let pawn = board.piece_at(sq("e2")).unwrap();
        board.select(pawn).unwrap();
        board.deselect(pawn);
        assert_eq!(board.state(), BoardState::Idle);
        assert_eq!(board.turn(), Color::White);
        assert!(board.moves().is_empty());
    }

    #[test]
    fn deselect_always_clears() {
        let mut board = Board::new();
        let pawn = board.piece_at(sq("e2")).unwrap();
        let knight = board.piece_at(Square::G1).unwrap();
        board.select(pawn).unwrap();
        board.deselect(knight);
        assert_eq!(board.state(), BoardState::Idle);
        assert!(board.selected().is_none());

        // Nothing selected: still a no-op rather than an error.
        board.deselect(pawn);
        assert_eq!(board.state(), BoardState::Idle);
        assert_eq!(board.turn(), Color::White);
    }

    #[test]
    fn move_commits_and_flips_turn() {
        let mut board = Board::new();
        let outcome = play(&mut board, "g1", "f3");
        let MoveOutcome::Committed(record) = outcome else {
            panic!("expected a committed move");
        };
        assert_eq!(record.from(), Square::G1);
        assert_eq!(record.to(), sq("f3"));
        assert_eq!(record.flag(), MoveFlag::Normal);
        assert_eq!(board.turn(), Color::Black);
        assert_eq!(board.moves(), &[record]);
        assert_eq!(board.state(), BoardState::Idle);
    }

    #[test]
    fn move_without_selection_is_declined() {
        let mut board = Board::new();
        assert_eq!(board.move_to(sq("e4")), Err(BoardError::NoSelection));
        assert_eq!(board.turn(), Color::White);
    }

    #[test]
    fn illegal_destination_is_declined() {
        let mut board = Board::new();
        let pawn = board.piece_at(sq("e2")).unwrap();
        board.select(pawn).unwrap();
        assert_eq!(
            board.move_to(sq("e5")),
            Err(BoardError::IllegalDestination {
                piece: pawn,
                to: sq("e5")
            })
        );
        assert!(board.moves().is_empty());
        assert_eq!(board.turn(), Color::White);
        assert_eq!(board.state(), BoardState::PieceSelected(pawn));
    }

    #[test]
    fn frozen_board_declines_select_and_move() {
        let mut board = Board::new();
        let pawn = board.piece_at(sq("e2")).unwrap();
        board.select(pawn).unwrap();
        board.set_frozen(true);
        assert_eq!(board.move_to(sq("e4")), Err(BoardError::Frozen));
        assert_eq!(board.select(pawn), Err(BoardError::Frozen));
        board.set_frozen(false);
        assert!(matches!(
            board.move_to(sq("e4")),
            Ok(MoveOutcome::Committed(_))
        ));
    }

    #[test]
    fn capture_is_recorded() {
        let mut board = Board::new();
        play(&mut board, "e2", "e4");
        play(&mut board, "d7", "d5");
        let victim = board.piece_at(sq("d5")).unwrap();
        let MoveOutcome::Committed(record) = play(&mut board, "e4", "d5") else {
            panic!("expected a committed move");
        };
        assert_eq!(record.captured(), Some(victim));
        assert!(board.piece(victim).unwrap().is_captured());
    }

    #[test]
    fn castling_is_recorded() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let MoveOutcome::Committed(record) = play(&mut board, "e1", "g1") else {
            panic!("expected a committed move");
        };
        assert!(record.castle());
        assert_eq!(record.flag(), MoveFlag::CastleKingside);
        assert_eq!(
            board.piece(board.piece_at(Square::F1).unwrap()).map(Piece::kind),
            Some(PieceKind::Rook)
        );
    }

    #[test]
    fn en_passant_memory() {
        let mut board = Board::new();
        play(&mut board, "e2", "e4");
        let pawn = board.piece_at(sq("e4")).unwrap();
        assert_eq!(board.en_passant(), Some(pawn));
        assert_eq!(board.last_en_passant(), None);

        play(&mut board, "a7", "a6");
        assert_eq!(board.en_passant(), None);
        assert_eq!(board.last_en_passant(), Some(pawn));
    }

    #[test]
    fn en_passant_capture_is_recorded() {
        let mut board = Board::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").unwrap();
        play(&mut board, "d7", "d5");
        let victim = board.piece_at(sq("d5")).unwrap();
        let MoveOutcome::Committed(record) = play(&mut board, "e5", "d6") else {
            panic!("expected a committed move");
        };
        assert_eq!(record.flag(), MoveFlag::EnPassant);
        assert_eq!(record.captured(), Some(victim));
        assert!(board.piece_at(sq("d5")).is_none());
    }

    #[test]
    fn promotion_flow() {
        let mut board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let pawn = board.piece_at(sq("a7")).unwrap();
        let MoveOutcome::PromotionPending(pending) = play(&mut board, "a7", "a8") else {
            panic!("expected a pending promotion");
        };
        assert_eq!(pending.pawn(), pawn);
        assert_eq!(pending.square(), Square::A8);
        assert_eq!(board.state(), BoardState::AwaitingPromotion(pending));
        assert_eq!(board.turn(), Color::White);
        assert!(board.moves().is_empty());
        assert!(board.legal_moves().is_empty());

        let king = board.king(Color::White);
        assert_eq!(board.select(king), Err(BoardError::PromotionPending));

        assert_eq!(
            board.promote(pawn, PieceKind::King),
            Err(BoardError::InvalidPromotionKind(PieceKind::King))
        );
        assert_eq!(board.state(), BoardState::AwaitingPromotion(pending));

        let record = board.promote(pawn, PieceKind::Queen).unwrap();
        assert_eq!(record.flag(), MoveFlag::PromoteQueen);
        assert_eq!(record.to_coordinate(), "a7a8q");
        assert_eq!(board.piece(pawn).unwrap().kind(), PieceKind::Queen);
        assert_eq!(board.state(), BoardState::Idle);
        assert_eq!(board.turn(), Color::Black);
        assert_eq!(board.moves().len(), 1);
        assert!(board.is_in_check(Color::Black));
    }

    #[test]
    fn status_is_ongoing_while_promotion_pending() {
        // The b-pawn is white's only mobile piece; once it stands on b8 as a
        // pawn, the position alone would read as stalemate.
        let mut board = Board::from_fen("7k/1P6/8/8/8/8/2q5/K7 w - - 0 1").unwrap();
        let pawn = board.piece_at(sq("b7")).unwrap();
        let MoveOutcome::PromotionPending(_) = play(&mut board, "b7", "b8") else {
            panic!("expected a pending promotion");
        };
        assert_eq!(board.status(), GameStatus::Ongoing);
        assert!(!board.status().is_over());
        assert!(board.legal_moves().is_empty());

        board.promote(pawn, PieceKind::Queen).unwrap();
        assert_eq!(board.status(), GameStatus::Check);
        assert!(!board.legal_moves().is_empty());
    }

    #[test]
    fn promote_without_pending_is_declined() {
        let mut board = Board::new();
        let pawn = board.piece_at(sq("a2")).unwrap();
        assert_eq!(
            board.promote(pawn, PieceKind::Queen),
            Err(BoardError::NoPendingPromotion)
        );
    }

    #[test]
    fn promote_is_allowed_while_frozen() {
        let mut board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let pawn = board.piece_at(sq("a7")).unwrap();
        play(&mut board, "a7", "a8");
        board.set_frozen(true);
        let king = board.king(Color::White);
        assert_eq!(
            board.promote(king, PieceKind::Queen),
            Err(BoardError::WrongPromotionPawn(king))
        );
        assert!(board.promote(pawn, PieceKind::Knight).is_ok());
    }

    #[test]
    fn load_position_resets_game() {
        let mut board = Board::new();
        play(&mut board, "e2", "e4");
        board.set_frozen(true);
        let warnings = board.load_position("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert!(warnings.is_empty());
        assert!(board.moves().is_empty());
        assert_eq!(board.turn(), Color::Black);
        assert_eq!(board.en_passant(), None);
        assert_eq!(board.pieces(Color::White).len(), 1);
        assert!(board.is_frozen());
    }

    #[test]
    fn failed_load_leaves_board_untouched() {
        let mut board = Board::new();
        play(&mut board, "e2", "e4");
        assert!(board.load_position("8/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert_eq!(board.moves().len(), 1);
        assert_eq!(board.turn(), Color::Black);
        assert_eq!(board.pieces(Color::White).len(), 16);
    }

    #[test]
    fn load_position_reports_warnings() {
        let mut board = Board::new();
        let warnings = board
            .load_position("4k3/8/8/8/8/8/8/4K3 w KQ e6 0 1")
            .unwrap();
        assert_eq!(
            warnings,
            vec![
                DecodeWarning::CastlingPiecesMissing('K'),
                DecodeWarning::CastlingPiecesMissing('Q'),
                DecodeWarning::NoEnPassantPawn(sq("e6")),
            ]
        );
    }

    #[test]
    fn fools_mate() {
        let mut board = Board::new();
        play(&mut board, "f2", "f3");
        play(&mut board, "e7", "e5");
        play(&mut board, "g2", "g4");
        play(&mut board, "d8", "h4");
        assert_eq!(board.status(), GameStatus::Checkmate);
        assert!(board.is_checkmate(Color::White));
        assert!(board.legal_moves().is_empty());
    }
}
