//! Chess position representation.

use chess_core::{Color, DecodeWarning, FenError, FenParser, MoveFlag, PieceId, PieceKind, Square};
use thiserror::Error;

use crate::Piece;

/// Errors that prevent a position description from being loaded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("{0} has no king")]
    MissingKing(Color),

    #[error("{0} has more than one king")]
    ExtraKing(Color),
}

/// A decoded position together with the warnings raised while decoding it.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub position: Position,
    pub warnings: Vec<DecodeWarning>,
}

/// Side effects of applying a move to a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Applied {
    pub from: Square,
    pub captured: Option<PieceId>,
    pub flag: MoveFlag,
    /// The moved pawn reached its last rank and still needs a new kind.
    pub promotion_due: bool,
}

/// Complete position state: every piece ever placed, square occupancy,
/// side to move and en passant memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Ordered piece collections, indexed by side.
    pieces: [Vec<Piece>; 2],

    /// Occupant of each square among pieces still on the board.
    squares: [Option<PieceId>; 64],

    /// The side to move.
    turn: Color,

    /// The pawn that may be taken en passant on this ply.
    en_passant: Option<PieceId>,
}

impl Position {
    /// Creates an empty position.
    pub fn empty(turn: Color) -> Self {
        Position {
            pieces: [Vec::new(), Vec::new()],
            squares: [None; 64],
            turn,
            en_passant: None,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenParser::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a position from a description, logging and discarding any
    /// decode warnings.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Self::decode(fen).map(|decoded| decoded.position)
    }

    /// Decodes a position description.
    ///
    /// Kings and rooks start out as moved; a castling token clears the flags
    /// of its king and rook. Pawns count as unmoved only on their start rank.
    pub fn decode(fen: &str) -> Result<Decoded, PositionError> {
        let parsed = FenParser::parse(fen)?;
        let mut position = Position::empty(parsed.side_to_move);

        for (sq, kind, color) in parsed.placements() {
            let has_moved = match kind {
                PieceKind::King | PieceKind::Rook => true,
                PieceKind::Pawn => sq.rank() != color.pawn_rank(),
                _ => false,
            };
            position.add_piece(Piece::new(kind, color, sq, has_moved));
        }

        for color in Color::BOTH {
            match position.live(color).filter(|(_, p)| p.kind == PieceKind::King).count() {
                0 => return Err(PositionError::MissingKing(color)),
                1 => {}
                _ => return Err(PositionError::ExtraKing(color)),
            }
        }

        let mut warnings = Vec::new();

        for token in parsed.castling_tokens() {
            let token = match token {
                Ok(token) => token,
                Err(warning) => {
                    warnings.push(warning);
                    continue;
                }
            };
            let king = position.find(token.king_square(), PieceKind::King, token.color);
            let rook = position.find(token.rook_square(), PieceKind::Rook, token.color);
            match (king, rook) {
                (Some(king), Some(rook)) => {
                    position.piece_mut(king).has_moved = false;
                    position.piece_mut(rook).has_moved = false;
                }
                _ => warnings.push(DecodeWarning::CastlingPiecesMissing(token.to_char())),
            }
        }

        match parsed.en_passant_square() {
            Ok(None) => {}
            Ok(Some(sq)) => match position.en_passant_pawn_via(sq) {
                Some(pawn) => position.en_passant = Some(pawn),
                None => warnings.push(DecodeWarning::NoEnPassantPawn(sq)),
            },
            Err(warning) => warnings.push(warning),
        }

        for warning in &warnings {
            tracing::warn!(%warning, "position description");
        }

        Ok(Decoded { position, warnings })
    }

    /// Finds the pawn an en passant field refers to: either the pawn
    /// standing on `sq`, or the one standing just beyond the square it
    /// skipped. Only a pawn of the side that just moved, sitting where a
    /// double step lands, qualifies.
    fn en_passant_pawn_via(&self, sq: Square) -> Option<PieceId> {
        let mover = self.turn.opposite();
        let landing_rank = (mover.pawn_rank() as i8 + 2 * mover.pawn_direction()) as u8;
        let eligible = |id: PieceId| {
            let pawn = self.piece(id);
            pawn.is(PieceKind::Pawn, mover) && pawn.square.rank() == landing_rank
        };

        match self.piece_at(sq) {
            Some(id) => Some(id).filter(|&id| eligible(id)),
            None => sq
                .offset(0, mover.pawn_direction())
                .and_then(|beyond| self.piece_at(beyond))
                .filter(|&id| eligible(id)),
        }
    }

    fn add_piece(&mut self, piece: Piece) {
        let list = &mut self.pieces[piece.color.index()];
        let id = PieceId::new(piece.color, list.len() as u8);
        self.squares[piece.square.index()] = Some(id);
        list.push(piece);
    }

    fn find(&self, sq: Square, kind: PieceKind, color: Color) -> Option<PieceId> {
        self.piece_at(sq).filter(|&id| self.piece(id).is(kind, color))
    }

    /// Returns the side to move.
    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Returns the pawn capturable en passant on this ply, if any.
    #[inline]
    pub fn en_passant(&self) -> Option<PieceId> {
        self.en_passant
    }

    /// Returns the square an en passant capture lands on: the square the
    /// capturable pawn skipped over.
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant.and_then(|id| {
            let pawn = self.piece(id);
            pawn.square.offset(0, -pawn.color.pawn_direction())
        })
    }

    /// Returns true if `id` names a piece of this position.
    #[inline]
    pub fn contains(&self, id: PieceId) -> bool {
        id.index() < self.pieces[id.color().index()].len()
    }

    /// Returns the piece with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this position.
    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.color().index()][id.index()]
    }

    #[inline]
    fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id.color().index()][id.index()]
    }

    /// Returns all pieces of a side, captured ones included, in decode order.
    #[inline]
    pub fn pieces(&self, color: Color) -> &[Piece] {
        &self.pieces[color.index()]
    }

    /// Iterates over the pieces of a side that are still on the board.
    pub fn live(&self, color: Color) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        self.pieces[color.index()]
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.captured)
            .map(move |(i, p)| (PieceId::new(color, i as u8), p))
    }

    /// Returns the piece standing on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<PieceId> {
        self.squares[sq.index()]
    }

    /// Returns the piece standing on the given square, if any.
    #[inline]
    pub fn occupant(&self, sq: Square) -> Option<&Piece> {
        self.piece_at(sq).map(|id| self.piece(id))
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.squares[sq.index()].is_none()
    }

    /// Returns the king of the given side.
    ///
    /// # Panics
    ///
    /// Panics if the side has no king on the board. Decoding rejects such
    /// positions and kings can never be captured, so this indicates
    /// corrupted state.
    pub fn king(&self, color: Color) -> PieceId {
        self.live(color)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(id, _)| id)
            .unwrap_or_else(|| panic!("invariant violated: {} has no king", color))
    }

    /// Returns the square of the given side's king.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.piece(self.king(color)).square
    }

    /// Moves a piece to `to` with all side effects: castling rook
    /// relocation, en passant and ordinary captures, en passant memory and
    /// the moved flag. The side to move is left unchanged.
    ///
    /// The caller is responsible for `to` being a legal destination.
    pub(crate) fn apply(&mut self, id: PieceId, to: Square) -> Applied {
        let piece = *self.piece(id);
        let from = piece.square;
        let previous_en_passant = self.en_passant.take();
        let mut flag = MoveFlag::Normal;
        let mut captured = None;

        match piece.kind {
            PieceKind::King if from.file().abs_diff(to.file()) == 2 => {
                let (corner, step, castle) = if to.file() > from.file() {
                    (7, -1, MoveFlag::CastleKingside)
                } else {
                    (0, 1, MoveFlag::CastleQueenside)
                };
                let rook = Square::new(corner, from.rank()).and_then(|sq| self.piece_at(sq));
                if let (Some(rook), Some(rook_to)) = (rook, to.offset(step, 0)) {
                    self.relocate(rook, rook_to);
                    self.piece_mut(rook).has_moved = true;
                }
                flag = castle;
            }
            PieceKind::Pawn => {
                if from.file() != to.file() && self.is_empty(to) {
                    let victim = Square::new(to.file(), from.rank()).and_then(|sq| self.piece_at(sq));
                    if let Some(victim) = victim.filter(|&v| Some(v) == previous_en_passant) {
                        self.capture(victim);
                        captured = Some(victim);
                        flag = MoveFlag::EnPassant;
                    }
                }
                if from.rank().abs_diff(to.rank()) == 2 {
                    self.en_passant = Some(id);
                    flag = MoveFlag::DoublePush;
                }
            }
            _ => {}
        }

        if let Some(victim) = self.piece_at(to).filter(|&v| v != id) {
            self.capture(victim);
            captured = Some(victim);
        }

        self.relocate(id, to);
        self.piece_mut(id).has_moved = true;

        Applied {
            from,
            captured,
            flag,
            promotion_due: piece.kind == PieceKind::Pawn
                && to.rank() == piece.color.promotion_rank(),
        }
    }

    /// Replaces a piece's kind. Used to complete a promotion.
    pub(crate) fn set_kind(&mut self, id: PieceId, kind: PieceKind) {
        self.piece_mut(id).kind = kind;
    }

    /// Hands the move to the other side.
    pub(crate) fn pass_turn(&mut self) {
        self.turn = self.turn.opposite();
    }

    fn relocate(&mut self, id: PieceId, to: Square) {
        let from = self.piece(id).square;
        if self.squares[from.index()] == Some(id) {
            self.squares[from.index()] = None;
        }
        self.squares[to.index()] = Some(id);
        self.piece_mut(id).square = to;
    }

    fn capture(&mut self, id: PieceId) {
        let sq = self.piece(id).square;
        if self.squares[sq.index()] == Some(id) {
            self.squares[sq.index()] = None;
        }
        self.piece_mut(id).captured = true;
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
