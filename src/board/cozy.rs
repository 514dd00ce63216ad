use cozy_chess::{Board as CozyBoard, Color, File, Move, Piece, Square};
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use crate::board::{GameStatus, PieceOn, PlayedMove};
use crate::error::BoardError;

#[derive(Clone, Debug)]
struct Undo {
    prev: CozyBoard,
    played: PlayedMove,
}

/// A cozy-chess board plus the undo stack the engine needs for make/unmake.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    history: Vec<Undo>,
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default(), history: Vec::with_capacity(128) }
    }

    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        CozyBoard::from_fen(fen, false)
            .map(|b| Self { board: b, history: Vec::with_capacity(128) })
            .map_err(|e| BoardError::Fen(format!("{e:?}")))
    }

    pub fn board(&self) -> &CozyBoard { &self.board }
    pub fn fen(&self) -> String { format!("{}", self.board) }
    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }
    pub fn in_check(&self) -> bool { !self.board.checkers().is_empty() }
    pub fn history_len(&self) -> usize { self.history.len() }

    /// Legal moves in generation order.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.board.generate_moves(|ml| { moves.extend(ml); false });
        moves
    }

    /// Legal moves that take a piece, en passant included.
    pub fn capture_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(16);
        let theirs = self.board.colors(!self.board.side_to_move());
        self.board.generate_moves(|ml| {
            let pawn = ml.piece == Piece::Pawn;
            for m in ml {
                // a diagonal pawn step onto an empty square is en passant
                if theirs.has(m.to) || (pawn && m.from.file() != m.to.file()) { moves.push(m); }
            }
            false
        });
        moves
    }

    pub fn has_legal_moves(&self) -> bool {
        self.board.generate_moves(|ml| !ml.is_empty())
    }

    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let piece = self.board.piece_on(sq)?;
        let color = self.board.color_on(sq)?;
        Some((color, piece))
    }

    /// Full-board snapshot.
    pub fn pieces(&self) -> Vec<PieceOn> {
        let mut out = Vec::with_capacity(32);
        for &color in &Color::ALL {
            for &piece in &Piece::ALL {
                for square in self.board.colored_pieces(color, piece) {
                    out.push(PieceOn { color, piece, square });
                }
            }
        }
        out
    }

    /// Resolve a move's metadata. The board must be in the state before the move.
    pub fn describe(&self, mv: Move) -> Option<PlayedMove> {
        let (color, piece) = self.piece_at(mv.from)?;
        let castle = piece == Piece::King && self.board.colors(color).has(mv.to);
        let mut en_passant = false;
        let captured = if castle {
            None
        } else if let Some(victim) = self.board.piece_on(mv.to) {
            Some(victim)
        } else if piece == Piece::Pawn && mv.from.file() != mv.to.file() {
            en_passant = true;
            Some(Piece::Pawn)
        } else {
            None
        };
        Some(PlayedMove { mv, color, piece, captured, en_passant, castle })
    }

    /// Apply a move after checking it is legal. Illegal input leaves the position untouched.
    pub fn play(&mut self, mv: Move) -> Result<PlayedMove, BoardError> {
        if !self.board.is_legal(mv) { return Err(BoardError::IllegalMove(format!("{}", mv))); }
        self.make(mv).ok_or_else(|| BoardError::IllegalMove(format!("{}", mv)))
    }

    /// Apply a move given by squares. Standard castling notation (e1g1) is accepted and a missing
    /// promotion piece defaults to a queen.
    pub fn play_squares(&mut self, from: Square, to: Square, promotion: Option<Piece>) -> Result<PlayedMove, BoardError> {
        let mv = self.resolve_squares(from, to, promotion)?;
        self.play(mv)
    }

    /// Apply a move written in UCI, e.g. `e2e4`, `e7e8n`, `e1g1`.
    pub fn play_uci(&mut self, text: &str) -> Result<PlayedMove, BoardError> {
        let mv = self.resolve_uci(text)?;
        self.play(mv)
    }

    /// Find the legal move meant by `from`/`to`, in the oracle's own encoding.
    pub fn resolve_squares(&self, from: Square, to: Square, promotion: Option<Piece>) -> Result<Move, BoardError> {
        let promo = promotion.unwrap_or(Piece::Queen);
        let target = self.castle_target(from, to).unwrap_or(to);
        self.legal_moves().into_iter()
            .find(|m| m.from == from && m.to == target && m.promotion.map_or(true, |p| p == promo))
            .ok_or_else(|| BoardError::IllegalMove(format!("{}{}", from, to)))
    }

    pub fn resolve_uci(&self, text: &str) -> Result<Move, BoardError> {
        let mv = Move::from_str(text.trim()).map_err(|_| BoardError::InvalidMove(text.to_string()))?;
        self.resolve_squares(mv.from, mv.to, mv.promotion)
    }

    /// Apply a move that came out of `legal_moves`, without re-checking legality.
    pub(crate) fn make(&mut self, mv: Move) -> Option<PlayedMove> {
        debug_assert!(self.board.is_legal(mv), "make() given illegal move {mv}");
        let played = self.describe(mv)?;
        let prev = self.board.clone();
        self.board.play_unchecked(mv);
        self.history.push(Undo { prev, played });
        Some(played)
    }

    pub fn undo(&mut self) -> Option<PlayedMove> {
        let u = self.history.pop()?;
        self.board = u.prev;
        Some(u.played)
    }

    /// Apply `mv` and return a guard that undoes it when dropped.
    pub fn scoped(&mut self, mv: Move) -> MoveGuard<'_> {
        let applied = self.make(mv).is_some();
        MoveGuard { pos: self, applied }
    }

    pub fn moves_uci(&self) -> Vec<String> {
        self.history.iter().map(|u| u.played.uci()).collect()
    }

    pub fn last_move(&self) -> Option<PlayedMove> { self.history.last().map(|u| u.played) }

    pub fn is_checkmate(&self) -> bool { self.in_check() && !self.has_legal_moves() }
    pub fn is_stalemate(&self) -> bool { !self.in_check() && !self.has_legal_moves() }
    pub fn is_fifty_move_draw(&self) -> bool { self.board.halfmove_clock() >= 100 }

    pub fn is_threefold_repetition(&self) -> bool {
        let key = self.board.hash();
        let seen = self.history.iter().filter(|u| u.prev.hash() == key).count();
        seen + 1 >= 3
    }

    /// Bare kings, or a single minor piece left on the board.
    pub fn is_insufficient_material(&self) -> bool {
        let b = &self.board;
        let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        if !heavy.is_empty() { return false; }
        (b.pieces(Piece::Knight) | b.pieces(Piece::Bishop)).len() <= 1
    }

    pub fn is_draw(&self) -> bool {
        self.is_stalemate() || self.is_fifty_move_draw() || self.is_threefold_repetition() || self.is_insufficient_material()
    }

    pub fn status(&self) -> GameStatus {
        if !self.has_legal_moves() {
            return if self.in_check() { GameStatus::win_against(self.side_to_move()) } else { GameStatus::Draw };
        }
        if self.is_draw() { GameStatus::Draw } else { GameStatus::InProgress }
    }

    /// King moving two files maps to cozy-chess's king-takes-rook castling encoding.
    fn castle_target(&self, from: Square, to: Square) -> Option<Square> {
        if self.board.piece_on(from)? != Piece::King || from.rank() != to.rank() { return None; }
        let (f, t) = (from.file() as i32, to.file() as i32);
        if (f - t).abs() != 2 { return None; }
        let rook_file = if t > f { File::H } else { File::A };
        Some(Square::new(rook_file, from.rank()))
    }
}

pub fn parse_square(text: &str) -> Result<Square, BoardError> {
    Square::from_str(text.trim()).map_err(|_| BoardError::InvalidSquare(text.to_string()))
}

/// Scoped make/unmake: the move is undone on every exit path, unwinding included.
pub struct MoveGuard<'a> {
    pos: &'a mut Position,
    applied: bool,
}

impl MoveGuard<'_> {
    pub fn applied(&self) -> bool { self.applied }
}

impl Deref for MoveGuard<'_> {
    type Target = Position;
    fn deref(&self) -> &Position { self.pos }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Position { self.pos }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        if self.applied { self.pos.undo(); }
    }
}
