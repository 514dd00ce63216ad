//! Rules adapter: everything the engine needs from the chess rules library.
pub mod cozy;

use cozy_chess::{Color, File, Move, Piece, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use cozy::{MoveGuard, Position};

/// Outcome of a game as reported to the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    InProgress,
    WhiteWin,
    BlackWin,
    Draw,
}

impl GameStatus {
    pub fn is_over(self) -> bool { self != GameStatus::InProgress }

    /// The status when `loser` is checkmated.
    pub fn win_against(loser: Color) -> Self {
        if loser == Color::White { GameStatus::BlackWin } else { GameStatus::WhiteWin }
    }
}

/// One piece on the board, as seen in a full-board snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceOn {
    pub color: Color,
    pub piece: Piece,
    pub square: Square,
}

/// A legal move with its metadata resolved against the position it was played from.
///
/// `mv` keeps cozy-chess's encoding (castling is king-takes-rook); `from()`/`to()` and the
/// `Display` impl use standard UCI squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedMove {
    pub mv: Move,
    pub color: Color,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub en_passant: bool,
    pub castle: bool,
}

impl PlayedMove {
    pub fn from(&self) -> Square { self.mv.from }

    pub fn to(&self) -> Square {
        if self.castle { castle_squares(self.mv).0 } else { self.mv.to }
    }

    pub fn promotion(&self) -> Option<Piece> { self.mv.promotion }
    pub fn is_capture(&self) -> bool { self.captured.is_some() }
    pub fn is_promotion(&self) -> bool { self.mv.promotion.is_some() }
    pub fn uci(&self) -> String { self.to_string() }
}

impl fmt::Display for PlayedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(p) = self.mv.promotion { write!(f, "{}", piece_char(p))?; }
        Ok(())
    }
}

pub fn piece_char(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}

/// Destination squares `(king, rook)` of a castling move in king-takes-rook encoding.
pub fn castle_squares(mv: Move) -> (Square, Square) {
    let rank = mv.from.rank();
    if mv.to.file() as usize > mv.from.file() as usize {
        (Square::new(File::G, rank), Square::new(File::F, rank))
    } else {
        (Square::new(File::C, rank), Square::new(File::D, rank))
    }
}

pub fn color_name(color: Color) -> &'static str {
    if color == Color::White { "white" } else { "black" }
}
