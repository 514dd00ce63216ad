//! Error types for board access, search, openings, external engines and sessions.

use thiserror::Error;

/// Errors raised by the rules adapter around `cozy_chess::Board`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid move text: {0}")]
    InvalidMove(String),

    #[error("FEN error: {0}")]
    Fen(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Search was asked to move in a position that is already over.
    #[error("No legal moves in position {fen}")]
    NoLegalMoves { fen: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpeningError {
    #[error("Unknown opening line: {0}")]
    UnknownLine(String),

    #[error("Opening line {name} is played by {expected}, not {requested}")]
    WrongSide { name: String, expected: String, requested: String },
}

/// Failures talking to an external UCI engine process. All of them are recoverable.
#[derive(Error, Debug)]
pub enum UciError {
    #[error("Failed to start engine {path}: {source}")]
    Spawn { path: String, source: std::io::Error },

    #[error("Engine pipe error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Engine closed its output")]
    Closed,

    #[error("Timed out after {millis} ms waiting for '{expected}'")]
    Timeout { expected: String, millis: u64 },

    #[error("Malformed engine reply: {0}")]
    Protocol(String),

    #[error("Engine returned no move")]
    NoMove,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a game session reports back to its caller.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Illegal move: {0}")]
    IllegalMove(#[from] BoardError),

    #[error("Game is over")]
    GameOver,

    #[error("It is not {0}'s turn")]
    NotYourTurn(&'static str),

    #[error("Difficulty level {level} out of range (max {max})")]
    InvalidDifficulty { level: u32, max: u32 },

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Opening(#[from] OpeningError),

    #[error("External engine failure: {0}")]
    External(#[from] UciError),
}

pub type SessionResult<T> = Result<T, SessionError>;
