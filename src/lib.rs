// Alpha-beta chess opponent with an opening book, undo and difficulty levels
pub mod board;
pub mod config;
pub mod error;
pub mod openings;
pub mod registry;
pub mod search;
pub mod session;
pub mod uci;

pub use board::{GameStatus, PlayedMove, Position};
pub use config::{Backend, SessionConfig, Side};
pub use error::{SessionError, SessionResult};
pub use registry::SessionRegistry;
pub use session::{build, EngineSession, Opponent, Phase, UciSession};
