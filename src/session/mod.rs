//! One game against the computer.
//!
//! [`Opponent`] is the capability set a session layer drives. [`EngineSession`] selects moves
//! with the in-process searcher; [`UciSession`] delegates to an external UCI engine. The variant
//! is chosen once, at construction, by [`build`].
pub mod engine;
pub mod external;

use cozy_chess::{Color, Square};
use std::time::Duration;

use crate::board::{GameStatus, PlayedMove, Position};
use crate::config::{Backend, SessionConfig};
use crate::error::SessionResult;

pub use engine::EngineSession;
pub use external::UciSession;

/// Highest accepted difficulty level.
pub const MAX_LEVEL: u32 = 4;

/// Plies searched in-process at `level`. Always odd, so the last ply searched is the
/// opponent's answer to the engine's candidate.
pub fn search_depth_for_level(level: u32) -> u32 { 2 * level + 1 }

/// Depth requested from an external engine at `level`.
pub fn external_depth_for_level(level: u32) -> u32 { 5 + 2 * level }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingOpponentMove,
    Thinking,
    Terminal,
}

pub fn phase_of(pos: &Position, engine: Color) -> Phase {
    if pos.status().is_over() { Phase::Terminal }
    else if pos.side_to_move() == engine { Phase::Thinking }
    else { Phase::AwaitingOpponentMove }
}

pub trait Opponent {
    /// The human's move. A missing promotion piece means a queen.
    fn apply_opponent_move(&mut self, from: Square, to: Square) -> SessionResult<PlayedMove>;
    /// Pick, play and return the computer's move.
    fn compute_reply(&mut self) -> SessionResult<PlayedMove>;
    fn check_status(&self) -> GameStatus;
    /// Take back the last full round. `false` (and no change) with fewer than two half-moves.
    fn undo(&mut self) -> bool;
    fn set_difficulty(&mut self, level: u32) -> SessionResult<()>;
    fn reset(&mut self) -> SessionResult<()>;
    fn position(&self) -> &Position;
    fn engine_color(&self) -> Color;

    fn phase(&self) -> Phase { phase_of(self.position(), self.engine_color()) }
}

pub fn build(config: &SessionConfig) -> SessionResult<Box<dyn Opponent + Send>> {
    match &config.backend {
        Backend::InProcess => Ok(Box::new(EngineSession::new(config)?)),
        Backend::External { path, args, timeout_ms } => {
            Ok(Box::new(UciSession::start(config, path, args.as_slice(), Duration::from_millis(*timeout_ms))?))
        }
    }
}
