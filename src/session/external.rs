use cozy_chess::{Color, Square};
use log::{info, warn};
use std::path::Path;
use std::time::Duration;

use crate::board::{GameStatus, PlayedMove, Position};
use crate::config::{Side, SessionConfig};
use crate::error::{SessionError, SessionResult, UciError};
use crate::session::engine::check_level;
use crate::session::{external_depth_for_level, Opponent, Phase};
use crate::uci::client::UciProcess;

/// Opponent backed by an external UCI engine. The rules adapter still owns the game; the
/// engine only sees the current FEN and answers with a move.
pub struct UciSession {
    engine: UciProcess,
    pos: Position,
    level: u32,
    depth: u32,
    engine_side: Side,
}

impl UciSession {
    pub fn start<S: AsRef<std::ffi::OsStr>>(config: &SessionConfig, path: &Path, args: &[S], timeout: Duration) -> SessionResult<Self> {
        check_level(config.difficulty)?;
        let mut engine = UciProcess::start(path, args, timeout)?;
        engine.new_game()?;
        info!("new external session: {} plays {}, level {}", path.display(), config.engine_color, config.difficulty);
        Ok(Self {
            engine,
            pos: Position::startpos(),
            level: config.difficulty,
            depth: external_depth_for_level(config.difficulty),
            engine_side: config.engine_color,
        })
    }

    pub fn depth(&self) -> u32 { self.depth }
    pub fn level(&self) -> u32 { self.level }
    pub fn engine_name(&self) -> Option<&str> { self.engine.name() }

    fn expect_phase(&self, wanted: Phase, who: &'static str) -> SessionResult<()> {
        match self.phase() {
            Phase::Terminal => Err(SessionError::GameOver),
            p if p == wanted => Ok(()),
            _ => Err(SessionError::NotYourTurn(who)),
        }
    }
}

impl Opponent for UciSession {
    fn apply_opponent_move(&mut self, from: Square, to: Square) -> SessionResult<PlayedMove> {
        self.expect_phase(Phase::AwaitingOpponentMove, "the player")?;
        Ok(self.pos.play_squares(from, to, None)?)
    }

    fn compute_reply(&mut self) -> SessionResult<PlayedMove> {
        self.expect_phase(Phase::Thinking, "the engine")?;
        self.engine.set_position_fen(&self.pos.fen())?;
        let text = self.engine.go_depth(self.depth)?;
        self.pos.play_uci(&text).map_err(|e| {
            warn!("external engine answered {} which is not playable: {}", text, e);
            SessionError::External(UciError::Protocol(format!("bestmove {text}: {e}")))
        })
    }

    fn check_status(&self) -> GameStatus { self.pos.status() }

    fn undo(&mut self) -> bool {
        if self.pos.history_len() < 2 { return false; }
        self.pos.undo();
        self.pos.undo();
        true
    }

    fn set_difficulty(&mut self, level: u32) -> SessionResult<()> {
        check_level(level)?;
        self.level = level;
        self.depth = external_depth_for_level(level);
        info!("external difficulty set to {} (depth {})", level, self.depth);
        Ok(())
    }

    fn reset(&mut self) -> SessionResult<()> {
        self.engine.new_game()?;
        self.pos = Position::startpos();
        Ok(())
    }

    fn position(&self) -> &Position { &self.pos }
    fn engine_color(&self) -> Color { self.engine_side.color() }
}
