use cozy_chess::{Color, Move, Square};
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::{color_name, GameStatus, PlayedMove, Position};
use crate::config::{Side, SessionConfig};
use crate::error::{SessionError, SessionResult};
use crate::openings::{OpeningStrategy, OpeningSupplier};
use crate::search::alphabeta::{SearchParams, Searcher};
use crate::search::delta::score_after;
use crate::search::eval::eval_cp;
use crate::session::{search_depth_for_level, Opponent, Phase, MAX_LEVEL};

/// In-process opponent: opening line first, then alpha-beta search.
pub struct EngineSession {
    pos: Position,
    searcher: Searcher,
    /// Static evaluation of `pos`, relative to the side to move.
    score: i32,
    level: u32,
    depth: u32,
    engine_side: Side,
    strategy: OpeningStrategy,
    openings: OpeningSupplier,
    opening_ended: bool,
    rng: SmallRng,
}

impl EngineSession {
    pub fn new(config: &SessionConfig) -> SessionResult<Self> {
        Self::from_position(config, Position::startpos())
    }

    /// Start from an arbitrary position; `reset` still goes back to the initial position.
    pub fn from_position(config: &SessionConfig, pos: Position) -> SessionResult<Self> {
        check_level(config.difficulty)?;
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let strategy = OpeningStrategy::from_name(&config.opening);
        let openings = OpeningSupplier::new(&strategy, config.engine_color, &mut rng)?;
        let params = SearchParams { quiescence: config.quiescence, ..SearchParams::default() };
        let score = eval_cp(pos.board());
        info!("new in-process session: engine plays {}, level {}, opening {}", config.engine_color, config.difficulty, strategy);
        Ok(Self {
            pos,
            searcher: Searcher::new(params),
            score,
            level: config.difficulty,
            depth: search_depth_for_level(config.difficulty),
            engine_side: config.engine_color,
            strategy,
            openings,
            opening_ended: false,
            rng,
        })
    }

    pub fn score(&self) -> i32 { self.score }
    pub fn depth(&self) -> u32 { self.depth }
    pub fn level(&self) -> u32 { self.level }
    pub fn opening_ended(&self) -> bool { self.opening_ended }
    pub fn opening_remaining(&self) -> usize { self.openings.remaining() }
    pub fn opening_name(&self) -> Option<&str> { self.openings.name() }

    /// Play `mv` and carry the running score across it.
    fn commit(&mut self, mv: Move) -> SessionResult<PlayedMove> {
        let next = score_after(self.pos.board(), mv, self.score);
        let played = self.pos.play(mv)?;
        self.score = next;
        debug_assert_eq!(self.score, eval_cp(self.pos.board()), "running score drifted");
        Ok(played)
    }

    /// Next playable book move, or `None` once the book is done for this game.
    fn next_opening_move(&mut self) -> Option<Move> {
        if self.opening_ended { return None; }
        let Some(text) = self.openings.next_move() else {
            info!("opening line finished, searching from here");
            self.opening_ended = true;
            return None;
        };
        match self.pos.resolve_uci(&text) {
            Ok(mv) => Some(mv),
            Err(e) => {
                warn!("opening move {} not playable ({}), leaving the book", text, e);
                self.openings.abandon();
                self.opening_ended = true;
                None
            }
        }
    }

    fn expect_phase(&self, wanted: Phase, who: &'static str) -> SessionResult<()> {
        match self.phase() {
            Phase::Terminal => Err(SessionError::GameOver),
            p if p == wanted => Ok(()),
            _ => Err(SessionError::NotYourTurn(who)),
        }
    }
}

pub(crate) fn check_level(level: u32) -> SessionResult<()> {
    if level > MAX_LEVEL { Err(SessionError::InvalidDifficulty { level, max: MAX_LEVEL }) } else { Ok(()) }
}

impl Opponent for EngineSession {
    fn apply_opponent_move(&mut self, from: Square, to: Square) -> SessionResult<PlayedMove> {
        self.expect_phase(Phase::AwaitingOpponentMove, "the player")?;
        let mv = self.pos.resolve_squares(from, to, None)?;
        let played = self.commit(mv)?;
        debug!("player {} played {}", color_name(played.color), played);
        Ok(played)
    }

    fn compute_reply(&mut self) -> SessionResult<PlayedMove> {
        self.expect_phase(Phase::Thinking, "the engine")?;
        if let Some(mv) = self.next_opening_move() {
            let played = self.commit(mv)?;
            debug!("engine book move {}", played);
            return Ok(played);
        }
        let result = self.searcher.find_best_move(&mut self.pos, self.depth)?;
        let played = self.commit(result.bestmove)?;
        debug!("engine searched {} (score {}, {} nodes)", played, result.score_cp, result.nodes);
        Ok(played)
    }

    fn check_status(&self) -> GameStatus { self.pos.status() }

    fn undo(&mut self) -> bool {
        if self.pos.history_len() < 2 { return false; }
        self.pos.undo();
        self.pos.undo();
        // Recomputed from scratch; the opening flag is left as it was.
        self.score = eval_cp(self.pos.board());
        true
    }

    fn set_difficulty(&mut self, level: u32) -> SessionResult<()> {
        check_level(level)?;
        self.level = level;
        self.depth = search_depth_for_level(level);
        info!("difficulty set to {} (depth {})", level, self.depth);
        Ok(())
    }

    fn reset(&mut self) -> SessionResult<()> {
        self.openings = OpeningSupplier::new(&self.strategy, self.engine_side, &mut self.rng)?;
        self.pos = Position::startpos();
        self.score = eval_cp(self.pos.board());
        self.opening_ended = false;
        info!("session reset");
        Ok(())
    }

    fn position(&self) -> &Position { &self.pos }
    fn engine_color(&self) -> Color { self.engine_side.color() }
}
