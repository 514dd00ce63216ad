use cozy_chess::{Board, Move, Piece};
use log::debug;
use crate::board::Position;
use crate::error::SearchError;
use crate::search::delta::score_after;
use crate::search::eval::{eval_cp, mated_score, piece_value, DRAW_SCORE, MATE_SCORE};

/// Window bound just outside every reachable score.
const INF: i32 = MATE_SCORE + 1;

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    pub depth: u32,
    /// Extend depth-0 leaves with a capture-only search.
    pub quiescence: bool,
    /// Reorder moves (promotions, then captures) at nodes with at least this much depth left.
    pub order_min_depth: u32,
}

impl Default for SearchParams {
    fn default() -> Self { Self { depth: 3, quiescence: true, order_min_depth: 2 } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub bestmove: Move,
    pub score_cp: i32,
    pub nodes: u64,
}

/// Negamax alpha-beta over a mutable `Position`. Every candidate is applied through
/// `Position::scoped`, so the board is restored however a subtree exits.
pub struct Searcher {
    pub(crate) nodes: u64,
    quiescence: bool,
    order_min_depth: u32,
}

impl Default for Searcher {
    fn default() -> Self {
        let p = SearchParams::default();
        Self { nodes: 0, quiescence: p.quiescence, order_min_depth: p.order_min_depth }
    }
}

impl Searcher {
    pub fn new(params: SearchParams) -> Self {
        Self { nodes: 0, quiescence: params.quiescence, order_min_depth: params.order_min_depth }
    }

    pub fn nodes(&self) -> u64 { self.nodes }
    pub fn set_quiescence(&mut self, on: bool) { self.quiescence = on; }

    pub fn search_with_params(&mut self, pos: &mut Position, params: SearchParams) -> Result<SearchResult, SearchError> {
        self.quiescence = params.quiescence;
        self.order_min_depth = params.order_min_depth;
        self.find_best_move(pos, params.depth)
    }

    /// Best move for the side to move, searched `depth` plies deep (at least one).
    ///
    /// The first move reaching the maximal score wins. Callers must check the game status first;
    /// a position without legal moves is reported as `SearchError::NoLegalMoves`.
    pub fn find_best_move(&mut self, pos: &mut Position, depth: u32) -> Result<SearchResult, SearchError> {
        self.nodes = 0;
        let depth = depth.max(1);
        let mut moves = pos.legal_moves();
        if moves.is_empty() { return Err(SearchError::NoLegalMoves { fen: pos.fen() }); }
        if depth >= self.order_min_depth { order_moves(pos.board(), &mut moves); }

        let root_score = eval_cp(pos.board());
        let mut alpha = -INF;
        let beta = INF;
        let mut best: Option<(Move, i32)> = None;
        for m in moves {
            let child_score = score_after(pos.board(), m, root_score);
            let score = {
                let mut child = pos.scoped(m);
                -self.alphabeta(&mut child, depth - 1, -beta, -alpha, 1, child_score)
            };
            if best.map_or(true, |(_, b)| score > b) { best = Some((m, score)); }
            if score > alpha { alpha = score; }
        }
        let (bestmove, score_cp) = best.ok_or_else(|| SearchError::NoLegalMoves { fen: pos.fen() })?;
        debug!("search depth={} best={} score={} nodes={}", depth, bestmove, score_cp, self.nodes);
        Ok(SearchResult { bestmove, score_cp, nodes: self.nodes })
    }

    /// `score` is the static evaluation of `pos` relative to its side to move, carried down
    /// incrementally from the root.
    fn alphabeta(&mut self, pos: &mut Position, depth: u32, mut alpha: i32, beta: i32, ply: i32, score: i32) -> i32 {
        self.nodes += 1;
        let mut moves = pos.legal_moves();
        if moves.is_empty() {
            return if pos.in_check() { mated_score(ply) } else { DRAW_SCORE };
        }
        if depth == 0 {
            return if self.quiescence { self.qsearch(pos, alpha, beta, score) } else { score };
        }
        if depth >= self.order_min_depth { order_moves(pos.board(), &mut moves); }

        for m in moves {
            let child_score = score_after(pos.board(), m, score);
            let s = {
                let mut child = pos.scoped(m);
                -self.alphabeta(&mut child, depth - 1, -beta, -alpha, ply + 1, child_score)
            };
            if s >= beta { return beta; }
            if s > alpha { alpha = s; }
        }
        alpha
    }

    pub fn qsearch_eval_cp(&mut self, pos: &mut Position) -> i32 {
        let stand = eval_cp(pos.board());
        self.qsearch(pos, -INF, INF, stand)
    }

    fn qsearch(&mut self, pos: &mut Position, mut alpha: i32, beta: i32, stand: i32) -> i32 {
        self.nodes += 1;
        // Stand pat
        if stand >= beta { return beta; }
        if stand > alpha { alpha = stand; }

        // Captures only; material strictly shrinks so this terminates.
        let mut caps = pos.capture_moves();
        order_moves(pos.board(), &mut caps);
        for m in caps {
            let child_score = score_after(pos.board(), m, stand);
            let s = {
                let mut child = pos.scoped(m);
                -self.qsearch(&mut child, -beta, -alpha, child_score)
            };
            if s >= beta { return beta; }
            if s > alpha { alpha = s; }
        }
        alpha
    }

    /// Plain negamax over the same tree and leaf rules, without pruning or ordering.
    pub fn search_unpruned(&mut self, pos: &mut Position, depth: u32) -> i32 {
        self.nodes = 0;
        let score = eval_cp(pos.board());
        self.negamax(pos, depth.max(1), 0, score)
    }

    fn negamax(&mut self, pos: &mut Position, depth: u32, ply: i32, score: i32) -> i32 {
        self.nodes += 1;
        let moves = pos.legal_moves();
        if moves.is_empty() {
            return if pos.in_check() { mated_score(ply) } else { DRAW_SCORE };
        }
        if depth == 0 {
            return if self.quiescence { self.qsearch(pos, -INF, INF, score) } else { score };
        }
        let mut best = -INF;
        for m in moves {
            let child_score = score_after(pos.board(), m, score);
            let mut child = pos.scoped(m);
            best = best.max(-self.negamax(&mut child, depth - 1, ply + 1, child_score));
        }
        best
    }
}

/// Promotions first, then captures (most valuable victim, least valuable attacker), then quiet
/// moves. The sort is stable, so equal keys keep generation order.
pub fn order_moves(board: &Board, moves: &mut [Move]) {
    moves.sort_by_key(|&m| -order_key(board, m));
}

fn order_key(board: &Board, m: Move) -> i32 {
    let mut key = 0;
    if let Some(p) = m.promotion { key += 10_000 + piece_value(p); }
    let attacker = board.piece_on(m.from).unwrap_or(Piece::Pawn);
    let victim = if board.colors(!board.side_to_move()).has(m.to) {
        board.piece_on(m.to)
    } else if attacker == Piece::Pawn && m.from.file() != m.to.file() {
        Some(Piece::Pawn)
    } else {
        None
    };
    if let Some(v) = victim {
        key += 1_000 + 10 * piece_value(v) - piece_value(attacker) / 10;
    }
    key
}
