use cozy_chess::{Board, Color, Piece};
use crate::search::pst::pst_value;

pub const PAWN: i32 = 100;
pub const KNIGHT: i32 = 320;
pub const BISHOP: i32 = 330;
pub const ROOK: i32 = 500;
pub const QUEEN: i32 = 900;

/// Material weight; the king carries none.
#[inline]
pub fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN,
        Piece::Knight => KNIGHT,
        Piece::Bishop => BISHOP,
        Piece::Rook => ROOK,
        Piece::Queen => QUEEN,
        Piece::King => 0,
    }
}

fn count_piece(board: &Board, color: Color, piece: Piece) -> i32 {
    board.colored_pieces(color, piece).len() as i32
}

// Side-agnostic material in centipawns: positive means White has more material.
pub fn material_eval_cp_side_agnostic(board: &Board) -> i32 {
    Piece::ALL.iter()
        .map(|&p| (count_piece(board, Color::White, p) - count_piece(board, Color::Black, p)) * piece_value(p))
        .sum()
}

// Piece-square total, positive favours White.
pub fn positional_eval_cp_side_agnostic(board: &Board) -> i32 {
    let mut score = 0;
    for &piece in &Piece::ALL {
        for sq in board.colored_pieces(Color::White, piece) { score += pst_value(piece, Color::White, sq); }
        for sq in board.colored_pieces(Color::Black, piece) { score -= pst_value(piece, Color::Black, sq); }
    }
    score
}

/// Full static evaluation from White's point of view.
pub fn eval_white(board: &Board) -> i32 {
    material_eval_cp_side_agnostic(board) + positional_eval_cp_side_agnostic(board)
}

// Material from side-to-move perspective (negamax-friendly)
pub fn material_eval_cp(board: &Board) -> i32 {
    let base = material_eval_cp_side_agnostic(board);
    if board.side_to_move() == Color::White { base } else { -base }
}

/// Static evaluation relative to the side to move.
pub fn eval_cp(board: &Board) -> i32 {
    let base = eval_white(board);
    if board.side_to_move() == Color::White { base } else { -base }
}

// Mate scoring helpers
pub const MATE_SCORE: i32 = 99_999;
pub const DRAW_SCORE: i32 = 0;
pub const MAX_PLY: i32 = 128;

/// Score of a node whose side to move is checkmated, `ply` half-moves below the root.
/// A mate delivered by the root move itself scores exactly `MATE_SCORE` at the root.
#[inline]
pub fn mated_score(ply: i32) -> i32 {
    -MATE_SCORE + (ply - 1)
}

pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_SCORE - MAX_PLY
}
