//! Incremental evaluation: the effect of one move on the mover's score, without a board rescan.
//!
//! The board passed in is always the position *before* the move, in search and in real play
//! alike, so the moving and captured pieces are read from it directly.
use cozy_chess::{Board, Move, Piece, Square};
use crate::board::castle_squares;
use crate::search::eval::piece_value;
use crate::search::pst::pst_value;

/// Change in the mover's evaluation caused by `mv`. The running stm-relative score after the
/// move is `-(before + delta)`.
pub fn score_delta(board: &Board, mv: Move) -> i32 {
    let us = board.side_to_move();
    let Some(piece) = board.piece_on(mv.from) else { return 0; };

    // Castling is encoded king-takes-rook: both pieces move.
    if piece == Piece::King && board.colors(us).has(mv.to) {
        let (king_to, rook_to) = castle_squares(mv);
        return pst_value(Piece::King, us, king_to) - pst_value(Piece::King, us, mv.from)
            + pst_value(Piece::Rook, us, rook_to) - pst_value(Piece::Rook, us, mv.to);
    }

    let mut delta = -pst_value(piece, us, mv.from);
    match mv.promotion {
        Some(promo) => delta += pst_value(promo, us, mv.to) + piece_value(promo) - piece_value(Piece::Pawn),
        None => delta += pst_value(piece, us, mv.to),
    }

    if let Some(victim) = board.piece_on(mv.to) {
        delta += piece_value(victim) + pst_value(victim, !us, mv.to);
    } else if piece == Piece::Pawn && mv.from.file() != mv.to.file() {
        // en passant: the captured pawn sits beside the origin square
        let victim_sq = Square::new(mv.to.file(), mv.from.rank());
        delta += piece_value(Piece::Pawn) + pst_value(Piece::Pawn, !us, victim_sq);
    }
    delta
}

/// Running stm-relative score after playing `mv` from a position scored `before`.
#[inline]
pub fn score_after(board: &Board, mv: Move, before: i32) -> i32 {
    -(before + score_delta(board, mv))
}
