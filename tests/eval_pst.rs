use cozy_chess::Board;
use pawnstorm::search::eval::{eval_cp, eval_white, material_eval_cp};

#[test]
fn startpos_is_balanced() {
    let b = Board::default();
    assert_eq!(eval_cp(&b), 0);
    assert_eq!(material_eval_cp(&b), 0);
}

#[test]
fn knight_center_better_than_rim() {
    // White: Kh1, Nd4; Black: Ka8. White to move.
    let center = Board::from_fen("k7/8/8/8/3N4/8/8/7K w - - 0 1", false).unwrap();
    let rim = Board::from_fen("k7/8/8/8/8/8/8/N6K w - - 0 1", false).unwrap();
    let c = eval_cp(&center);
    let r = eval_cp(&rim);
    assert!(c > r, "center eval {c} should be greater than rim {r}");
}

#[test]
fn pawn_advanced_better_than_back() {
    // White pawn on e4 vs e2; kings only otherwise.
    let advanced = Board::from_fen("k7/8/8/8/4P3/8/8/7K w - - 0 1", false).unwrap();
    let back = Board::from_fen("k7/8/8/8/8/8/4P3/7K w - - 0 1", false).unwrap();
    let a = eval_cp(&advanced);
    let b = eval_cp(&back);
    assert!(a > b, "advanced pawn eval {a} should exceed back pawn {b}");
}

#[test]
fn score_is_relative_to_side_to_move() {
    let w = Board::from_fen("k7/8/8/8/3N4/8/8/7K w - - 0 1", false).unwrap();
    let b = Board::from_fen("k7/8/8/8/3N4/8/8/7K b - - 0 1", false).unwrap();
    assert_eq!(eval_white(&w), eval_white(&b));
    assert_eq!(eval_cp(&w), -eval_cp(&b));
    assert!(eval_cp(&w) > 0);
}

#[test]
fn colour_mirrored_positions_score_the_same_for_the_mover() {
    let white = Board::from_fen("4k3/8/8/8/4P3/2N5/8/4K3 w - - 0 1", false).unwrap();
    let black = Board::from_fen("4k3/8/2n5/4p3/8/8/8/4K3 b - - 0 1", false).unwrap();
    assert_eq!(eval_cp(&white), eval_cp(&black));
}
