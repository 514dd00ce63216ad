use pawnstorm::board::Position;
use pawnstorm::search::alphabeta::Searcher;

// (fen, deepest depth checked)
const POSITIONS: &[(&str, u32)] = &[
    ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 3),
    ("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3", 3),
    ("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1", 3),
    ("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 2),
    ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3),
    ("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", 3),
];

fn check(quiescence: bool) {
    for &(fen, max_depth) in POSITIONS {
        for depth in 1..=max_depth {
            let mut pos = Position::from_fen(fen).unwrap();
            let mut pruned = Searcher::default();
            pruned.set_quiescence(quiescence);
            let mut full = Searcher::default();
            full.set_quiescence(quiescence);
            let a = pruned.find_best_move(&mut pos, depth).unwrap();
            let b = full.search_unpruned(&mut pos, depth);
            assert_eq!(a.score_cp, b, "{fen} depth {depth} quiescence {quiescence}");
            assert!(a.nodes <= full.nodes(), "pruning searched more nodes: {fen} depth {depth}");
            assert_eq!(pos.fen(), fen);
        }
    }
}

#[test]
fn alphabeta_matches_plain_negamax() {
    check(false);
}

#[test]
fn alphabeta_matches_plain_negamax_with_quiescence() {
    check(true);
}
