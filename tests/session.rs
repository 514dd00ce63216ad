use cozy_chess::Square;
use pawnstorm::board::{GameStatus, Position};
use pawnstorm::config::{SessionConfig, Side};
use pawnstorm::error::{BoardError, SessionError};
use pawnstorm::openings::get_opening_lines;
use pawnstorm::session::{search_depth_for_level, EngineSession, Opponent, Phase, MAX_LEVEL};
use pretty_assertions::assert_eq;

fn config(engine: Side, opening: &str, seed: u64) -> SessionConfig {
    SessionConfig { engine_color: engine, opening: opening.into(), difficulty: 0, seed: Some(seed), ..SessionConfig::default() }
}

const FOOLS_MATE: &str = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";

#[test]
fn depth_grows_with_level() {
    let depths: Vec<u32> = (0..=MAX_LEVEL).map(search_depth_for_level).collect();
    assert_eq!(depths, vec![1, 3, 5, 7, 9]);

    let mut s = EngineSession::new(&config(Side::Black, "none", 1)).unwrap();
    s.set_difficulty(2).unwrap();
    assert_eq!((s.level(), s.depth()), (2, 5));
    let err = s.set_difficulty(MAX_LEVEL + 1).unwrap_err();
    assert!(matches!(err, SessionError::InvalidDifficulty { level: 5, max: 4 }));
    assert_eq!(s.depth(), 5);

    let bad = SessionConfig { difficulty: 9, ..SessionConfig::default() };
    assert!(matches!(EngineSession::new(&bad), Err(SessionError::InvalidDifficulty { .. })));
}

#[test]
fn undo_needs_a_full_round() {
    let mut s = EngineSession::new(&config(Side::Black, "none", 1)).unwrap();
    assert!(!s.undo());
    s.apply_opponent_move(Square::E2, Square::E4).unwrap();
    let fen = s.position().fen();
    let before_score = s.score();
    assert!(!s.undo());
    assert_eq!(s.position().fen(), fen);
    assert_eq!(s.score(), before_score);
    assert_eq!(s.position().history_len(), 1);
}

#[test]
fn illegal_move_changes_nothing() {
    let mut s = EngineSession::new(&config(Side::Black, "none", 1)).unwrap();
    let fen = s.position().fen();
    let err = s.apply_opponent_move(Square::E2, Square::E5).unwrap_err();
    assert!(matches!(err, SessionError::IllegalMove(BoardError::IllegalMove(_))));
    // moving the opponent's piece
    assert!(s.apply_opponent_move(Square::E7, Square::E5).is_err());
    // empty square
    assert!(s.apply_opponent_move(Square::E4, Square::E5).is_err());
    assert_eq!(s.position().fen(), fen);
    assert_eq!(s.score(), 0);
    assert_eq!(s.phase(), Phase::AwaitingOpponentMove);
}

#[test]
fn turn_order_is_enforced() {
    let mut s = EngineSession::new(&config(Side::Black, "none", 1)).unwrap();
    assert!(matches!(s.compute_reply(), Err(SessionError::NotYourTurn(_))));
    s.apply_opponent_move(Square::E2, Square::E4).unwrap();
    assert_eq!(s.phase(), Phase::Thinking);
    assert!(matches!(s.apply_opponent_move(Square::D2, Square::D4), Err(SessionError::NotYourTurn(_))));
    s.compute_reply().unwrap();
    assert_eq!(s.phase(), Phase::AwaitingOpponentMove);
}

#[test]
fn finished_game_rejects_moves() {
    let pos = Position::from_fen(FOOLS_MATE).unwrap();
    let mut s = EngineSession::from_position(&config(Side::Black, "none", 1), pos).unwrap();
    assert_eq!(s.check_status(), GameStatus::BlackWin);
    assert_eq!(s.phase(), Phase::Terminal);
    assert!(matches!(s.compute_reply(), Err(SessionError::GameOver)));
    assert!(matches!(s.apply_opponent_move(Square::E1, Square::F2), Err(SessionError::GameOver)));
}

#[test]
fn stalemate_is_a_draw() {
    let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let s = EngineSession::from_position(&config(Side::Black, "none", 1), pos).unwrap();
    assert_eq!(s.check_status(), GameStatus::Draw);
    assert_eq!(s.phase(), Phase::Terminal);
}

#[test]
fn engine_can_play_white() {
    let mut s = EngineSession::new(&config(Side::White, "none", 1)).unwrap();
    assert_eq!(s.phase(), Phase::Thinking);
    let reply = s.compute_reply().unwrap();
    assert_eq!(reply.color, cozy_chess::Color::White);
    assert_eq!(s.phase(), Phase::AwaitingOpponentMove);
}

#[test]
fn named_opening_is_deterministic() {
    let mut replies = Vec::new();
    for seed in [1, 99] {
        let mut s = EngineSession::new(&config(Side::White, "london", seed)).unwrap();
        let mut line = Vec::new();
        line.push(s.compute_reply().unwrap().uci());
        s.apply_opponent_move(Square::D7, Square::D5).unwrap();
        line.push(s.compute_reply().unwrap().uci());
        s.apply_opponent_move(Square::G8, Square::F6).unwrap();
        line.push(s.compute_reply().unwrap().uci());
        replies.push(line);
    }
    assert_eq!(replies[0], vec!["d2d4", "g1f3", "c1f4"]);
    assert_eq!(replies[0], replies[1]);
}

#[test]
fn random_opening_plays_a_whole_book_line() {
    // Quiet wing pawn moves never get in the way of a black book line.
    let human = [(Square::A2, Square::A3), (Square::H2, Square::H3), (Square::A3, Square::A4), (Square::H3, Square::H4), (Square::B2, Square::B3)];
    let lines = get_opening_lines();
    for seed in 0..8 {
        let mut s = EngineSession::new(&config(Side::Black, "random", seed)).unwrap();
        let name = s.opening_name().expect("a line was drawn").to_string();
        let line = lines.iter().find(|l| l.name == name).unwrap();
        assert_eq!(line.side, Side::Black);
        let mut played = Vec::new();
        for &(from, to) in human.iter().take(line.moves.len()) {
            s.apply_opponent_move(from, to).unwrap();
            played.push(s.compute_reply().unwrap().uci());
        }
        assert_eq!(played, line.moves, "seed {seed}");
        assert_eq!(s.opening_remaining(), 0);
        assert!(!s.opening_ended());
    }
}

#[test]
fn unplayable_book_move_ends_the_opening() {
    let mut s = EngineSession::new(&config(Side::White, "london", 4)).unwrap();
    assert_eq!(s.compute_reply().unwrap().uci(), "d2d4");
    s.apply_opponent_move(Square::E7, Square::E5).unwrap();
    assert_eq!(s.compute_reply().unwrap().uci(), "g1f3");
    // Bb4+ makes the next book move (c1f4) illegal
    s.apply_opponent_move(Square::F8, Square::B4).unwrap();
    let reply = s.compute_reply().unwrap();
    assert_ne!(reply.uci(), "c1f4");
    assert!(s.opening_ended());
    assert_eq!(s.opening_remaining(), 0);

    // the book stays closed after taking moves back
    assert!(s.undo());
    assert!(s.opening_ended());
    s.apply_opponent_move(Square::F8, Square::B4).unwrap();
    s.compute_reply().unwrap();
    assert!(s.opening_ended());
}

#[test]
fn reset_starts_a_fresh_game() {
    let mut s = EngineSession::new(&config(Side::White, "italian", 2)).unwrap();
    s.compute_reply().unwrap();
    s.apply_opponent_move(Square::E7, Square::E5).unwrap();
    s.compute_reply().unwrap();
    s.reset().unwrap();
    assert_eq!(s.position().fen(), Position::startpos().fen());
    assert_eq!(s.position().history_len(), 0);
    assert_eq!(s.score(), 0);
    assert_eq!(s.opening_remaining(), 5);
    assert_eq!(s.compute_reply().unwrap().uci(), "e2e4");
}

#[test]
fn wrong_side_opening_is_rejected() {
    let err = EngineSession::new(&config(Side::Black, "london", 1)).err().unwrap();
    assert!(matches!(err, SessionError::Opening(_)));
}
