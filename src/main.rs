use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cozy_chess::{Color, Square};
use pawnstorm::board::cozy::parse_square;
use pawnstorm::board::{piece_char, GameStatus, Position};
use pawnstorm::config::{Backend, SessionConfig, Side};
use pawnstorm::session::{self, Opponent, Phase};
use pawnstorm::uci::UciEngine;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess against the Pawnstorm engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a game in the terminal
    Play(PlayArgs),
    /// Speak UCI on stdin/stdout
    Uci {
        /// Never search deeper than this, whatever `go depth` asks for
        #[arg(long)]
        max_depth: Option<u32>,
    },
}

#[derive(clap::Args, Debug, Default)]
struct PlayArgs {
    /// JSON session config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Difficulty level, 0 to 4
    #[arg(long)]
    difficulty: Option<u32>,

    /// Opening line name, 'random' or 'none'
    #[arg(long)]
    opening: Option<String>,

    /// Your color: 'w' for white, 'b' for black (default white)
    #[arg(long)]
    color: Option<String>,

    /// Use an external UCI engine instead of the built-in search
    #[arg(long)]
    engine_path: Option<PathBuf>,

    /// Seed for opening selection
    #[arg(long)]
    seed: Option<u64>,

    /// Print search timing
    #[arg(long)]
    verbose: bool,
}

fn load_config(args: &PlayArgs) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(color) = &args.color {
        let human: Side = color.parse().map_err(anyhow::Error::msg)?;
        config.engine_color = human.opposite();
    }
    if let Some(d) = args.difficulty { config.difficulty = d; }
    if let Some(o) = &args.opening { config.opening = o.clone(); }
    if let Some(s) = args.seed { config.seed = Some(s); }
    if let Some(path) = &args.engine_path {
        config.backend = Backend::External { path: path.clone(), args: Vec::new(), timeout_ms: 30_000 };
    }
    Ok(config)
}

fn print_board(pos: &Position) {
    let mut grid = [['.'; 8]; 8];
    for p in pos.pieces() {
        let c = piece_char(p.piece);
        grid[p.square.rank() as usize][p.square.file() as usize] =
            if p.color == Color::White { c.to_ascii_uppercase() } else { c };
    }
    println!();
    for (r, row) in grid.iter().enumerate().rev() {
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        println!("{} {}", r + 1, cells.join(" "));
    }
    println!("  a b c d e f g h");
    if let Some(last) = pos.last_move() { println!("last move: {}", last); }
    println!("{}", pos.fen());
}

fn print_result(status: GameStatus) {
    match status {
        GameStatus::WhiteWin => println!("\nCheckmate! White wins!"),
        GameStatus::BlackWin => println!("\nCheckmate! Black wins!"),
        GameStatus::Draw => println!("\nGame is a draw!"),
        GameStatus::InProgress => {}
    }
}

fn parse_move_squares(text: &str) -> Option<(Square, Square)> {
    if text.len() < 4 || !text.is_ascii() { return None; }
    let from = parse_square(&text[0..2]).ok()?;
    let to = parse_square(&text[2..4]).ok()?;
    Some((from, to))
}

/// Let the engine move. A failed reply is reported and the game stays where it was.
fn engine_turn(game: &mut dyn Opponent, verbose: bool) -> bool {
    let start = Instant::now();
    match game.compute_reply() {
        Ok(reply) => {
            println!("Computer plays: {}", reply);
            if verbose { println!("elapsed: {:.2}s", start.elapsed().as_secs_f32()); }
            true
        }
        Err(e) => {
            println!("{e}");
            println!("Press enter to let the computer try again, or type 'undo', 'new' or 'quit'.");
            false
        }
    }
}

fn play(args: PlayArgs) -> Result<()> {
    let config = load_config(&args)?;
    let mut game = session::build(&config)?;
    println!("Commands: <move> (e.g. e2e4), undo, level <0-4>, new, quit");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        match game.phase() {
            Phase::Terminal => {
                print_board(game.position());
                print_result(game.check_status());
                print!("Type 'new' for another game or 'quit': ");
            }
            Phase::Thinking => {
                if engine_turn(game.as_mut(), args.verbose) { continue; }
                print!("> ");
            }
            Phase::AwaitingOpponentMove => {
                print_board(game.position());
                print!("Enter your move: ");
            }
        }
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break; };
        let line = line?;
        let mut words = line.split_whitespace();
        match words.next() {
            None => {}
            Some("quit") | Some("exit") => break,
            Some("undo") => {
                if !game.undo() { println!("Nothing to undo."); }
            }
            Some("new") => game.reset()?,
            Some("level") => match words.next().and_then(|w| w.parse::<u32>().ok()) {
                Some(level) => {
                    if let Err(e) = game.set_difficulty(level) { println!("{e}"); }
                }
                None => println!("Usage: level <0-4>"),
            },
            Some(mv) => match parse_move_squares(mv) {
                Some((from, to)) => {
                    if let Err(e) = game.apply_opponent_move(from, to) { println!("{e}"); }
                }
                None => println!("Invalid move format! Use format like 'e2e4'"),
            },
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Some(Command::Uci { max_depth }) => UciEngine::with_max_depth(max_depth).run_loop()?,
        Some(Command::Play(args)) => play(args)?,
        None => play(PlayArgs::default())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawnstorm::board::PlayedMove;
    use pawnstorm::error::{SessionError, SessionResult, UciError};
    use pawnstorm::EngineSession;
    use pretty_assertions::assert_eq;

    /// An opponent whose engine never answers.
    struct Stalled(EngineSession);

    impl Opponent for Stalled {
        fn apply_opponent_move(&mut self, from: Square, to: Square) -> SessionResult<PlayedMove> {
            self.0.apply_opponent_move(from, to)
        }
        fn compute_reply(&mut self) -> SessionResult<PlayedMove> {
            Err(SessionError::External(UciError::Timeout { expected: "bestmove".into(), millis: 10 }))
        }
        fn check_status(&self) -> GameStatus { self.0.check_status() }
        fn undo(&mut self) -> bool { self.0.undo() }
        fn set_difficulty(&mut self, level: u32) -> SessionResult<()> { self.0.set_difficulty(level) }
        fn reset(&mut self) -> SessionResult<()> { self.0.reset() }
        fn position(&self) -> &Position { self.0.position() }
        fn engine_color(&self) -> Color { self.0.engine_color() }
    }

    fn white_engine() -> EngineSession {
        let config = SessionConfig { engine_color: Side::White, opening: "none".into(), seed: Some(1), ..SessionConfig::default() };
        EngineSession::new(&config).unwrap()
    }

    #[test]
    fn failed_reply_keeps_the_game_going() {
        let mut game = Stalled(white_engine());
        assert!(!engine_turn(&mut game, false));
        assert_eq!(game.position().history_len(), 0);
        assert_eq!(game.phase(), Phase::Thinking);
        game.reset().unwrap();
        assert_eq!(game.phase(), Phase::Thinking);
    }

    #[test]
    fn engine_turn_plays_a_move() {
        let mut game = white_engine();
        assert!(engine_turn(&mut game, false));
        assert_eq!(game.position().history_len(), 1);
        assert_eq!(game.phase(), Phase::AwaitingOpponentMove);
    }

    #[test]
    fn color_flag_overrides_config_only_when_given() {
        let path = std::env::temp_dir().join(format!("pawnstorm-play-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"engine_color": "white", "difficulty": 2}"#).unwrap();

        let from_file = load_config(&PlayArgs { config: Some(path.clone()), ..PlayArgs::default() }).unwrap();
        assert_eq!(from_file.engine_color, Side::White);
        assert_eq!(from_file.difficulty, 2);

        let flagged = load_config(&PlayArgs { config: Some(path.clone()), color: Some("w".into()), ..PlayArgs::default() }).unwrap();
        assert_eq!(flagged.engine_color, Side::Black);

        assert!(load_config(&PlayArgs { color: Some("green".into()), ..PlayArgs::default() }).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
