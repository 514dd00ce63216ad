use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pawnstorm::board::GameStatus;
use pawnstorm::config::{SessionConfig, Side};
use pawnstorm::session::{EngineSession, Opponent, Phase, MAX_LEVEL};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "arena", about = "Play the in-process engine against a random mover at each difficulty level")]
struct Args {
    /// Games per level
    #[arg(long, default_value_t = 8)]
    games: usize,

    /// Comma-separated difficulty levels
    #[arg(long, default_value = "0,1,2")]
    levels: String,

    /// Max plies before declaring a draw
    #[arg(long, default_value_t = 200)]
    max_plies: usize,

    /// Worker threads (0 = rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Random seed
    #[arg(long, default_value_t = 1u64)]
    seed: u64,

    /// Optional: write summary JSON to this path
    #[arg(long)]
    json_out: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct GameOutcome {
    level: u32,
    engine_won: bool,
    engine_lost: bool,
    plies: usize,
}

#[derive(Debug, Default, Serialize)]
struct LevelSummary {
    level: u32,
    games: usize,
    wins: usize,
    losses: usize,
    draws: usize,
    avg_plies: f64,
}

fn play_one(level: u32, game_idx: usize, seed: u64, max_plies: usize) -> Result<GameOutcome> {
    let engine_side = if game_idx % 2 == 0 { Side::White } else { Side::Black };
    let game_seed = seed ^ ((level as u64) << 32) ^ game_idx as u64;
    let config = SessionConfig { difficulty: level, engine_color: engine_side, seed: Some(game_seed), ..SessionConfig::default() };
    let mut session = EngineSession::new(&config)?;
    let mut rng = SmallRng::seed_from_u64(game_seed.wrapping_add(1));

    let mut plies = 0;
    while plies < max_plies {
        match session.phase() {
            Phase::Terminal => break,
            Phase::Thinking => { session.compute_reply()?; }
            Phase::AwaitingOpponentMove => {
                let moves = session.position().legal_moves();
                let Some(&mv) = moves.choose(&mut rng) else { break; };
                let played = session.position().describe(mv).ok_or_else(|| anyhow::anyhow!("undescribable move {mv}"))?;
                session.apply_opponent_move(played.from(), played.to())?;
            }
        }
        plies += 1;
    }
    let winner = match session.check_status() {
        GameStatus::WhiteWin => Some(Side::White),
        GameStatus::BlackWin => Some(Side::Black),
        _ => None,
    };
    Ok(GameOutcome {
        level,
        engine_won: winner == Some(engine_side),
        engine_lost: winner == Some(engine_side.opposite()),
        plies,
    })
}

fn summarize(level: u32, outcomes: &[GameOutcome]) -> LevelSummary {
    let mine: Vec<&GameOutcome> = outcomes.iter().filter(|o| o.level == level).collect();
    let games = mine.len();
    let wins = mine.iter().filter(|o| o.engine_won).count();
    let losses = mine.iter().filter(|o| o.engine_lost).count();
    let total_plies: usize = mine.iter().map(|o| o.plies).sum();
    LevelSummary {
        level,
        games,
        wins,
        losses,
        draws: games - wins - losses,
        avg_plies: if games > 0 { total_plies as f64 / games as f64 } else { 0.0 },
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let levels: Vec<u32> = args.levels.split(',')
        .map(|s| s.trim().parse::<u32>())
        .collect::<Result<_, _>>()?;
    if let Some(bad) = levels.iter().find(|&&l| l > MAX_LEVEL) {
        anyhow::bail!("level {bad} is above the maximum of {MAX_LEVEL}");
    }
    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new().num_threads(args.threads).build_global()?;
    }

    let jobs: Vec<(u32, usize)> = levels.iter()
        .flat_map(|&l| (0..args.games).map(move |g| (l, g)))
        .collect();
    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} games [{elapsed_precise}] {msg}")?);

    let start = Instant::now();
    let outcomes: Vec<GameOutcome> = jobs.par_iter()
        .map(|&(level, g)| {
            let r = play_one(level, g, args.seed, args.max_plies);
            pb.inc(1);
            r
        })
        .collect::<Result<_>>()?;
    pb.finish_with_message("done");

    let summaries: Vec<LevelSummary> = levels.iter().map(|&l| summarize(l, &outcomes)).collect();
    for s in &summaries {
        println!("level {}: games={} wins={} losses={} draws={} avg_plies={:.1}",
            s.level, s.games, s.wins, s.losses, s.draws, s.avg_plies);
    }
    println!("elapsed: {:.2}s", start.elapsed().as_secs_f64());

    if let Some(path) = args.json_out.as_deref() {
        let payload = serde_json::json!({
            "games_per_level": args.games,
            "max_plies": args.max_plies,
            "seed": args.seed,
            "levels": summaries,
        });
        if let Err(e) = std::fs::write(path, serde_json::to_string_pretty(&payload)?) {
            eprintln!("warn: failed to write json_out: {}", e);
        }
    }
    Ok(())
}
