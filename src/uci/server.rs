use std::io::{self, BufRead, Write};
use log::{debug, warn};
use crate::board::Position;
use crate::search::alphabeta::Searcher;

const DEFAULT_GO_DEPTH: u32 = 3;

/// Minimal UCI front end over the in-process searcher.
pub struct UciEngine {
    pos: Position,
    searcher: Searcher,
    /// Caps `go depth N`; set from the command line.
    max_depth: Option<u32>,
}

impl Default for UciEngine {
    fn default() -> Self { Self::new() }
}

impl UciEngine {
    pub fn new() -> Self { Self { pos: Position::startpos(), searcher: Searcher::default(), max_depth: None } }

    pub fn with_max_depth(max_depth: Option<u32>) -> Self { Self { max_depth, ..Self::new() } }

    pub fn position(&self) -> &Position { &self.pos }

    fn cmd_uci<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name Pawnstorm {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "id author Pawnstorm Team")?;
        writeln!(out, "uciok")
    }

    fn cmd_isready<W: Write>(&self, out: &mut W) -> io::Result<()> { writeln!(out, "readyok") }

    fn cmd_ucinewgame(&mut self) { self.pos = Position::startpos(); }

    fn cmd_position(&mut self, args: &str) {
        // Supports: 'position startpos [moves ...]' and 'position fen <fen> [moves ...]'
        let mut tokens = args.split_whitespace();
        let base = match tokens.next() {
            Some("startpos") => Some(Position::startpos()),
            Some("fen") => {
                // FEN is 6 fields; collect them
                let fen_fields: Vec<&str> = tokens.by_ref().take(6).collect();
                Position::from_fen(&fen_fields.join(" ")).map_err(|e| warn!("position: {e}")).ok()
            }
            _ => None,
        };
        let Some(mut pos) = base else { return; };
        if let Some("moves") = tokens.next() {
            for mv in tokens {
                if let Err(e) = pos.play_uci(mv) { warn!("position: {e}"); return; }
            }
        }
        self.pos = pos;
    }

    fn cmd_go<W: Write>(&mut self, args: &str, out: &mut W) -> io::Result<()> {
        // Support minimal: go depth N (anything else searches the default depth)
        let mut depth = DEFAULT_GO_DEPTH;
        let mut tokens = args.split_whitespace();
        while let Some(tok) = tokens.next() {
            if tok == "depth" {
                if let Some(d) = tokens.next().and_then(|s| s.parse::<u32>().ok()) { depth = d; }
            }
        }
        if let Some(cap) = self.max_depth { depth = depth.min(cap); }
        let best = self.searcher.find_best_move(&mut self.pos, depth).ok()
            .and_then(|r| self.pos.describe(r.bestmove));
        match best {
            Some(m) => writeln!(out, "bestmove {}", m.uci()),
            None => writeln!(out, "bestmove 0000"),
        }
    }

    /// Handle one command line. Returns `false` on `quit`.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<bool> {
        let line = line.trim();
        debug!("uci < {}", line);
        match line {
            "" | "stop" => {}
            "uci" => self.cmd_uci(out)?,
            "isready" => self.cmd_isready(out)?,
            "ucinewgame" => self.cmd_ucinewgame(),
            "quit" => return Ok(false),
            _ => {
                if let Some(rest) = line.strip_prefix("position ") { self.cmd_position(rest); }
                else if let Some(rest) = line.strip_prefix("go") { self.cmd_go(rest, out)?; }
            }
        }
        out.flush()?;
        Ok(true)
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        for line in input.lines() {
            if !self.handle_line(&line?, out)? { break; }
        }
        Ok(())
    }

    pub fn run_loop(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run(stdin.lock(), &mut out)
    }
}
