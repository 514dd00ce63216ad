//! Driver for an external UCI engine process (e.g. Stockfish).
use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use crate::error::UciError;

/// How long a search that missed its deadline gets to answer `stop`.
const STOP_GRACE: Duration = Duration::from_secs(2);

pub struct UciProcess {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    timeout: Duration,
    name: Option<String>,
}

impl UciProcess {
    /// Spawn the engine and run the `uci` / `isready` handshake.
    pub fn start<S: AsRef<OsStr>>(path: &Path, args: &[S], timeout: Duration) -> Result<Self, UciError> {
        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| UciError::Spawn { path: path.display().to_string(), source })?;
        let stdin = child.stdin.take().ok_or(UciError::Closed)?;
        let stdout = child.stdout.take().ok_or(UciError::Closed)?;

        // Reads block, so they live on their own thread and every wait can time out.
        let (tx, rx) = mpsc::channel();
        thread::Builder::new().name("uci-reader".into()).spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break; };
                if tx.send(line).is_err() { break; }
            }
        })?;

        let mut p = Self { child, stdin, lines: rx, timeout, name: None };
        p.send("uci")?;
        let mut name = None;
        p.wait_for("uciok", |l| {
            if let Some(n) = l.strip_prefix("id name ") { name = Some(n.trim().to_string()); }
            l == "uciok"
        })?;
        p.name = name;
        p.is_ready()?;
        info!("external engine ready: {}", p.name.as_deref().unwrap_or("<unnamed>"));
        Ok(p)
    }

    pub fn name(&self) -> Option<&str> { self.name.as_deref() }

    fn send(&mut self, cmd: &str) -> Result<(), UciError> {
        debug!("uci > {}", cmd);
        writeln!(self.stdin, "{}", cmd)?;
        self.stdin.flush()?;
        Ok(())
    }

    fn wait_for<F: FnMut(&str) -> bool>(&mut self, expected: &str, done: F) -> Result<String, UciError> {
        self.wait_within(expected, self.timeout, done)
    }

    fn wait_within<F: FnMut(&str) -> bool>(&mut self, expected: &str, limit: Duration, mut done: F) -> Result<String, UciError> {
        let deadline = Instant::now() + limit;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.lines.recv_timeout(left) {
                Ok(line) => {
                    debug!("uci < {}", line);
                    if done(line.trim()) { return Ok(line); }
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(UciError::Timeout { expected: expected.to_string(), millis: limit.as_millis() as u64 });
                }
                Err(RecvTimeoutError::Disconnected) => return Err(UciError::Closed),
            }
        }
    }

    /// Throw away whatever the engine printed since the last exchange.
    fn drain(&mut self) {
        while let Ok(line) = self.lines.try_recv() {
            debug!("uci < {} (dropped)", line);
        }
    }

    /// Drop stale output, then wait until the engine has read everything sent so far.
    fn sync(&mut self) -> Result<(), UciError> {
        self.drain();
        self.is_ready()
    }

    pub fn is_ready(&mut self) -> Result<(), UciError> {
        self.send("isready")?;
        self.wait_for("readyok", |l| l == "readyok").map(|_| ())
    }

    pub fn new_game(&mut self) -> Result<(), UciError> {
        self.drain();
        self.send("ucinewgame")?;
        self.is_ready()
    }

    pub fn set_position_fen(&mut self, fen: &str) -> Result<(), UciError> {
        self.sync()?;
        self.send(&format!("position fen {fen}"))
    }

    /// Search to `depth` and return the engine's `bestmove` token.
    ///
    /// On timeout the search is stopped and its late answer swallowed, so the next `go` gets a
    /// reply for its own position. An engine that ignores `stop` is killed.
    pub fn go_depth(&mut self, depth: u32) -> Result<String, UciError> {
        self.send(&format!("go depth {depth}"))?;
        match self.wait_for("bestmove", |l| l.starts_with("bestmove")) {
            Ok(line) => parse_bestmove(&line),
            Err(e @ UciError::Timeout { .. }) => {
                warn!("{e}; stopping the search");
                self.abandon_search();
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    fn abandon_search(&mut self) {
        let grace = self.timeout.max(STOP_GRACE);
        let stopped = self.send("stop").is_ok()
            && self.wait_within("bestmove", grace, |l| l.starts_with("bestmove")).is_ok();
        if !stopped {
            warn!("engine did not answer stop, killing it");
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }

    pub fn quit(&mut self) {
        let _ = self.send("quit");
        for _ in 0..20 {
            if let Ok(Some(_)) = self.child.try_wait() { return; }
            thread::sleep(Duration::from_millis(10));
        }
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl Drop for UciProcess {
    fn drop(&mut self) { self.quit(); }
}

/// Extract the move from a `bestmove <move> [ponder <move>]` line.
pub fn parse_bestmove(line: &str) -> Result<String, UciError> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("bestmove") { return Err(UciError::Protocol(line.to_string())); }
    match tokens.next() {
        None => Err(UciError::Protocol(line.to_string())),
        Some("(none)") | Some("0000") => Err(UciError::NoMove),
        Some(mv) if cozy_chess::Move::from_str(mv).is_ok() => Ok(mv.to_string()),
        Some(_) => Err(UciError::Protocol(line.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bestmove_lines() {
        assert_eq!(parse_bestmove("bestmove e2e4 ponder e7e5").unwrap(), "e2e4");
        assert_eq!(parse_bestmove("bestmove a7a8q").unwrap(), "a7a8q");
        assert!(matches!(parse_bestmove("bestmove (none)"), Err(UciError::NoMove)));
        assert!(matches!(parse_bestmove("bestmove"), Err(UciError::Protocol(_))));
        assert!(matches!(parse_bestmove("bestmove zz99"), Err(UciError::Protocol(_))));
        assert!(matches!(parse_bestmove("info depth 3"), Err(UciError::Protocol(_))));
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let r = UciProcess::start(Path::new("/nonexistent/uci-engine"), &[] as &[&str], Duration::from_millis(100));
        assert!(matches!(r, Err(UciError::Spawn { .. })));
    }
}
