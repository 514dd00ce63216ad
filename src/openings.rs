//! Fixed opening lines the engine plays before its search takes over.
//! Each line lists only the engine's own half-moves, in standard UCI notation.

use crate::config::Side;
use crate::error::OpeningError;
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningLine {
    pub name: String,
    pub side: Side,
    pub moves: Vec<String>,
}

fn line(name: &str, side: Side, moves: &[&str]) -> OpeningLine {
    OpeningLine { name: name.to_string(), side, moves: moves.iter().map(|s| s.to_string()).collect() }
}

/// Get all built-in opening lines
pub fn get_opening_lines() -> Vec<OpeningLine> {
    vec![
        line("london", Side::White, &["d2d4", "g1f3", "c1f4", "e2e3", "f1d3", "e1g1"]),
        line("italian", Side::White, &["e2e4", "g1f3", "f1c4", "d2d3", "e1g1"]),
        line("english", Side::White, &["c2c4", "b1c3", "g2g3", "f1g2", "g1f3", "e1g1"]),
        line("sicilian", Side::Black, &["c7c5", "d7d6", "g8f6", "a7a6"]),
        line("french", Side::Black, &["e7e6", "d7d5", "g8f6", "f8e7", "e8g8"]),
        line("kings-indian", Side::Black, &["g8f6", "g7g6", "f8g7", "d7d6", "e8g8"]),
        line("caro-kann", Side::Black, &["c7c6", "d7d5", "c8f5", "e7e6"]),
    ]
}

/// Lines playable by `side`.
pub fn lines_for(side: Side) -> Vec<OpeningLine> {
    get_opening_lines().into_iter().filter(|l| l.side == side).collect()
}

/// How a session picks its opening line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpeningStrategy {
    Named(String),
    Random,
    NoBook,
}

impl OpeningStrategy {
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => OpeningStrategy::Random,
            "none" | "" => OpeningStrategy::NoBook,
            other => OpeningStrategy::Named(other.to_string()),
        }
    }
}

impl FromStr for OpeningStrategy {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self::from_name(s)) }
}

impl fmt::Display for OpeningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpeningStrategy::Named(n) => write!(f, "{n}"),
            OpeningStrategy::Random => write!(f, "random"),
            OpeningStrategy::NoBook => write!(f, "none"),
        }
    }
}

/// A stack of pre-committed moves. It only ever shrinks.
#[derive(Debug, Clone)]
pub struct OpeningSupplier {
    name: Option<String>,
    stack: Vec<String>,
}

impl OpeningSupplier {
    pub fn new<R: Rng + ?Sized>(strategy: &OpeningStrategy, side: Side, rng: &mut R) -> Result<Self, OpeningError> {
        let chosen = match strategy {
            OpeningStrategy::NoBook => None,
            OpeningStrategy::Random => lines_for(side).choose(rng).cloned(),
            OpeningStrategy::Named(name) => {
                let found = get_opening_lines().into_iter().find(|l| &l.name == name)
                    .ok_or_else(|| OpeningError::UnknownLine(name.clone()))?;
                if found.side != side {
                    return Err(OpeningError::WrongSide { name: name.clone(), expected: found.side.to_string(), requested: side.to_string() });
                }
                Some(found)
            }
        };
        if let Some(l) = &chosen { info!("opening line '{}' for {}", l.name, side); }
        Ok(Self::from_line(chosen))
    }

    pub fn from_line(line: Option<OpeningLine>) -> Self {
        match line {
            Some(l) => {
                let mut stack = l.moves;
                stack.reverse();
                Self { name: Some(l.name), stack }
            }
            None => Self { name: None, stack: Vec::new() },
        }
    }

    pub fn next_move(&mut self) -> Option<String> { self.stack.pop() }

    /// Throw away whatever is left; the line can no longer be followed.
    pub fn abandon(&mut self) { self.stack.clear(); }

    pub fn remaining(&self) -> usize { self.stack.len() }
    pub fn name(&self) -> Option<&str> { self.name.as_deref() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_get_openings() {
        let lines = get_opening_lines();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0].name, "london");
        assert_eq!(lines[0].moves[0], "d2d4");
        assert_eq!(lines_for(Side::Black).len(), 4);
    }

    #[test]
    fn named_line_pops_in_order() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = OpeningSupplier::new(&"sicilian".parse().unwrap(), Side::Black, &mut rng).unwrap();
        assert_eq!(s.name(), Some("sicilian"));
        let popped: Vec<String> = std::iter::from_fn(|| s.next_move()).collect();
        assert_eq!(popped, vec!["c7c5", "d7d6", "g8f6", "a7a6"]);
        assert_eq!(s.next_move(), None);
    }

    #[test]
    fn wrong_side_and_unknown_names_are_rejected() {
        let mut rng = SmallRng::seed_from_u64(1);
        let wrong = OpeningSupplier::new(&OpeningStrategy::Named("london".into()), Side::Black, &mut rng);
        assert!(matches!(wrong, Err(OpeningError::WrongSide { .. })));
        let unknown = OpeningSupplier::new(&OpeningStrategy::Named("bongcloud".into()), Side::White, &mut rng);
        assert!(matches!(unknown, Err(OpeningError::UnknownLine(_))));
    }

    #[test]
    fn no_book_is_empty() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = OpeningSupplier::new(&"none".parse().unwrap(), Side::White, &mut rng).unwrap();
        assert_eq!(s.remaining(), 0);
        assert_eq!(s.next_move(), None);
    }
}
