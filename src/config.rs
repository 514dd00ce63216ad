//! Session configuration: serde-loadable, every field defaulted.
use cozy_chess::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn color(self) -> Color {
        match self { Side::White => Color::White, Side::Black => Color::Black }
    }

    pub fn opposite(self) -> Side {
        match self { Side::White => Side::Black, Side::Black => Side::White }
    }
}

impl From<Color> for Side {
    fn from(c: Color) -> Self { if c == Color::White { Side::White } else { Side::Black } }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Side::White => "white", Side::Black => "black" })
    }
}

impl FromStr for Side {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "w" | "white" => Ok(Side::White),
            "b" | "black" => Ok(Side::Black),
            _ => Err(format!("Invalid color '{s}': use 'w' or 'b'")),
        }
    }
}

/// Which move selector backs a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Backend {
    #[default]
    InProcess,
    External {
        path: PathBuf,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
}

fn default_timeout_ms() -> u64 { 30_000 }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub difficulty: u32,
    pub opening: String,
    pub engine_color: Side,
    pub quiescence: bool,
    pub seed: Option<u64>,
    pub backend: Backend,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty: 1,
            opening: "random".to_string(),
            engine_color: Side::Black,
            quiescence: true,
            seed: None,
            backend: Backend::InProcess,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::from_json_str(&text)
    }
}
