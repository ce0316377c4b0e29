use cozy_chess::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("cannot parse {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("{0}")]
    Invalid(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Opponent {
    #[default]
    Random,
    Engine,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    White,
    Black,
}

impl Side {
    pub fn color(self) -> Color {
        match self { Side::White => Color::White, Side::Black => Color::Black }
    }
}

/// Everything chosen at start. Loaded from an optional JSON file, then
/// overridden by command line flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub opponent: Opponent,
    pub engine: Option<PathBuf>,
    pub movetime_ms: u64,
    pub engine_options: BTreeMap<String, String>,
    pub human: Side,
    pub seed: Option<u64>,
    pub fen: Option<String>,
    pub assets: Option<PathBuf>,
    pub keep_open: bool,
    pub scale: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            opponent: Opponent::Random,
            engine: None,
            movetime_ms: 100,
            engine_options: BTreeMap::new(),
            human: Side::White,
            seed: None,
            fen: None,
            assets: None,
            keep_open: false,
            scale: 1.25,
        }
    }
}

/// Unscaled window size: board on top, status panel below.
pub const BASE_WINDOW: (f32, f32) = (752.0, 1000.0);

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> { serde_json::from_str(text) }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.opponent == Opponent::Engine && self.engine.is_none() {
            return Err(ConfigError::Invalid("engine opponent needs an engine path".into()));
        }
        if self.movetime_ms == 0 {
            return Err(ConfigError::Invalid("movetime must be at least 1 ms".into()));
        }
        if !(self.scale.is_finite() && self.scale > 0.1 && self.scale <= 4.0) {
            return Err(ConfigError::Invalid(format!("scale {} out of range", self.scale)));
        }
        Ok(())
    }

    pub fn movetime(&self) -> Duration { Duration::from_millis(self.movetime_ms) }

    pub fn window_size(&self) -> (f32, f32) { (BASE_WINDOW.0 * self.scale, BASE_WINDOW.1 * self.scale) }

    /// The human's pieces are drawn at the bottom.
    pub fn flipped(&self) -> bool { self.human == Side::Black }

    pub fn engine_options(&self) -> Vec<(String, String)> {
        self.engine_options.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

/// Parses `NAME=VALUE` for `--engine-option`.
pub fn parse_engine_option(s: &str) -> Result<(String, String), String> {
    let (name, value) = s.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() { return Err(format!("empty option name in '{s}'")); }
    Ok((name.to_string(), value.trim().to_string()))
}
