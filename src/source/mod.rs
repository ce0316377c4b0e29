//! Where the non-human side's moves come from.

use cozy_chess::Move;
use std::path::PathBuf;

use crate::board::Position;

pub mod engine;
pub mod random;

pub use engine::UciSource;
pub use random::RandomSource;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to launch engine {path}: {source}")]
    Spawn { path: PathBuf, source: std::io::Error },
    #[error("engine i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine never answered '{expected}'")]
    Handshake { expected: &'static str },
    #[error("unexpected engine output: {0}")]
    Protocol(String),
    #[error("no move available")]
    NoMove,
    #[error("engine played an illegal move: {0}")]
    IllegalMove(String),
    #[error("engine process closed its output")]
    Closed,
}

/// Produces one move per call for the side to move in `pos`.
pub trait MoveSource {
    fn name(&self) -> &str;

    fn choose(&mut self, pos: &Position) -> Result<Move, EngineError>;

    fn new_game(&mut self) -> Result<(), EngineError> { Ok(()) }

    fn quit(&mut self) {}
}
