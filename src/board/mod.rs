pub mod cozy;
pub mod squares;

pub use cozy::{Outcome, Position, Snapshot, Termination};

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },
    #[error("illegal move {mv} in {fen}")]
    IllegalMove { mv: String, fen: String },
    #[error("not a move: '{0}'")]
    BadMoveText(String),
}
