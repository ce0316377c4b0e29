// Drag-and-drop chessboard against a random mover or a UCI engine
pub mod board;
pub mod config;
pub mod game;
pub mod gui;
pub mod layout;
pub mod source;
pub mod uci;

pub use board::Position;
pub use game::{resolve_drop, Game, Grab};
