//! Turn sequencing and drag-and-drop, independent of any window toolkit.

use cozy_chess::{Color, Move, Piece, Square};
use log::{debug, info};

use crate::board::{Outcome, Position};
use crate::source::{EngineError, MoveSource};

/// The piece being dragged and where it was picked up from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grab {
    pub piece: (Color, Piece),
    pub origin: Square,
}

/// Legal move for dragging the piece on `from` onto `to`.
///
/// A king dragged two files (or onto its own rook) castles. When the drag
/// matches several promotions the queen is picked.
pub fn resolve_drop(pos: &Position, from: Square, to: Square) -> Option<Move> {
    let matches: Vec<Move> = pos
        .legal_moves()
        .into_iter()
        .filter(|&m| m.from == from && (m.to == to || pos.king_destination(m) == to))
        .collect();
    matches
        .iter()
        .copied()
        .find(|m| m.promotion == Some(Piece::Queen))
        .or_else(|| matches.first().copied())
}

pub struct Game {
    position: Position,
    human: Color,
    source: Box<dyn MoveSource>,
    grab: Option<Grab>,
    last_move: Option<String>,
}

impl Game {
    pub fn new(position: Position, human: Color, source: Box<dyn MoveSource>) -> Self {
        Self { position, human, source, grab: None, last_move: None }
    }

    pub fn position(&self) -> &Position { &self.position }

    pub fn human(&self) -> Color { self.human }

    pub fn grab(&self) -> Option<Grab> { self.grab }

    pub fn last_move(&self) -> Option<&str> { self.last_move.as_deref() }

    pub fn opponent_name(&self) -> &str { self.source.name() }

    pub fn outcome(&self) -> Option<Outcome> { self.position.outcome() }

    pub fn is_human_turn(&self) -> bool { self.position.side_to_move() == self.human }

    /// Asks the move source for a move when it is its turn and applies it.
    /// Returns the move played, if any.
    pub fn play_machine_turn(&mut self) -> Result<Option<Move>, EngineError> {
        if self.is_human_turn() || self.position.is_game_over() { return Ok(None); }
        let mv = self.source.choose(&self.position)?;
        let uci = self.position.to_uci(mv);
        self.position.play(mv).map_err(|_| EngineError::IllegalMove(uci.clone()))?;
        info!("{} plays {}", self.source.name(), uci);
        self.last_move = Some(uci);
        Ok(Some(mv))
    }

    /// Pointer pressed over `square`. Starts a drag if nothing is held and
    /// the square is occupied.
    pub fn press(&mut self, square: Option<Square>) {
        if self.grab.is_some() || !self.is_human_turn() || self.position.is_game_over() { return; }
        let Some(origin) = square else { return };
        if let Some(piece) = self.position.piece_at(origin) {
            self.grab = Some(Grab { piece, origin });
        }
    }

    /// Pointer released with the drop target already resolved (`None` for a
    /// release off the board or in a square's dead zone). The grab is always
    /// cleared; the move is played only if it is legal.
    pub fn release(&mut self, target: Option<Square>) -> Option<Move> {
        let grab = self.grab.take()?;
        let Some(to) = target else {
            debug!("drop of {} discarded", grab.origin);
            return None;
        };
        let Some(mv) = resolve_drop(&self.position, grab.origin, to) else {
            debug!("no legal move {}{}", grab.origin, to);
            return None;
        };
        let uci = self.position.to_uci(mv);
        self.position.play(mv).ok()?;
        info!("human plays {}", uci);
        self.last_move = Some(uci);
        Some(mv)
    }

    /// Drops any grab without moving.
    pub fn cancel_grab(&mut self) { self.grab = None; }
}
