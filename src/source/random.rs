use cozy_chess::Move;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::{EngineError, MoveSource};
use crate::board::Position;

/// Uniform pick among the legal moves.
pub struct RandomSource {
    rng: SmallRng,
}

impl RandomSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed { Some(s) => SmallRng::seed_from_u64(s), None => SmallRng::from_entropy() };
        Self { rng }
    }

    pub fn pick(&mut self, moves: &[Move]) -> Option<Move> {
        if moves.is_empty() { None } else { Some(moves[self.rng.gen_range(0..moves.len())]) }
    }
}

impl MoveSource for RandomSource {
    fn name(&self) -> &str { "random" }

    fn choose(&mut self, pos: &Position) -> Result<Move, EngineError> {
        self.pick(&pos.legal_moves()).ok_or(EngineError::NoMove)
    }
}
