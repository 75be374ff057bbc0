//! Capability seams an integrating system programs against.

use crate::error::TimelockError;
use crate::puzzle::PuzzleRsw;
use crate::solver::CancellationToken;
use crate::timelock::TimelockRsw;

pub trait Timelock {
    type Puzzle: Puzzle;

    /// Mints a puzzle for `duration` units of sequential work, plus its answer.
    fn setup_puzzle(&mut self, duration: u64) -> Result<(Self::Puzzle, Vec<u8>), TimelockError>;
}

pub trait Puzzle {
    fn solve(&self) -> Result<Vec<u8>, TimelockError>;
}

impl Timelock for TimelockRsw {
    type Puzzle = PuzzleRsw;

    fn setup_puzzle(&mut self, duration: u64) -> Result<(PuzzleRsw, Vec<u8>), TimelockError> {
        self.setup(duration)
    }
}

impl Puzzle for PuzzleRsw {
    fn solve(&self) -> Result<Vec<u8>, TimelockError> {
        self.solve_with(&CancellationToken::new())
    }
}
