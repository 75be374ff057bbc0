use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rug::Integer;

use crate::error::TimelockError;
use crate::mask::integer_to_key;
use crate::puzzle::PuzzleRsw;

pub const DEFAULT_CHECK_INTERVAL: u64 = 1024;

/// Result of the squaring chain: `value = a^(2^steps) mod n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquaringOutcome {
    pub value: Integer,
    pub steps: u64,
}

/// Recovers the locked value from public fields only, one modular squaring per unit of duration.
///
/// No exponent reduction happens here: without `p` and `q` the only route to
/// `a^(2^t) mod n` is `t` squarings in sequence.
pub struct SequentialSolver<'a> {
    puzzle: &'a PuzzleRsw,
    check_interval: u64,
}

impl<'a> SequentialSolver<'a> {
    pub fn new(puzzle: &'a PuzzleRsw) -> Self {
        SequentialSolver {
            puzzle,
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }

    /// Poll the cancellation token every `interval` squarings (at least every one).
    pub fn with_check_interval(mut self, interval: u64) -> Self {
        self.check_interval = interval.max(1);
        self
    }

    #[inline]
    fn square_mod(value: &mut Integer, modulus: &Integer) {
        value.square_mut();
        *value %= modulus;
    }

    pub fn square(&self, cancelled: &CancellationToken) -> Result<SquaringOutcome, TimelockError> {
        let modulus = self.puzzle.modulus(); // n
        let base = self.puzzle.base(); // a
        let duration = self.puzzle.duration(); // t

        if *modulus <= 0 {
            return Err(TimelockError::ModulusNotInitialized);
        }
        if *base <= 0 {
            return Err(TimelockError::BaseNotSet);
        }

        // s_0 = a mod n
        let mut value = Integer::from(base % modulus);
        let mut steps = 0u64;

        while steps < duration {
            if steps % self.check_interval == 0 {
                if cancelled.is_cancelled() {
                    tracing::debug!(steps, duration, "Sequential squaring cancelled");
                    return Err(TimelockError::Cancelled);
                }
                tracing::trace!(steps, duration, "Sequential squaring progress");
            }

            // s_{i+1} = s_i^2 mod n
            Self::square_mod(&mut value, modulus);
            steps += 1;
        }

        Ok(SquaringOutcome { value, steps })
    }

    /// Squares, then undoes the puzzle's masking to return the key bytes.
    pub fn solve(&self, cancelled: &CancellationToken) -> Result<Vec<u8>, TimelockError> {
        let outcome = self.square(cancelled)?;
        let key = self.puzzle.mode().invert(
            &outcome.value,
            self.puzzle.masked(),
            self.puzzle.modulus(),
        )?;

        tracing::debug!(
            steps = outcome.steps,
            mode = ?self.puzzle.mode(),
            "Puzzle solved"
        );
        Ok(integer_to_key(&key))
    }
}

/// Cooperative stop signal shared between a caller and a running solve.
///
/// Clones share the same flag. An optional deadline makes the token report
/// cancellation once it has passed.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        CancellationToken {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    /// A timeout too large to represent as an `Instant` never expires.
    pub fn with_timeout(timeout: Duration) -> Self {
        CancellationToken {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Signals cancellation to any listening operations
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Checks if cancellation has been requested or the deadline has passed
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}
