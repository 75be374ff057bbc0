//! Rivest-Shamir-Wagner time-lock puzzles.
//!
//! The owner of a [`TimelockRsw`] knows the factorization of the modulus and
//! derives `a^(2^t) mod n` instantly; holders of the resulting [`PuzzleRsw`]
//! must perform `t` sequential squarings to unlock the key.

pub mod capability;
pub mod config;
pub mod error;
pub mod mask;
pub mod modulus;
pub mod puzzle;
pub mod solver;
pub mod timelock;
pub mod trapdoor;

pub use capability::{Puzzle, Timelock};
pub use config::TimelockConfig;
pub use error::TimelockError;
pub use mask::MaskMode;
pub use modulus::{ModulusGenerator, SecretPrimes};
pub use puzzle::PuzzleRsw;
pub use solver::{CancellationToken, SequentialSolver, SquaringOutcome};
pub use timelock::{GeneratorState, TimelockRsw};
pub use trapdoor::TrapdoorDerivation;
