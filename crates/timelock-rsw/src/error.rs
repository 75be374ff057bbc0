use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimelockError {
    #[error("Modulus not initialized: primes p and q are not available")]
    ModulusNotInitialized,

    #[error("Exponent not set: a duration must be fixed before derivation")]
    ExponentNotSet,

    #[error("Base not set: a must be a positive integer")]
    BaseNotSet,

    #[error("Prime generation failed: {0}")]
    PrimeGenerationFailure(String),

    #[error("Degenerate primes: p and q are equal")]
    DegeneratePrimes,

    #[error("Solve cancelled")]
    Cancelled,

    #[error("Invalid modulus size {bits} bits: must be even and at least {min}")]
    InvalidModulusBits { bits: u32, min: u32 },

    #[error("Supplied factor is not a probable prime")]
    NotPrime,

    #[error("Key too large: key integer must be smaller than the modulus")]
    KeyTooLarge,

    #[error("Non-canonical key: leading zero bytes cannot be recovered")]
    NonCanonicalKey,

    #[error("Base shares a factor with the modulus")]
    BaseNotCoprime,

    #[error("Malformed puzzle: {0}")]
    MalformedPuzzle(String),

    #[error("Types error: {0}")]
    Types(#[from] timelock_types::TypesError),
}
