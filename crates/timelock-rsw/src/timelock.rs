use std::fmt;

use rand::{CryptoRng, RngCore};
use rug::Integer;

use crate::config::{DEFAULT_BASE, DEFAULT_MODULUS_BITS, TimelockConfig};
use crate::error::TimelockError;
use crate::mask::{MaskMode, integer_to_key, key_to_integer};
use crate::modulus::{ModulusGenerator, SecretPrimes};
use crate::puzzle::PuzzleRsw;
use crate::trapdoor::TrapdoorDerivation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// Primes were never generated or have been forgotten.
    Uninitialized,
    /// Primes exist but the base is unusable.
    PrimesGenerated,
    Ready,
    /// At least one puzzle has been minted; more may follow.
    PuzzleIssued,
}

/// Owner side of an RSW time-lock: holds the trapdoor and mints puzzles.
pub struct TimelockRsw {
    primes: Option<SecretPrimes>,
    base: Integer,
    key: Vec<u8>,
    duration: Option<u64>,
    mode: MaskMode,
    issued: u64,
}

impl TimelockRsw {
    /// Generates a fresh `modulus_bits` modulus and stores `key` and `base`.
    pub fn new(
        key: &[u8],
        base: impl Into<Integer>,
        modulus_bits: u32,
    ) -> Result<Self, TimelockError> {
        let config = TimelockConfig {
            modulus_bits,
            ..TimelockConfig::get_default()
        };
        Self::with_config(key, base, &config)
    }

    pub fn new_2048(key: &[u8], base: impl Into<Integer>) -> Result<Self, TimelockError> {
        Self::new(key, base, DEFAULT_MODULUS_BITS)
    }

    /// 2048-bit modulus with base 2.
    pub fn new_2048_a2(key: &[u8]) -> Result<Self, TimelockError> {
        Self::new(key, DEFAULT_BASE, DEFAULT_MODULUS_BITS)
    }

    pub fn with_config(
        key: &[u8],
        base: impl Into<Integer>,
        config: &TimelockConfig,
    ) -> Result<Self, TimelockError> {
        let primes = ModulusGenerator::new(config).generate(config.modulus_bits)?;
        Ok(Self::from_primes(primes, key, base, config.mask_mode))
    }

    pub fn with_config_and_rng<R: RngCore + CryptoRng>(
        key: &[u8],
        base: impl Into<Integer>,
        config: &TimelockConfig,
        rng: &mut R,
    ) -> Result<Self, TimelockError> {
        let primes = ModulusGenerator::new(config).generate_with(config.modulus_bits, rng)?;
        Ok(Self::from_primes(primes, key, base, config.mask_mode))
    }

    pub fn from_primes(
        primes: SecretPrimes,
        key: &[u8],
        base: impl Into<Integer>,
        mode: MaskMode,
    ) -> Self {
        TimelockRsw {
            primes: Some(primes),
            base: base.into(),
            key: key.to_vec(),
            duration: None,
            mode,
            issued: 0,
        }
    }

    pub fn state(&self) -> GeneratorState {
        if self.primes.is_none() {
            GeneratorState::Uninitialized
        } else if self.base <= 0 {
            GeneratorState::PrimesGenerated
        } else if self.issued == 0 {
            GeneratorState::Ready
        } else {
            GeneratorState::PuzzleIssued
        }
    }

    pub(crate) fn primes(&self) -> Option<&SecretPrimes> {
        self.primes.as_ref()
    }

    pub fn base(&self) -> &Integer {
        &self.base
    }

    pub fn duration(&self) -> Option<u64> {
        self.duration
    }

    pub fn mode(&self) -> MaskMode {
        self.mode
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Fixes `t` for the next derivation.
    pub fn set_duration(&mut self, duration: u64) {
        self.duration = Some(duration);
    }

    pub fn trapdoor(&self) -> TrapdoorDerivation<'_> {
        TrapdoorDerivation::new(self)
    }

    /// Public modulus; fails once the primes are gone.
    pub fn modulus(&self) -> Result<Integer, TimelockError> {
        self.trapdoor().modulus()
    }

    /// Mints a puzzle locked for `duration` squarings.
    ///
    /// Returns the puzzle and the answer a solver will recover. The puzzle holds
    /// value copies of the public fields only. Callers normally discard the answer.
    /// On failure the previously fixed duration is left in place.
    pub fn setup(&mut self, duration: u64) -> Result<(PuzzleRsw, Vec<u8>), TimelockError> {
        let previous = self.duration.replace(duration);

        let derived = {
            let trapdoor = self.trapdoor();
            trapdoor.modulus().and_then(|modulus| {
                let key = key_to_integer(&self.key, &modulus)?;
                let locked = trapdoor.locked_value()?;
                let masked = self.mode.apply(&locked, &key, &modulus)?;
                Ok((modulus, key, masked))
            })
        };
        let (modulus, key, masked) = match derived {
            Ok(derived) => derived,
            Err(err) => {
                self.duration = previous;
                return Err(err);
            }
        };

        self.issued += 1;
        tracing::info!(
            duration,
            modulus_bits = modulus.significant_bits(),
            mode = ?self.mode,
            issued = self.issued,
            "Time-lock puzzle issued"
        );

        let puzzle = PuzzleRsw::new(modulus, self.base.clone(), duration, masked, self.mode);
        Ok((puzzle, integer_to_key(&key)))
    }

    /// Drops the trapdoor. Puzzles already issued remain solvable by squaring.
    pub fn forget_primes(&mut self) {
        if self.primes.take().is_some() {
            tracing::debug!(issued = self.issued, "Trapdoor primes discarded");
        }
    }
}

impl fmt::Debug for TimelockRsw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelockRsw")
            .field("primes", &self.primes)
            .field("base", &self.base)
            .field("duration", &self.duration)
            .field("mode", &self.mode)
            .field("issued", &self.issued)
            .finish_non_exhaustive()
    }
}
