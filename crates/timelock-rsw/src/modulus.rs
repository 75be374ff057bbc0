use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use rug::Integer;
use rug::integer::{IsPrime, Order};

use crate::config::TimelockConfig;
use crate::error::TimelockError;

// Rounds used when validating caller-supplied factors.
const SUPPLIED_PRIME_REPS: u32 = 30;
// Below this the top-bit forcing in `random_prime` leaves no room to search.
const ABSOLUTE_MIN_MODULUS_BITS: u32 = 16;

/// The trapdoor: two distinct primes whose product is the public modulus.
///
/// Never serialized. `Debug` only reveals the modulus size.
pub struct SecretPrimes {
    p: Integer,
    q: Integer,
}

impl SecretPrimes {
    /// Wraps externally chosen factors after checking they are distinct probable primes.
    pub fn from_primes(p: Integer, q: Integer) -> Result<Self, TimelockError> {
        if p == q {
            return Err(TimelockError::DegeneratePrimes);
        }
        for factor in [&p, &q] {
            if *factor < 2 || factor.is_probably_prime(SUPPLIED_PRIME_REPS) == IsPrime::No {
                return Err(TimelockError::NotPrime);
            }
        }
        Ok(SecretPrimes { p, q })
    }

    pub(crate) fn p(&self) -> &Integer {
        &self.p
    }

    pub(crate) fn q(&self) -> &Integer {
        &self.q
    }

    /// n = p·q
    pub fn modulus(&self) -> Integer {
        Integer::from(&self.p * &self.q)
    }
}

impl fmt::Debug for SecretPrimes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretPrimes")
            .field("modulus_bits", &self.modulus().significant_bits())
            .finish_non_exhaustive()
    }
}

pub struct ModulusGenerator<'a> {
    config: &'a TimelockConfig,
}

impl<'a> ModulusGenerator<'a> {
    pub fn new(config: &'a TimelockConfig) -> Self {
        ModulusGenerator { config }
    }

    /// Generates `p` and `q` of `modulus_bits / 2` bits each from the OS CSPRNG.
    pub fn generate(&self, modulus_bits: u32) -> Result<SecretPrimes, TimelockError> {
        self.generate_with(modulus_bits, &mut OsRng)
    }

    /// Same as [`generate`](Self::generate) with a caller-provided CSPRNG.
    pub fn generate_with<R: RngCore + CryptoRng>(
        &self,
        modulus_bits: u32,
        rng: &mut R,
    ) -> Result<SecretPrimes, TimelockError> {
        self.check_modulus_bits(modulus_bits)?;
        tracing::debug!(modulus_bits, "Generating RSW modulus");

        let prime_bits = modulus_bits / 2;
        let p = self.random_prime(prime_bits, rng)?;

        let mut retries = 0u32;
        loop {
            let q = self.random_prime(prime_bits, rng)?;
            if q != p {
                let primes = SecretPrimes { p, q };
                tracing::debug!(
                    modulus_bits = primes.modulus().significant_bits(),
                    retries,
                    "RSW modulus generated"
                );
                return Ok(primes);
            }

            retries += 1;
            tracing::warn!(retries, "Generated identical primes, regenerating q");
            if retries > self.config.degenerate_retries {
                return Err(TimelockError::DegeneratePrimes);
            }
        }
    }

    fn check_modulus_bits(&self, modulus_bits: u32) -> Result<(), TimelockError> {
        let min = self.config.min_modulus_bits.max(ABSOLUTE_MIN_MODULUS_BITS);
        if modulus_bits % 2 != 0 || modulus_bits < min {
            return Err(TimelockError::InvalidModulusBits {
                bits: modulus_bits,
                min,
            });
        }
        Ok(())
    }

    /// Draws a random odd start with the two top bits set, then walks to the next
    /// prime. Setting both top bits keeps the product of two such primes at exactly
    /// twice the bit length.
    fn random_prime<R: RngCore + CryptoRng>(
        &self,
        bits: u32,
        rng: &mut R,
    ) -> Result<Integer, TimelockError> {
        let mut buf = vec![0u8; bits.div_ceil(8) as usize];

        for attempt in 0..self.config.max_prime_attempts {
            rng.try_fill_bytes(&mut buf).map_err(|e| {
                TimelockError::PrimeGenerationFailure(format!("randomness source failed: {}", e))
            })?;

            let mut candidate = Integer::from_digits(&buf, Order::MsfBe);
            candidate.keep_bits_mut(bits);
            candidate.set_bit(bits - 1, true);
            candidate.set_bit(bits - 2, true);
            candidate.set_bit(0, true);
            candidate.next_prime_mut();

            // Walked past the top of the range
            if candidate.significant_bits() != bits {
                tracing::trace!(attempt, bits, "Prime candidate overflowed bit length");
                continue;
            }
            if candidate.is_probably_prime(self.config.primality_reps) == IsPrime::No {
                continue;
            }
            return Ok(candidate);
        }

        Err(TimelockError::PrimeGenerationFailure(format!(
            "no {}-bit prime found within {} attempts",
            bits, self.config.max_prime_attempts
        )))
    }
}
