use rug::Integer;

use crate::error::TimelockError;
use crate::modulus::SecretPrimes;
use crate::timelock::TimelockRsw;

/// Owner-side derivation of the locked value.
///
/// Knowing φ(n) lets the owner shrink `2^t` modulo φ(n) before exponentiating,
/// so the cost does not depend on `t`.
pub struct TrapdoorDerivation<'a> {
    timelock: &'a TimelockRsw,
}

impl<'a> TrapdoorDerivation<'a> {
    pub fn new(timelock: &'a TimelockRsw) -> Self {
        TrapdoorDerivation { timelock }
    }

    fn primes(&self) -> Result<&'a SecretPrimes, TimelockError> {
        self.timelock
            .primes()
            .ok_or(TimelockError::ModulusNotInitialized)
    }

    /// n = pq
    pub fn modulus(&self) -> Result<Integer, TimelockError> {
        Ok(self.primes()?.modulus())
    }

    /// φ(n) = (p-1)(q-1)
    pub fn totient(&self) -> Result<Integer, TimelockError> {
        let primes = self.primes()?;
        let p_minus_1 = Integer::from(primes.p() - 1u32);
        let q_minus_1 = Integer::from(primes.q() - 1u32);
        Ok(p_minus_1 * q_minus_1)
    }

    /// e = 2^t mod φ(n)
    pub fn reduced_exponent(&self) -> Result<Integer, TimelockError> {
        let duration = self
            .timelock
            .duration()
            .ok_or(TimelockError::ExponentNotSet)?;
        let totient = self.totient()?;

        let two = Integer::from(2);
        let duration = Integer::from(duration);
        two.pow_mod_ref(&duration, &totient)
            .map(Integer::from)
            .ok_or(TimelockError::ExponentNotSet)
    }

    /// b = a^e mod n = a^(2^t) mod n
    pub fn locked_value(&self) -> Result<Integer, TimelockError> {
        let base = self.timelock.base();
        if *base <= 0 {
            return Err(TimelockError::BaseNotSet);
        }
        let modulus = self.modulus()?;

        // Euler's theorem only applies to units mod n
        if Integer::from(base.gcd_ref(&modulus)) != 1 {
            return Err(TimelockError::BaseNotCoprime);
        }

        let exponent = self.reduced_exponent()?;
        base.pow_mod_ref(&exponent, &modulus)
            .map(Integer::from)
            .ok_or(TimelockError::BaseNotCoprime)
    }
}
