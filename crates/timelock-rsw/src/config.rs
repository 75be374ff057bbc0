use crate::mask::MaskMode;

pub const DEFAULT_MODULUS_BITS: u32 = 2048;
pub const DEFAULT_BASE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelockConfig {
    pub modulus_bits: u32,
    pub min_modulus_bits: u32,
    pub primality_reps: u32,
    pub max_prime_attempts: u32,
    pub degenerate_retries: u32,
    pub cancel_check_interval: u64,
    pub mask_mode: MaskMode,
}

impl TimelockConfig {
    pub fn new(
        modulus_bits: u32,
        min_modulus_bits: u32,
        primality_reps: u32,
        max_prime_attempts: u32,
        degenerate_retries: u32,
        cancel_check_interval: u64,
        mask_mode: MaskMode,
    ) -> Self {
        Self {
            modulus_bits,
            min_modulus_bits,
            primality_reps,
            max_prime_attempts,
            degenerate_retries,
            cancel_check_interval,
            mask_mode,
        }
    }

    pub fn get_default() -> Self {
        Self {
            modulus_bits: DEFAULT_MODULUS_BITS,
            min_modulus_bits: 1024,
            primality_reps: 30,
            max_prime_attempts: 64,
            degenerate_retries: 3,
            cancel_check_interval: 1024,
            mask_mode: MaskMode::Xor,
        }
    }
}

impl Default for TimelockConfig {
    fn default() -> Self {
        Self::get_default()
    }
}
