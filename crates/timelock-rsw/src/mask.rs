//! Reversible combination of the locked value `b` with the secret key `k`.
//!
//! XOR is the canonical mode. ADD keeps `ck = b + k` without reduction, so `ck`
//! may exceed the modulus; it is kept as a secondary policy only.

use rug::Integer;
use rug::integer::Order;
use timelock_types::{MASK_ADD, MASK_XOR, TypesError};

use crate::error::TimelockError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaskMode {
    #[default]
    Xor,
    Add,
}

impl MaskMode {
    pub fn tag(self) -> u8 {
        match self {
            MaskMode::Xor => MASK_XOR,
            MaskMode::Add => MASK_ADD,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, TimelockError> {
        match tag {
            MASK_XOR => Ok(MaskMode::Xor),
            MASK_ADD => Ok(MaskMode::Add),
            other => Err(TypesError::UnknownMaskMode(other).into()),
        }
    }

    /// ck from b and k.
    pub fn apply(
        self,
        locked: &Integer,
        key: &Integer,
        modulus: &Integer,
    ) -> Result<Integer, TimelockError> {
        match self {
            MaskMode::Xor => {
                let width = modulus_width(modulus);
                let b = encode_fixed(locked, width).ok_or_else(|| {
                    TimelockError::MalformedPuzzle("locked value wider than modulus".into())
                })?;
                let k = encode_fixed(key, width).ok_or(TimelockError::KeyTooLarge)?;
                Ok(xor_bytes(&b, &k))
            }
            MaskMode::Add => Ok(Integer::from(locked + key)),
        }
    }

    /// k from b and ck.
    pub fn invert(
        self,
        locked: &Integer,
        masked: &Integer,
        modulus: &Integer,
    ) -> Result<Integer, TimelockError> {
        match self {
            MaskMode::Xor => {
                let width = modulus_width(modulus);
                let b = encode_fixed(locked, width).ok_or_else(|| {
                    TimelockError::MalformedPuzzle("locked value wider than modulus".into())
                })?;
                let ck = encode_fixed(masked, width).ok_or_else(|| {
                    TimelockError::MalformedPuzzle("masked value wider than modulus".into())
                })?;
                Ok(xor_bytes(&ck, &b))
            }
            MaskMode::Add => {
                let key = Integer::from(masked - locked);
                if key < 0 {
                    return Err(TimelockError::MalformedPuzzle(
                        "masked value smaller than locked value".into(),
                    ));
                }
                Ok(key)
            }
        }
    }
}

/// Byte length of the modulus; the canonical width for `b`, `k` and XOR-mode `ck`.
pub fn modulus_width(modulus: &Integer) -> usize {
    modulus.significant_bits().div_ceil(8) as usize
}

/// Big-endian encoding zero-padded to `width`, or `None` if `value` does not fit.
pub fn encode_fixed(value: &Integer, width: usize) -> Option<Vec<u8>> {
    if *value < 0 {
        return None;
    }
    let digits = value.significant_digits::<u8>();
    if digits > width {
        return None;
    }
    let mut out = vec![0u8; width];
    value.write_digits(&mut out[width - digits..], Order::MsfBe);
    Some(out)
}

/// Reads key bytes as a big-endian integer below `modulus`.
///
/// A leading zero byte would be lost on the way back out, so such keys are refused.
pub fn key_to_integer(key: &[u8], modulus: &Integer) -> Result<Integer, TimelockError> {
    if key.first() == Some(&0) {
        return Err(TimelockError::NonCanonicalKey);
    }
    let value = Integer::from_digits(key, Order::MsfBe);
    if value >= *modulus {
        return Err(TimelockError::KeyTooLarge);
    }
    Ok(value)
}

/// Minimal big-endian bytes; zero becomes the empty key.
pub fn integer_to_key(value: &Integer) -> Vec<u8> {
    value.to_digits::<u8>(Order::MsfBe)
}

fn xor_bytes(lhs: &[u8], rhs: &[u8]) -> Integer {
    let combined: Vec<u8> = lhs.iter().zip(rhs).map(|(l, r)| l ^ r).collect();
    Integer::from_digits(&combined, Order::MsfBe)
}
