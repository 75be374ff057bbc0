use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

use crate::TypesError;

/// Wire tag for `ck = b XOR k`.
pub const MASK_XOR: u8 = 0;
/// Wire tag for `ck = b + k`.
pub const MASK_ADD: u8 = 1;

const RECORD_FIELDS: usize = 5;

/// Public fields of an RSW puzzle as they travel between owner and solver.
///
/// Big integers are carried as big-endian byte strings. Leading zero bytes are
/// tolerated on decode, so `modulus`, `base` and `masked` compare equal to
/// their integer values rather than to a particular byte length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleRecord {
    pub modulus: Vec<u8>,
    pub base: Vec<u8>,
    pub duration: u64,
    pub masked: Vec<u8>,
    pub mode: u8,
}

impl PuzzleRecord {
    pub fn to_rlp_bytes(&self) -> Vec<u8> {
        rlp::encode(self).to_vec()
    }

    pub fn from_rlp_bytes(bytes: &[u8]) -> Result<Self, TypesError> {
        let rlp = Rlp::new(bytes);
        let consumed = rlp.payload_info()?.total();
        if consumed > bytes.len() {
            return Err(DecoderError::RlpIsTooShort.into());
        }
        if consumed < bytes.len() {
            return Err(TypesError::TrailingBytes(bytes.len() - consumed));
        }

        let record = Self::decode(&rlp)?;
        if record.mode != MASK_XOR && record.mode != MASK_ADD {
            return Err(TypesError::UnknownMaskMode(record.mode));
        }
        Ok(record)
    }
}

impl Encodable for PuzzleRecord {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(RECORD_FIELDS);
        s.append(&self.modulus);
        s.append(&self.base);
        s.append(&self.duration);
        s.append(&self.masked);
        s.append(&self.mode);
    }
}

impl Decodable for PuzzleRecord {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if !rlp.is_list() {
            return Err(DecoderError::RlpExpectedToBeList);
        }
        if rlp.item_count()? != RECORD_FIELDS {
            return Err(DecoderError::RlpIncorrectListLen);
        }

        let mut iter = rlp.iter();
        Ok(PuzzleRecord {
            modulus: iter.next().ok_or(DecoderError::RlpIsTooShort)?.as_val()?,
            base: iter.next().ok_or(DecoderError::RlpIsTooShort)?.as_val()?,
            duration: iter.next().ok_or(DecoderError::RlpIsTooShort)?.as_val()?,
            masked: iter.next().ok_or(DecoderError::RlpIsTooShort)?.as_val()?,
            mode: iter.next().ok_or(DecoderError::RlpIsTooShort)?.as_val()?,
        })
    }
}
