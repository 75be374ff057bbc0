use rug::Integer;
use rug::integer::Order;
use timelock_types::PuzzleRecord;

use crate::error::TimelockError;
use crate::mask::MaskMode;
use crate::solver::{CancellationToken, SequentialSolver};

// Rivest-Shamir-Wagner puzzle: the public half of a time-lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleRsw {
    modulus: Integer, // n - the RSA modulus (p × q)
    base: Integer,    // a - the value squared t times
    duration: u64,    // t - number of sequential squarings
    masked: Integer,  // ck - key combined with a^(2^t) mod n
    mode: MaskMode,
}

impl PuzzleRsw {
    pub fn new(
        modulus: Integer,
        base: Integer,
        duration: u64,
        masked: Integer,
        mode: MaskMode,
    ) -> Self {
        PuzzleRsw {
            modulus,
            base,
            duration,
            masked,
            mode,
        }
    }

    pub fn modulus(&self) -> &Integer {
        &self.modulus
    }

    pub fn base(&self) -> &Integer {
        &self.base
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn masked(&self) -> &Integer {
        &self.masked
    }

    pub fn mode(&self) -> MaskMode {
        self.mode
    }

    /// Solves by repeated squaring, without a way to stop early.
    pub fn solve(&self) -> Result<Vec<u8>, TimelockError> {
        self.solve_with(&CancellationToken::new())
    }

    pub fn solve_with(&self, cancelled: &CancellationToken) -> Result<Vec<u8>, TimelockError> {
        SequentialSolver::new(self).solve(cancelled)
    }

    pub fn to_record(&self) -> PuzzleRecord {
        PuzzleRecord {
            modulus: self.modulus.to_digits::<u8>(Order::MsfBe),
            base: self.base.to_digits::<u8>(Order::MsfBe),
            duration: self.duration,
            masked: self.masked.to_digits::<u8>(Order::MsfBe),
            mode: self.mode.tag(),
        }
    }

    pub fn from_record(record: &PuzzleRecord) -> Result<Self, TimelockError> {
        Ok(PuzzleRsw {
            modulus: Integer::from_digits(&record.modulus, Order::MsfBe),
            base: Integer::from_digits(&record.base, Order::MsfBe),
            duration: record.duration,
            masked: Integer::from_digits(&record.masked, Order::MsfBe),
            mode: MaskMode::from_tag(record.mode)?,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_record().to_rlp_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TimelockError> {
        let record = PuzzleRecord::from_rlp_bytes(bytes)?;
        Self::from_record(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timelock_types::{MASK_ADD, TypesError};

    fn textbook() -> PuzzleRsw {
        PuzzleRsw::new(
            Integer::from(3233),
            Integer::from(2),
            3,
            Integer::from(261),
            MaskMode::Xor,
        )
    }

    #[test]
    fn test_puzzle_accessors() {
        let puzzle = textbook();
        assert_eq!(*puzzle.modulus(), 3233);
        assert_eq!(*puzzle.base(), 2);
        assert_eq!(puzzle.duration(), 3);
        assert_eq!(*puzzle.masked(), 261);
        assert_eq!(puzzle.mode(), MaskMode::Xor);
    }

    #[test]
    fn test_solve_textbook() {
        assert_eq!(textbook().solve().unwrap(), vec![0x05]);
    }

    #[test]
    fn test_record_fields() {
        let record = textbook().to_record();
        assert_eq!(record.modulus, vec![0x0c, 0xa1]);
        assert_eq!(record.base, vec![0x02]);
        assert_eq!(record.duration, 3);
        assert_eq!(record.masked, vec![0x01, 0x05]);
        assert_eq!(record.mode, 0);
    }

    #[test]
    fn test_bytes_roundtrip_preserves_puzzle() {
        let puzzle = textbook();
        let decoded = PuzzleRsw::from_bytes(&puzzle.to_bytes()).unwrap();
        assert_eq!(decoded, puzzle);
        assert_eq!(decoded.solve().unwrap(), vec![0x05]);
    }

    #[test]
    fn test_record_tolerates_padded_integers() {
        let record = PuzzleRecord {
            modulus: vec![0x00, 0x0c, 0xa1],
            base: vec![0x00, 0x02],
            duration: 3,
            masked: vec![0x00, 0x00, 0x01, 0x05],
            mode: 0,
        };
        let puzzle = PuzzleRsw::from_record(&record).unwrap();
        assert_eq!(puzzle, textbook());
    }

    #[test]
    fn test_add_mode_tag_survives() {
        let puzzle = PuzzleRsw::new(
            Integer::from(3233),
            Integer::from(2),
            3,
            Integer::from(261),
            MaskMode::Add,
        );
        let record = puzzle.to_record();
        assert_eq!(record.mode, MASK_ADD);
        assert_eq!(PuzzleRsw::from_record(&record).unwrap().mode(), MaskMode::Add);
    }

    #[test]
    fn test_unknown_mode_in_record() {
        let mut record = textbook().to_record();
        record.mode = 42;
        let result = PuzzleRsw::from_record(&record);
        assert!(matches!(
            result,
            Err(TimelockError::Types(TypesError::UnknownMaskMode(42)))
        ));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = PuzzleRsw::from_bytes(&[0xff, 0x00, 0x01]);
        assert!(matches!(result, Err(TimelockError::Types(_))));
    }
}
