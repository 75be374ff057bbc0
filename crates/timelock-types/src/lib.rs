pub mod error;
pub mod record;

pub use error::TypesError;
pub use record::{MASK_ADD, MASK_XOR, PuzzleRecord};
