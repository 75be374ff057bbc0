use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypesError {
    #[error("RLP decode error: {0}")]
    RlpDecode(#[from] rlp::DecoderError),

    #[error("Unknown mask mode tag: {0}")]
    UnknownMaskMode(u8),

    #[error("Trailing bytes after puzzle record: {0}")]
    TrailingBytes(usize),
}
