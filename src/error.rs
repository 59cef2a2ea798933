use thiserror::Error;

/// Errors shared by every codec in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Unexpected end of bit-stream")]
    UnexpectedEof,

    #[error("Inconsistent or malformed header")]
    InvalidHeader,

    #[error("Back-reference offset out of bounds")]
    InvalidOffset,

    #[error("Declared length exceeds available input")]
    InputTooShort,

    #[error("Frequency table total exceeds 2^29 - 1")]
    CountsOverflow,

    #[error("Huffman code length table is inconsistent")]
    InvalidCodeLength,

    #[error("Caller-supplied output capacity is too small")]
    CapacityExceeded,

    #[error("LZCL sub-codec tag is not one of {{Fixed, Arithmetic, Huffman, Golomb}}")]
    InvalidSubCodecTag,
}

pub type Result<T> = core::result::Result<T, CodecError>;
