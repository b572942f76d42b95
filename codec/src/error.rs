//! Error types for codec operations

use thiserror::Error;

/// Error type for decode operations.
///
/// Encoding a well-typed value never fails at this layer, so only the decode
/// half of a codec produces errors. After a failed decode the cursor position
/// is unspecified and the cursor must be discarded.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unexpected end of input")]
    EndOfInput,
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("invalid varint")]
    InvalidVarint,
    #[error("invalid utf-8 in string payload")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("invalid value for {0}: {1:#04x}")]
    InvalidValue(&'static str, u8), // context, offending byte
    #[error("unknown tag: {0}")]
    UnknownTag(u64),
}
