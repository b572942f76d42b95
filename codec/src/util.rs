//! Shared length-prefix helpers.
//!
//! Lengths and element counts are varint-encoded and restricted to values
//! that fit in a `u32`, keeping the wire format identical across 32-bit and
//! 64-bit architectures.

use crate::{cursor::Cursor, error::Error, varint};
use bytes::BufMut;

/// Writes a length prefix.
///
/// Panics if `len` exceeds `u32::MAX`; a value that large cannot exist on the
/// wire and indicates a programmer error on the encode path.
pub(crate) fn write_len(len: usize, buf: &mut impl BufMut) {
    let len = u32::try_from(len).expect("length exceeds u32");
    varint::write(len, buf);
}

/// Reads a length prefix, rejecting any length larger than the input left in
/// `cursor`.
///
/// Every codec in this crate encodes at least one byte per value, so a prefix
/// that claims more units than there are bytes remaining can never be
/// satisfied. Rejecting it up front also bounds the allocation made for the
/// payload by the size of the input itself.
pub(crate) fn read_len(cursor: &mut Cursor<'_>) -> Result<usize, Error> {
    let len: u32 = varint::read(cursor)?;
    let len = len as usize;
    if len > cursor.remaining() {
        return Err(Error::EndOfInput);
    }
    Ok(len)
}
