//! Variable-length integer encoding and decoding
//!
//! Unsigned integers are encoded LEB128-style: each byte carries 7 bits of
//! data in ascending order of significance, and the high bit marks that more
//! bytes follow. Signed integers are first mapped to unsigned ones with
//! ZigZag encoding so that values close to zero stay short in either sign.
//!
//! Length prefixes and union tags throughout the crate use this encoding.

use crate::error::Error;
use bytes::{Buf, BufMut};
use std::ops::{BitOrAssign, Shl, ShrAssign};

const DATA_BITS_PER_BYTE: usize = 7;
const DATA_BITS_MASK: u8 = 0x7F;
const CONTINUATION_BIT_MASK: u8 = 0x80;

/// A trait for unsigned integers that can be varint encoded.
pub trait UInt:
    Copy
    + From<u8>
    + Sized
    + ShrAssign<usize>
    + Shl<usize, Output = Self>
    + BitOrAssign<Self>
    + PartialOrd
{
    /// Returns the number of leading zeros in the integer.
    fn leading_zeros(self) -> u32;

    /// Returns the least significant byte of the integer.
    fn as_u8(self) -> u8;
}

macro_rules! impl_uint {
    ($type:ty) => {
        impl UInt for $type {
            #[inline]
            fn leading_zeros(self) -> u32 {
                self.leading_zeros()
            }

            #[inline]
            fn as_u8(self) -> u8 {
                self as u8
            }
        }
    };
}
impl_uint!(u32);
impl_uint!(u64);

/// Encodes an unsigned integer as a varint.
pub fn write<T: UInt>(value: T, buf: &mut impl BufMut) {
    let continuation_threshold = T::from(CONTINUATION_BIT_MASK);
    if value < continuation_threshold {
        // Fast path for small values (common case for lengths and tags).
        buf.put_u8(value.as_u8());
        return;
    }

    let mut val = value;
    while val >= continuation_threshold {
        buf.put_u8(val.as_u8() | CONTINUATION_BIT_MASK);
        val >>= DATA_BITS_PER_BYTE;
    }
    buf.put_u8(val.as_u8());
}

/// Decodes an unsigned integer from a varint.
///
/// Encodings that overflow `T` (including overlong encodings whose data bits
/// reach past the width of `T`) fail with [`Error::InvalidVarint`].
pub fn read<T: UInt>(buf: &mut impl Buf) -> Result<T, Error> {
    let max_bits = std::mem::size_of::<T>() * 8;
    let mut result: T = T::from(0);
    let mut shift = 0;

    loop {
        if !buf.has_remaining() {
            return Err(Error::EndOfInput);
        }
        let byte = buf.get_u8();

        // Every byte must contribute data bits that fit within T. Once shift
        // reaches the width of T, any further byte is overlong.
        if shift >= max_bits {
            return Err(Error::InvalidVarint);
        }
        let data = byte & DATA_BITS_MASK;
        let remaining_bits = max_bits - shift;
        if remaining_bits < DATA_BITS_PER_BYTE && (data >> remaining_bits) != 0 {
            return Err(Error::InvalidVarint);
        }

        result |= T::from(data) << shift;

        if byte & CONTINUATION_BIT_MASK == 0 {
            return Ok(result);
        }
        shift += DATA_BITS_PER_BYTE;
    }
}

/// Calculates the number of bytes needed to encode an unsigned integer as a
/// varint.
pub fn size<T: UInt>(value: T) -> usize {
    let total_bits = std::mem::size_of::<T>() * 8;
    let data_bits = total_bits - value.leading_zeros() as usize;
    usize::max(1, data_bits.div_ceil(DATA_BITS_PER_BYTE))
}

/// Encodes a signed 64-bit integer as a varint using ZigZag encoding.
pub fn write_signed(value: i64, buf: &mut impl BufMut) {
    write(zigzag(value), buf);
}

/// Decodes a signed 64-bit integer from ZigZag encoding.
pub fn read_signed(buf: &mut impl Buf) -> Result<i64, Error> {
    Ok(unzigzag(read(buf)?))
}

// ZigZag moves the sign bit to the least significant position so that small
// magnitudes encode short regardless of sign.
#[inline]
fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ (-((value & 1) as i64))
}
