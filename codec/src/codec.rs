//! The codec value type and its encode/decode entry points.

use crate::{cursor::Cursor, error::Error};
use bytes::{Bytes, BytesMut};
use std::sync::Arc;

/// Shared encode half of a codec: appends the encoding of a value to a buffer.
pub(crate) type EncodeFn<T> = Arc<dyn Fn(&T, &mut BytesMut) + Send + Sync>;

/// Shared decode half of a codec: reads one value from a cursor.
pub(crate) type DecodeFn<T> =
    Arc<dyn for<'a> Fn(&mut Cursor<'a>) -> Result<T, Error> + Send + Sync>;

/// Wraps a decode closure as a shared [`DecodeFn`], keeping the cursor
/// lifetime higher-ranked through the generic bound.
pub(crate) fn decode_fn<T, F>(f: F) -> DecodeFn<T>
where
    T: 'static,
    F: for<'a> Fn(&mut Cursor<'a>) -> Result<T, Error> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A bidirectional codec for values of type `T`.
///
/// A codec pairs two total operations: an encoder that appends bytes to an
/// output buffer and a decoder that reads them back through a checked
/// [`Cursor`]. Codecs are built once, typically at process startup, from the
/// constructors in [`primitives`](crate::primitives), the combinators in
/// [`combinators`](crate::combinators), and the [`recursive`](fn@crate::recursive)
/// and [`tagged_union`](crate::union::tagged_union) constructors. They are
/// immutable afterwards: cloning is cheap
/// (shared internals) and a codec may be used from any number of threads
/// concurrently.
pub struct Codec<T> {
    encode: EncodeFn<T>,
    decode: DecodeFn<T>,
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        Self {
            encode: Arc::clone(&self.encode),
            decode: Arc::clone(&self.decode),
        }
    }
}

impl<T> Codec<T> {
    /// Builds a codec from an encode and a decode closure.
    ///
    /// This is the escape hatch for custom primitives; most codecs should be
    /// assembled from the built-in constructors instead. The two closures
    /// must be mutual inverses for round-trips to hold, and the encoder
    /// should append at least one byte per value so that length-prefixed
    /// containers can bound their allocations.
    pub fn new<E, D>(encode: E, decode: D) -> Self
    where
        E: Fn(&T, &mut BytesMut) + Send + Sync + 'static,
        D: for<'a> Fn(&mut Cursor<'a>) -> Result<T, Error> + Send + Sync + 'static,
    {
        Self {
            encode: Arc::new(encode),
            decode: Arc::new(decode),
        }
    }

    /// Appends the encoding of `value` to `buf`.
    pub fn write(&self, value: &T, buf: &mut BytesMut) {
        (self.encode)(value, buf)
    }

    /// Reads one value from `cursor`, leaving it positioned after the
    /// consumed bytes.
    pub fn read(&self, cursor: &mut Cursor<'_>) -> Result<T, Error> {
        (self.decode)(cursor)
    }

    /// Encodes `value` into a fresh buffer.
    pub fn encode(&self, value: &T) -> Bytes {
        let mut buf = BytesMut::new();
        self.write(value, &mut buf);
        buf.freeze()
    }

    /// Decodes a value from `input`, requiring the input to be fully
    /// consumed.
    ///
    /// Trailing bytes fail with [`Error::ExtraData`]; use [`Codec::read`] to
    /// decode a value from the front of a larger input.
    pub fn decode(&self, input: &[u8]) -> Result<T, Error> {
        let mut cursor = Cursor::new(input);
        let value = self.read(&mut cursor)?;
        let remaining = cursor.remaining();
        if remaining > 0 {
            return Err(Error::ExtraData(remaining));
        }
        Ok(value)
    }
}
