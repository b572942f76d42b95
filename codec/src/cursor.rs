//! Bounded input cursor for decode operations.

use crate::error::Error;
use bytes::Buf;

/// A view over an immutable byte sequence plus a read position.
///
/// Every read is checked against the remaining length and advances the
/// position; no operation panics on malformed input. A cursor exists only for
/// the duration of one decode call.
#[derive(Debug)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor positioned at the start of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Returns the number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// Returns the next `n` bytes and advances past them.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.remaining() < n {
            return Err(Error::EndOfInput);
        }
        let bytes = &self.input[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads exactly `N` bytes into a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let bytes = self.read(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.read(1)?[0])
    }
}

// Lets `impl Buf` readers (e.g. the varint module) consume from a cursor.
impl Buf for Cursor<'_> {
    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    fn chunk(&self) -> &[u8] {
        &self.input[self.pos..]
    }

    fn advance(&mut self, cnt: usize) {
        assert!(
            cnt <= self.input.len() - self.pos,
            "advance past end of input"
        );
        self.pos += cnt;
    }
}
