//! Cursor-based writer over a pre-sized mutable byte slice.

use crate::{
    error::{Result, WireError},
    varint,
};

/// A cursor over a mutable byte slice with primitive write operations.
///
/// The destination is sized up front from a precomputed wire length; the
/// writer never reallocates. A write that would overrun the buffer fails
/// with [`WireError::WriteOverflow`], which signals a length-computation bug
/// in the caller rather than a condition to recover from.
#[derive(Debug)]
pub struct DataWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> DataWriter<'a> {
    /// Create a writer over `buf` with the cursor at the start.
    #[must_use]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes left between the cursor and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Bytes written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.pos
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    /// Write a big-endian `u32`.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Write a variable-length integer in canonical form.
    pub fn write_varint62(&mut self, value: u64) -> Result<()> {
        let written = varint::encode(value, &mut self.buf[self.pos..])?;
        self.pos += written;
        Ok(())
    }

    /// Write a raw byte slice.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.remaining() < bytes.len() {
            return Err(WireError::WriteOverflow {
                needed: bytes.len(),
                available: self.remaining(),
            });
        }
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }
}
