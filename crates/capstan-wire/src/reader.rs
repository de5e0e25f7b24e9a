//! Cursor-based reader over an immutable byte slice.

use crate::{
    error::{Result, WireError},
    varint,
};

/// A cursor over a borrowed byte slice with primitive read operations.
///
/// Every read either fully succeeds and advances the cursor, or fails with
/// [`WireError::ShortRead`] and leaves the cursor exactly where it was. This
/// makes the reader safe to use against partially-received input: a failed
/// read can be retried once more bytes are available.
///
/// Sub-slices returned by the read methods borrow from the underlying input,
/// not from the reader, so they stay valid after further reads.
#[derive(Debug)]
pub struct DataReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DataReader<'a> {
    /// Create a reader over `data` with the cursor at the start.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes left between the cursor and the end of the input.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True once the cursor has reached the end of the input.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.pos == self.data.len()
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.pos
    }

    fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Read a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(bytes);
        Ok(u32::from_be_bytes(raw))
    }

    /// Read a variable-length integer (RFC 9000 §16).
    ///
    /// Non-minimal encodings are accepted.
    pub fn read_varint62(&mut self) -> Result<u64> {
        let (value, consumed) = varint::decode(self.rest())?;
        self.pos += consumed;
        Ok(value)
    }

    /// Read exactly `n` bytes, returned as a sub-slice of the input.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(WireError::ShortRead { needed: n, available: self.remaining() });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Read a varint length `L` followed by `L` bytes.
    ///
    /// The cursor is restored to its position before the length if the
    /// payload is incomplete, so the whole composite read is retryable.
    pub fn read_varint62_length_prefixed(&mut self) -> Result<&'a [u8]> {
        let start = self.pos;
        let length = self.read_varint62()?;
        let length = usize::try_from(length).map_err(|_| {
            self.pos = start;
            WireError::ShortRead { needed: usize::MAX, available: self.remaining() }
        })?;
        match self.read_bytes(length) {
            Ok(bytes) => Ok(bytes),
            Err(error) => {
                self.pos = start;
                Err(error)
            }
        }
    }

    /// Consume and return everything between the cursor and the end.
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let rest = self.rest();
        self.pos = self.data.len();
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_reads() {
        let mut reader = DataReader::new(&[0x07, 0xde, 0xad, 0xbe, 0xef, 0x40, 0x25, 0xaa]);
        assert_eq!(reader.read_u8(), Ok(0x07));
        assert_eq!(reader.read_u32(), Ok(0xdead_beef));
        assert_eq!(reader.read_varint62(), Ok(37));
        assert_eq!(reader.read_remaining(), &[0xaa]);
        assert!(reader.is_done());
        assert_eq!(reader.consumed(), 8);
    }

    #[test]
    fn failed_read_leaves_cursor_unchanged() {
        let mut reader = DataReader::new(&[0x01, 0x02]);
        assert_eq!(reader.read_u8(), Ok(0x01));
        let before = reader.consumed();

        assert_eq!(reader.read_u32(), Err(WireError::ShortRead { needed: 4, available: 1 }));
        assert_eq!(reader.consumed(), before);
        assert_eq!(reader.read_bytes(5), Err(WireError::ShortRead { needed: 5, available: 1 }));
        assert_eq!(reader.consumed(), before);

        // The remaining byte is still readable.
        assert_eq!(reader.read_u8(), Ok(0x02));
    }

    #[test]
    fn length_prefixed_read() {
        let mut reader = DataReader::new(&[0x03, b'a', b'b', b'c', 0x00]);
        assert_eq!(reader.read_varint62_length_prefixed(), Ok(&b"abc"[..]));
        assert_eq!(reader.read_varint62_length_prefixed(), Ok(&b""[..]));
        assert!(reader.is_done());
    }

    #[test]
    fn length_prefixed_read_restores_cursor_on_short_payload() {
        // Length 5 but only 2 payload bytes present.
        let mut reader = DataReader::new(&[0x05, b'a', b'b']);
        assert!(reader.read_varint62_length_prefixed().is_err());
        assert_eq!(reader.consumed(), 0);

        // Retry after "more data arrives" succeeds from the same position.
        let mut reader = DataReader::new(&[0x05, b'a', b'b', b'c', b'd', b'e']);
        assert_eq!(reader.read_varint62_length_prefixed(), Ok(&b"abcde"[..]));
    }

    #[test]
    fn read_remaining_on_empty_input() {
        let mut reader = DataReader::new(&[]);
        assert!(reader.is_done());
        assert_eq!(reader.read_remaining(), &[] as &[u8]);
    }
}
