//! QUIC variable-length integer encoding (RFC 9000 §16).
//!
//! The top two bits of the first byte select the total length of the
//! encoding; the remaining bits form a big-endian unsigned integer:
//!
//! | 2MSB | Length  | Usable Bits | Range                        |
//! |------|---------|-------------|------------------------------|
//! | 00   | 1 byte  | 6           | 0–63                         |
//! | 01   | 2 bytes | 14          | 0–16383                      |
//! | 10   | 4 bytes | 30          | 0–1073741823                 |
//! | 11   | 8 bytes | 62          | 0–4611686018427387903        |
//!
//! Encoding always produces the canonical (shortest) form. Decoding accepts
//! any well-formed encoding, including non-minimal ones, as RFC 9000
//! requires of readers.

use crate::error::{Result, WireError};

/// Maximum value representable as a 62-bit varint (2^62 - 1).
pub const MAX_VARINT62: u64 = (1 << 62) - 1;

/// Number of bytes the canonical encoding of `value` occupies.
///
/// Values above [`MAX_VARINT62`] report 8 here and are rejected by
/// [`encode`].
pub const fn varint_len(value: u64) -> usize {
    if value <= 63 {
        1
    } else if value <= 16_383 {
        2
    } else if value <= 1_073_741_823 {
        4
    } else {
        8
    }
}

/// Decode a variable-length integer from the front of `buf`.
///
/// Returns `(value, bytes_consumed)` on success.
///
/// # Errors
///
/// Returns [`WireError::ShortRead`] if `buf` holds fewer bytes than the
/// length class selected by the first byte.
pub fn decode(buf: &[u8]) -> Result<(u64, usize)> {
    let Some(&first) = buf.first() else {
        return Err(WireError::ShortRead { needed: 1, available: 0 });
    };

    let len = 1usize << (first >> 6);
    if buf.len() < len {
        return Err(WireError::ShortRead { needed: len, available: buf.len() });
    }

    let mut value = u64::from(first & 0x3f);
    for &byte in &buf[1..len] {
        value = (value << 8) | u64::from(byte);
    }

    Ok((value, len))
}

/// Encode `value` in canonical form into the front of `buf`.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns [`WireError::VarintOverflow`] for values above [`MAX_VARINT62`]
/// and [`WireError::WriteOverflow`] if `buf` is too short for the canonical
/// encoding.
#[allow(clippy::cast_possible_truncation)] // Shifts and masks isolate single bytes.
pub fn encode(value: u64, buf: &mut [u8]) -> Result<usize> {
    if value > MAX_VARINT62 {
        return Err(WireError::VarintOverflow(value));
    }

    let len = varint_len(value);
    if buf.len() < len {
        return Err(WireError::WriteOverflow { needed: len, available: buf.len() });
    }

    // Length prefix: 00, 01, 10, 11 for 1, 2, 4, 8 bytes.
    for (i, slot) in buf[..len].iter_mut().enumerate() {
        *slot = (value >> (8 * (len - 1 - i))) as u8;
    }
    buf[0] |= (len.trailing_zeros() as u8) << 6;

    Ok(len)
}
