//! Error types for the wire layer.
//!
//! All errors are structured, testable, and carry the byte counts needed to
//! diagnose a failure without re-parsing the input.

use thiserror::Error;

/// Errors produced by the wire-level read and write primitives.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    /// A read needed more bytes than the input had left.
    ///
    /// This is a recoverable condition for streaming callers: the read left
    /// the cursor untouched, so the same read can be retried once more input
    /// has arrived.
    #[error("short read: needed {needed} bytes, {available} available")]
    ShortRead {
        /// Bytes required by the failed read
        needed: usize,
        /// Bytes remaining in the input
        available: usize,
    },

    /// A write overran the destination buffer.
    ///
    /// Buffers are sized from a precomputed wire length, so this indicates a
    /// length-computation bug rather than bad peer input.
    #[error("write overruns buffer: needed {needed} bytes, {available} available")]
    WriteOverflow {
        /// Bytes required by the failed write
        needed: usize,
        /// Bytes remaining in the buffer
        available: usize,
    },

    /// Serialization finished without filling the destination buffer.
    ///
    /// The counterpart of [`WireError::WriteOverflow`]: the precomputed wire
    /// length was larger than the bytes actually produced.
    #[error("serialized length mismatch: {unwritten} bytes left unwritten")]
    ShortWrite {
        /// Bytes left unwritten at the end of serialization
        unwritten: usize,
    },

    /// A value does not fit in the 62-bit variable-length integer range.
    #[error("value {0} does not fit in a 62-bit varint")]
    VarintOverflow(u64),
}

/// Convenient Result type alias for wire operations
pub type Result<T> = std::result::Result<T, WireError>;
