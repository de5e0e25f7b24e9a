//! # capstan-wire: low-level wire primitives
//!
//! This crate implements the byte-level building blocks for the capstan
//! capsule codec: RFC 9000 variable-length integers, cursor-based readers
//! and writers, and a composable wire schema for describing record layouts.
//!
//! ## Design
//!
//! - **Two-pass serialization**: every [`WireElement`] reports its exact
//!   on-wire length before anything is written, so output buffers are
//!   allocated once at exactly the right size. A writer that runs short (or
//!   long) signals a length-accounting bug, not a recoverable condition.
//!
//! - **Retryable reads**: [`DataReader`] never advances its cursor on a
//!   failed read. Streaming callers can hit a [`WireError::ShortRead`],
//!   buffer more input, and retry the same read without any repair work.
//!
//! - **Allocation as a capability**: serialization takes a
//!   [`BufferAllocator`] so callers can pool wire buffers; the codec itself
//!   has no allocation policy beyond "exact size, once".
//!
//! This crate knows nothing about capsules. Capsule types, their payload
//! schemas, and the streaming parser live in `capstan-capsule`.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod alloc;
pub mod error;
pub mod reader;
pub mod varint;
pub mod wire;
pub mod writer;

pub use alloc::{BufferAllocator, SystemAllocator};
pub use error::{Result, WireError};
pub use reader::DataReader;
pub use varint::MAX_VARINT62;
pub use wire::{
    WireBytes, WireElement, WireSpan, WireUint8, WireUint32, WireVarInt62, serialize_into_buffer,
    serialize_into_writer, wire_len_of,
};
pub use writer::DataWriter;
