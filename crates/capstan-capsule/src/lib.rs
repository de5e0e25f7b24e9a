//! # capstan-capsule: HTTP capsule protocol codec
//!
//! This crate implements the capsule framing used inside HTTP upgrade
//! tunnels (CONNECT-UDP, CONNECT-IP, and WebTransport over HTTP/3). A
//! capsule stream is a self-delimiting sequence of typed records carried
//! over a reliable byte stream; each record is
//! `type (varint) || length (varint) || payload`.
//!
//! Two entry points cover the two directions:
//!
//! - [`serialize_capsule`] turns a [`Capsule`] value into its exact wire
//!   bytes, using the wire schema from `capstan-wire`.
//! - [`CapsuleParser`] consumes byte fragments of arbitrary size, delivers
//!   each completed capsule to a [`CapsuleVisitor`] in stream order, and
//!   reports the first malformation as a terminal failure.
//!
//! ## Protocol Design
//!
//! - **Open type space**: seven capsule types have defined payload
//!   structure; every other codepoint round-trips as
//!   [`Capsule::Unknown`] with its payload untouched. Unknown is not an
//!   error.
//!
//! - **Bounded buffering**: the parser refuses to hold more than
//!   [`MAX_BUFFERED_CAPSULE_BYTES`] of incomplete capsule, so a peer that
//!   declares an enormous record and never finishes it cannot exhaust
//!   memory.
//!
//! - **Sans-IO**: nothing here reads sockets, spawns tasks, or suspends.
//!   The transport feeds bytes in; the visitor takes capsules out, inline.
//!
//! ## Implementation Notes
//!
//! - **No unsafe parsing**: every field is read through checked cursor
//!   operations; malformed input is rejected with a specific message before
//!   any value is constructed.
//!
//! - **Cheap payload views**: parser-produced capsules hold [`bytes::Bytes`]
//!   slices of the receive buffer, so delivery is copy-free; the visitor
//!   still must not retain the capsule reference beyond the callback.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod capsule;
pub mod error;
pub mod ip;
pub mod parser;
pub mod serialize;
pub mod types;

pub use capsule::Capsule;
pub use error::{IpError, ParseError, SerializeError};
pub use ip::{IpAddress, IpAddressRange, IpFamily, IpPrefix, PrefixWithId};
pub use parser::{CapsuleParser, CapsuleVisitor, MAX_BUFFERED_CAPSULE_BYTES};
pub use serialize::{serialize_capsule, serialize_capsule_or_empty};
