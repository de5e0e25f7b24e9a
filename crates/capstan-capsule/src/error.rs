//! Error types for the capsule codec.
//!
//! Serialization errors propagate up the call stack as values. Parse errors
//! are terminal for the stream that produced them; their `Display` forms are
//! the exact messages handed to
//! [`CapsuleVisitor::on_parse_failure`](crate::CapsuleVisitor::on_parse_failure).

use capstan_wire::WireError;
use thiserror::Error;

/// Errors from constructing IP addresses, prefixes, and ranges.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpError {
    /// A packed address was neither 4 nor 16 bytes long.
    #[error("packed IP address must be 4 or 16 bytes, got {0}")]
    BadPackedLength(usize),

    /// A prefix length exceeded the address family's width.
    #[error("prefix length {length} exceeds the family maximum of {max}")]
    PrefixLengthOutOfRange {
        /// The rejected prefix length
        length: u8,
        /// Maximum valid length for the address family (32 or 128)
        max: u8,
    },

    /// A range's start and end addresses belong to different families.
    #[error("address range endpoints must share an address family")]
    MixedAddressFamily,
}

/// Failure while encoding a capsule into its wire form.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{source} while serializing a {capsule} capsule")]
pub struct SerializeError {
    /// Name of the capsule variant being encoded
    pub capsule: &'static str,
    /// The underlying wire-layer failure
    #[source]
    pub source: WireError,
}

/// Terminal parse failures reported to the visitor.
///
/// The parser reports at most one of these per stream; afterwards it stays
/// in the failed state and ignores further input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// CLOSE_WEBTRANSPORT_SESSION payload shorter than its error code.
    #[error("Unable to parse capsule CLOSE_WEBTRANSPORT_SESSION error code")]
    CloseErrorCode,

    /// Address list element truncated inside its request ID.
    #[error("Unable to parse capsule {capsule} request ID")]
    PrefixRequestId {
        /// Capsule name (ADDRESS_REQUEST or ADDRESS_ASSIGN)
        capsule: &'static str,
    },

    /// Element truncated before its address family byte.
    #[error("Unable to parse capsule {capsule} family")]
    Family {
        /// Capsule name
        capsule: &'static str,
    },

    /// Address family byte was neither 4 nor 6.
    #[error("Bad {capsule} family")]
    BadFamily {
        /// Capsule name
        capsule: &'static str,
    },

    /// Address list element truncated inside its packed address.
    #[error("Unable to read capsule {capsule} address")]
    PrefixAddress {
        /// Capsule name
        capsule: &'static str,
    },

    /// Address list element truncated before its prefix length byte.
    #[error("Unable to parse capsule {capsule} IP prefix length")]
    PrefixLengthTruncated {
        /// Capsule name
        capsule: &'static str,
    },

    /// Prefix length exceeded the address family's width.
    #[error("Invalid IP prefix length")]
    InvalidPrefixLength,

    /// Route advertisement truncated inside a range's start address.
    #[error("Unable to read capsule ROUTE_ADVERTISEMENT start address")]
    RangeStartAddress,

    /// Route advertisement truncated inside a range's end address.
    #[error("Unable to read capsule ROUTE_ADVERTISEMENT end address")]
    RangeEndAddress,

    /// Route advertisement truncated before a range's protocol byte.
    #[error("Unable to parse capsule ROUTE_ADVERTISEMENT IP protocol")]
    RangeProtocol,

    /// The residual buffer exceeded the cap without completing a capsule.
    #[error("Refusing to buffer too much capsule data")]
    BufferedDataTooLarge,

    /// The visitor returned `false` from `on_capsule`.
    #[error("Visitor failed to process capsule")]
    VisitorRejected,

    /// End of stream declared while a partial capsule was still buffered.
    #[error("Incomplete capsule left at the end of the stream")]
    IncompleteCapsule,
}
