//! Incremental capsule stream parser.
//!
//! The parser accepts byte fragments of arbitrary size and alignment,
//! accumulates them, and hands each completed capsule to a visitor in
//! stream order. It is single-threaded and fully synchronous; the only code
//! it calls out to is the visitor, which runs inline and must not re-enter
//! the parser.
//!
//! # Invariants
//!
//! - **Ordering**: capsules reach the visitor in exactly the order their
//!   first byte appeared in the stream.
//!
//! - **Sticky failure**: the visitor hears about at most one parse failure
//!   per parser lifetime. After a failure the buffer is dropped and every
//!   further `ingest` returns `false` without touching the visitor.
//!
//! - **Bounded memory**: after draining all complete capsules, a residual
//!   fragment larger than [`MAX_BUFFERED_CAPSULE_BYTES`] fails the stream.
//!   A peer cannot make the parser buffer without limit by declaring a huge
//!   capsule and trickling its payload.

use bytes::{Bytes, BytesMut};

use capstan_wire::DataReader;

use crate::{
    capsule::Capsule,
    error::ParseError,
    ip::{IpAddress, IpAddressRange, IpFamily, IpPrefix, PrefixWithId},
    types,
};

/// Residual-buffer cap, in bytes.
///
/// Applied to what remains *after* extracting every complete capsule, so a
/// single `ingest` call may transiently hold more while it drains.
pub const MAX_BUFFERED_CAPSULE_BYTES: usize = 1024 * 1024;

/// Receiver for completed capsules and the stream's terminal error.
///
/// Both methods run synchronously inside [`CapsuleParser::ingest`]. The
/// capsule reference (and the buffers inside it) must not be assumed valid
/// beyond the callback; copy out anything worth keeping. Calling back into
/// the parser that issued the callback is not supported.
pub trait CapsuleVisitor {
    /// Called once per completed capsule, in stream order.
    ///
    /// Return `true` to continue the stream; `false` permanently fails the
    /// parser.
    fn on_capsule(&mut self, capsule: &Capsule) -> bool;

    /// Called exactly once, on the first parse failure.
    fn on_parse_failure(&mut self, error_message: &str);
}

/// Streaming parser for a capsule sequence.
///
/// Feed fragments with [`ingest`](Self::ingest); declare end-of-stream with
/// [`error_if_remaining_buffered_data`](Self::error_if_remaining_buffered_data).
/// Instances are independent of one another and are not thread-safe.
pub struct CapsuleParser<V> {
    visitor: V,
    buffered: BytesMut,
    failed: bool,
}

impl<V: CapsuleVisitor> CapsuleParser<V> {
    /// Create a parser delivering to `visitor`.
    pub fn new(visitor: V) -> Self {
        Self { visitor, buffered: BytesMut::new(), failed: false }
    }

    /// Shared access to the visitor.
    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    /// Exclusive access to the visitor.
    pub fn visitor_mut(&mut self) -> &mut V {
        &mut self.visitor
    }

    /// Consume the parser, returning the visitor.
    pub fn into_visitor(self) -> V {
        self.visitor
    }

    /// Append `fragment` to the stream and deliver every capsule it
    /// completes.
    ///
    /// Returns `true` while the stream is healthy, `false` once a parse
    /// failure has been reported (now or previously).
    pub fn ingest(&mut self, fragment: &[u8]) -> bool {
        if self.failed {
            return false;
        }
        self.buffered.extend_from_slice(fragment);

        while self.attempt_parse() {}
        if self.failed {
            self.buffered.clear();
            return false;
        }

        if self.buffered.len() > MAX_BUFFERED_CAPSULE_BYTES {
            self.buffered.clear();
            self.report_parse_failure(ParseError::BufferedDataTooLarge);
            return false;
        }
        true
    }

    /// Declare end of stream.
    ///
    /// If a partial capsule is still buffered, reports
    /// [`ParseError::IncompleteCapsule`] and fails the parser. A no-op on an
    /// already-failed parser.
    pub fn error_if_remaining_buffered_data(&mut self) {
        if self.failed {
            return;
        }
        if !self.buffered.is_empty() {
            self.buffered.clear();
            self.report_parse_failure(ParseError::IncompleteCapsule);
        }
    }

    /// Try to extract one capsule from the front of the buffer.
    ///
    /// Returns `true` if a capsule was consumed (the caller loops) and
    /// `false` if more bytes are needed. A parse or visitor failure sets
    /// `self.failed` and also returns `false`.
    fn attempt_parse(&mut self) -> bool {
        if self.buffered.is_empty() {
            return false;
        }

        let (capsule_type, header_len, payload_len) = {
            let mut reader = DataReader::new(&self.buffered);
            let Ok(capsule_type) = reader.read_varint62() else {
                tracing::trace!("partial read: capsule type incomplete");
                return false;
            };
            let Ok(declared_len) = reader.read_varint62() else {
                tracing::trace!("partial read: capsule length incomplete");
                return false;
            };
            let Ok(payload_len) = usize::try_from(declared_len) else {
                // Unrepresentable on this platform; the buffer cap will
                // reject the stream before the payload could ever complete.
                return false;
            };
            (capsule_type, reader.consumed(), payload_len)
        };

        if self.buffered.len() - header_len < payload_len {
            tracing::trace!(payload_len, "partial read: capsule payload incomplete");
            return false;
        }

        let frame = self.buffered.split_to(header_len + payload_len).freeze();
        let payload = frame.slice(header_len..);

        let capsule = match parse_capsule_payload(capsule_type, payload) {
            Ok(capsule) => capsule,
            Err(error) => {
                self.report_parse_failure(error);
                return false;
            }
        };

        if !self.visitor.on_capsule(&capsule) {
            self.report_parse_failure(ParseError::VisitorRejected);
            return false;
        }
        true
    }

    fn report_parse_failure(&mut self, error: ParseError) {
        if self.failed {
            // One failure per stream; a second report is a bug in the
            // parser itself.
            tracing::error!(error = %error, "capsule parser produced a second failure");
            return;
        }
        self.failed = true;
        self.visitor.on_parse_failure(&error.to_string());
    }
}

/// Interpret a complete capsule payload according to its type code.
fn parse_capsule_payload(capsule_type: u64, payload: Bytes) -> Result<Capsule, ParseError> {
    match capsule_type {
        types::DATAGRAM => Ok(Capsule::Datagram { payload }),
        types::LEGACY_DATAGRAM => Ok(Capsule::LegacyDatagram { payload }),
        types::LEGACY_DATAGRAM_WITHOUT_CONTEXT => {
            Ok(Capsule::LegacyDatagramWithoutContext { payload })
        }
        types::CLOSE_WEBTRANSPORT_SESSION => {
            let mut reader = DataReader::new(&payload);
            let error_code = reader.read_u32().map_err(|_| ParseError::CloseErrorCode)?;
            let error_message = payload.slice(reader.consumed()..);
            Ok(Capsule::CloseWebTransportSession { error_code, error_message })
        }
        types::ADDRESS_REQUEST => {
            let requested = parse_prefix_list(&payload, "ADDRESS_REQUEST")?;
            Ok(Capsule::AddressRequest { requested })
        }
        types::ADDRESS_ASSIGN => {
            let assigned = parse_prefix_list(&payload, "ADDRESS_ASSIGN")?;
            Ok(Capsule::AddressAssign { assigned })
        }
        types::ROUTE_ADVERTISEMENT => {
            let ranges = parse_range_list(&payload)?;
            Ok(Capsule::RouteAdvertisement { ranges })
        }
        _ => Ok(Capsule::Unknown { capsule_type, data: payload }),
    }
}

fn read_family(reader: &mut DataReader<'_>, capsule: &'static str) -> Result<IpFamily, ParseError> {
    let code = reader.read_u8().map_err(|_| ParseError::Family { capsule })?;
    IpFamily::from_wire_code(code).ok_or(ParseError::BadFamily { capsule })
}

fn parse_prefix_list(
    payload: &[u8],
    capsule: &'static str,
) -> Result<Vec<PrefixWithId>, ParseError> {
    let mut reader = DataReader::new(payload);
    let mut prefixes = Vec::new();
    while !reader.is_done() {
        let request_id =
            reader.read_varint62().map_err(|_| ParseError::PrefixRequestId { capsule })?;
        let family = read_family(&mut reader, capsule)?;
        let packed = reader
            .read_bytes(family.packed_len())
            .map_err(|_| ParseError::PrefixAddress { capsule })?;
        let address =
            IpAddress::from_packed(packed).map_err(|_| ParseError::PrefixAddress { capsule })?;
        let prefix_length =
            reader.read_u8().map_err(|_| ParseError::PrefixLengthTruncated { capsule })?;
        let ip_prefix =
            IpPrefix::new(address, prefix_length).map_err(|_| ParseError::InvalidPrefixLength)?;
        prefixes.push(PrefixWithId { request_id, ip_prefix });
    }
    Ok(prefixes)
}

fn parse_range_list(payload: &[u8]) -> Result<Vec<IpAddressRange>, ParseError> {
    const CAPSULE: &str = "ROUTE_ADVERTISEMENT";
    let mut reader = DataReader::new(payload);
    let mut ranges = Vec::new();
    while !reader.is_done() {
        let family = read_family(&mut reader, CAPSULE)?;
        let start = reader
            .read_bytes(family.packed_len())
            .ok()
            .and_then(|bytes| IpAddress::from_packed(bytes).ok())
            .ok_or(ParseError::RangeStartAddress)?;
        let end = reader
            .read_bytes(family.packed_len())
            .ok()
            .and_then(|bytes| IpAddress::from_packed(bytes).ok())
            .ok_or(ParseError::RangeEndAddress)?;
        let protocol = reader.read_u8().map_err(|_| ParseError::RangeProtocol)?;
        ranges.push(IpAddressRange { start, end, protocol });
    }
    Ok(ranges)
}
