//! The capsule value: a tagged union over every known capsule shape.

use std::fmt;

use bytes::Bytes;

use crate::{
    ip::{IpAddressRange, PrefixWithId},
    types,
};

/// One self-delimiting typed record in an HTTP capsule stream.
///
/// Seven capsule types have a defined payload structure; every other
/// codepoint round-trips through [`Capsule::Unknown`] with its payload
/// preserved verbatim.
///
/// Byte-valued fields are [`Bytes`]: capsules produced by the parser share
/// the parser's receive buffer without copying, and cloning a capsule is
/// cheap either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capsule {
    /// HTTP datagram payload (RFC 9297).
    Datagram {
        /// The datagram bytes, opaque to the capsule layer
        payload: Bytes,
    },

    /// Datagram under the pre-RFC codepoint.
    LegacyDatagram {
        /// The datagram bytes
        payload: Bytes,
    },

    /// Datagram from draft revisions without context IDs.
    LegacyDatagramWithoutContext {
        /// The datagram bytes
        payload: Bytes,
    },

    /// WebTransport session termination.
    CloseWebTransportSession {
        /// Application error code
        error_code: u32,
        /// Application error message, not necessarily UTF-8
        error_message: Bytes,
    },

    /// CONNECT-IP address request.
    AddressRequest {
        /// Requested prefixes, in stream order
        requested: Vec<PrefixWithId>,
    },

    /// CONNECT-IP address assignment.
    AddressAssign {
        /// Assigned prefixes, in stream order
        assigned: Vec<PrefixWithId>,
    },

    /// CONNECT-IP route advertisement.
    RouteAdvertisement {
        /// Advertised ranges, in stream order
        ranges: Vec<IpAddressRange>,
    },

    /// Any capsule type without a defined structure.
    Unknown {
        /// The 62-bit capsule type code
        capsule_type: u64,
        /// The raw payload, preserved verbatim
        data: Bytes,
    },
}

impl Capsule {
    /// Build a DATAGRAM capsule.
    pub fn datagram(payload: impl Into<Bytes>) -> Self {
        Self::Datagram { payload: payload.into() }
    }

    /// Build a LEGACY_DATAGRAM capsule.
    pub fn legacy_datagram(payload: impl Into<Bytes>) -> Self {
        Self::LegacyDatagram { payload: payload.into() }
    }

    /// Build a LEGACY_DATAGRAM_WITHOUT_CONTEXT capsule.
    pub fn legacy_datagram_without_context(payload: impl Into<Bytes>) -> Self {
        Self::LegacyDatagramWithoutContext { payload: payload.into() }
    }

    /// Build a CLOSE_WEBTRANSPORT_SESSION capsule.
    pub fn close_web_transport_session(error_code: u32, error_message: impl Into<Bytes>) -> Self {
        Self::CloseWebTransportSession { error_code, error_message: error_message.into() }
    }

    /// Build an ADDRESS_REQUEST capsule.
    #[must_use]
    pub fn address_request(requested: Vec<PrefixWithId>) -> Self {
        Self::AddressRequest { requested }
    }

    /// Build an ADDRESS_ASSIGN capsule.
    #[must_use]
    pub fn address_assign(assigned: Vec<PrefixWithId>) -> Self {
        Self::AddressAssign { assigned }
    }

    /// Build a ROUTE_ADVERTISEMENT capsule.
    #[must_use]
    pub fn route_advertisement(ranges: Vec<IpAddressRange>) -> Self {
        Self::RouteAdvertisement { ranges }
    }

    /// Build a capsule of an arbitrary type carrying an opaque payload.
    pub fn unknown(capsule_type: u64, data: impl Into<Bytes>) -> Self {
        Self::Unknown { capsule_type, data: data.into() }
    }

    /// The 62-bit type code this capsule carries on the wire.
    #[must_use]
    pub fn capsule_type(&self) -> u64 {
        match self {
            Self::Datagram { .. } => types::DATAGRAM,
            Self::LegacyDatagram { .. } => types::LEGACY_DATAGRAM,
            Self::LegacyDatagramWithoutContext { .. } => types::LEGACY_DATAGRAM_WITHOUT_CONTEXT,
            Self::CloseWebTransportSession { .. } => types::CLOSE_WEBTRANSPORT_SESSION,
            Self::AddressRequest { .. } => types::ADDRESS_REQUEST,
            Self::AddressAssign { .. } => types::ADDRESS_ASSIGN,
            Self::RouteAdvertisement { .. } => types::ROUTE_ADVERTISEMENT,
            Self::Unknown { capsule_type, .. } => *capsule_type,
        }
    }

    /// The variant name, for diagnostics and error context.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Unknown { .. } => "Unknown",
            _ => types::capsule_type_name(self.capsule_type())
                .unwrap_or("Unknown"),
        }
    }
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for byte in bytes {
        write!(f, "{byte:02x}")?;
    }
    Ok(())
}

impl fmt::Display for Capsule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Datagram { payload }
            | Self::LegacyDatagram { payload }
            | Self::LegacyDatagramWithoutContext { payload } => {
                write!(f, "{}[", self.type_name())?;
                write_hex(f, payload)?;
                write!(f, "]")
            }
            Self::CloseWebTransportSession { error_code, error_message } => {
                write!(
                    f,
                    "CLOSE_WEBTRANSPORT_SESSION(error_code={error_code},error_message=\"{}\")",
                    String::from_utf8_lossy(error_message)
                )
            }
            Self::AddressRequest { requested } => {
                write!(f, "ADDRESS_REQUEST[")?;
                for prefix in requested {
                    write!(f, "({}-{})", prefix.request_id, prefix.ip_prefix)?;
                }
                write!(f, "]")
            }
            Self::AddressAssign { assigned } => {
                write!(f, "ADDRESS_ASSIGN[")?;
                for prefix in assigned {
                    write!(f, "({}-{})", prefix.request_id, prefix.ip_prefix)?;
                }
                write!(f, "]")
            }
            Self::RouteAdvertisement { ranges } => {
                write!(f, "ROUTE_ADVERTISEMENT[")?;
                for range in ranges {
                    write!(f, "({}-{}-{})", range.start, range.end, range.protocol)?;
                }
                write!(f, "]")
            }
            Self::Unknown { capsule_type, data } => {
                write!(f, "Unknown({capsule_type})[")?;
                write_hex(f, data)?;
                write!(f, "]")
            }
        }
    }
}
