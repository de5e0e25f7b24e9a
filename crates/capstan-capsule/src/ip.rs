//! Packed-form IP addresses, prefixes, and ranges.
//!
//! Addresses move through the capsule layer in packed network-order binary
//! form (4 bytes for IPv4, 16 for IPv6); the codec never parses textual
//! addresses. `Display` implementations render the conventional dotted-quad
//! and colon forms for diagnostics only.

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
};

use crate::error::IpError;

/// IP address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IpFamily {
    /// IPv4
    V4,
    /// IPv6
    V6,
}

impl IpFamily {
    /// Length of a packed address of this family, in bytes.
    #[must_use]
    pub const fn packed_len(self) -> usize {
        match self {
            Self::V4 => 4,
            Self::V6 => 16,
        }
    }

    /// Width of a full-length prefix for this family (32 or 128).
    #[must_use]
    pub const fn prefix_width(self) -> u8 {
        match self {
            Self::V4 => 32,
            Self::V6 => 128,
        }
    }

    /// The family byte used on the wire (4 or 6).
    #[must_use]
    pub const fn wire_code(self) -> u8 {
        match self {
            Self::V4 => 4,
            Self::V6 => 6,
        }
    }

    /// Look up a family from its on-wire byte. Anything other than 4 or 6
    /// is unknown.
    #[must_use]
    pub const fn from_wire_code(code: u8) -> Option<Self> {
        match code {
            4 => Some(Self::V4),
            6 => Some(Self::V6),
            _ => None,
        }
    }
}

/// An IP address in packed network-order form.
///
/// Equality and ordering are byte-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IpAddress {
    /// IPv4 address, 4 packed bytes
    V4([u8; 4]),
    /// IPv6 address, 16 packed bytes
    V6([u8; 16]),
}

impl IpAddress {
    /// Build an address from its packed form.
    ///
    /// # Errors
    ///
    /// Returns [`IpError::BadPackedLength`] unless `bytes` is exactly 4 or
    /// 16 bytes long.
    pub fn from_packed(bytes: &[u8]) -> Result<Self, IpError> {
        match bytes.len() {
            4 => {
                let mut octets = [0u8; 4];
                octets.copy_from_slice(bytes);
                Ok(Self::V4(octets))
            }
            16 => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(bytes);
                Ok(Self::V6(octets))
            }
            n => Err(IpError::BadPackedLength(n)),
        }
    }

    /// The packed form: exactly 4 or 16 bytes, network order.
    #[must_use]
    pub fn as_packed(&self) -> &[u8] {
        match self {
            Self::V4(octets) => octets,
            Self::V6(octets) => octets,
        }
    }

    /// The address family.
    #[must_use]
    pub const fn family(&self) -> IpFamily {
        match self {
            Self::V4(_) => IpFamily::V4,
            Self::V6(_) => IpFamily::V6,
        }
    }

    /// True for IPv4 addresses.
    #[must_use]
    pub const fn is_ipv4(&self) -> bool {
        matches!(self, Self::V4(_))
    }

    /// True for IPv6 addresses.
    #[must_use]
    pub const fn is_ipv6(&self) -> bool {
        matches!(self, Self::V6(_))
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4(octets) => write!(f, "{}", Ipv4Addr::from(*octets)),
            Self::V6(octets) => write!(f, "{}", Ipv6Addr::from(*octets)),
        }
    }
}

impl From<Ipv4Addr> for IpAddress {
    fn from(addr: Ipv4Addr) -> Self {
        Self::V4(addr.octets())
    }
}

impl From<Ipv6Addr> for IpAddress {
    fn from(addr: Ipv6Addr) -> Self {
        Self::V6(addr.octets())
    }
}

impl From<IpAddr> for IpAddress {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

/// An IP prefix: an address plus a prefix length bounded by the family
/// width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpPrefix {
    address: IpAddress,
    prefix_length: u8,
}

impl IpPrefix {
    /// A host-route prefix covering exactly `address` (/32 or /128).
    #[must_use]
    pub fn host(address: IpAddress) -> Self {
        Self { address, prefix_length: address.family().prefix_width() }
    }

    /// Build a prefix with an explicit length.
    ///
    /// # Errors
    ///
    /// Returns [`IpError::PrefixLengthOutOfRange`] if `prefix_length`
    /// exceeds 32 (IPv4) or 128 (IPv6).
    pub fn new(address: IpAddress, prefix_length: u8) -> Result<Self, IpError> {
        let max = address.family().prefix_width();
        if prefix_length > max {
            return Err(IpError::PrefixLengthOutOfRange { length: prefix_length, max });
        }
        Ok(Self { address, prefix_length })
    }

    /// The prefix's address.
    #[must_use]
    pub const fn address(&self) -> IpAddress {
        self.address
    }

    /// The prefix length in bits.
    #[must_use]
    pub const fn prefix_length(&self) -> u8 {
        self.prefix_length
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_length)
    }
}

/// An IP prefix paired with the request identifier it answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrefixWithId {
    /// Opaque identifier correlating requests with assignments
    pub request_id: u64,
    /// The requested or assigned prefix
    pub ip_prefix: IpPrefix,
}

/// An inclusive interval of IP addresses plus an IP protocol number.
///
/// Both endpoints must belong to the same family; [`IpAddressRange::new`]
/// enforces this. Whether `start <= end` is a question for the layer that
/// interprets routes, not for the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpAddressRange {
    /// First address in the range
    pub start: IpAddress,
    /// Last address in the range
    pub end: IpAddress,
    /// IP protocol number (0 means any)
    pub protocol: u8,
}

impl IpAddressRange {
    /// Build a range, rejecting mixed-family endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`IpError::MixedAddressFamily`] if `start` and `end` belong
    /// to different families.
    pub fn new(start: IpAddress, end: IpAddress, protocol: u8) -> Result<Self, IpError> {
        if start.family() != end.family() {
            return Err(IpError::MixedAddressFamily);
        }
        Ok(Self { start, end, protocol })
    }
}
