//! Capsule type codepoints.
//!
//! Codepoints for the address-management capsules are drawn from the
//! in-progress MASQUE drafts and have drifted across revisions; they live
//! here and nowhere else so an update touches a single module. Any value
//! not listed below is treated as an unknown capsule and carried verbatim.

/// HTTP Datagram (RFC 9297).
pub const DATAGRAM: u64 = 0x00;

/// Datagram under the pre-RFC registration.
pub const LEGACY_DATAGRAM: u64 = 0xff37a0;

/// Datagram from draft revisions that dropped context IDs.
pub const LEGACY_DATAGRAM_WITHOUT_CONTEXT: u64 = 0xff37a5;

/// WebTransport session termination.
pub const CLOSE_WEBTRANSPORT_SESSION: u64 = 0x2843;

/// CONNECT-IP address request.
pub const ADDRESS_REQUEST: u64 = 0x9ECA_6A00;

/// CONNECT-IP address assignment.
pub const ADDRESS_ASSIGN: u64 = 0x9ECA_6A01;

/// CONNECT-IP route advertisement.
pub const ROUTE_ADVERTISEMENT: u64 = 0x9ECA_6A02;

/// The name of a known capsule type, or `None` for unknown codepoints.
#[must_use]
pub const fn capsule_type_name(capsule_type: u64) -> Option<&'static str> {
    match capsule_type {
        DATAGRAM => Some("DATAGRAM"),
        LEGACY_DATAGRAM => Some("LEGACY_DATAGRAM"),
        LEGACY_DATAGRAM_WITHOUT_CONTEXT => Some("LEGACY_DATAGRAM_WITHOUT_CONTEXT"),
        CLOSE_WEBTRANSPORT_SESSION => Some("CLOSE_WEBTRANSPORT_SESSION"),
        ADDRESS_REQUEST => Some("ADDRESS_REQUEST"),
        ADDRESS_ASSIGN => Some("ADDRESS_ASSIGN"),
        ROUTE_ADVERTISEMENT => Some("ROUTE_ADVERTISEMENT"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names() {
        assert_eq!(capsule_type_name(DATAGRAM), Some("DATAGRAM"));
        assert_eq!(capsule_type_name(ROUTE_ADVERTISEMENT), Some("ROUTE_ADVERTISEMENT"));
        assert_eq!(capsule_type_name(0x17), None);
    }
}
