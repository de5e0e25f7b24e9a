//! Capsule serialization.
//!
//! Every capsule leaves as `type (varint) || payload length (varint) ||
//! payload`, with the payload laid out by the wire schema for its variant.
//! The payload length is computed before any byte is written, so the output
//! buffer is allocated exactly once at its final size.

use bytes::Bytes;

use capstan_wire::{
    BufferAllocator, WireBytes, WireElement, WireSpan, WireUint8, WireUint32, WireVarInt62,
    serialize_into_buffer, varint::varint_len,
};

use crate::{
    capsule::Capsule,
    error::SerializeError,
    ip::{IpAddressRange, PrefixWithId},
    types,
};

// request_id (varint), family byte, packed address, prefix length byte.
impl WireElement for PrefixWithId {
    fn wire_len(&self) -> usize {
        let address = self.ip_prefix.address();
        varint_len(self.request_id) + 1 + address.family().packed_len() + 1
    }

    fn serialize(&self, writer: &mut capstan_wire::DataWriter<'_>) -> capstan_wire::Result<()> {
        let address = self.ip_prefix.address();
        (
            WireVarInt62(self.request_id),
            WireUint8(address.family().wire_code()),
            WireBytes(address.as_packed()),
            WireUint8(self.ip_prefix.prefix_length()),
        )
            .serialize(writer)
    }
}

// family byte, packed start, packed end, protocol byte.
impl WireElement for IpAddressRange {
    fn wire_len(&self) -> usize {
        1 + self.start.family().packed_len() + self.end.family().packed_len() + 1
    }

    fn serialize(&self, writer: &mut capstan_wire::DataWriter<'_>) -> capstan_wire::Result<()> {
        (
            WireUint8(self.start.family().wire_code()),
            WireBytes(self.start.as_packed()),
            WireBytes(self.end.as_packed()),
            WireUint8(self.protocol),
        )
            .serialize(writer)
    }
}

fn serialize_fields<E: WireElement>(
    capsule_type: u64,
    payload: &E,
    allocator: &impl BufferAllocator,
) -> capstan_wire::Result<Bytes> {
    let payload_len = payload.wire_len() as u64;
    serialize_into_buffer(
        allocator,
        &(WireVarInt62(capsule_type), WireVarInt62(payload_len), payload),
    )
}

/// Serialize `capsule` into its on-wire form.
///
/// # Errors
///
/// Returns [`SerializeError`] wrapping the wire-layer failure; in practice
/// only an unknown capsule whose type code exceeds the 62-bit varint range
/// can fail here.
pub fn serialize_capsule(
    capsule: &Capsule,
    allocator: &impl BufferAllocator,
) -> Result<Bytes, SerializeError> {
    let result = match capsule {
        Capsule::Datagram { payload } => {
            serialize_fields(types::DATAGRAM, &WireBytes(payload), allocator)
        }
        Capsule::LegacyDatagram { payload } => {
            serialize_fields(types::LEGACY_DATAGRAM, &WireBytes(payload), allocator)
        }
        Capsule::LegacyDatagramWithoutContext { payload } => serialize_fields(
            types::LEGACY_DATAGRAM_WITHOUT_CONTEXT,
            &WireBytes(payload),
            allocator,
        ),
        Capsule::CloseWebTransportSession { error_code, error_message } => serialize_fields(
            types::CLOSE_WEBTRANSPORT_SESSION,
            &(WireUint32(*error_code), WireBytes(error_message)),
            allocator,
        ),
        Capsule::AddressRequest { requested } => {
            serialize_fields(types::ADDRESS_REQUEST, &WireSpan(requested), allocator)
        }
        Capsule::AddressAssign { assigned } => {
            serialize_fields(types::ADDRESS_ASSIGN, &WireSpan(assigned), allocator)
        }
        Capsule::RouteAdvertisement { ranges } => {
            serialize_fields(types::ROUTE_ADVERTISEMENT, &WireSpan(ranges), allocator)
        }
        Capsule::Unknown { capsule_type, data } => {
            serialize_fields(*capsule_type, &WireBytes(data), allocator)
        }
    };
    result.map_err(|source| SerializeError { capsule: capsule.type_name(), source })
}

/// Serialize `capsule`, swallowing failure into an empty buffer.
///
/// Kept for callers that predate [`serialize_capsule`]'s status-returning
/// shape. The error is logged; new code should propagate it instead.
pub fn serialize_capsule_or_empty(capsule: &Capsule, allocator: &impl BufferAllocator) -> Bytes {
    match serialize_capsule(capsule, allocator) {
        Ok(buf) => buf,
        Err(error) => {
            tracing::error!(capsule = %capsule, error = %error, "failed to serialize capsule");
            Bytes::new()
        }
    }
}
