//! Property tests: serialize/parse round trips and fragmentation
//! invariance under arbitrary input chunking.

use bytes::Bytes;
use proptest::prelude::*;

use capstan_capsule::{
    Capsule, CapsuleParser, CapsuleVisitor, IpAddress, IpAddressRange, IpPrefix, PrefixWithId,
    serialize_capsule, types,
};
use capstan_wire::SystemAllocator;

#[derive(Default)]
struct Recorder {
    capsules: Vec<Capsule>,
    failures: Vec<String>,
}

impl CapsuleVisitor for Recorder {
    fn on_capsule(&mut self, capsule: &Capsule) -> bool {
        self.capsules.push(capsule.clone());
        true
    }

    fn on_parse_failure(&mut self, error_message: &str) {
        self.failures.push(error_message.to_string());
    }
}

fn payload_strategy() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..64).prop_map(Bytes::from)
}

fn address_strategy() -> impl Strategy<Value = IpAddress> {
    prop_oneof![
        any::<[u8; 4]>().prop_map(IpAddress::V4),
        any::<[u8; 16]>().prop_map(IpAddress::V6),
    ]
}

fn prefix_strategy() -> impl Strategy<Value = PrefixWithId> {
    (any::<u64>(), address_strategy())
        .prop_flat_map(|(request_id, address)| {
            let request_id = request_id & capstan_wire::MAX_VARINT62;
            (
                Just(request_id),
                Just(address),
                0..=address.family().prefix_width(),
            )
        })
        .prop_map(|(request_id, address, prefix_length)| PrefixWithId {
            request_id,
            ip_prefix: IpPrefix::new(address, prefix_length).expect("length bounded by strategy"),
        })
}

fn range_strategy() -> impl Strategy<Value = IpAddressRange> {
    let v4 = (any::<[u8; 4]>(), any::<[u8; 4]>(), any::<u8>()).prop_map(|(start, end, protocol)| {
        IpAddressRange::new(IpAddress::V4(start), IpAddress::V4(end), protocol)
            .expect("same family")
    });
    let v6 =
        (any::<[u8; 16]>(), any::<[u8; 16]>(), any::<u8>()).prop_map(|(start, end, protocol)| {
            IpAddressRange::new(IpAddress::V6(start), IpAddress::V6(end), protocol)
                .expect("same family")
        });
    prop_oneof![v4, v6]
}

fn unknown_type_strategy() -> impl Strategy<Value = u64> {
    (0..=capstan_wire::MAX_VARINT62).prop_filter("must not collide with a known type", |t| {
        types::capsule_type_name(*t).is_none()
    })
}

fn capsule_strategy() -> impl Strategy<Value = Capsule> {
    prop_oneof![
        payload_strategy().prop_map(|payload| Capsule::Datagram { payload }),
        payload_strategy().prop_map(|payload| Capsule::LegacyDatagram { payload }),
        payload_strategy().prop_map(|payload| Capsule::LegacyDatagramWithoutContext { payload }),
        (any::<u32>(), payload_strategy()).prop_map(|(error_code, error_message)| {
            Capsule::CloseWebTransportSession { error_code, error_message }
        }),
        prop::collection::vec(prefix_strategy(), 0..4).prop_map(Capsule::address_request),
        prop::collection::vec(prefix_strategy(), 0..4).prop_map(Capsule::address_assign),
        prop::collection::vec(range_strategy(), 0..4).prop_map(Capsule::route_advertisement),
        (unknown_type_strategy(), payload_strategy())
            .prop_map(|(capsule_type, data)| Capsule::Unknown { capsule_type, data }),
    ]
}

/// Serialize `capsules` into one contiguous stream.
fn serialize_stream(capsules: &[Capsule]) -> Vec<u8> {
    let mut stream = Vec::new();
    for capsule in capsules {
        stream.extend_from_slice(&serialize_capsule(capsule, &SystemAllocator).expect("in range"));
    }
    stream
}

/// Feed `stream` to a fresh parser, cut at `cuts` (fractions of the length).
fn parse_fragmented(stream: &[u8], cuts: &[usize]) -> Recorder {
    let mut cut_points: Vec<usize> = cuts.iter().map(|c| c % (stream.len() + 1)).collect();
    cut_points.sort_unstable();

    let mut parser = CapsuleParser::new(Recorder::default());
    let mut start = 0;
    for cut in cut_points {
        assert!(parser.ingest(&stream[start..cut]));
        start = cut;
    }
    assert!(parser.ingest(&stream[start..]));
    parser.error_if_remaining_buffered_data();
    parser.into_visitor()
}

proptest! {
    /// Every capsule survives a serialize/parse round trip unchanged.
    #[test]
    fn roundtrip_single_capsule(capsule in capsule_strategy()) {
        let stream = serialize_stream(std::slice::from_ref(&capsule));
        let recorder = parse_fragmented(&stream, &[]);
        prop_assert!(recorder.failures.is_empty());
        prop_assert_eq!(recorder.capsules, vec![capsule]);
    }

    /// Parsing is invariant under how the stream is cut into fragments.
    #[test]
    fn fragmentation_invariance(
        capsules in prop::collection::vec(capsule_strategy(), 1..4),
        cuts in prop::collection::vec(any::<usize>(), 0..8),
    ) {
        let stream = serialize_stream(&capsules);
        let recorder = parse_fragmented(&stream, &cuts);
        prop_assert!(recorder.failures.is_empty());
        prop_assert_eq!(recorder.capsules, capsules);
    }

    /// Two serialized capsules fed in one fragment arrive as two capsules
    /// in order.
    #[test]
    fn coalesced_pair(first in capsule_strategy(), second in capsule_strategy()) {
        let stream = serialize_stream(&[first.clone(), second.clone()]);
        let recorder = parse_fragmented(&stream, &[]);
        prop_assert!(recorder.failures.is_empty());
        prop_assert_eq!(recorder.capsules, vec![first, second]);
    }

    /// Serialized headers use canonical varints: re-serializing a parsed
    /// capsule reproduces the input bytes exactly.
    #[test]
    fn serialization_is_canonical(capsule in capsule_strategy()) {
        let stream = serialize_stream(std::slice::from_ref(&capsule));
        let recorder = parse_fragmented(&stream, &[]);
        prop_assert_eq!(recorder.capsules.len(), 1);
        let reserialized = serialize_stream(&recorder.capsules);
        prop_assert_eq!(reserialized, stream);
    }
}
