//! Round-trip fuzzer: build a capsule from fuzz input, serialize it,
//! re-parse it under fuzz-chosen fragmentation, and require the visitor to
//! see the identical value exactly once.

#![no_main]

use capstan_capsule::{
    Capsule, CapsuleParser, CapsuleVisitor, IpAddress, IpAddressRange, IpPrefix, PrefixWithId,
    serialize_capsule, types,
};
use capstan_wire::SystemAllocator;
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Collect {
    capsules: Vec<Capsule>,
    failures: Vec<String>,
}

impl CapsuleVisitor for Collect {
    fn on_capsule(&mut self, capsule: &Capsule) -> bool {
        self.capsules.push(capsule.clone());
        true
    }

    fn on_parse_failure(&mut self, error_message: &str) {
        self.failures.push(error_message.to_string());
    }
}

/// Derive one capsule from the fuzz input, consuming a few leading bytes
/// for structure and using the rest as payload material.
fn build_capsule(selector: u8, body: &[u8]) -> Capsule {
    match selector % 8 {
        0 => Capsule::datagram(body.to_vec()),
        1 => Capsule::legacy_datagram(body.to_vec()),
        2 => Capsule::legacy_datagram_without_context(body.to_vec()),
        3 => {
            let (code, message) = split_u32(body);
            Capsule::close_web_transport_session(code, message.to_vec())
        }
        4 => Capsule::address_request(build_prefixes(body)),
        5 => Capsule::address_assign(build_prefixes(body)),
        6 => Capsule::route_advertisement(build_ranges(body)),
        _ => {
            let (raw, data) = split_u32(body);
            let capsule_type = u64::from(raw);
            if types::capsule_type_name(capsule_type).is_some() {
                Capsule::datagram(data.to_vec())
            } else {
                Capsule::unknown(capsule_type, data.to_vec())
            }
        }
    }
}

fn split_u32(body: &[u8]) -> (u32, &[u8]) {
    if body.len() < 4 {
        return (0, body);
    }
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&body[..4]);
    (u32::from_be_bytes(raw), &body[4..])
}

fn build_prefixes(body: &[u8]) -> Vec<PrefixWithId> {
    body.chunks_exact(6)
        .map(|chunk| {
            let address = IpAddress::V4([chunk[1], chunk[2], chunk[3], chunk[4]]);
            PrefixWithId {
                request_id: u64::from(chunk[0]),
                ip_prefix: IpPrefix::new(address, chunk[5] % 33).expect("length in range"),
            }
        })
        .collect()
}

fn build_ranges(body: &[u8]) -> Vec<IpAddressRange> {
    body.chunks_exact(9)
        .map(|chunk| {
            let start = IpAddress::V4([chunk[0], chunk[1], chunk[2], chunk[3]]);
            let end = IpAddress::V4([chunk[4], chunk[5], chunk[6], chunk[7]]);
            IpAddressRange::new(start, end, chunk[8]).expect("same family")
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Some((&chunk_byte, body)) = rest.split_first() else {
        return;
    };

    let capsule = build_capsule(selector, body);
    let wire = serialize_capsule(&capsule, &SystemAllocator).expect("built capsule is in range");

    let chunk_size = usize::from(chunk_byte).max(1);
    let mut parser = CapsuleParser::new(Collect::default());
    for fragment in wire.chunks(chunk_size) {
        assert!(parser.ingest(fragment), "well-formed stream must stay clean");
    }
    parser.error_if_remaining_buffered_data();

    let collect = parser.into_visitor();
    assert!(collect.failures.is_empty(), "unexpected failure: {:?}", collect.failures);
    assert_eq!(collect.capsules, vec![capsule]);
});
