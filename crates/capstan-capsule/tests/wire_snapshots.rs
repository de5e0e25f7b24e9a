//! Snapshot tests for wire format stability.
//!
//! Binary snapshots of every capsule variant's encoding. If the wire format
//! changes, these fail, so protocol compatibility cannot break silently.

use std::net::{Ipv4Addr, Ipv6Addr};

use insta::assert_snapshot;

use capstan_capsule::{
    Capsule, IpAddressRange, IpPrefix, PrefixWithId, serialize_capsule,
};
use capstan_wire::SystemAllocator;

fn capsule_to_hex(capsule: &Capsule) -> String {
    let buf = serialize_capsule(capsule, &SystemAllocator).expect("encoding should succeed");
    hex::encode(&buf)
}

fn host_prefix(request_id: u64) -> PrefixWithId {
    PrefixWithId {
        request_id,
        ip_prefix: IpPrefix::new(Ipv4Addr::new(10, 0, 0, 1).into(), 32).unwrap(),
    }
}

#[test]
fn snapshot_empty_datagram() {
    assert_snapshot!(capsule_to_hex(&Capsule::datagram("")), @"0000");
}

#[test]
fn snapshot_datagram() {
    assert_snapshot!(capsule_to_hex(&Capsule::datagram("abc")), @"0003616263");
}

#[test]
fn snapshot_legacy_datagram() {
    assert_snapshot!(
        capsule_to_hex(&Capsule::legacy_datagram(vec![0xde, 0xad])),
        @"80ff37a002dead"
    );
}

#[test]
fn snapshot_legacy_datagram_without_context() {
    assert_snapshot!(
        capsule_to_hex(&Capsule::legacy_datagram_without_context(vec![0xde, 0xad])),
        @"80ff37a502dead"
    );
}

#[test]
fn snapshot_close_web_transport_session() {
    assert_snapshot!(
        capsule_to_hex(&Capsule::close_web_transport_session(42, "hello")),
        @"6843090000002a68656c6c6f"
    );
}

#[test]
fn snapshot_address_request() {
    assert_snapshot!(
        capsule_to_hex(&Capsule::address_request(vec![host_prefix(0)])),
        @"c00000009eca6a000700040a00000120"
    );
}

#[test]
fn snapshot_address_assign() {
    assert_snapshot!(
        capsule_to_hex(&Capsule::address_assign(vec![host_prefix(1)])),
        @"c00000009eca6a010701040a00000120"
    );
}

#[test]
fn snapshot_address_assign_ipv6() {
    let prefix = PrefixWithId {
        request_id: 4660,
        ip_prefix: IpPrefix::new(Ipv6Addr::LOCALHOST.into(), 128).unwrap(),
    };
    assert_snapshot!(
        capsule_to_hex(&Capsule::address_assign(vec![prefix])),
        @"c00000009eca6a0114523406000000000000000000000000000000000180"
    );
}

#[test]
fn snapshot_route_advertisement() {
    let range = IpAddressRange::new(
        Ipv4Addr::new(192, 168, 0, 0).into(),
        Ipv4Addr::new(192, 168, 0, 255).into(),
        17,
    )
    .unwrap();
    assert_snapshot!(
        capsule_to_hex(&Capsule::route_advertisement(vec![range])),
        @"c00000009eca6a020a04c0a80000c0a800ff11"
    );
}

#[test]
fn snapshot_empty_route_advertisement() {
    assert_snapshot!(
        capsule_to_hex(&Capsule::route_advertisement(vec![])),
        @"c00000009eca6a0200"
    );
}

#[test]
fn snapshot_unknown() {
    assert_snapshot!(
        capsule_to_hex(&Capsule::unknown(0x17, vec![0xff])),
        @"1701ff"
    );
}

#[test]
fn snapshot_display_forms() {
    assert_snapshot!(Capsule::datagram("abc").to_string(), @"DATAGRAM[616263]");
    assert_snapshot!(
        Capsule::close_web_transport_session(42, "hello").to_string(),
        @r#"CLOSE_WEBTRANSPORT_SESSION(error_code=42,error_message="hello")"#
    );
    assert_snapshot!(
        Capsule::address_assign(vec![host_prefix(1)]).to_string(),
        @"ADDRESS_ASSIGN[(1-10.0.0.1/32)]"
    );
    let range = IpAddressRange::new(
        Ipv4Addr::new(192, 168, 0, 0).into(),
        Ipv4Addr::new(192, 168, 0, 255).into(),
        17,
    )
    .unwrap();
    assert_snapshot!(
        Capsule::route_advertisement(vec![range]).to_string(),
        @"ROUTE_ADVERTISEMENT[(192.168.0.0-192.168.0.255-17)]"
    );
    assert_snapshot!(Capsule::unknown(0x17, vec![0xff]).to_string(), @"Unknown(23)[ff]");
}
