// netctrl: Topology Graph and Path Resolution for SDN Controllers
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Test the match algebra: equality and subsumption of fields, matches and flow entries.

use crate::nom::*;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Check reflexivity, and the expected subsumption and equality in both directions.
fn check(m1: &Match, m2: &Match, subsumption: [bool; 2], equality: [bool; 2]) {
    assert!(m1.equals(m1), "{} should be equal to itself", m1);
    assert!(m2.equals(m2), "{} should be equal to itself", m2);
    assert!(m1.subsumes(m1), "{} should subsume itself", m1);
    assert!(m2.subsumes(m2), "{} should subsume itself", m2);
    assert_eq!(m1.subsumes(m2), subsumption[0], "{} subsumes {}", m1, m2);
    assert_eq!(m2.subsumes(m1), subsumption[1], "{} subsumes {}", m2, m1);
    assert_eq!(m1.equals(m2), equality[0], "{} equals {}", m1, m2);
    assert_eq!(m2.equals(m1), equality[1], "{} equals {}", m2, m1);
}

fn mac(b: [u8; 6]) -> MacAddr {
    MacAddr(b)
}

fn ipv4(addr: [u8; 4], mask: [u8; 4]) -> Masked<Ipv4Addr> {
    Masked::new(Ipv4Addr::from(addr), Ipv4Addr::from(mask))
}

#[test]
fn in_port() {
    let m1 = Match::new().with(Field::InPort("n1$$1".into()));
    let m2 = Match::new().with(Field::InPort("n1$$2".into()));
    check(&m1, &m2, [false, false], [false, false]);
    check(&m1, &m1.clone(), [true, true], [true, true]);
}

#[test]
fn eth_src() {
    let m1 = Match::new().with(Field::EthSrc(Masked::new(
        mac([1, 2, 3, 0, 0, 0]),
        mac([0xff, 0xff, 0xff, 0, 0, 0]),
    )));
    let m2 = Match::new().with(Field::EthSrc(Masked::new(
        mac([1, 2, 3, 4, 0, 0]),
        mac([0xff, 0xff, 0xff, 0xff, 0, 0]),
    )));
    check(&m1, &m2, [true, false], [false, false]);
}

#[test]
fn eth_src_and_dst() {
    let broad = Masked::new(mac([1, 2, 3, 0, 0, 0]), mac([0xff, 0xff, 0xff, 0, 0, 0]));
    let narrow = Masked::new(mac([1, 2, 3, 4, 0, 0]), mac([0xff, 0xff, 0xff, 0xff, 0, 0]));
    let m1 = Match::new().with(Field::EthSrc(broad)).with(Field::EthDst(broad));
    let m2 = Match::new().with(Field::EthSrc(broad)).with(Field::EthDst(narrow));
    check(&m1, &m2, [true, false], [false, false]);
    // src and dst are different types
    let m3 = Match::new().with(Field::EthDst(broad));
    let m4 = Match::new().with(Field::EthSrc(narrow));
    check(&m3, &m4, [false, false], [false, false]);
}

#[test]
fn ipv4_dst() {
    let m1 = Match::new().with(Field::Ipv4Dst(ipv4([1, 2, 3, 0], [255, 255, 255, 0])));
    let m2 = Match::new().with(Field::Ipv4Dst(ipv4([1, 2, 3, 4], [255, 255, 255, 255])));
    check(&m1, &m2, [true, false], [false, false]);

    // different network
    let m3 = Match::new().with(Field::Ipv4Dst(ipv4([1, 2, 4, 4], [255, 255, 255, 255])));
    check(&m1, &m3, [false, false], [false, false]);
}

#[test]
fn ipv4_equal_under_mask() {
    // the host bits are irrelevant
    let m1 = Match::new().with(Field::Ipv4Src(ipv4([10, 0, 0, 1], [255, 0, 0, 0])));
    let m2 = Match::new().with(Field::Ipv4Src(ipv4([10, 9, 9, 9], [255, 0, 0, 0])));
    check(&m1, &m2, [true, true], [true, true]);
}

#[test]
fn ipv6() {
    let addr = Ipv6Addr::from([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]);
    let mask_24 = Ipv6Addr::from([0xff, 0xff, 0xff, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    let mask_32 = Ipv6Addr::from([0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    let m1 = Match::new()
        .with(Field::Ipv6Src(Masked::new(addr, mask_24)))
        .with(Field::Ipv6Dst(Masked::new(addr, mask_32)));
    let m2 = Match::new()
        .with(Field::Ipv6Src(Masked::new(addr, mask_32)))
        .with(Field::Ipv6Dst(Masked::new(addr, mask_32)));
    check(&m1, &m2, [true, false], [false, false]);
}

#[test]
fn fewer_fields_subsume() {
    let m1 = Match::new().with(Field::EthType(ETH_TYPE_IPV4));
    let m2 = Match::new()
        .with(Field::InPort("n1$$1".into()))
        .with(Field::EthType(ETH_TYPE_IPV4))
        .with(Field::TransportPortDst(80));
    check(&m1, &m2, [true, false], [false, false]);
    // the empty match subsumes everything
    check(&Match::new(), &m2, [true, false], [false, false]);
}

#[test]
fn field_order_is_irrelevant() {
    let m1 = Match::new().with(Field::VlanId(10)).with(Field::VlanPcp(3));
    let m2 = Match::new().with(Field::VlanPcp(3)).with(Field::VlanId(10));
    check(&m1, &m2, [true, true], [true, true]);
}

#[test]
fn duplicate_field_types() {
    // two fields of the same type neither equal nor subsume anything
    let m1 = Match::new().with(Field::VlanId(10));
    let m2 = Match::new().with(Field::VlanId(10)).with(Field::VlanId(11));
    assert!(!m1.subsumes(&m2));
    assert!(!m1.equals(&m2));
    assert!(!m2.equals(&m1));
}

#[test]
fn unmasked_fields_subsume_iff_equal() {
    assert!(Field::EthType(0x800).subsumes(&Field::EthType(0x800)));
    assert!(!Field::EthType(0x800).subsumes(&Field::EthType(0x806)));
    assert!(!Field::VlanId(1).subsumes(&Field::VlanPcp(1)));
    assert!(Field::VlanId(1).has_same_type(&Field::VlanId(2)));
    assert!(!Field::TransportPortSrc(1).has_same_type(&Field::TransportPortDst(1)));
}

#[test]
fn without_in_port() {
    let m = Match::new().with(Field::VlanId(1)).with(Field::InPort("n1$$1".into()));
    assert_eq!(m.in_port(), Some(&Uid::from("n1$$1")));
    let stripped = m.without_in_port();
    assert_eq!(stripped.in_port(), None);
    assert!(stripped.equals(&Match::new().with(Field::VlanId(1))));
}

#[test]
fn flow_entry_relations() {
    let broad = Match::new().with(Field::Ipv4Dst(ipv4([1, 2, 3, 0], [255, 255, 255, 0])));
    let narrow = Match::new().with(Field::Ipv4Dst(ipv4([1, 2, 3, 4], [255, 255, 255, 255])));
    let fwd = vec![Action::Forward(vec!["n1$$1".into()])];

    let f1 = FlowEntry::new("n1".into(), broad.clone(), fwd.clone(), 1);
    let f2 = FlowEntry::new("n1".into(), narrow.clone(), fwd.clone(), 1);
    assert!(f1.subsumes(&f2));
    assert!(!f2.subsumes(&f1));

    // the id is ignored
    let mut f3 = f1.clone();
    f3.id = "42".to_string();
    assert!(f1.equals(&f3));

    // different actions
    let f4 = FlowEntry::new("n1".into(), narrow.clone(), vec![Action::Drop], 1);
    assert!(!f1.subsumes(&f4));
    assert!(!f4.subsumes(&f1));
    assert!(!f1.equals(&f4));

    // different node or priority
    let f5 = FlowEntry::new("n2".into(), narrow.clone(), fwd.clone(), 1);
    let f6 = FlowEntry::new("n1".into(), narrow, fwd, 2);
    assert!(!f1.subsumes(&f5));
    assert!(!f1.subsumes(&f6));
}
