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

//! # Match Fields
//!
//! This module contains the predicates a flow entry can match on, and the conjunction of them,
//! the [`Match`]. Every field knows three relations to another field:
//!
//! - `has_same_type`: Both fields constrain the same packet dimension.
//! - `equals`: Both fields constrain the dimension in exactly the same way.
//! - `subsumes`: Every packet matched by the other field is also matched by this one.

use crate::nom::{MacAddr, Uid};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Addresses that can be combined with a bit mask.
pub trait MaskBits: Copy {
    /// Returns the address as a bit vector (right-aligned)
    fn bits(&self) -> u128;
}

impl MaskBits for MacAddr {
    fn bits(&self) -> u128 {
        self.0.iter().fold(0u128, |acc, b| (acc << 8) | u128::from(*b))
    }
}

impl MaskBits for Ipv4Addr {
    fn bits(&self) -> u128 {
        u128::from(u32::from(*self))
    }
}

impl MaskBits for Ipv6Addr {
    fn bits(&self) -> u128 {
        u128::from(*self)
    }
}

/// Address together with a mask. Only the bits set in the mask are relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Masked<A> {
    /// The address
    pub addr: A,
    /// The mask
    pub mask: A,
}

impl<A: MaskBits> Masked<A> {
    /// Create a new masked address
    pub fn new(addr: A, mask: A) -> Self {
        Self { addr, mask }
    }

    /// Returns `true` if both masks are the same, and the addresses are the same under the mask.
    pub fn equals(&self, other: &Self) -> bool {
        let mask = self.mask.bits();
        mask == other.mask.bits() && self.addr.bits() & mask == other.addr.bits() & mask
    }

    /// Returns `true` if the mask of `other` is at least as specific as `self`, and the address of
    /// `other` matches `self` under the mask of `self`.
    pub fn subsumes(&self, other: &Self) -> bool {
        let mask = self.mask.bits();
        other.mask.bits() & mask == mask && self.addr.bits() & mask == other.addr.bits() & mask
    }
}

impl<A: fmt::Display> fmt::Display for Masked<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

/// Type of a [`Field`], without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKind {
    /// Input port
    InPort,
    /// Ethernet source address
    EthSrc,
    /// Ethernet destination address
    EthDst,
    /// Ethernet type
    EthType,
    /// VLAN ID
    VlanId,
    /// VLAN priority code point
    VlanPcp,
    /// IPv4 source address
    Ipv4Src,
    /// IPv4 destination address
    Ipv4Dst,
    /// IPv6 source address
    Ipv6Src,
    /// IPv6 destination address
    Ipv6Dst,
    /// Transport-layer source port
    TransportPortSrc,
    /// Transport-layer destination port
    TransportPortDst,
}

/// Ethernet type of IPv4 packets
pub const ETH_TYPE_IPV4: u16 = 0x0800;
/// Ethernet type of IPv6 packets
pub const ETH_TYPE_IPV6: u16 = 0x86DD;
/// Ethernet type of ARP packets
pub const ETH_TYPE_ARP: u16 = 0x0806;

/// Typed predicate over a packet or port attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Input port (port UID)
    InPort(Uid),
    /// Ethernet source address
    EthSrc(Masked<MacAddr>),
    /// Ethernet destination address
    EthDst(Masked<MacAddr>),
    /// Ethernet type
    EthType(u16),
    /// VLAN ID
    VlanId(u16),
    /// VLAN priority code point
    VlanPcp(u8),
    /// IPv4 source address
    Ipv4Src(Masked<Ipv4Addr>),
    /// IPv4 destination address
    Ipv4Dst(Masked<Ipv4Addr>),
    /// IPv6 source address
    Ipv6Src(Masked<Ipv6Addr>),
    /// IPv6 destination address
    Ipv6Dst(Masked<Ipv6Addr>),
    /// Transport-layer source port
    TransportPortSrc(u16),
    /// Transport-layer destination port
    TransportPortDst(u16),
}

impl Field {
    /// Returns the type of the field
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::InPort(_) => FieldKind::InPort,
            Self::EthSrc(_) => FieldKind::EthSrc,
            Self::EthDst(_) => FieldKind::EthDst,
            Self::EthType(_) => FieldKind::EthType,
            Self::VlanId(_) => FieldKind::VlanId,
            Self::VlanPcp(_) => FieldKind::VlanPcp,
            Self::Ipv4Src(_) => FieldKind::Ipv4Src,
            Self::Ipv4Dst(_) => FieldKind::Ipv4Dst,
            Self::Ipv6Src(_) => FieldKind::Ipv6Src,
            Self::Ipv6Dst(_) => FieldKind::Ipv6Dst,
            Self::TransportPortSrc(_) => FieldKind::TransportPortSrc,
            Self::TransportPortDst(_) => FieldKind::TransportPortDst,
        }
    }

    /// Returns `true` if both fields are of the same type.
    pub fn has_same_type(&self, other: &Field) -> bool {
        self.kind() == other.kind()
    }

    /// Returns `true` if both fields are of the same type and constrain the packets identically.
    pub fn equals(&self, other: &Field) -> bool {
        match (self, other) {
            (Self::EthSrc(a), Self::EthSrc(b)) | (Self::EthDst(a), Self::EthDst(b)) => a.equals(b),
            (Self::Ipv4Src(a), Self::Ipv4Src(b)) | (Self::Ipv4Dst(a), Self::Ipv4Dst(b)) => {
                a.equals(b)
            }
            (Self::Ipv6Src(a), Self::Ipv6Src(b)) | (Self::Ipv6Dst(a), Self::Ipv6Dst(b)) => {
                a.equals(b)
            }
            (Self::InPort(a), Self::InPort(b)) => a == b,
            (Self::EthType(a), Self::EthType(b)) => a == b,
            (Self::VlanId(a), Self::VlanId(b)) => a == b,
            (Self::VlanPcp(a), Self::VlanPcp(b)) => a == b,
            (Self::TransportPortSrc(a), Self::TransportPortSrc(b)) => a == b,
            (Self::TransportPortDst(a), Self::TransportPortDst(b)) => a == b,
            _ => false,
        }
    }

    /// Returns `true` if every packet matched by `other` is also matched by `self`. Fields without
    /// a mask subsume only equal fields.
    pub fn subsumes(&self, other: &Field) -> bool {
        match (self, other) {
            (Self::EthSrc(a), Self::EthSrc(b)) | (Self::EthDst(a), Self::EthDst(b)) => {
                a.subsumes(b)
            }
            (Self::Ipv4Src(a), Self::Ipv4Src(b)) | (Self::Ipv4Dst(a), Self::Ipv4Dst(b)) => {
                a.subsumes(b)
            }
            (Self::Ipv6Src(a), Self::Ipv6Src(b)) | (Self::Ipv6Dst(a), Self::Ipv6Dst(b)) => {
                a.subsumes(b)
            }
            _ => self.equals(other),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InPort(p) => write!(f, "in_port={}", p),
            Self::EthSrc(m) => write!(f, "eth_src={}", m),
            Self::EthDst(m) => write!(f, "eth_dst={}", m),
            Self::EthType(t) => write!(f, "eth_type={:#06x}", t),
            Self::VlanId(v) => write!(f, "vlan_id={}", v),
            Self::VlanPcp(v) => write!(f, "vlan_pcp={}", v),
            Self::Ipv4Src(m) => write!(f, "ipv4_src={}", m),
            Self::Ipv4Dst(m) => write!(f, "ipv4_dst={}", m),
            Self::Ipv6Src(m) => write!(f, "ipv6_src={}", m),
            Self::Ipv6Dst(m) => write!(f, "ipv6_dst={}", m),
            Self::TransportPortSrc(p) => write!(f, "tp_src={}", p),
            Self::TransportPortDst(p) => write!(f, "tp_dst={}", p),
        }
    }
}

/// # Match
///
/// Unordered set of fields, interpreted as their conjunction. A missing field type means that the
/// match does not care about this dimension. Only one field of each type should be present. This is
/// not enforced while building the match, but a match violating it neither equals nor subsumes any
/// other match.
///
/// ```
/// use netctrl::nom::{Field, Match, Masked};
/// use std::net::Ipv4Addr;
///
/// let broad = Match::new().with(Field::Ipv4Dst(Masked::new(
///     Ipv4Addr::new(10, 0, 0, 0),
///     Ipv4Addr::new(255, 0, 0, 0),
/// )));
/// let narrow = Match::new()
///     .with(Field::InPort("n1$$1".into()))
///     .with(Field::Ipv4Dst(Masked::new(
///         Ipv4Addr::new(10, 1, 2, 3),
///         Ipv4Addr::new(255, 255, 255, 255),
///     )));
/// assert!(broad.subsumes(&narrow));
/// assert!(!narrow.subsumes(&broad));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Match {
    /// All fields of the match
    pub fields: Vec<Field>,
}

impl Match {
    /// Create an empty match (matching every packet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the match
    pub fn with(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the input port, if the match contains one.
    pub fn in_port(&self) -> Option<&Uid> {
        self.fields.iter().find_map(|f| match f {
            Field::InPort(p) => Some(p),
            _ => None,
        })
    }

    /// Returns a copy of the match without any input port field.
    pub fn without_in_port(&self) -> Self {
        Self { fields: self.fields.iter().filter(|f| f.kind() != FieldKind::InPort).cloned().collect() }
    }

    /// Returns `true` if both matches have the same size, and every field of `self` has exactly one
    /// equal field in `other`.
    pub fn equals(&self, other: &Match) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|f| other.fields.iter().filter(|g| g.has_same_type(f) && f.equals(g)).count() == 1)
    }

    /// Returns `true` if for every field of `self`, there exists exactly one field of the same type
    /// in `other`, and the field of `self` subsumes it. Fields only present in `other` are ignored.
    pub fn subsumes(&self, other: &Match) -> bool {
        self.fields.iter().all(|f| {
            let mut same_type = other.fields.iter().filter(|g| g.has_same_type(f));
            match (same_type.next(), same_type.next()) {
                (Some(g), None) => f.subsumes(g),
                _ => false,
            }
        })
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            f.write_str("*")
        } else {
            write!(f, "{}", self.fields.iter().join(", "))
        }
    }
}
