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

//! # Network Object Model
//!
//! Types shared by every part of the controller: identifiers, nodes, ports and links, the
//! match/action algebra, flow entries, paths, and the events and commands exchanged with the
//! environment.

mod action;
mod event;
mod field;
mod flow;
mod types;

pub use action::{actions_equal, Action};
pub use event::{Command, Event};
pub use field::{
    Field, FieldKind, MaskBits, Masked, Match, ETH_TYPE_ARP, ETH_TYPE_IPV4, ETH_TYPE_IPV6,
};
pub use flow::{FlowEntry, Path, Pathlet, DEFAULT_PRIORITY};
pub use types::{
    ActorRef, Link, LinkState, MacAddr, Node, Port, PortState, Uid, UidError, UID_SEPARATOR,
};
