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

//! Forwarding actions of a flow entry.

use crate::nom::{Field, Match, Uid};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Action applied to a packet matched by a flow entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Forward the packet out of all listed ports
    Forward(Vec<Uid>),
    /// Flood the packet out of every port of the node except `in_port`
    Flood {
        /// Port on which the packet entered, and which must not be used for flooding
        in_port: Uid,
    },
    /// Drop the packet
    Drop,
    /// Send the packet to the controller
    SendToController,
    /// Push a VLAN tag with the given ID
    PushVlan(u16),
    /// Pop the outermost VLAN tag
    PopVlan,
    /// Rewrite header fields of the packet
    WriteFields(Vec<Field>),
}

impl Action {
    /// Returns `true` if both actions have the same effect. `Forward` compares the set of ports
    /// (ignoring order and multiplicity), and `WriteFields` compares the fields like a [`Match`].
    pub fn equals(&self, other: &Action) -> bool {
        match (self, other) {
            (Self::Forward(a), Self::Forward(b)) => {
                a.iter().collect::<HashSet<_>>() == b.iter().collect::<HashSet<_>>()
            }
            (Self::Flood { in_port: a }, Self::Flood { in_port: b }) => a == b,
            (Self::Drop, Self::Drop) => true,
            (Self::SendToController, Self::SendToController) => true,
            (Self::PushVlan(a), Self::PushVlan(b)) => a == b,
            (Self::PopVlan, Self::PopVlan) => true,
            (Self::WriteFields(a), Self::WriteFields(b)) => {
                Match { fields: a.clone() }.equals(&Match { fields: b.clone() })
            }
            _ => false,
        }
    }

    /// Returns `true` if the action sends the packet out of some port (`Forward` or `Flood`).
    pub fn is_forwarding(&self) -> bool {
        matches!(self, Self::Forward(_) | Self::Flood { .. })
    }
}

/// Returns `true` if both action lists are pointwise equal (see [`Action::equals`]).
pub fn actions_equal(a: &[Action], b: &[Action]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward(ports) => write!(f, "forward({})", ports.iter().join(", ")),
            Self::Flood { in_port } => write!(f, "flood(except {})", in_port),
            Self::Drop => f.write_str("drop"),
            Self::SendToController => f.write_str("controller"),
            Self::PushVlan(v) => write!(f, "push_vlan({})", v),
            Self::PopVlan => f.write_str("pop_vlan"),
            Self::WriteFields(fields) => write!(f, "write({})", fields.iter().join(", ")),
        }
    }
}
