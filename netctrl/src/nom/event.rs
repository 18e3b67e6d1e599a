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

//! Messages exchanged between the controller and its environment.

use crate::nom::{ActorRef, FlowEntry, Link, Node, Path};
use serde::{Deserialize, Serialize};

/// Inbound event, processed by the controller one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A link was discovered
    LinkAdded(Link),
    /// A link disappeared
    LinkDeleted(Link),
    /// A node connected to the controller
    NodeJoined(Node),
    /// Request to install a path
    AddPath {
        /// Actor which is notified once the path is installed
        requester: ActorRef,
        /// The requested path
        path: Path,
    },
    /// Request to remove a path
    DelPath(Path),
    /// A flow entry was installed on a node
    FlowEntryAdded(FlowEntry),
    /// A flow entry was removed from a node
    FlowEntryDeleted(FlowEntry),
}

/// Outbound command, emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Install a flow entry, and send `FlowEntryAdded` to `ack` afterwards.
    AddFlowEntry {
        /// Flow to install
        flow: FlowEntry,
        /// Receiver of the confirmation
        ack: ActorRef,
    },
    /// All flows of the path are installed.
    PathAdded {
        /// Receiver of the notification
        requester: ActorRef,
        /// The installed path
        path: Path,
    },
    /// The path could not be compiled.
    PathRejected {
        /// Receiver of the notification
        requester: ActorRef,
        /// The rejected path
        path: Path,
        /// Reason of the rejection
        reason: String,
    },
}
