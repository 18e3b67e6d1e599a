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

//! # Flow Entries and Paths
//!
//! A [`FlowEntry`] is a physical forwarding rule installed on a single node. A [`Path`] is the
//! logical, multi-hop description of how traffic should be forwarded, from which the flow entries
//! are compiled.

use crate::nom::{actions_equal, Action, Match, Uid};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default priority of flow entries and paths
pub const DEFAULT_PRIORITY: u16 = 1;

/// Physical forwarding rule of a single node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEntry {
    /// ID assigned by the owner of the flow entry, used to correlate it to a path
    #[serde(default)]
    pub id: String,
    /// Node on which the flow entry is installed
    pub node: Uid,
    /// Packets matched by this rule
    pub pattern: Match,
    /// Actions applied to the matched packets, in order
    pub actions: Vec<Action>,
    /// Priority of the rule
    pub priority: u16,
    /// Remove the rule after it was idle for this duration (zero means never)
    #[serde(default)]
    pub idle_timeout: Duration,
    /// Remove the rule after this duration (zero means never)
    #[serde(default)]
    pub hard_timeout: Duration,
}

impl FlowEntry {
    /// Create a new flow entry without ID and timeouts.
    pub fn new(node: Uid, pattern: Match, actions: Vec<Action>, priority: u16) -> Self {
        Self {
            id: String::new(),
            node,
            pattern,
            actions,
            priority,
            idle_timeout: Duration::default(),
            hard_timeout: Duration::default(),
        }
    }

    /// Returns `true` if both entries are installed on the same node, with the same priority,
    /// pointwise equal actions and equal matches. The ID and the timeouts are ignored.
    pub fn equals(&self, other: &FlowEntry) -> bool {
        self.same_target(other) && self.pattern.equals(&other.pattern)
    }

    /// Returns `true` if both entries are installed on the same node, with the same priority,
    /// pointwise equal actions, and the match of `self` subsumes the match of `other`.
    pub fn subsumes(&self, other: &FlowEntry) -> bool {
        self.same_target(other) && self.pattern.subsumes(&other.pattern)
    }

    fn same_target(&self, other: &FlowEntry) -> bool {
        self.node == other.node
            && self.priority == other.priority
            && actions_equal(&self.actions, &other.actions)
    }
}

impl fmt::Display for FlowEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] prio {}: {} => {}",
            self.node,
            self.id,
            self.priority,
            self.pattern,
            self.actions.iter().join(", ")
        )
    }
}

/// Specification of a single hop of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pathlet {
    /// Packets forwarded by this hop
    pub pattern: Match,
    /// Input ports excluded from this hop. Currently not evaluated by the compiler.
    #[serde(default)]
    pub exclude: Vec<Uid>,
    /// Actions applied at the end of the hop
    pub actions: Vec<Action>,
}

impl Pathlet {
    /// Create a new pathlet
    pub fn new(pattern: Match, actions: Vec<Action>) -> Self {
        Self { pattern, exclude: Vec::new(), actions }
    }
}

/// Logical path, consisting of an ordered sequence of pathlets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    /// ID of the path, assigned when the path is accepted
    #[serde(default)]
    pub id: String,
    /// Priority of all flow entries of this path
    pub priority: u16,
    /// All hops of the path
    pub pathlets: Vec<Pathlet>,
}

impl Path {
    /// Create a new path without ID.
    pub fn new(priority: u16, pathlets: Vec<Pathlet>) -> Self {
        Self { id: String::new(), priority, pathlets }
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY, Vec::new())
    }
}
