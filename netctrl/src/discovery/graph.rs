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

//! # Topology Graph
//!
//! The topology graph stores, for every origin node, all discovered links leaving this node,
//! grouped by the node they lead to. The adjacency lives in a [`Dict`] keyed by the origin node,
//! which allows the graph to be persisted and restored together with the rest of the controller
//! state.

use crate::nom::{Link, Uid, UidError};
use crate::store::Dict;
use log::*;
use std::collections::BTreeMap;
use thiserror::Error;

/// Name of the dict storing the adjacency
pub const GRAPH_DICT: &str = "NetGraph";

/// Outgoing links of a single node, grouped by the destination node.
pub type Adjacency = BTreeMap<Uid, Vec<Link>>;

/// # Topology Graph
///
/// Directed multigraph of the discovered network. Links are recorded at the node owning their
/// `from` port. A link with multiple destination ports on different nodes is recorded once per
/// destination node, narrowed to the ports of that node.
///
/// ```
/// use netctrl::discovery::TopologyGraph;
/// use netctrl::nom::{Link, Uid};
///
/// let mut g = TopologyGraph::new();
/// g.add_link(Link::new("n1$$1", "n2$$1")).unwrap();
/// assert!(g.add_link(Link::new("n1$$2", "n1$$3")).is_err());
/// assert_eq!(g.nodes().collect::<Vec<_>>(), vec![Uid::from("n1")]);
/// ```
#[derive(Debug, Clone)]
pub struct TopologyGraph {
    adjacency: Dict<Adjacency>,
}

impl Default for TopologyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyGraph {
    /// Create an empty topology graph
    pub fn new() -> Self {
        Self { adjacency: Dict::new(GRAPH_DICT) }
    }

    /// Create the topology graph from an existing (restored) dict
    pub fn from_dict(adjacency: Dict<Adjacency>) -> Self {
        Self { adjacency }
    }

    /// Returns the underlying dict
    pub fn dict(&self) -> &Dict<Adjacency> {
        &self.adjacency
    }

    /// Record a discovered link. If a link with the same identity (`from` and `id`) is already
    /// known, it is replaced. The link is rejected without modifying the graph if any port UID is
    /// malformed, if it has no destination, or if any destination is on the origin node.
    pub fn add_link(&mut self, link: Link) -> Result<(), GraphError> {
        let origin = link.from.node_of_port()?;
        if link.to.is_empty() {
            return Err(GraphError::NoDestination(link.uid()));
        }

        // group the destination ports by their node
        let mut destinations: BTreeMap<Uid, Vec<Uid>> = BTreeMap::new();
        for port in link.to.iter() {
            let dst = port.node_of_port()?;
            if dst == origin {
                return Err(GraphError::SelfLoop(link.uid(), origin));
            }
            destinations.entry(dst).or_default().push(port.clone());
        }

        if self.remove_from_adjacency(&origin, &link) {
            debug!("Replacing link {}", link.uid());
        }

        let adjacency = self.adjacency.entry_or_default(origin.as_str());
        for (dst, ports) in destinations {
            debug!("Add link {} ({} -> {})", link, origin, dst);
            adjacency.entry(dst).or_default().push(Link { to: ports, ..link.clone() });
        }
        Ok(())
    }

    /// Remove a link (identified by `from` and `id`) from the graph. Returns `true` if the link
    /// was present. Destination groups and origins without links are dropped.
    pub fn remove_link(&mut self, link: &Link) -> Result<bool, GraphError> {
        let origin = link.from.node_of_port()?;
        let removed = self.remove_from_adjacency(&origin, link);
        if removed {
            debug!("Removed link {}", link.uid());
        } else {
            debug!("Cannot remove unknown link {}", link.uid());
        }
        Ok(removed)
    }

    fn remove_from_adjacency(&mut self, origin: &Uid, link: &Link) -> bool {
        let adjacency = match self.adjacency.get_mut(origin.as_str()) {
            Some(a) => a,
            None => return false,
        };
        let mut removed = false;
        for links in adjacency.values_mut() {
            let before = links.len();
            links.retain(|l| !l.same_identity(link));
            removed |= links.len() != before;
        }
        adjacency.retain(|_, links| !links.is_empty());
        if adjacency.is_empty() {
            self.adjacency.remove(origin.as_str());
        }
        removed
    }

    /// Iterate over all outgoing links of `node`.
    pub fn links<'a>(&'a self, node: &Uid) -> impl Iterator<Item = &'a Link> + 'a {
        self.adjacency.get(node.as_str()).into_iter().flat_map(|a| a.values().flatten())
    }

    /// Iterate over all outgoing links of `node`, together with the node they lead to.
    pub fn neighbors<'a>(&'a self, node: &Uid) -> impl Iterator<Item = (&'a Uid, &'a Link)> + 'a {
        self.adjacency
            .get(node.as_str())
            .into_iter()
            .flat_map(|a| a.iter().flat_map(|(dst, links)| links.iter().map(move |l| (dst, l))))
    }

    /// Iterate over all links from `from` to `to`.
    pub fn links_between<'a>(
        &'a self,
        from: &Uid,
        to: &Uid,
    ) -> impl Iterator<Item = &'a Link> + 'a {
        self.adjacency.get(from.as_str()).and_then(|a| a.get(to)).into_iter().flatten()
    }

    /// Iterate over all links of the graph.
    pub fn all_links(&self) -> impl Iterator<Item = &Link> {
        self.adjacency.iter().flat_map(|(_, a)| a.values().flatten())
    }

    /// Iterate over all nodes with at least one outgoing link.
    pub fn nodes(&self) -> impl Iterator<Item = Uid> + '_ {
        self.adjacency.keys().map(|k| Uid::from(k.as_str()))
    }

    /// Returns `true` if some recorded link starts at `port`.
    pub fn has_link_from(&self, port: &Uid) -> bool {
        match port.node_of_port() {
            Ok(node) => self.links(&node).any(|l| &l.from == port),
            Err(_) => false,
        }
    }

    /// Number of recorded links (a link narrowed to several destination nodes is counted once per
    /// destination).
    pub fn num_links(&self) -> usize {
        self.all_links().count()
    }
}

/// Errors of the topology graph and the resolver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A port UID of the link is malformed
    #[error("Malformed link: {0}")]
    MalformedLink(#[from] UidError),
    /// The link has no destination port
    #[error("Link {0} has no destination")]
    NoDestination(Uid),
    /// The link starts and ends on the same node
    #[error("Link {0} is a loop on node {1}")]
    SelfLoop(Uid, Uid),
    /// The shortest path search found a shorter distance to an already finalized node.
    #[error("Invalid distance in shortest path search: node {node} recorded at {recorded}, reached at {reached}")]
    InvalidDistance {
        /// The node with the broken distance
        node: Uid,
        /// The distance recorded previously
        recorded: usize,
        /// The distance at which the node was reached again
        reached: usize,
    },
}
