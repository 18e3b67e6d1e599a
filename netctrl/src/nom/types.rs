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

//! Identifiers and the physical objects of the network object model: nodes, ports and links.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Reserved delimiter between the hierarchical components of a [`Uid`].
pub const UID_SEPARATOR: &str = "$$";

/// # Unique Identifier
///
/// Opaque identifier of a node, a port or a link. It is formed by joining the hierarchical
/// component IDs with [`UID_SEPARATOR`]:
///
/// - node: `node_id`
/// - port: `node_id$$port_id`
/// - link: `node_id$$port_id$$link_id`
///
/// ```
/// use netctrl::nom::Uid;
/// let port = Uid::join(&["n1", "2"]);
/// assert_eq!(port.as_str(), "n1$$2");
/// assert_eq!(port.node_of_port().unwrap(), Uid::from("n1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(pub String);

impl Uid {
    /// Join the components into a single UID.
    pub fn join<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(parts.into_iter().map(|s| s.as_ref().to_string()).join(UID_SEPARATOR))
    }

    /// Split the UID into its components.
    pub fn split(&self) -> Vec<&str> {
        self.0.split(UID_SEPARATOR).collect()
    }

    /// Returns the UID as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Parse a port UID into the node ID and the port ID.
    pub fn port_parts(&self) -> Result<(&str, &str), UidError> {
        match self.split().as_slice() {
            [node, port] if !node.is_empty() && !port.is_empty() => Ok((*node, *port)),
            _ => Err(UidError::MalformedPort(self.clone())),
        }
    }

    /// Returns the UID of the node a port UID belongs to.
    pub fn node_of_port(&self) -> Result<Uid, UidError> {
        self.port_parts().map(|(node, _)| Uid::from(node))
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Uid {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Uid {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Errors while parsing UIDs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UidError {
    /// The UID is not of the form `node$$port`
    #[error("Malformed port UID: {0}")]
    MalformedPort(Uid),
}

/// Hardware address of a node or a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MacAddr(pub [u8; 6]);

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().map(|b| format!("{:02x}", b)).join(":"))
    }
}

/// Forwarding element, such as a switch or a router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// ID of the node, unique among all nodes in the network
    pub id: String,
    /// Hardware address of the node
    #[serde(default)]
    pub mac_addr: MacAddr,
    /// Ports of the node
    #[serde(default)]
    pub ports: Vec<Port>,
}

impl Node {
    /// Create a node with the given ID and no ports.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self { id: id.into(), mac_addr: MacAddr::default(), ports: Vec::new() }
    }

    /// Add a port with the given local ID to the node.
    pub fn with_port<S: Into<String>>(mut self, id: S) -> Self {
        let port = Port::new(self.uid(), id);
        self.ports.push(port);
        self
    }

    /// Returns the UID of the node.
    pub fn uid(&self) -> Uid {
        Uid(self.id.clone())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node {} (mac={}, {} ports)", self.id, self.mac_addr, self.ports.len())
    }
}

/// State of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortState {
    /// The state is unknown
    Unknown,
    /// Not connected to any link
    Down,
    /// Up and forwarding packets
    Up,
    /// Blocked
    Blocked,
}

impl Default for PortState {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Physical or virtual port of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// ID of the port, unique among the ports of the node.
    pub id: String,
    /// UID of the node owning this port
    pub node: Uid,
    /// The outgoing link, if any
    #[serde(default)]
    pub link: Option<Uid>,
    /// State of the port
    #[serde(default)]
    pub state: PortState,
}

impl Port {
    /// Create a new port on a node.
    pub fn new<S: Into<String>>(node: Uid, id: S) -> Self {
        Self { id: id.into(), node, link: None, state: PortState::Unknown }
    }

    /// Returns the UID of the port, in the form `node$$port`.
    pub fn uid(&self) -> Uid {
        Uid::join(&[self.node.as_str(), self.id.as_str()])
    }
}

/// State of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkState {
    /// The state is unknown
    Unknown,
    /// The link is up
    Up,
    /// The link is down
    Down,
}

impl Default for LinkState {
    fn default() -> Self {
        Self::Unknown
    }
}

/// # Link
///
/// Directed edge from one port to one or more destination ports. The identity of a link is the
/// pair `(from, id)`, which allows parallel links from the same port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// Link ID, unique among the outgoing links of `from`
    #[serde(default)]
    pub id: String,
    /// Port at which the link starts
    pub from: Uid,
    /// Port(s) connected to `from` using this link
    pub to: Vec<Uid>,
    /// State of the link
    #[serde(default)]
    pub state: LinkState,
}

impl Link {
    /// Create a new link between two ports, with link ID `0`.
    pub fn new<F: Into<Uid>, T: Into<Uid>>(from: F, to: T) -> Self {
        Self { id: "0".to_string(), from: from.into(), to: vec![to.into()], state: LinkState::Up }
    }

    /// Change the link ID
    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = id.into();
        self
    }

    /// Returns the UID of the link, in the form `node$$port$$link`.
    pub fn uid(&self) -> Uid {
        Uid::join(&[self.from.as_str(), self.id.as_str()])
    }

    /// Returns `true` if both links have the same identity (`from` and `id`).
    pub fn same_identity(&self, other: &Link) -> bool {
        self.from == other.from && self.id == other.id
    }

    /// Returns the first destination port of the link.
    pub fn peer(&self) -> Option<&Uid> {
        self.to.first()
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> [{}]", self.from, self.to.iter().join(", "))
    }
}

/// Reference to an actor (an application and a key in its dictionaries). Used as the requester of a
/// path and as the return address of flow installations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorRef {
    /// Name of the application
    pub app: String,
    /// Key within the application
    pub key: String,
}

impl ActorRef {
    /// Create a new actor reference
    pub fn new<A: Into<String>, K: Into<String>>(app: A, key: K) -> Self {
        Self { app: app.into(), key: key.into() }
    }
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app, self.key)
    }
}
