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

#![deny(missing_docs)]

//! # netctrl: Topology Graph and Path Resolution for SDN Controllers
//! This is the control-plane core of a software-defined network controller. It maintains the
//! topology of the network from discovered links, computes all shortest routes between nodes, and
//! compiles logical multi-hop paths into a minimal set of per-node forwarding rules (flow entries),
//! whose installation it tracks until the path is complete.
//!
//! ## Structure
//!
//! This library is structured in the following way:
//!
//! - **[`NOM`](nom)**: The network object model. It contains identifiers, nodes, ports and links,
//!   the [match](nom::Match) and [action](nom::Action) algebra, [flow entries](nom::FlowEntry) and
//!   [paths](nom::Path), and the [events](nom::Event) and [commands](nom::Command) exchanged with
//!   the environment.
//!
//! - **[`Discovery`](discovery)**: The [topology graph](discovery::TopologyGraph) built from the
//!   discovered links, and the [shortest-multipath resolver](discovery::shortest_paths).
//!
//! - **[`Path`](path)**: The [path compiler](path::PathCompiler), the
//!   [flow deduplicator](path::dedup_flows) and the [installation tracker](path::InstallTracker).
//!
//! - **[`Controller`](controller)**: The single owner of all state, which processes events one at
//!   a time. It can be moved onto its own thread using a
//!   [`ControllerHandle`](controller::ControllerHandle).
//!
//! - **[`Store`](store)**: Named key-value stores, which can be persisted as JSON.
//!
//! - **[`Topologies`](topologies)**: Example topologies for testing.
//!
//! ## Usage
//!
//! ```
//! use netctrl::config::ControllerConfig;
//! use netctrl::controller::Controller;
//! use netctrl::nom::*;
//! use netctrl::Error;
//!
//! fn main() -> Result<(), Error> {
//!     let mut controller = Controller::new(ControllerConfig::default());
//!
//!     // feed the discovered links
//!     controller.handle(Event::LinkAdded(Link::new("n1$$1", "n2$$1")))?;
//!     controller.handle(Event::LinkAdded(Link::new("n2$$1", "n1$$1")))?;
//!
//!     // request a path from port n1$$0 to port n2$$2
//!     let path = Path::new(
//!         1,
//!         vec![Pathlet::new(
//!             Match::new().with(Field::InPort("n1$$0".into())),
//!             vec![Action::Forward(vec!["n2$$2".into()])],
//!         )],
//!     );
//!     let requester = ActorRef::new("app", "0");
//!     let commands = controller.handle(Event::AddPath { requester, path })?;
//!
//!     // install the flows, and confirm them
//!     let mut done = Vec::new();
//!     for command in commands {
//!         if let Command::AddFlowEntry { flow, .. } = command {
//!             done.extend(controller.handle(Event::FlowEntryAdded(flow))?);
//!         }
//!     }
//!     assert!(matches!(done.as_slice(), [Command::PathAdded { .. }]));
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod discovery;
mod error;
pub mod nom;
pub mod path;
pub mod store;
pub mod topologies;

pub use error::Error;

// test modules
mod test;
