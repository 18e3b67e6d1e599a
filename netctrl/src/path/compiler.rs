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

//! # Path Compiler
//!
//! The path compiler turns a logical [`Path`] into the flow entries that realize it on the
//! discovered topology. The pathlets of the path are compiled top to bottom. For every pathlet,
//! the compiler determines the ports at which traffic must leave (the outports), and the port at
//! which it enters (the inport), either from the match of the pathlet or inherited from the
//! outports of the previous pathlet. Then, traffic is routed from the inport (or from every node,
//! if no inport is known) to every outport along the shortest routes of the topology.

use super::dedup_flows;
use crate::config::{CompilerConfig, InportAddressing, PathSelection};
use crate::discovery::{shortest_paths, GraphError, TopologyGraph};
use crate::nom::{Action, Field, FlowEntry, Match, Path, Pathlet, Uid, UidError};
use log::*;
use thiserror::Error;

/// Compiles paths into flow entries on a topology.
#[derive(Debug)]
pub struct PathCompiler<'a> {
    graph: &'a TopologyGraph,
    config: &'a CompilerConfig,
}

impl<'a> PathCompiler<'a> {
    /// Create a new compiler working on the given topology.
    pub fn new(graph: &'a TopologyGraph, config: &'a CompilerConfig) -> Self {
        Self { graph, config }
    }

    /// Compile the path into a deduplicated list of flow entries. Either all pathlets compile, or
    /// an error is returned and no flow entry is produced. The returned flow entries have no ID.
    pub fn compile(&self, path: &Path) -> Result<Vec<FlowEntry>, PathError> {
        if path.pathlets.is_empty() {
            return Err(PathError::EmptyPath);
        }

        let mut flows: Vec<FlowEntry> = Vec::new();
        let mut outports: Vec<Uid> = Vec::new();

        for (i, pathlet) in path.pathlets.iter().enumerate() {
            if outports.is_empty() {
                let (new_flows, new_outports) = self.compile_pathlet(pathlet, None, path.priority)?;
                flows.extend(new_flows);
                outports = new_outports;
                continue;
            }

            let inports = self.inherited_inports(&outports);
            outports.clear();
            if inports.is_empty() {
                // the next pathlet starts without inherited inports
                warn!("No inport of pathlet {} is connected. Skipping it.", i);
                continue;
            }

            for inport in inports.iter() {
                let (new_flows, new_outports) =
                    self.compile_pathlet(pathlet, Some(inport), path.priority)?;
                flows.extend(new_flows);
                outports.extend(new_outports);
            }
        }

        let num_candidates = flows.len();
        let flows = dedup_flows(flows);
        debug!(
            "Compiled {} pathlets into {} flows ({} before deduplication)",
            path.pathlets.len(),
            flows.len(),
            num_candidates
        );
        Ok(flows)
    }

    /// Compile a single pathlet, returning the generated flow entries and the outports.
    fn compile_pathlet(
        &self,
        pathlet: &Pathlet,
        inherited: Option<&Uid>,
        priority: u16,
    ) -> Result<(Vec<FlowEntry>, Vec<Uid>), PathError> {
        let outports = self.outports(pathlet)?;

        let inport = match (pathlet.pattern.in_port(), inherited) {
            (Some(explicit), Some(inherited)) if explicit != inherited => {
                return Err(PathError::Conflict {
                    inherited: inherited.clone(),
                    explicit: explicit.clone(),
                })
            }
            (Some(explicit), _) => Some(explicit.clone()),
            (None, inherited) => inherited.cloned(),
        };

        let no_inport = pathlet.pattern.without_in_port();
        let transit_actions: Vec<Action> =
            pathlet.actions.iter().filter(|a| !a.is_forwarding()).cloned().collect();

        let sources: Vec<Uid> = match inport.as_ref() {
            Some(p) => vec![p.node_of_port()?],
            None => self.graph.nodes().collect(),
        };

        let mut flows = Vec::new();
        for src in sources.iter() {
            for outport in outports.iter() {
                let dst = outport.node_of_port()?;
                let routes = shortest_paths(self.graph, src, &dst)?.ok_or_else(|| {
                    PathError::NoPath { from: src.clone(), to: outport.clone() }
                })?;

                if routes.length == 0 {
                    flows.push(self.flow(
                        dst,
                        with_inport(&no_inport, inport.as_ref()),
                        pathlet.actions.clone(),
                        priority,
                    ));
                    continue;
                }

                let num_routes = match self.config.path_selection {
                    PathSelection::All => routes.paths.len(),
                    PathSelection::First => 1,
                };
                for route in routes.paths.iter().take(num_routes) {
                    let mut last_inport = inport.clone();
                    for link in route.iter() {
                        let mut actions = transit_actions.clone();
                        actions.push(Action::Forward(vec![link.from.clone()]));
                        flows.push(self.flow(
                            link.from.node_of_port()?,
                            with_inport(&no_inport, last_inport.as_ref()),
                            actions,
                            priority,
                        ));
                        last_inport = link.peer().cloned();
                    }
                    flows.push(self.flow(
                        dst.clone(),
                        with_inport(&no_inport, last_inport.as_ref()),
                        pathlet.actions.clone(),
                        priority,
                    ));
                }
            }
        }

        trace!("pathlet with inport {:?} compiled into {} flows", inport, flows.len());
        Ok((flows, outports))
    }

    /// Ports out of which the pathlet sends traffic: all ports of `Forward` actions, and all ports
    /// with an outgoing link of the flooding node, except the flood inport.
    fn outports(&self, pathlet: &Pathlet) -> Result<Vec<Uid>, PathError> {
        let mut ports: Vec<Uid> = Vec::new();
        for action in pathlet.actions.iter() {
            match action {
                Action::Forward(fwd) => {
                    for port in fwd.iter() {
                        if !ports.contains(port) {
                            ports.push(port.clone());
                        }
                    }
                }
                Action::Flood { in_port } => {
                    let node = in_port.node_of_port()?;
                    for link in self.graph.links(&node) {
                        if &link.from != in_port && !ports.contains(&link.from) {
                            ports.push(link.from.clone());
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(ports)
    }

    /// Candidate inports of the next pathlet, derived from the outports of the current one.
    fn inherited_inports(&self, outports: &[Uid]) -> Vec<Uid> {
        let mut inports: Vec<Uid> = Vec::new();
        for outport in outports {
            match self.config.inport_addressing {
                InportAddressing::Mirrored => {
                    if self.graph.has_link_from(outport) && !inports.contains(outport) {
                        inports.push(outport.clone());
                    }
                }
                InportAddressing::Peer => {
                    let node = match outport.node_of_port() {
                        Ok(n) => n,
                        Err(e) => {
                            warn!("Ignoring outport: {}", e);
                            continue;
                        }
                    };
                    for link in self.graph.links(&node).filter(|l| &l.from == outport) {
                        for peer in link.to.iter() {
                            if !inports.contains(peer) {
                                inports.push(peer.clone());
                            }
                        }
                    }
                }
            }
        }
        inports
    }

    fn flow(&self, node: Uid, pattern: Match, actions: Vec<Action>, priority: u16) -> FlowEntry {
        let mut flow = FlowEntry::new(node, pattern, actions, priority);
        flow.idle_timeout = self.config.idle_timeout();
        flow.hard_timeout = self.config.hard_timeout();
        flow
    }
}

fn with_inport(pattern: &Match, inport: Option<&Uid>) -> Match {
    match inport {
        Some(p) => pattern.clone().with(Field::InPort(p.clone())),
        None => pattern.clone(),
    }
}

/// Errors while compiling a path
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// The path has no pathlets
    #[error("Path has no pathlets")]
    EmptyPath,
    /// The inport inherited from the previous pathlet differs from the inport of the match
    #[error("Two different inports: {inherited} and {explicit}")]
    Conflict {
        /// Inport inherited from the previous pathlet
        inherited: Uid,
        /// Inport of the match of the pathlet
        explicit: Uid,
    },
    /// The outport cannot be reached
    #[error("No path found from {from} to {to}")]
    NoPath {
        /// Source node
        from: Uid,
        /// Outport which is not reachable
        to: Uid,
    },
    /// A port UID is malformed
    #[error("Malformed port: {0}")]
    MalformedPort(#[from] UidError),
    /// Error of the topology graph
    #[error("Topology error: {0}")]
    Graph(#[from] GraphError),
}
