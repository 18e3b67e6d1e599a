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

//! # Controller
//!
//! The [`Controller`] is the single owner of all controller state: the topology graph, the node
//! registry and the installation tracker. It processes events strictly one at a time, and returns
//! the commands that result from every event. The [`ControllerHandle`] runs a controller on a
//! dedicated thread, fed by a channel.

use crate::config::ControllerConfig;
use crate::discovery::{Adjacency, TopologyGraph, GRAPH_DICT};
use crate::nom::{ActorRef, Command, Event, FlowEntry, Node, Path};
use crate::path::{
    IdAllocator, InstallTracker, PathCompiler, PathError, PathRecord, ID_DICT, PATH_DICT,
};
use crate::store::Dict;
use crate::Error;
use log::*;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Name of the dict storing the registered nodes
pub const NODE_DICT: &str = "Node";

/// # Controller
///
/// ```
/// use netctrl::config::ControllerConfig;
/// use netctrl::controller::Controller;
/// use netctrl::nom::{Event, Link};
///
/// let mut controller = Controller::new(ControllerConfig::default());
/// let commands = controller.handle(Event::LinkAdded(Link::new("n1$$1", "n2$$1"))).unwrap();
/// assert!(commands.is_empty());
/// assert_eq!(controller.graph().num_links(), 1);
/// ```
#[derive(Debug)]
pub struct Controller {
    config: ControllerConfig,
    graph: TopologyGraph,
    nodes: Dict<Node>,
    tracker: InstallTracker,
}

impl Controller {
    /// Create a controller with empty state.
    pub fn new(config: ControllerConfig) -> Self {
        let tracker = InstallTracker::new(config.identity.clone());
        Self { config, graph: TopologyGraph::new(), nodes: Dict::new(NODE_DICT), tracker }
    }

    /// Create a controller, restoring its state from the `state_dir` of the configuration. If no
    /// state directory is configured, the state is empty.
    pub fn restore(config: ControllerConfig) -> Result<Self, Error> {
        let dir = match config.state_dir.clone() {
            Some(dir) => dir,
            None => return Ok(Self::new(config)),
        };
        let graph = TopologyGraph::from_dict(Dict::<Adjacency>::load(GRAPH_DICT, &dir)?);
        let nodes: Dict<Node> = Dict::load(NODE_DICT, &dir)?;
        let tracker = InstallTracker::from_dicts(
            config.identity.clone(),
            Dict::<PathRecord>::load(PATH_DICT, &dir)?,
            IdAllocator::from_dict(Dict::load(ID_DICT, &dir)?),
        );
        info!(
            "Restored {} links, {} nodes and {} paths from {:?}",
            graph.num_links(),
            nodes.len(),
            tracker.paths().len(),
            dir
        );
        Ok(Self { config, graph, nodes, tracker })
    }

    /// Write the state into the `state_dir` of the configuration. Does nothing if no state
    /// directory is configured.
    pub fn save(&self) -> Result<(), Error> {
        if let Some(dir) = self.config.state_dir.as_ref() {
            self.graph.dict().save(dir)?;
            self.nodes.save(dir)?;
            self.tracker.paths().save(dir)?;
            self.tracker.ids().dict().save(dir)?;
            info!("Saved the controller state to {:?}", dir);
        }
        Ok(())
    }

    /// Returns the configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Returns the topology graph
    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    /// Returns all registered nodes
    pub fn nodes(&self) -> &Dict<Node> {
        &self.nodes
    }

    /// Returns the installation tracker
    pub fn tracker(&self) -> &InstallTracker {
        &self.tracker
    }

    /// Process a single event, and return the resulting commands.
    pub fn handle(&mut self, event: Event) -> Result<Vec<Command>, Error> {
        match event {
            Event::LinkAdded(link) => {
                self.graph.add_link(link)?;
                Ok(Vec::new())
            }
            Event::LinkDeleted(link) => {
                self.graph.remove_link(&link)?;
                Ok(Vec::new())
            }
            Event::NodeJoined(node) => {
                info!("{} joined", node);
                for port in node.ports.iter() {
                    debug!("Port {} of {} is {:?}", port.uid(), node.id, port.state);
                }
                self.nodes.put(node.id.clone(), node);
                Ok(Vec::new())
            }
            Event::AddPath { requester, path } => Ok(self.add_path(requester, path)),
            Event::DelPath(_) => Err(Error::NotImplemented("path deletion")),
            Event::FlowEntryAdded(flow) => Ok(self.tracker.confirm(&flow)?.into_iter().collect()),
            Event::FlowEntryDeleted(_) => Err(Error::NotImplemented("flow deletion")),
        }
    }

    /// Compile the path and start tracking its installation. If the path cannot be compiled or
    /// no ID is left for it, it is rejected, and the requester is notified.
    pub fn add_path(&mut self, requester: ActorRef, path: Path) -> Vec<Command> {
        let flows = match self.compile_path(&path) {
            Ok(flows) => flows,
            Err(e) => return reject(requester, path, e.to_string()),
        };
        match self.tracker.track(requester.clone(), path.clone(), flows) {
            Ok(commands) => commands,
            Err(e) => reject(requester, path, e.to_string()),
        }
    }

    /// Compile the path on the current topology, without tracking it.
    pub fn compile_path(&self, path: &Path) -> Result<Vec<FlowEntry>, PathError> {
        PathCompiler::new(&self.graph, &self.config.compiler).compile(path)
    }
}

fn reject(requester: ActorRef, path: Path, reason: String) -> Vec<Command> {
    warn!("Rejecting path from {}: {}", requester, reason);
    vec![Command::PathRejected { requester, path, reason }]
}

/// Handle to a controller running on its own thread.
#[derive(Debug)]
pub struct ControllerHandle {
    events: Sender<Event>,
    commands: Receiver<Command>,
    thread: JoinHandle<Controller>,
}

impl ControllerHandle {
    /// Move the controller onto a new thread. The thread processes events until the handle is
    /// shut down.
    pub fn spawn(controller: Controller) -> Self {
        let (events, event_rx) = channel::<Event>();
        let (command_tx, commands) = channel::<Command>();

        let thread = thread::spawn(move || {
            let mut controller = controller;
            for event in event_rx {
                match controller.handle(event) {
                    Ok(cmds) => {
                        for cmd in cmds {
                            if command_tx.send(cmd).is_err() {
                                debug!("Dropping command, nobody is listening");
                            }
                        }
                    }
                    Err(Error::NotImplemented(what)) => error!("Not implemented: {}", what),
                    Err(e) => warn!("Cannot handle event: {}", e),
                }
            }
            debug!("Controller thread stops");
            controller
        });

        Self { events, commands, thread }
    }

    /// Send an event to the controller
    pub fn send(&self, event: Event) -> Result<(), Error> {
        self.events.send(event).map_err(|_| Error::Disconnected)
    }

    /// Receiver of all commands emitted by the controller
    pub fn commands(&self) -> &Receiver<Command> {
        &self.commands
    }

    /// All commands emitted so far, without blocking.
    pub fn try_commands(&self) -> Vec<Command> {
        self.commands.try_iter().collect()
    }

    /// Stop the controller after all pending events are processed, persist its state, and return
    /// it.
    pub fn shutdown(self) -> Result<Controller, Error> {
        let Self { events, commands, thread } = self;
        drop(events);
        let controller = thread.join().map_err(|_| Error::Disconnected)?;
        drop(commands);
        controller.save()?;
        Ok(controller)
    }
}
