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

//! # Installation Tracker
//!
//! The tracker keeps a record for every accepted path, containing all of its flow entries and
//! whether they are installed already. Confirmations of installed flows are matched to the path
//! through the flow ID, which is set to the path ID. Once every flow of a path is confirmed, the
//! requester of the path is notified exactly once.

use super::id::{encode_path_id, IdAllocator, IdError};
use crate::nom::{ActorRef, Command, FlowEntry, Path};
use crate::store::Dict;
use log::*;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use thiserror::Error;

/// Name of the dict storing the path records
pub const PATH_DICT: &str = "Path";

/// Flow entry of a path, and whether it is installed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowStatus {
    /// The flow entry
    pub flow: FlowEntry,
    /// Whether the installation of the flow was confirmed
    pub installed: bool,
}

/// Bookkeeping of an accepted path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    /// Actor to notify once the path is installed
    pub requester: ActorRef,
    /// The path (with its assigned ID)
    pub path: Path,
    /// All flows of the path
    pub flows: Vec<FlowStatus>,
    /// Number of installed flows
    pub installed: usize,
    /// Time at which the path was accepted
    pub created: SystemTime,
}

impl PathRecord {
    /// Returns `true` if every flow of the path is installed
    pub fn is_complete(&self) -> bool {
        self.installed == self.flows.len()
    }
}

/// # Installation Tracker
///
/// Owns the path records and the ID counters.
#[derive(Debug, Clone)]
pub struct InstallTracker {
    identity: ActorRef,
    paths: Dict<PathRecord>,
    ids: IdAllocator,
}

impl InstallTracker {
    /// Create a new, empty tracker. `identity` is the receiver of the flow confirmations.
    pub fn new(identity: ActorRef) -> Self {
        Self::from_dicts(identity, Dict::new(PATH_DICT), IdAllocator::new())
    }

    /// Create the tracker from existing (restored) state.
    pub fn from_dicts(identity: ActorRef, paths: Dict<PathRecord>, ids: IdAllocator) -> Self {
        Self { identity, paths, ids }
    }

    /// Returns the dict of all path records
    pub fn paths(&self) -> &Dict<PathRecord> {
        &self.paths
    }

    /// Returns the record of a path
    pub fn record(&self, path_id: &str) -> Option<&PathRecord> {
        self.paths.get(path_id)
    }

    /// Returns the ID allocator
    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Returns the ID allocator mutably, for reserving flow IDs.
    pub fn ids_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    /// Accept a path with its compiled flows. A new path ID is assigned to the path and to all of
    /// its flows, the record is stored, and one `AddFlowEntry` command per flow is returned. If the
    /// path has no flows, it is complete immediately, and `PathAdded` is returned instead. Nothing
    /// is stored if no path ID can be reserved.
    pub fn track(
        &mut self,
        requester: ActorRef,
        mut path: Path,
        mut flows: Vec<FlowEntry>,
    ) -> Result<Vec<Command>, TrackerError> {
        path.id = encode_path_id(self.ids.reserve_path_id()?);
        for flow in flows.iter_mut() {
            flow.id = path.id.clone();
        }

        let commands: Vec<Command> = if flows.is_empty() {
            info!("Path {} has no flows, and is installed immediately", path.id);
            vec![Command::PathAdded { requester: requester.clone(), path: path.clone() }]
        } else {
            flows
                .iter()
                .map(|flow| {
                    debug!("Install flow {}", flow);
                    Command::AddFlowEntry { flow: flow.clone(), ack: self.identity.clone() }
                })
                .collect()
        };

        info!("Accepted path {} with {} flows from {}", path.id, flows.len(), requester);
        let record = PathRecord {
            requester,
            flows: flows.into_iter().map(|flow| FlowStatus { flow, installed: false }).collect(),
            installed: 0,
            created: SystemTime::now(),
            path: path.clone(),
        };
        self.paths.put(path.id, record);
        Ok(commands)
    }

    /// Confirm the installation of a flow. Returns `PathAdded` if this flow was the last missing
    /// flow of its path.
    pub fn confirm(&mut self, flow: &FlowEntry) -> Result<Option<Command>, TrackerError> {
        let record = self
            .paths
            .get_mut(&flow.id)
            .ok_or_else(|| TrackerError::UnknownPath(flow.id.clone()))?;

        let status = record
            .flows
            .iter_mut()
            .find(|s| s.flow.equals(flow))
            .ok_or_else(|| TrackerError::UnknownFlow(flow.id.clone(), flow.to_string()))?;
        if status.installed {
            return Err(TrackerError::AlreadyInstalled(flow.id.clone(), flow.to_string()));
        }
        status.installed = true;
        record.installed += 1;
        debug!(
            "Flow installed on {} ({} of {} for path {})",
            flow.node,
            record.installed,
            record.flows.len(),
            flow.id
        );

        if record.is_complete() {
            info!("Path {} is installed", record.path.id);
            Ok(Some(Command::PathAdded {
                requester: record.requester.clone(),
                path: record.path.clone(),
            }))
        } else {
            Ok(None)
        }
    }
}

/// Errors while tracking flow confirmations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// No path has the ID of the flow
    #[error("Flow confirmed for unknown path {0}")]
    UnknownPath(String),
    /// The path has no flow equal to the confirmed one
    #[error("Path {0} has no flow {1}")]
    UnknownFlow(String, String),
    /// The flow was confirmed before
    #[error("Flow {1} of path {0} is already installed")]
    AlreadyInstalled(String, String),
    /// No path ID is left
    #[error("Cannot assign a path ID: {0}")]
    Ids(#[from] IdError),
}
