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

//! Module containing the main error type

use crate::config::ConfigError;
use crate::discovery::GraphError;
use crate::path::{PathError, TrackerError};
use crate::store::StoreError;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// Error propagated from the topology graph
    #[error("Topology Error: {0}")]
    GraphError(#[from] GraphError),
    /// Error while compiling a path
    #[error("Path Error: {0}")]
    PathError(#[from] PathError),
    /// Error while tracking the installation of a path
    #[error("Tracker Error: {0}")]
    TrackerError(#[from] TrackerError),
    /// Error while persisting or restoring the state
    #[error("Store Error: {0}")]
    StoreError(#[from] StoreError),
    /// Error in the configuration
    #[error("Config Error: {0}")]
    ConfigError(#[from] ConfigError),
    /// The requested operation is not implemented
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
    /// The controller thread is no longer running
    #[error("The controller is disconnected")]
    Disconnected,
}
