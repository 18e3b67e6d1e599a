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

//! # Configuration
//!
//! The controller is configured using a [`ControllerConfig`], which can be read from a JSON file.
//! Every field has a default value, such that an empty JSON object (or no file at all) is a valid
//! configuration.

use crate::nom::ActorRef;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Name of the application, used for the default controller identity.
pub const APP_NAME: &str = "path";

/// Which of the shortest routes between two nodes are compiled into flow entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSelection {
    /// Every shortest route gets flow entries
    All,
    /// Only the first shortest route gets flow entries
    First,
}

impl Default for PathSelection {
    fn default() -> Self {
        Self::All
    }
}

/// How the outport of one pathlet is turned into the inport of the next pathlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InportAddressing {
    /// The outport UID itself is used as the inport of the next pathlet. It is only kept if some
    /// link starts at this port.
    Mirrored,
    /// The ports at the far end of the links starting at the outport are used as the inports of
    /// the next pathlet.
    Peer,
}

impl Default for InportAddressing {
    fn default() -> Self {
        Self::Mirrored
    }
}

/// Configuration of the path compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Which shortest routes are used
    pub path_selection: PathSelection,
    /// How inports are inherited between pathlets
    pub inport_addressing: InportAddressing,
    /// Idle timeout of generated flow entries in seconds (0 means no timeout)
    pub idle_timeout_secs: u64,
    /// Hard timeout of generated flow entries in seconds (0 means no timeout)
    pub hard_timeout_secs: u64,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            path_selection: PathSelection::default(),
            inport_addressing: InportAddressing::default(),
            idle_timeout_secs: 0,
            hard_timeout_secs: 0,
        }
    }
}

impl CompilerConfig {
    /// Idle timeout of generated flow entries
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Hard timeout of generated flow entries
    pub fn hard_timeout(&self) -> Duration {
        Duration::from_secs(self.hard_timeout_secs)
    }
}

/// Configuration of the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Identity of the controller, used as the receiver of flow installation confirmations
    pub identity: ActorRef,
    /// Directory in which the persistent state is stored. If `None`, nothing is persisted.
    pub state_dir: Option<PathBuf>,
    /// Configuration of the path compiler
    pub compiler: CompilerConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            identity: ActorRef::new(APP_NAME, "0"),
            state_dir: None,
            compiler: CompilerConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Read the configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Errors while reading the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file cannot be read
    #[error("Cannot read the configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid configuration
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}
