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

//! Allocation of path and flow IDs from persistent counters.

use crate::store::Dict;
use std::ops::Range;
use thiserror::Error;

/// Name of the dict storing the counters
pub const ID_DICT: &str = "ID";
const PATH_COUNTER: &str = "path";
const FLOW_COUNTER: &str = "flow";

/// Monotonically increasing counters for path IDs and flow IDs. The next free value of every
/// counter is stored in a [`Dict`], such that IDs are never reused after a restore.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    counters: Dict<u64>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Create a new allocator, starting every counter at 0.
    pub fn new() -> Self {
        Self { counters: Dict::new(ID_DICT) }
    }

    /// Create the allocator from an existing (restored) dict
    pub fn from_dict(counters: Dict<u64>) -> Self {
        Self { counters }
    }

    /// Returns the underlying dict
    pub fn dict(&self) -> &Dict<u64> {
        &self.counters
    }

    /// Reserve the next path ID
    pub fn reserve_path_id(&mut self) -> Result<u64, IdError> {
        Ok(self.reserve(PATH_COUNTER, 1)?.start)
    }

    /// Reserve `count` consecutive flow IDs
    pub fn reserve_flow_ids(&mut self, count: u64) -> Result<Range<u64>, IdError> {
        self.reserve(FLOW_COUNTER, count)
    }

    /// The counter is left untouched if it cannot hold `count` more IDs.
    fn reserve(&mut self, counter: &str, count: u64) -> Result<Range<u64>, IdError> {
        let next = self.counters.entry_or_default(counter);
        let start = *next;
        let end = start
            .checked_add(count)
            .ok_or_else(|| IdError::Exhausted { counter: counter.to_string(), start, count })?;
        *next = end;
        Ok(start..end)
    }
}

/// Errors while allocating IDs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IdError {
    /// The counter would overflow
    #[error("Counter {counter} at {start} cannot reserve {count} more IDs")]
    Exhausted {
        /// Name of the counter
        counter: String,
        /// Next free value of the counter
        start: u64,
        /// Number of requested IDs
        count: u64,
    },
}

/// Encode a path ID as a lower-case hexadecimal string.
pub fn encode_path_id(id: u64) -> String {
    format!("{:x}", id)
}
