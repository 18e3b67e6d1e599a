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

//! # Keyed Stores
//!
//! A [`Dict`] is a named, ordered key-value store. Every piece of persistent controller state lives
//! in exactly one dict, which is owned by exactly one component. Dicts can be written to and read
//! from a directory as JSON snapshots, one file per dict.

use log::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Named key-value store with ordered keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dict<V> {
    name: String,
    entries: BTreeMap<String, V>,
}

impl<V> Dict<V> {
    /// Create an empty dict
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), entries: BTreeMap::new() }
    }

    /// Returns the name of the dict
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a reference to the value stored at `key`
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Returns a mutable reference to the value stored at `key`
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Store a value, returning the old one.
    pub fn put<S: Into<String>>(&mut self, key: S, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    /// Remove the value stored at `key`
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key)
    }

    /// Returns `true` if a value is stored at `key`
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over all keys in order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Iterate over all entries in key order
    pub fn iter(&self) -> btree_map::Iter<'_, String, V> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the dict has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Default> Dict<V> {
    /// Returns a mutable reference to the value at `key`, inserting the default value if absent.
    pub fn entry_or_default<S: Into<String>>(&mut self, key: S) -> &mut V {
        self.entries.entry(key.into()).or_default()
    }
}

impl<V> Dict<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Path of the snapshot of the dict named `name` inside `dir`.
    pub fn snapshot_path(name: &str, dir: &Path) -> PathBuf {
        dir.join(format!("{}.json", name))
    }

    /// Write a JSON snapshot of the dict into `dir`, creating the directory if necessary.
    pub fn save(&self, dir: &Path) -> Result<(), StoreError> {
        fs::create_dir_all(dir)?;
        let path = Self::snapshot_path(&self.name, dir);
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, &self.entries)?;
        debug!("Saved {} entries of dict {} to {:?}", self.len(), self.name, path);
        Ok(())
    }

    /// Load the dict named `name` from its snapshot in `dir`. If no snapshot exists, an empty dict
    /// is returned.
    pub fn load<S: Into<String>>(name: S, dir: &Path) -> Result<Self, StoreError> {
        let name = name.into();
        let path = Self::snapshot_path(&name, dir);
        if !path.exists() {
            debug!("No snapshot of dict {} in {:?}", name, dir);
            return Ok(Self::new(name));
        }
        let reader = BufReader::new(File::open(&path)?);
        let entries: BTreeMap<String, V> = serde_json::from_reader(reader)?;
        info!("Restored {} entries of dict {} from {:?}", entries.len(), name, path);
        Ok(Self { name, entries })
    }
}

impl<'a, V> IntoIterator for &'a Dict<V> {
    type Item = (&'a String, &'a V);
    type IntoIter = btree_map::Iter<'a, String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Errors while saving or loading a dict
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error while accessing the file system
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    /// Error while encoding or decoding the snapshot
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
}
