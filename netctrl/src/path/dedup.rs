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

//! Removal of redundant flow entries.

use crate::nom::FlowEntry;

/// Remove all flow entries which are made redundant by another entry of the list. An entry is
/// redundant if some other entry strictly subsumes it, or if an earlier entry is equal to it.
/// The order of the remaining entries is preserved.
///
/// An entry subsumes itself, and two equal entries subsume each other. Only subsumption without
/// equality removes an entry, such that of several equal entries, exactly the first one remains.
pub fn dedup_flows(flows: Vec<FlowEntry>) -> Vec<FlowEntry> {
    let redundant: Vec<bool> = flows
        .iter()
        .enumerate()
        .map(|(i, fi)| {
            flows.iter().enumerate().any(|(j, fj)| {
                i != j && ((fj.subsumes(fi) && !fj.equals(fi)) || (j < i && fj.equals(fi)))
            })
        })
        .collect();

    flows
        .into_iter()
        .zip(redundant.into_iter())
        .filter_map(|(f, redundant)| if redundant { None } else { Some(f) })
        .collect()
}
