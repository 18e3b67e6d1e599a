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

//! Export of the topology graph into a [`petgraph`] graph, and to Graphviz.

use super::TopologyGraph;
use crate::nom::{Link, Uid};
use petgraph::dot::Dot;
use petgraph::prelude::*;
use std::collections::HashMap;

/// Topology exported as a petgraph graph. Every link is an edge.
pub type ExportedGraph = DiGraph<Uid, Link>;

impl TopologyGraph {
    /// Build a petgraph graph of the topology. Returns the graph and the index of every node.
    /// Nodes without outgoing links are included when some link leads to them.
    pub fn to_petgraph(&self) -> (ExportedGraph, HashMap<Uid, NodeIndex>) {
        let mut graph = ExportedGraph::new();
        let mut indices: HashMap<Uid, NodeIndex> = HashMap::new();

        for origin in self.nodes() {
            indices.entry(origin.clone()).or_insert_with(|| graph.add_node(origin.clone()));
            for (dst, link) in self.neighbors(&origin) {
                let dst_idx =
                    *indices.entry(dst.clone()).or_insert_with(|| graph.add_node(dst.clone()));
                let src_idx = indices[&origin];
                graph.add_edge(src_idx, dst_idx, link.clone());
            }
        }

        (graph, indices)
    }

    /// Render the topology in the Graphviz DOT format. Nodes are labelled with their UID, and
    /// edges with the link they represent.
    pub fn to_dot(&self) -> String {
        let (graph, _) = self.to_petgraph();
        format!("{}", Dot::new(&graph))
    }
}
