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

//! # Example Topologies
//!
//! Topologies for testing and for the command-line tool. Nodes are named `n1`, `n2`, and so on,
//! and every node numbers its ports in the order in which they are connected, starting at 1. All
//! connections are bidirectional (two links, one in each direction).

use crate::discovery::{GraphError, TopologyGraph};
use crate::nom::{Link, Uid};
use rand::prelude::*;
use std::collections::HashMap;

/// Incrementally builds a topology, allocating ports on every node.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    graph: TopologyGraph,
    next_port: HashMap<String, usize>,
}

impl TopologyBuilder {
    /// Create a builder for an empty topology
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next free port on `node`
    pub fn port(&mut self, node: &str) -> Uid {
        let next = self.next_port.entry(node.to_string()).or_insert(1);
        let port = Uid::join(&[node, next.to_string().as_str()]);
        *next += 1;
        port
    }

    /// Connect two nodes with a new port on each side, in both directions.
    pub fn connect(&mut self, a: &str, b: &str) -> Result<&mut Self, GraphError> {
        let pa = self.port(a);
        let pb = self.port(b);
        self.graph.add_link(Link::new(pa.clone(), pb.clone()))?;
        self.graph.add_link(Link::new(pb, pa))?;
        Ok(self)
    }

    /// Returns the topology
    pub fn build(self) -> TopologyGraph {
        self.graph
    }
}

/// Name of the `i`-th node (starting at 1)
pub fn node_name(i: usize) -> String {
    format!("n{}", i)
}

/// Line topology `n1 - n2 - ... - nN`
pub fn line(n: usize) -> Result<TopologyGraph, GraphError> {
    let mut b = TopologyBuilder::new();
    for i in 1..n {
        b.connect(&node_name(i), &node_name(i + 1))?;
    }
    Ok(b.build())
}

/// Ring topology `n1 - n2 - ... - nN - n1`
pub fn ring(n: usize) -> Result<TopologyGraph, GraphError> {
    let mut b = TopologyBuilder::new();
    for i in 1..n {
        b.connect(&node_name(i), &node_name(i + 1))?;
    }
    if n > 2 {
        b.connect(&node_name(n), &node_name(1))?;
    }
    Ok(b.build())
}

/// Grid with `width` columns and `height` rows. Node `n(r * width + c + 1)` is in row `r` and
/// column `c`.
pub fn grid(width: usize, height: usize) -> Result<TopologyGraph, GraphError> {
    let mut b = TopologyBuilder::new();
    let name = |r: usize, c: usize| node_name(r * width + c + 1);
    for r in 0..height {
        for c in 0..width {
            if c + 1 < width {
                b.connect(&name(r, c), &name(r, c + 1))?;
            }
            if r + 1 < height {
                b.connect(&name(r, c), &name(r + 1, c))?;
            }
        }
    }
    Ok(b.build())
}

/// Random topology with `n` nodes, where every pair of nodes is connected with probability `p`.
/// The same seed always generates the same topology. `p` is clamped to `[0, 1]`, and `NaN` is
/// treated as 0.
pub fn random(n: usize, p: f64, seed: u64) -> Result<TopologyGraph, GraphError> {
    let p = p.max(0.0).min(1.0);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut b = TopologyBuilder::new();
    for i in 1..=n {
        for j in (i + 1)..=n {
            if rng.gen_bool(p) {
                b.connect(&node_name(i), &node_name(j))?;
            }
        }
    }
    Ok(b.build())
}

/// Two node-disjoint routes of equal length from `n1` to `n4`: `n1 - n2 - n4` and
/// `n1 - n3 - n4`.
pub fn disjoint_routes() -> Result<TopologyGraph, GraphError> {
    let mut b = TopologyBuilder::new();
    b.connect("n1", "n2")?.connect("n2", "n4")?.connect("n1", "n3")?.connect("n3", "n4")?;
    Ok(b.build())
}

/// Six nodes with two branches, `n1 - n2 - n4 - n6` and `n3 - n5 - n6`. The ports are fixed, such
/// that `n1 -> n6` leaves through `n1$$1`, `n2$$2` and `n4$$2`, and enters through `n2$$1`,
/// `n4$$1` and `n6$$1`.
pub fn two_branches() -> Result<TopologyGraph, GraphError> {
    let mut g = TopologyGraph::new();
    for (a, b) in &[
        ("n1$$1", "n2$$1"),
        ("n2$$2", "n4$$1"),
        ("n3$$2", "n5$$1"),
        ("n4$$2", "n6$$1"),
        ("n5$$2", "n6$$2"),
    ] {
        g.add_link(Link::new(*a, *b))?;
        g.add_link(Link::new(*b, *a))?;
    }
    Ok(g)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builder_ports() {
        let mut b = TopologyBuilder::new();
        b.connect("a", "b").unwrap().connect("a", "c").unwrap();
        let g = b.build();
        assert!(g.has_link_from(&Uid::from("a$$1")));
        assert!(g.has_link_from(&Uid::from("a$$2")));
        assert!(g.has_link_from(&Uid::from("b$$1")));
        assert!(!g.has_link_from(&Uid::from("b$$2")));
        assert_eq!(g.num_links(), 4);
    }

    #[test]
    fn grid_links() {
        // 3x2 grid has 7 edges
        assert_eq!(grid(3, 2).unwrap().num_links(), 14);
        assert_eq!(ring(4).unwrap().num_links(), 8);
        assert_eq!(line(6).unwrap().num_links(), 10);
    }

    #[test]
    fn random_is_deterministic() {
        let a = random(12, 0.3, 42).unwrap();
        let b = random(12, 0.3, 42).unwrap();
        assert_eq!(a.all_links().collect::<Vec<_>>(), b.all_links().collect::<Vec<_>>());
    }

    #[test]
    fn random_probability_out_of_range() {
        // complete graph with 5 nodes has 10 edges
        assert_eq!(random(5, 1.5, 1).unwrap().num_links(), 20);
        assert_eq!(random(5, -0.5, 1).unwrap().num_links(), 0);
        assert_eq!(random(5, f64::NAN, 1).unwrap().num_links(), 0);
    }
}
