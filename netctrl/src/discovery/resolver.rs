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

//! # Shortest-Multipath Resolver
//!
//! Computes the minimal hop count between two nodes of the [`TopologyGraph`], together with every
//! sequence of links achieving it. All links have the same cost.

use super::{GraphError, TopologyGraph};
use crate::nom::{Link, Uid};
use log::*;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::rc::Rc;

/// Result of the shortest-multipath search
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    /// Number of hops of every shortest path
    pub length: usize,
    /// All link sequences of minimal length. Empty if source and destination are the same node.
    pub paths: Vec<Vec<Link>>,
}

/// Distance of a finalized node, and all links on some shortest path into this node.
#[derive(Debug, Default)]
struct Visit {
    dist: usize,
    back_links: Vec<(Uid, Link)>,
}

/// Compute all shortest paths from `from` to `to`. Returns `Ok(None)` if `to` is not reachable.
///
/// ```
/// use netctrl::discovery::{shortest_paths, TopologyGraph};
/// use netctrl::nom::{Link, Uid};
///
/// let mut g = TopologyGraph::new();
/// g.add_link(Link::new("a$$1", "b$$1")).unwrap();
/// g.add_link(Link::new("b$$2", "c$$1")).unwrap();
/// let sp = shortest_paths(&g, &Uid::from("a"), &Uid::from("c")).unwrap().unwrap();
/// assert_eq!(sp.length, 2);
/// assert_eq!(sp.paths.len(), 1);
/// assert!(shortest_paths(&g, &Uid::from("c"), &Uid::from("a")).unwrap().is_none());
/// ```
pub fn shortest_paths(
    graph: &TopologyGraph,
    from: &Uid,
    to: &Uid,
) -> Result<Option<ShortestPaths>, GraphError> {
    if from == to {
        return Ok(Some(ShortestPaths { length: 0, paths: Vec::new() }));
    }

    let mut visited: HashMap<Uid, Visit> = HashMap::new();
    visited.insert(from.clone(), Visit::default());

    let mut queue: BinaryHeap<Reverse<(usize, Uid)>> = BinaryHeap::new();
    queue.push(Reverse((0, from.clone())));

    while let Some(Reverse((dist, node))) = queue.pop() {
        // the destination is never expanded
        if &node == to {
            continue;
        }
        for (next, link) in graph.neighbors(&node) {
            match visited.get_mut(next) {
                Some(v) if v.dist == dist + 1 => v.back_links.push((node.clone(), link.clone())),
                Some(v) if v.dist > dist + 1 => {
                    return Err(GraphError::InvalidDistance {
                        node: next.clone(),
                        recorded: v.dist,
                        reached: dist + 1,
                    })
                }
                Some(_) => {}
                None => {
                    visited.insert(
                        next.clone(),
                        Visit { dist: dist + 1, back_links: vec![(node.clone(), link.clone())] },
                    );
                    queue.push(Reverse((dist + 1, next.clone())));
                }
            }
        }
    }

    let length = match visited.get(to) {
        Some(v) => v.dist,
        None => {
            trace!("{} is not reachable from {}", to, from);
            return Ok(None);
        }
    };

    let mut memo = HashMap::new();
    let paths = reconstruct(from, to, &visited, &mut memo);
    trace!("{} shortest paths of length {} from {} to {}", paths.len(), length, from, to);
    Ok(Some(ShortestPaths { length, paths: paths.as_ref().clone() }))
}

/// Expand the back-links from `node` down to `from`. Every node is expanded at most once.
fn reconstruct(
    from: &Uid,
    node: &Uid,
    visited: &HashMap<Uid, Visit>,
    memo: &mut HashMap<Uid, Rc<Vec<Vec<Link>>>>,
) -> Rc<Vec<Vec<Link>>> {
    if node == from {
        return Rc::new(vec![Vec::new()]);
    }
    if let Some(paths) = memo.get(node) {
        return paths.clone();
    }

    let mut paths = Vec::new();
    if let Some(visit) = visited.get(node) {
        for (prev, link) in visit.back_links.iter() {
            for prefix in reconstruct(from, prev, visited, memo).iter() {
                let mut path = prefix.clone();
                path.push(link.clone());
                paths.push(path);
            }
        }
    }

    let paths = Rc::new(paths);
    memo.insert(node.clone(), paths.clone());
    paths
}
