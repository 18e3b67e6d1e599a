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

//! Test the topology graph store

use crate::discovery::{GraphError, TopologyGraph};
use crate::nom::{Link, Uid, UidError};
use crate::topologies;
use maplit::btreeset;
use std::collections::BTreeSet;

fn nodes(g: &TopologyGraph) -> BTreeSet<Uid> {
    g.nodes().collect()
}

#[test]
fn add_links() {
    let mut g = TopologyGraph::new();
    g.add_link(Link::new("n1$$1", "n2$$1")).unwrap();
    g.add_link(Link::new("n1$$2", "n3$$1")).unwrap();
    g.add_link(Link::new("n2$$1", "n1$$1")).unwrap();

    assert_eq!(nodes(&g), btreeset! {Uid::from("n1"), Uid::from("n2")});
    assert_eq!(g.links(&"n1".into()).count(), 2);
    assert_eq!(g.links(&"n2".into()).count(), 1);
    assert_eq!(g.links(&"n3".into()).count(), 0);
    assert_eq!(
        g.neighbors(&"n1".into()).map(|(n, _)| n.clone()).collect::<BTreeSet<_>>(),
        btreeset! {Uid::from("n2"), Uid::from("n3")}
    );
    assert!(g.has_link_from(&"n1$$2".into()));
    assert!(!g.has_link_from(&"n3$$1".into()));
}

#[test]
fn reject_self_loop() {
    let mut g = topologies::line(3).unwrap();
    let before = g.dict().clone();

    assert_eq!(
        g.add_link(Link::new("n1$$5", "n1$$6")),
        Err(GraphError::SelfLoop("n1$$5$$0".into(), "n1".into()))
    );
    // a loop hidden in a multi-destination link
    let link = Link { to: vec!["n2$$7".into(), "n1$$6".into()], ..Link::new("n1$$5", "n2$$7") };
    assert!(g.add_link(link).is_err());

    assert_eq!(g.dict(), &before);
}

#[test]
fn reject_malformed() {
    let mut g = TopologyGraph::new();
    assert_eq!(
        g.add_link(Link::new("n1", "n2$$1")),
        Err(GraphError::MalformedLink(UidError::MalformedPort("n1".into())))
    );
    assert!(g.add_link(Link::new("n1$$1", "n2$$1$$3")).is_err());
    let no_dst = Link { to: vec![], ..Link::new("n1$$1", "n2$$1") };
    assert_eq!(g.add_link(no_dst), Err(GraphError::NoDestination("n1$$1$$0".into())));
    assert_eq!(g.num_links(), 0);
}

#[test]
fn multi_destination_link() {
    let mut g = TopologyGraph::new();
    let link = Link {
        to: vec!["n2$$1".into(), "n3$$1".into(), "n2$$2".into()],
        ..Link::new("n1$$1", "n2$$1")
    };
    g.add_link(link).unwrap();

    let to_n2: Vec<&Link> = g.links_between(&"n1".into(), &"n2".into()).collect();
    let to_n3: Vec<&Link> = g.links_between(&"n1".into(), &"n3".into()).collect();
    assert_eq!(to_n2.len(), 1);
    assert_eq!(to_n2[0].to, vec![Uid::from("n2$$1"), Uid::from("n2$$2")]);
    assert_eq!(to_n3.len(), 1);
    assert_eq!(to_n3[0].to, vec![Uid::from("n3$$1")]);
}

#[test]
fn replace_link() {
    let mut g = TopologyGraph::new();
    g.add_link(Link::new("n1$$1", "n2$$1")).unwrap();
    // same identity, new destination
    g.add_link(Link::new("n1$$1", "n3$$1")).unwrap();
    assert_eq!(g.num_links(), 1);
    assert_eq!(g.links_between(&"n1".into(), &"n2".into()).count(), 0);
    assert_eq!(g.links_between(&"n1".into(), &"n3".into()).count(), 1);

    // parallel link with a different id
    g.add_link(Link::new("n1$$1", "n3$$1").with_id("1")).unwrap();
    assert_eq!(g.num_links(), 2);
}

#[test]
fn remove_link() {
    let mut g = TopologyGraph::new();
    g.add_link(Link::new("n1$$1", "n2$$1")).unwrap();
    g.add_link(Link::new("n1$$2", "n3$$1")).unwrap();

    assert_eq!(g.remove_link(&Link::new("n1$$1", "n2$$1")), Ok(true));
    assert_eq!(g.remove_link(&Link::new("n1$$1", "n2$$1")), Ok(false));
    assert_eq!(g.links_between(&"n1".into(), &"n2".into()).count(), 0);
    assert_eq!(nodes(&g), btreeset! {Uid::from("n1")});

    assert_eq!(g.remove_link(&Link::new("n1$$2", "n3$$1")), Ok(true));
    assert!(g.dict().is_empty());
    assert_eq!(nodes(&g), BTreeSet::new());
}

#[test]
fn export() {
    let g = topologies::line(3).unwrap();
    let (pg, indices) = g.to_petgraph();
    assert_eq!(pg.node_count(), 3);
    assert_eq!(pg.edge_count(), 4);
    assert!(pg.contains_edge(indices[&Uid::from("n1")], indices[&Uid::from("n2")]));
    assert!(!pg.contains_edge(indices[&Uid::from("n1")], indices[&Uid::from("n3")]));

    let dot = g.to_dot();
    assert!(dot.starts_with("digraph {"));
    assert!(dot.contains("n1$$1 -> [n2$$1]"));
}
