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

//! Test the compilation of paths into flow entries

use crate::config::{CompilerConfig, InportAddressing, PathSelection};
use crate::discovery::TopologyGraph;
use crate::nom::*;
use crate::path::{PathCompiler, PathError};
use crate::topologies;
use maplit::hashmap;
use std::collections::HashMap;

fn compile(
    g: &TopologyGraph,
    config: &CompilerConfig,
    path: &Path,
) -> Result<Vec<FlowEntry>, PathError> {
    PathCompiler::new(g, config).compile(path)
}

fn forward(ports: &[&str]) -> Action {
    Action::Forward(ports.iter().map(|p| Uid::from(*p)).collect())
}

fn in_port(p: &str) -> Match {
    Match::new().with(Field::InPort(p.into()))
}

fn first_outport(flow: &FlowEntry) -> Option<&Uid> {
    flow.actions.iter().find_map(|a| match a {
        Action::Forward(ports) => ports.first(),
        _ => None,
    })
}

/// In-port and out-port of every flow, keyed by node.
fn ports_by_node(flows: &[FlowEntry]) -> HashMap<Uid, (Uid, Uid)> {
    flows
        .iter()
        .map(|f| {
            (
                f.node.clone(),
                (f.pattern.in_port().unwrap().clone(), first_outport(f).unwrap().clone()),
            )
        })
        .collect()
}

#[test]
fn end_to_end() {
    let g = topologies::two_branches().unwrap();
    let path = Path::new(1, vec![Pathlet::new(in_port("n1$$0"), vec![forward(&["n6$$3"])])]);
    let flows = compile(&g, &CompilerConfig::default(), &path).unwrap();

    let in_ports: Vec<&str> =
        flows.iter().map(|f| f.pattern.in_port().unwrap().as_str()).collect();
    let out_ports: Vec<&str> = flows.iter().map(|f| first_outport(f).unwrap().as_str()).collect();
    assert_eq!(in_ports, vec!["n1$$0", "n2$$1", "n4$$1", "n6$$1"]);
    assert_eq!(out_ports, vec!["n1$$1", "n2$$2", "n4$$2", "n6$$3"]);
    for f in flows.iter() {
        assert_eq!(f.priority, 1);
        assert!(f.id.is_empty());
        assert_eq!(f.node, f.pattern.in_port().unwrap().node_of_port().unwrap());
    }
}

#[test]
fn empty_path() {
    let g = topologies::two_branches().unwrap();
    let path = Path::new(1, vec![]);
    assert_eq!(compile(&g, &CompilerConfig::default(), &path), Err(PathError::EmptyPath));
}

#[test]
fn no_path() {
    let g = topologies::two_branches().unwrap();
    // n7 is not part of the topology
    let path = Path::new(1, vec![Pathlet::new(in_port("n1$$0"), vec![forward(&["n7$$1"])])]);
    assert_eq!(
        compile(&g, &CompilerConfig::default(), &path),
        Err(PathError::NoPath { from: "n1".into(), to: "n7$$1".into() })
    );
}

#[test]
fn local_delivery() {
    let g = topologies::two_branches().unwrap();
    let pattern = in_port("n1$$0").with(Field::EthType(ETH_TYPE_IPV4));
    let actions = vec![Action::PushVlan(7), forward(&["n1$$4"])];
    let path = Path::new(3, vec![Pathlet::new(pattern, actions.clone())]);
    let flows = compile(&g, &CompilerConfig::default(), &path).unwrap();
    assert_eq!(flows.len(), 1);
    assert_eq!(flows[0].node, Uid::from("n1"));
    assert_eq!(flows[0].actions, actions);
    assert_eq!(flows[0].priority, 3);
    assert!(flows[0].pattern.equals(&in_port("n1$$0").with(Field::EthType(ETH_TYPE_IPV4))));
}

#[test]
fn transit_actions() {
    let g = topologies::line(3).unwrap();
    let actions = vec![Action::PushVlan(7), forward(&["n3$$9"])];
    let path = Path::new(1, vec![Pathlet::new(in_port("n1$$9"), actions.clone())]);
    let flows = compile(&g, &CompilerConfig::default(), &path).unwrap();
    assert_eq!(flows.len(), 3);
    // transit flows carry the non-forwarding actions, and forward on the link
    assert_eq!(flows[0].actions, vec![Action::PushVlan(7), forward(&["n1$$1"])]);
    assert_eq!(flows[1].actions, vec![Action::PushVlan(7), forward(&["n2$$2"])]);
    // the terminal flow has all actions
    assert_eq!(flows[2].actions, actions);
}

#[test]
fn conflicting_inports() {
    let g = topologies::two_branches().unwrap();
    let path = Path::new(
        1,
        vec![
            Pathlet::new(in_port("n1$$0"), vec![forward(&["n2$$2"])]),
            Pathlet::new(in_port("n4$$1"), vec![forward(&["n6$$3"])]),
        ],
    );
    assert_eq!(
        compile(&g, &CompilerConfig::default(), &path),
        Err(PathError::Conflict { inherited: "n2$$2".into(), explicit: "n4$$1".into() })
    );
}

#[test]
fn mirrored_inports() {
    let g = topologies::two_branches().unwrap();
    let path = Path::new(
        1,
        vec![
            Pathlet::new(in_port("n1$$0"), vec![forward(&["n2$$2"])]),
            Pathlet::new(Match::new(), vec![forward(&["n6$$3"])]),
        ],
    );
    let flows = compile(&g, &CompilerConfig::default(), &path).unwrap();
    assert_eq!(flows.len(), 5);
    assert_eq!(ports_by_node(&flows[..2]), hashmap! {
        Uid::from("n1") => (Uid::from("n1$$0"), Uid::from("n1$$1")),
        Uid::from("n2") => (Uid::from("n2$$1"), Uid::from("n2$$2")),
    });
    // the second pathlet enters at the outport of the first one
    assert_eq!(ports_by_node(&flows[2..]), hashmap! {
        Uid::from("n2") => (Uid::from("n2$$2"), Uid::from("n2$$2")),
        Uid::from("n4") => (Uid::from("n4$$1"), Uid::from("n4$$2")),
        Uid::from("n6") => (Uid::from("n6$$1"), Uid::from("n6$$3")),
    });
}

#[test]
fn peer_inports() {
    let g = topologies::two_branches().unwrap();
    let config =
        CompilerConfig { inport_addressing: InportAddressing::Peer, ..CompilerConfig::default() };
    let path = Path::new(
        1,
        vec![
            Pathlet::new(in_port("n1$$0"), vec![forward(&["n2$$2"])]),
            Pathlet::new(Match::new(), vec![forward(&["n6$$3"])]),
        ],
    );
    let flows = compile(&g, &config, &path).unwrap();
    assert_eq!(ports_by_node(&flows[..2]), hashmap! {
        Uid::from("n1") => (Uid::from("n1$$0"), Uid::from("n1$$1")),
        Uid::from("n2") => (Uid::from("n2$$1"), Uid::from("n2$$2")),
    });
    assert_eq!(ports_by_node(&flows[2..]), hashmap! {
        Uid::from("n4") => (Uid::from("n4$$1"), Uid::from("n4$$2")),
        Uid::from("n6") => (Uid::from("n6$$1"), Uid::from("n6$$3")),
    });
}

#[test]
fn unconnected_outport_skips_pathlet() {
    let mut g = topologies::line(2).unwrap();
    // n5 cannot reach n1, which must not matter for the skipped pathlet
    g.add_link(Link::new("n5$$1", "n4$$1")).unwrap();
    // n2$$7 has no link, so the second pathlet has no inport
    let path = Path::new(
        1,
        vec![
            Pathlet::new(in_port("n1$$0"), vec![forward(&["n2$$7"])]),
            Pathlet::new(Match::new().with(Field::VlanId(4)), vec![forward(&["n1$$8"])]),
        ],
    );
    let flows = compile(&g, &CompilerConfig::default(), &path).unwrap();

    assert_eq!(flows.len(), 2);
    assert!(flows.iter().all(|f| !f.pattern.fields.contains(&Field::VlanId(4))));
    assert_eq!(
        ports_by_node(&flows),
        hashmap! {
            Uid::from("n1") => (Uid::from("n1$$0"), Uid::from("n1$$1")),
            Uid::from("n2") => (Uid::from("n2$$1"), Uid::from("n2$$7")),
        }
    );
}

#[test]
fn pathlet_after_skipped_starts_fresh() {
    let g = topologies::line(2).unwrap();
    let path = Path::new(
        1,
        vec![
            Pathlet::new(in_port("n1$$0"), vec![forward(&["n2$$7"])]),
            Pathlet::new(Match::new().with(Field::VlanId(4)), vec![forward(&["n1$$8"])]),
            Pathlet::new(Match::new().with(Field::VlanId(5)), vec![forward(&["n2$$9"])]),
        ],
    );
    let flows = compile(&g, &CompilerConfig::default(), &path).unwrap();

    assert!(flows.iter().all(|f| !f.pattern.fields.contains(&Field::VlanId(4))));
    let third: Vec<&FlowEntry> =
        flows.iter().filter(|f| f.pattern.fields.contains(&Field::VlanId(5))).collect();
    // from every node to n2, without an inport. The terminal flow on n2 is subsumed.
    assert_eq!(third.len(), 2);
    assert!(third.iter().all(|f| f.pattern.in_port().is_none()));
    assert!(third
        .iter()
        .any(|f| f.node == Uid::from("n1") && first_outport(f) == Some(&Uid::from("n1$$1"))));
    assert!(third
        .iter()
        .any(|f| f.node == Uid::from("n2") && first_outport(f) == Some(&Uid::from("n2$$9"))));
    assert_eq!(flows.len(), 4);
}

#[test]
fn all_or_first_route() {
    let g = topologies::disjoint_routes().unwrap();
    let path = Path::new(1, vec![Pathlet::new(in_port("n1$$0"), vec![forward(&["n4$$9"])])]);

    let all = compile(&g, &CompilerConfig::default(), &path).unwrap();
    let first_config =
        CompilerConfig { path_selection: PathSelection::First, ..CompilerConfig::default() };
    let first = compile(&g, &first_config, &path).unwrap();

    // all: two flows on n1 (one per route), one per intermediate node, two at the destination
    assert_eq!(all.len(), 6);
    assert_eq!(all.iter().filter(|f| f.node == Uid::from("n1")).count(), 2);
    assert_eq!(all.iter().filter(|f| f.node == Uid::from("n4")).count(), 2);
    assert_eq!(first.len(), 3);
    assert_eq!(first.iter().map(|f| f.node.as_str()).collect::<Vec<_>>(), vec!["n1", "n2", "n4"]);
}

#[test]
fn flood() {
    let g = topologies::disjoint_routes().unwrap();
    // flood on n1, except for the inport n1$$0: leaves through n1$$1 (to n2) and n1$$2 (to n3)
    let path = Path::new(
        1,
        vec![Pathlet::new(in_port("n1$$0"), vec![Action::Flood { in_port: "n1$$0".into() }])],
    );
    let flows = compile(&g, &CompilerConfig::default(), &path).unwrap();
    // both outports are on n1 itself, so the two local flows are identical
    let nodes: Vec<&str> = flows.iter().map(|f| f.node.as_str()).collect();
    assert_eq!(nodes, vec!["n1"]);
    assert!(flows.iter().all(|f| f.actions == vec![Action::Flood { in_port: "n1$$0".into() }]));
}

#[test]
fn timeouts() {
    let g = topologies::line(2).unwrap();
    let config = CompilerConfig {
        idle_timeout_secs: 10,
        hard_timeout_secs: 60,
        ..CompilerConfig::default()
    };
    let path = Path::new(1, vec![Pathlet::new(in_port("n1$$0"), vec![forward(&["n2$$5"])])]);
    let flows = compile(&g, &config, &path).unwrap();
    assert_eq!(flows.len(), 2);
    for f in flows {
        assert_eq!(f.idle_timeout.as_secs(), 10);
        assert_eq!(f.hard_timeout.as_secs(), 60);
    }
}
