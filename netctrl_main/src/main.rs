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

use netctrl::config::{ControllerConfig, InportAddressing, PathSelection};
use netctrl::controller::{Controller, ControllerHandle};
use netctrl::discovery::{shortest_paths, TopologyGraph};
use netctrl::nom::*;
use netctrl::topologies;

use clap::{Args, Parser, Subcommand};
use log::*;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

fn main() -> Result<(), Box<dyn Error>> {
    // initialize the env logger
    pretty_env_logger::init();

    // run clap
    let args = CommandLineArguments::parse();
    let config = args.config()?;

    // match on the action
    match args.cmd {
        MainCommand::Dot { topology } => {
            let graph = topology.build()?;
            println!("{}", graph.to_dot());
        }
        MainCommand::Routes { from, to, topology } => {
            let graph = topology.build()?;
            match shortest_paths(&graph, &from.as_str().into(), &to.as_str().into())? {
                Some(sp) => {
                    println!(
                        "{} routes of length {} from {} to {}",
                        sp.paths.len(),
                        sp.length,
                        from,
                        to
                    );
                    for route in sp.paths {
                        let hops: Vec<String> = route.iter().map(|l| l.to_string()).collect();
                        println!("  {}", hops.join(", "));
                    }
                }
                None => println!("{} is not reachable from {}", to, from),
            }
        }
        MainCommand::Compile { path, topology } => {
            let graph = topology.build()?;
            let path = path.load()?;
            let mut controller = Controller::new(config);
            feed_links(&mut controller, &graph)?;
            let flows = controller.compile_path(&path)?;
            println!("{}", serde_json::to_string_pretty(&flows)?);
        }
        MainCommand::Demo { path, topology } => {
            let graph = topology.build()?;
            let path = path.load()?;
            demo(config, &graph, path)?;
        }
    }

    Ok(())
}

/// Feed all links of the topology into the controller, as if they were discovered.
fn feed_links(controller: &mut Controller, graph: &TopologyGraph) -> Result<(), netctrl::Error> {
    for link in graph.all_links() {
        controller.handle(Event::LinkAdded(link.clone()))?;
    }
    Ok(())
}

/// Run the controller on its own thread, install the path, and confirm every flow as soon as it
/// is emitted.
fn demo(
    config: ControllerConfig,
    graph: &TopologyGraph,
    path: Path,
) -> Result<(), Box<dyn Error>> {
    let mut controller = Controller::restore(config)?;
    feed_links(&mut controller, graph)?;
    let handle = ControllerHandle::spawn(controller);

    let requester = ActorRef::new("demo", "0");
    handle.send(Event::AddPath { requester, path })?;

    loop {
        match handle.commands().recv_timeout(Duration::from_secs(1)) {
            Ok(Command::AddFlowEntry { flow, ack }) => {
                println!("install {} (ack to {})", flow, ack);
                handle.send(Event::FlowEntryAdded(flow))?;
            }
            Ok(Command::PathAdded { requester, path }) => {
                println!("path {} installed, notify {}", path.id, requester);
                break;
            }
            Ok(Command::PathRejected { requester, reason, .. }) => {
                println!("path rejected, notify {}: {}", requester, reason);
                break;
            }
            Err(e) => {
                error!("No answer from the controller: {}", e);
                break;
            }
        }
    }

    let controller = handle.shutdown()?;
    info!("{} paths known to the controller", controller.tracker().paths().len());
    Ok(())
}

#[derive(Parser, Debug)]
#[clap(name = "netctrl", author = "Tibor Schneider")]
struct CommandLineArguments {
    /// Controller configuration (JSON)
    #[clap(short = 'c', long)]
    config: Option<String>,
    /// Compile only the first of all shortest routes
    #[clap(long)]
    first_route: bool,
    /// Inherit the inports of pathlets from the far end of the links
    #[clap(long)]
    peer_inports: bool,
    /// Action to perform
    #[clap(subcommand)]
    cmd: MainCommand,
}

impl CommandLineArguments {
    /// Read the configuration file, and apply the command-line flags on top of it.
    fn config(&self) -> Result<ControllerConfig, Box<dyn Error>> {
        let mut config = match self.config.as_ref() {
            Some(file) => ControllerConfig::from_file(file)?,
            None => ControllerConfig::default(),
        };
        if self.first_route {
            config.compiler.path_selection = PathSelection::First;
        }
        if self.peer_inports {
            config.compiler.inport_addressing = InportAddressing::Peer;
        }
        debug!("Configuration: {:?}", config);
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
enum MainCommand {
    /// Print the topology in the Graphviz format
    #[clap(name = "dot")]
    Dot {
        /// Topology to use
        #[clap(subcommand)]
        topology: TopologySelection,
    },
    /// Print all shortest routes between two nodes
    #[clap(name = "routes")]
    Routes {
        /// Source node
        #[clap(short = 'f', long)]
        from: String,
        /// Destination node
        #[clap(short = 't', long)]
        to: String,
        /// Topology to use
        #[clap(subcommand)]
        topology: TopologySelection,
    },
    /// Compile a path, and print the flow entries as JSON
    #[clap(name = "compile")]
    Compile {
        /// Path to compile
        #[clap(flatten)]
        path: PathArguments,
        /// Topology to use
        #[clap(subcommand)]
        topology: TopologySelection,
    },
    /// Run the controller, install a path and confirm all flows
    #[clap(name = "demo")]
    Demo {
        /// Path to install
        #[clap(flatten)]
        path: PathArguments,
        /// Topology to use
        #[clap(subcommand)]
        topology: TopologySelection,
    },
}

#[derive(Args, Debug)]
struct PathArguments {
    /// Read the path from a JSON file instead of the ports
    #[clap(long = "json")]
    json_filename: Option<String>,
    /// Port at which the traffic enters
    #[clap(short = 'f', long, default_value = "n1$$0")]
    from: String,
    /// Port at which the traffic leaves
    #[clap(short = 't', long, default_value = "n6$$3")]
    to: String,
    /// Priority of the flows
    #[clap(short = 'p', long, default_value = "1")]
    priority: u16,
}

impl PathArguments {
    fn load(&self) -> Result<Path, Box<dyn Error>> {
        if let Some(filename) = self.json_filename.as_ref() {
            return Ok(serde_json::from_reader(BufReader::new(File::open(filename)?))?);
        }
        Ok(Path::new(
            self.priority,
            vec![Pathlet::new(
                Match::new().with(Field::InPort(self.from.as_str().into())),
                vec![Action::Forward(vec![self.to.as_str().into()])],
            )],
        ))
    }
}

#[derive(Subcommand, Debug)]
enum TopologySelection {
    /// Nodes connected in a line
    #[clap(name = "line")]
    Line {
        /// Number of nodes
        #[clap(default_value = "6")]
        n: usize,
    },
    /// Nodes connected in a ring
    #[clap(name = "ring")]
    Ring {
        /// Number of nodes
        #[clap(default_value = "6")]
        n: usize,
    },
    /// Grid of nodes
    #[clap(name = "grid")]
    Grid {
        /// Number of columns
        #[clap(default_value = "3")]
        width: usize,
        /// Number of rows
        #[clap(default_value = "2")]
        height: usize,
    },
    /// Random topology
    #[clap(name = "random")]
    Random {
        /// Number of nodes
        #[clap(default_value = "10")]
        n: usize,
        /// Probability that two nodes are connected
        #[clap(short = 'p', long, default_value = "0.3", validator = probability)]
        prob: f64,
        /// Seed for the random generator
        #[clap(short = 's', long, default_value = "42")]
        seed: u64,
    },
    /// Two disjoint routes from n1 to n4
    #[clap(name = "disjoint")]
    Disjoint,
    /// Six nodes with two branches meeting at n6
    #[clap(name = "branches")]
    TwoBranches,
}

/// Accepts numbers in `[0, 1]`.
fn probability(s: &str) -> Result<(), String> {
    match s.parse::<f64>() {
        Ok(p) if (0.0..=1.0).contains(&p) => Ok(()),
        Ok(p) => Err(format!("{} is not a probability", p)),
        Err(e) => Err(e.to_string()),
    }
}

impl TopologySelection {
    fn build(&self) -> Result<TopologyGraph, netctrl::discovery::GraphError> {
        match self {
            Self::Line { n } => topologies::line(*n),
            Self::Ring { n } => topologies::ring(*n),
            Self::Grid { width, height } => topologies::grid(*width, *height),
            Self::Random { n, prob, seed } => topologies::random(*n, *prob, *seed),
            Self::Disjoint => topologies::disjoint_routes(),
            Self::TwoBranches => topologies::two_branches(),
        }
    }
}
