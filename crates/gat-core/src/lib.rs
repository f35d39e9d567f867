//! # gat-core: Power Grid Modeling Core
//!
//! Data structures for the network model that carbon annotation runs over.
//!
//! ## Design Philosophy
//!
//! Networks are modeled as **undirected multigraphs** where:
//! - **Nodes**: Buses (bus), Generators (gen), Loads (load)
//! - **Edges**: Branches (lines and transformers)
//!
//! The generator nodes together form the "generator table": every [`Gen`] has
//! a `bus` column and a mutable `gci` column holding its greenhouse-gas
//! intensity once annotated.
//!
//! ## Quick Start
//!
//! ```rust
//! use gat_core::*;
//!
//! let mut network = Network::new();
//!
//! let bus1 = network.graph.add_node(Node::Bus(Bus::new(BusId::new(1), "Bus 1")));
//! let bus2 = network.graph.add_node(Node::Bus(Bus::new(BusId::new(2), "Bus 2")));
//! network.graph.add_edge(
//!     bus1,
//!     bus2,
//!     Edge::Branch(Branch::new(BranchId::new(1), "Line 1-2", BusId::new(1), BusId::new(2))),
//! );
//!
//! network.graph.add_node(Node::Gen(
//!     Gen::new(GenId::new(1), "Gen 1".to_string(), BusId::new(1)).with_output(120.0),
//! ));
//!
//! let updated = network.set_generator_gci_at_bus(BusId::new(1), TonnesPerMwh(0.3621));
//! assert_eq!(updated, 1);
//! ```
//!
//! ## Modules
//!
//! - [`diagnostics`] - Warning collection for operations that degrade silently
//! - [`error`] - The unified [`GatError`]
//! - [`units`] - Power and emissions unit newtypes

use petgraph::{prelude::*, Undirected};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod diagnostics;
pub mod error;
pub mod units;

pub use diagnostics::{DiagnosticIssue, Diagnostics};
pub use error::{GatError, GatResult};
pub use petgraph::graph::NodeIndex;
pub use units::{Kilovolts, Megawatts, TonnesPerHour, TonnesPerMwh};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            #[inline]
            pub fn new(value: usize) -> Self {
                $name(value)
            }
            #[inline]
            pub fn value(&self) -> usize {
                self.0
            }
        }
    };
}

define_id!(
    /// Bus identifier; the key of a fuel dictionary.
    BusId
);
define_id!(GenId);
define_id!(LoadId);
define_id!(BranchId);

impl std::fmt::Display for BusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bus {}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Bus {
    pub id: BusId,
    pub name: String,
    /// Base voltage in kilovolts
    pub base_kv: Kilovolts,
}

impl Bus {
    pub fn new(id: BusId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            base_kv: Kilovolts(0.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub from_bus: BusId,
    pub to_bus: BusId,
}

impl Branch {
    pub fn new(id: BranchId, name: impl Into<String>, from_bus: BusId, to_bus: BusId) -> Self {
        Self {
            id,
            name: name.into(),
            from_bus,
            to_bus,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Gen {
    pub id: GenId,
    pub name: String,
    pub bus: BusId,
    /// Active power output (MW)
    pub active_power: Megawatts,
    /// Maximum active power output
    pub pmax: Megawatts,
    /// In-service status
    pub status: bool,
    /// Greenhouse-gas intensity; `None` until the generator is annotated
    pub gci: Option<TonnesPerMwh>,
}

impl Gen {
    /// Create an in-service generator with no output and no intensity
    pub fn new(id: GenId, name: String, bus: BusId) -> Self {
        Self {
            id,
            name,
            bus,
            active_power: Megawatts(0.0),
            pmax: Megawatts(f64::INFINITY),
            status: true,
            gci: None,
        }
    }

    /// Set dispatched active power (in MW)
    pub fn with_output(mut self, mw: f64) -> Self {
        self.active_power = Megawatts(mw);
        self
    }

    /// Set maximum active power (in MW)
    pub fn with_pmax(mut self, mw: f64) -> Self {
        self.pmax = Megawatts(mw);
        self
    }

    /// Preset an intensity, e.g. from an earlier annotation pass
    pub fn with_gci(mut self, gci: f64) -> Self {
        self.gci = Some(TonnesPerMwh(gci));
        self
    }

    /// Emission rate at the current dispatch, if the generator is annotated
    pub fn emission_rate(&self) -> Option<TonnesPerHour> {
        self.gci.map(|gci| self.active_power * gci)
    }
}

#[derive(Debug, Clone)]
pub struct Load {
    pub id: LoadId,
    pub name: String,
    pub bus: BusId,
    /// Active power demand (MW)
    pub active_power: Megawatts,
}

#[derive(Debug, Clone)]
pub enum Node {
    Bus(Bus),
    Gen(Gen),
    Load(Load),
}

#[derive(Debug, Clone)]
pub enum Edge {
    Branch(Branch),
}

/// The core power network graph
#[derive(Debug, Default)]
pub struct Network {
    pub graph: Graph<Node, Edge, Undirected>,
}

impl Network {
    pub fn new() -> Self {
        Self {
            graph: Graph::new_undirected(),
        }
    }

    /// Compute basic statistics about the network
    pub fn stats(&self) -> NetworkStats {
        let mut stats = NetworkStats::default();

        for node in self.graph.node_weights() {
            match node {
                Node::Bus(_) => stats.num_buses += 1,
                Node::Gen(g) => {
                    stats.num_gens += 1;
                    if g.gci.is_some() {
                        stats.num_annotated_gens += 1;
                    }
                    if g.pmax.is_finite() {
                        stats.total_gen_capacity_mw += g.pmax.value();
                    }
                }
                Node::Load(l) => {
                    stats.num_loads += 1;
                    stats.total_load_mw += l.active_power.value();
                }
            }
        }

        stats.num_branches = self.graph.edge_count();
        stats
    }

    /// Get all generators as a vector
    pub fn generators(&self) -> Vec<&Gen> {
        self.graph
            .node_weights()
            .filter_map(|n| match n {
                Node::Gen(g) => Some(g),
                _ => None,
            })
            .collect()
    }

    /// Find generators at a specific bus
    pub fn generators_at_bus(&self, bus_id: BusId) -> Vec<&Gen> {
        self.graph
            .node_weights()
            .filter_map(|n| match n {
                Node::Gen(g) if g.bus == bus_id => Some(g),
                _ => None,
            })
            .collect()
    }

    /// Distinct buses that host at least one generator, in first-seen order.
    pub fn generator_bus_ids(&self) -> Vec<BusId> {
        let mut seen = HashSet::new();
        self.graph
            .node_weights()
            .filter_map(|n| match n {
                Node::Gen(g) if seen.insert(g.bus) => Some(g.bus),
                _ => None,
            })
            .collect()
    }

    /// Overwrite `gci` on every generator connected to `bus_id`.
    ///
    /// Returns the number of generators written; zero when nothing sits on
    /// the bus. No other field or node is touched.
    pub fn set_generator_gci_at_bus(&mut self, bus_id: BusId, gci: TonnesPerMwh) -> usize {
        let mut updated = 0;
        for node in self.graph.node_weights_mut() {
            if let Node::Gen(g) = node {
                if g.bus == bus_id {
                    g.gci = Some(gci);
                    updated += 1;
                }
            }
        }
        updated
    }

    /// Emission rate of in-service, annotated generation at current dispatch.
    pub fn total_emission_rate(&self) -> TonnesPerHour {
        self.graph
            .node_weights()
            .filter_map(|n| match n {
                Node::Gen(g) if g.status => g.emission_rate(),
                _ => None,
            })
            .sum()
    }
}

/// Statistics about a network's size and annotation coverage
#[derive(Debug, Clone, Default)]
pub struct NetworkStats {
    pub num_buses: usize,
    pub num_gens: usize,
    pub num_annotated_gens: usize,
    pub num_loads: usize,
    pub num_branches: usize,
    pub total_load_mw: f64,
    pub total_gen_capacity_mw: f64,
}

impl std::fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} buses, {} branches, {} gens ({} with GCI, {:.0} MW), {} loads ({:.0} MW)",
            self.num_buses,
            self.num_branches,
            self.num_gens,
            self.num_annotated_gens,
            self.total_gen_capacity_mw,
            self.num_loads,
            self.total_load_mw
        )
    }
}
