//! # gat-carbon: generator carbon-intensity annotation
//!
//! Tags every generator in a [`gat_core::Network`] with a greenhouse-gas
//! intensity (GCI) chosen by the fuel burned at its bus and the emissions
//! convention in use (direct CO2 or CO2-equivalent).
//!
//! ## Workflow
//!
//! 1. [`default_fuel_dict`] seeds one `N/A`/`CO2` entry per generator bus.
//! 2. The caller edits the [`FuelDict`] to classify buses.
//! 3. [`annotate_gci`] writes the looked-up intensity into `Gen::gci`.
//!
//! ```rust
//! use gat_carbon::{annotate_gci, default_fuel_dict};
//! use gat_core::{BusId, Gen, GenId, Network, Node};
//!
//! let mut network = Network::new();
//! network.graph.add_node(Node::Gen(Gen::new(GenId::new(1), "G1".into(), BusId::new(1))));
//!
//! let mut fuel = default_fuel_dict(&network);
//! fuel.set_fuel(BusId::new(1), "CCGT", "CO2");
//!
//! annotate_gci(&mut network, &fuel);
//! assert_eq!(network.generators()[0].gci.map(|g| g.value()), Some(0.3621));
//! ```
//!
//! Annotation never fails. Incomplete descriptors are skipped and unknown
//! fuel codes resolve to zero; [`annotate_gci_with`] reports both through
//! [`gat_core::Diagnostics`] and accepts custom tables built from a
//! [`CarbonConfig`].

pub mod annotate;
pub mod config;
pub mod fuel;
pub mod tables;

pub use annotate::{
    annotate_gci, annotate_gci_with, default_fuel_dict, AnnotateOptions, AnnotationSummary,
};
pub use config::{load_config_from_str, CarbonConfig};
pub use fuel::{
    EmissionsBasis, FuelDescriptor, FuelDict, FuelType, DEFAULT_EMISSIONS_CODE, DEFAULT_FUEL_CODE,
};
pub use tables::{GciTable, GciTables};
