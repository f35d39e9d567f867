use std::borrow::Cow;

use gat_core::{DiagnosticIssue, Diagnostics, GatResult, Network, TonnesPerMwh};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::CarbonConfig;
use crate::fuel::{EmissionsBasis, FuelDescriptor, FuelDict};
use crate::tables::GciTables;

/// Options for an annotation pass.
#[derive(Debug, Clone)]
pub struct AnnotateOptions<'a> {
    /// Intensity tables to look fuel codes up in; borrows the built-ins by default.
    pub tables: Cow<'a, GciTables>,
    /// If true, a fuel code missing from the selected table is reported as a
    /// `fuel` warning. The generator still gets zero either way.
    pub report_unknown_fuel: bool,
}

impl Default for AnnotateOptions<'_> {
    fn default() -> Self {
        Self {
            tables: Cow::Borrowed(GciTables::builtin()),
            report_unknown_fuel: true,
        }
    }
}

impl AnnotateOptions<'static> {
    pub fn from_config(config: &CarbonConfig) -> GatResult<Self> {
        Ok(Self {
            tables: Cow::Owned(config.tables()?),
            report_unknown_fuel: config.report_unknown_fuel,
        })
    }
}

/// What an annotation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationSummary {
    /// Dictionary entries that were looked up and written
    pub buses_annotated: usize,
    /// Dictionary entries without a `type` or `emissions` key
    pub buses_skipped: usize,
    /// Annotated entries whose bus hosts no generator
    pub buses_without_generators: usize,
    /// Annotated entries whose fuel code was null or not in the selected table
    pub unknown_fuel_buses: usize,
    pub generators_updated: usize,
}

impl std::fmt::Display for AnnotationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} generators updated across {} buses ({} skipped, {} without generators, {} unknown fuel)",
            self.generators_updated,
            self.buses_annotated,
            self.buses_skipped,
            self.buses_without_generators,
            self.unknown_fuel_buses
        )
    }
}

/// Seed a fuel dictionary with one `{"type": "N/A", "emissions": "CO2"}`
/// entry per distinct generator bus.
pub fn default_fuel_dict(network: &Network) -> FuelDict {
    network
        .generator_bus_ids()
        .into_iter()
        .map(|bus| (bus, FuelDescriptor::default()))
        .collect()
}

/// Write each bus's intensity into the `gci` of every generator on that bus,
/// using the built-in tables.
///
/// Entries without both a `type` and an `emissions` key are skipped, null or
/// unknown fuel codes get zero, and entries for buses without generators
/// change nothing. Generators on buses absent from `fuel_dict` keep their
/// current `gci`. Nothing is logged above debug level except the summary.
pub fn annotate_gci(network: &mut Network, fuel_dict: &FuelDict) -> AnnotationSummary {
    let opts = AnnotateOptions {
        report_unknown_fuel: false,
        ..AnnotateOptions::default()
    };
    let mut diag = Diagnostics::new();
    annotate_gci_with(network, fuel_dict, &opts, &mut diag)
}

/// [`annotate_gci`] with caller-supplied tables, recording anything unusual
/// in `diag`.
#[tracing::instrument(level = "debug", skip_all, fields(entries = fuel_dict.len()))]
pub fn annotate_gci_with(
    network: &mut Network,
    fuel_dict: &FuelDict,
    opts: &AnnotateOptions<'_>,
    diag: &mut Diagnostics,
) -> AnnotationSummary {
    let mut summary = AnnotationSummary::default();

    for (&bus, descriptor) in fuel_dict {
        let Some((fuel_code, emissions_code)) = descriptor.fields() else {
            let issue = DiagnosticIssue::new(
                "fuel",
                "Fuel descriptor needs both 'type' and 'emissions' keys; bus skipped",
            )
            .with_entity(bus.to_string());
            debug!(%issue);
            diag.add(issue);
            summary.buses_skipped += 1;
            continue;
        };

        let basis = emissions_code.map_or(EmissionsBasis::Co2, EmissionsBasis::from_code);
        let table = opts.tables.select(basis);
        let gci = match fuel_code.and_then(|code| table.get(code)) {
            Some(gci) => gci,
            None => {
                summary.unknown_fuel_buses += 1;
                let issue = DiagnosticIssue::new(
                    "fuel",
                    format!(
                        "Unrecognised fuel code {} for {}; intensity set to 0",
                        fuel_code.map_or_else(|| "null".to_string(), |c| format!("'{}'", c)),
                        basis.code()
                    ),
                )
                .with_entity(bus.to_string());
                if opts.report_unknown_fuel {
                    warn!(%issue);
                    diag.add(issue);
                } else {
                    debug!(%issue);
                }
                TonnesPerMwh::ZERO
            }
        };

        let updated = network.set_generator_gci_at_bus(bus, gci);
        debug!(%bus, fuel = ?fuel_code, emissions = ?emissions_code, gci = gci.value(), updated);

        summary.buses_annotated += 1;
        summary.generators_updated += updated;
        if updated == 0 {
            summary.buses_without_generators += 1;
        }
    }

    info!(%summary, "carbon annotation finished");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use gat_core::{Bus, BusId, Gen, GenId, Node};

    fn network_with_gens(buses: &[usize]) -> Network {
        let mut network = Network::new();
        for (i, &bus) in buses.iter().enumerate() {
            network.graph.add_node(Node::Gen(Gen::new(
                GenId::new(i),
                format!("G{}", i),
                BusId::new(bus),
            )));
        }
        network
    }

    fn gci_at(network: &Network, bus: usize) -> Vec<Option<f64>> {
        network
            .generators_at_bus(BusId::new(bus))
            .iter()
            .map(|g| g.gci.map(TonnesPerMwh::value))
            .collect()
    }

    #[test]
    fn test_default_fuel_dict_one_entry_per_bus() {
        let network = network_with_gens(&[1, 1, 2, 3]);
        let dict = default_fuel_dict(&network);

        let buses: Vec<usize> = dict.buses().map(|b| b.value()).collect();
        assert_eq!(buses, vec![1, 2, 3]);
        for (_, descriptor) in &dict {
            assert_eq!(descriptor.fields(), Some((Some("N/A"), Some("CO2"))));
        }
    }

    #[test]
    fn test_default_fuel_dict_ignores_generatorless_buses() {
        let mut network = network_with_gens(&[]);
        network
            .graph
            .add_node(Node::Bus(Bus::new(BusId::new(1), "Bus 1")));
        assert!(default_fuel_dict(&network).is_empty());
    }

    #[test]
    fn test_co2_and_co2e_tables() {
        let mut network = network_with_gens(&[1, 1, 2]);
        let mut dict = FuelDict::new();
        dict.set_fuel(BusId::new(1), "BIT", "CO2");
        dict.set_fuel(BusId::new(2), "BIT", "CO2e");

        let summary = annotate_gci(&mut network, &dict);

        assert_eq!(gci_at(&network, 1), vec![Some(0.8204), Some(0.8204)]);
        assert_eq!(gci_at(&network, 2), vec![Some(0.8230)]);
        assert_eq!(summary.generators_updated, 3);
        assert_eq!(summary.buses_annotated, 2);
    }

    #[test]
    fn test_unknown_fuel_is_zero_and_reported() {
        let mut network = network_with_gens(&[4]);
        let mut dict = FuelDict::new();
        dict.set_fuel(BusId::new(4), "FOO", "CO2");

        let mut diag = Diagnostics::new();
        let summary =
            annotate_gci_with(&mut network, &dict, &AnnotateOptions::default(), &mut diag);

        assert_eq!(gci_at(&network, 4), vec![Some(0.0)]);
        assert_eq!(summary.unknown_fuel_buses, 1);
        assert_eq!(diag.warning_count(), 1);
        assert!(diag.issues[0].message.contains("'FOO'"));
        assert_eq!(diag.issues[0].entity.as_deref(), Some("Bus 4"));
    }

    #[test]
    fn test_unknown_fuel_reporting_can_be_disabled() {
        let mut network = network_with_gens(&[4]);
        let mut dict = FuelDict::new();
        dict.set_fuel(BusId::new(4), "FOO", "CO2e");

        let opts = AnnotateOptions {
            report_unknown_fuel: false,
            ..AnnotateOptions::default()
        };
        let mut diag = Diagnostics::new();
        let summary = annotate_gci_with(&mut network, &dict, &opts, &mut diag);

        assert_eq!(gci_at(&network, 4), vec![Some(0.0)]);
        assert_eq!(summary.unknown_fuel_buses, 1);
        assert!(!diag.has_issues());
    }

    #[test]
    fn test_incomplete_descriptor_leaves_generators_untouched() {
        let mut network = Network::new();
        network.graph.add_node(Node::Gen(
            Gen::new(GenId::new(1), "G1".into(), BusId::new(1)).with_gci(0.42),
        ));
        let mut dict = FuelDict::new();
        dict.insert(
            BusId::new(1),
            FuelDescriptor {
                fuel_type: Some(Some("CCGT".into())),
                emissions: None,
            },
        );

        let mut diag = Diagnostics::new();
        let summary =
            annotate_gci_with(&mut network, &dict, &AnnotateOptions::default(), &mut diag);

        assert_eq!(gci_at(&network, 1), vec![Some(0.42)]);
        assert_eq!(summary.buses_skipped, 1);
        assert_eq!(summary.generators_updated, 0);
        assert_eq!(diag.issues_by_category("fuel").count(), 1);
    }

    #[test]
    fn test_bus_without_generators_is_noop() {
        let mut network = network_with_gens(&[1]);
        let mut dict = FuelDict::new();
        dict.set_fuel(BusId::new(99), "ANT", "CO2");

        let summary = annotate_gci(&mut network, &dict);

        assert_eq!(gci_at(&network, 1), vec![None]);
        assert_eq!(summary.buses_without_generators, 1);
        assert_eq!(network.graph.node_count(), 1);
    }

    #[test]
    fn test_custom_tables_from_config() {
        let mut config = CarbonConfig::default();
        config.co2.insert("BIO".to_string(), 0.05);
        let opts = AnnotateOptions::from_config(&config).unwrap();

        let mut network = network_with_gens(&[1]);
        let mut dict = FuelDict::new();
        dict.set_fuel(BusId::new(1), "BIO", "CO2");

        let mut diag = Diagnostics::new();
        let summary = annotate_gci_with(&mut network, &dict, &opts, &mut diag);

        assert_eq!(gci_at(&network, 1), vec![Some(0.05)]);
        assert_eq!(summary.unknown_fuel_buses, 0);
        assert!(!diag.has_issues());
    }

    #[test]
    fn test_default_options_borrow_builtin_tables() {
        let opts = AnnotateOptions::default();
        assert!(matches!(opts.tables, Cow::Borrowed(_)));
        assert!(std::ptr::eq(opts.tables.as_ref(), GciTables::builtin()));
    }

    #[test]
    fn test_summary_display() {
        let summary = AnnotationSummary {
            buses_annotated: 2,
            generators_updated: 3,
            ..AnnotationSummary::default()
        };
        assert!(summary.to_string().starts_with("3 generators updated across 2 buses"));
    }
}
