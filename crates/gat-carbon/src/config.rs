use std::collections::BTreeMap;

use anyhow::{Context, Result};
use gat_core::GatResult;
use serde::{Deserialize, Serialize};

use crate::fuel::EmissionsBasis;
use crate::tables::GciTables;

/// User-tunable settings for an annotation pass.
///
/// ```yaml
/// report_unknown_fuel: true
/// co2:
///   BIO: 0.05
/// co2e:
///   BIO: 0.07
/// ```
///
/// `co2`/`co2e` entries override or extend the built-in tables. Keys are
/// case-sensitive and any other key is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CarbonConfig {
    #[serde(default = "default_report_unknown_fuel")]
    pub report_unknown_fuel: bool,
    #[serde(default)]
    pub co2: BTreeMap<String, f64>,
    #[serde(default)]
    pub co2e: BTreeMap<String, f64>,
}

fn default_report_unknown_fuel() -> bool {
    true
}

impl Default for CarbonConfig {
    fn default() -> Self {
        Self {
            report_unknown_fuel: default_report_unknown_fuel(),
            co2: BTreeMap::new(),
            co2e: BTreeMap::new(),
        }
    }
}

impl CarbonConfig {
    /// Built-in tables with this config's overrides applied.
    pub fn tables(&self) -> GatResult<GciTables> {
        let mut tables = GciTables::default();
        for (basis, overrides) in [
            (EmissionsBasis::Co2, &self.co2),
            (EmissionsBasis::Co2e, &self.co2e),
        ] {
            let table = tables.select_mut(basis);
            for (code, value) in overrides {
                table.set(code, *value)?;
            }
        }
        Ok(tables)
    }
}

/// Parse a [`CarbonConfig`] from YAML or JSON text.
pub fn load_config_from_str(data: &str) -> Result<CarbonConfig> {
    if data.trim().is_empty() {
        return Ok(CarbonConfig::default());
    }
    serde_yaml::from_str(data)
        .or_else(|_| serde_json::from_str(data))
        .context("parsing carbon config")
}
