use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use gat_core::{BusId, GatResult};
use serde::{Deserialize, Deserializer, Serialize};

/// Fuel code assigned to buses that have not been classified yet.
pub const DEFAULT_FUEL_CODE: &str = "N/A";
/// Emissions convention assigned to buses that have not been classified yet.
pub const DEFAULT_EMISSIONS_CODE: &str = "CO2";

/// Fuel categories with a built-in intensity.
///
/// Codes are matched case-sensitively; `Oil` and `Thermal` are mixed case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuelType {
    Anthracite,
    Bituminous,
    HeavyOil,
    Gas,
    CombinedCycleGas,
    InternalCombustion,
    Thermal,
    Nuclear,
    Renewable,
    Hydro,
    NotAvailable,
}

impl FuelType {
    pub const ALL: [FuelType; 11] = [
        FuelType::Anthracite,
        FuelType::Bituminous,
        FuelType::HeavyOil,
        FuelType::Gas,
        FuelType::CombinedCycleGas,
        FuelType::InternalCombustion,
        FuelType::Thermal,
        FuelType::Nuclear,
        FuelType::Renewable,
        FuelType::Hydro,
        FuelType::NotAvailable,
    ];

    pub fn code(self) -> &'static str {
        match self {
            FuelType::Anthracite => "ANT",
            FuelType::Bituminous => "BIT",
            FuelType::HeavyOil => "Oil",
            FuelType::Gas => "GAS",
            FuelType::CombinedCycleGas => "CCGT",
            FuelType::InternalCombustion => "ICE",
            FuelType::Thermal => "Thermal",
            FuelType::Nuclear => "NUC",
            FuelType::Renewable => "RE",
            FuelType::Hydro => "HYD",
            FuelType::NotAvailable => DEFAULT_FUEL_CODE,
        }
    }

    pub fn from_code(code: &str) -> Option<FuelType> {
        FuelType::ALL.into_iter().find(|fuel| fuel.code() == code)
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Emissions accounting convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmissionsBasis {
    /// Direct CO2 only
    #[default]
    Co2,
    /// CO2 + 21 x CH4 + 310 x N2O
    Co2e,
}

impl EmissionsBasis {
    /// Only the exact code `"CO2e"` selects the CO2e basis; anything else is CO2.
    pub fn from_code(code: &str) -> EmissionsBasis {
        if code == "CO2e" {
            EmissionsBasis::Co2e
        } else {
            EmissionsBasis::Co2
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            EmissionsBasis::Co2 => DEFAULT_EMISSIONS_CODE,
            EmissionsBasis::Co2e => "CO2e",
        }
    }
}

/// Fuel classification for one bus.
///
/// Each field has three states: absent (`None`), present but null
/// (`Some(None)`), and present with a code. The annotator skips descriptors
/// with an absent field; a null `type` resolves to zero intensity and a null
/// `emissions` selects the CO2 table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelDescriptor {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub fuel_type: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub emissions: Option<Option<String>>,
}

/// Maps a key that is present in the input to `Some`, even when its value is
/// null; `#[serde(default)]` covers the absent case.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl FuelDescriptor {
    pub fn new(fuel_type: impl Into<String>, emissions: impl Into<String>) -> Self {
        Self {
            fuel_type: Some(Some(fuel_type.into())),
            emissions: Some(Some(emissions.into())),
        }
    }

    /// Both fields, when both keys are present; either value may be null.
    pub fn fields(&self) -> Option<(Option<&str>, Option<&str>)> {
        match (&self.fuel_type, &self.emissions) {
            (Some(fuel_type), Some(emissions)) => {
                Some((fuel_type.as_deref(), emissions.as_deref()))
            }
            _ => None,
        }
    }

    /// Recognised fuel category, if the code is one of the built-in ones.
    pub fn fuel(&self) -> Option<FuelType> {
        self.fuel_type
            .as_ref()
            .and_then(Option::as_deref)
            .and_then(FuelType::from_code)
    }

    /// Emissions convention, if the key is present. A null value means CO2.
    pub fn emissions_basis(&self) -> Option<EmissionsBasis> {
        self.emissions
            .as_ref()
            .map(|code| code.as_deref().map_or(EmissionsBasis::Co2, EmissionsBasis::from_code))
    }
}

impl Default for FuelDescriptor {
    fn default() -> Self {
        Self::new(DEFAULT_FUEL_CODE, DEFAULT_EMISSIONS_CODE)
    }
}

/// Per-bus fuel classification, keyed by bus id.
///
/// Serialises as a JSON object whose keys are the bus numbers:
///
/// ```
/// use gat_carbon::{FuelDict, FuelType};
/// use gat_core::BusId;
///
/// let dict = FuelDict::from_json_str(r#"{"1": {"type": "CCGT", "emissions": "CO2"}}"#).unwrap();
/// assert_eq!(
///     dict.get(BusId::new(1)).and_then(|d| d.fuel()),
///     Some(FuelType::CombinedCycleGas)
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FuelDict(BTreeMap<BusId, FuelDescriptor>);

impl FuelDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the descriptor for `bus`, returning the previous one.
    pub fn insert(&mut self, bus: BusId, descriptor: FuelDescriptor) -> Option<FuelDescriptor> {
        self.0.insert(bus, descriptor)
    }

    /// Shorthand for inserting a complete descriptor.
    pub fn set_fuel(
        &mut self,
        bus: BusId,
        fuel_type: impl Into<String>,
        emissions: impl Into<String>,
    ) -> Option<FuelDescriptor> {
        self.insert(bus, FuelDescriptor::new(fuel_type, emissions))
    }

    pub fn get(&self, bus: BusId) -> Option<&FuelDescriptor> {
        self.0.get(&bus)
    }

    pub fn get_mut(&mut self, bus: BusId) -> Option<&mut FuelDescriptor> {
        self.0.get_mut(&bus)
    }

    pub fn remove(&mut self, bus: BusId) -> Option<FuelDescriptor> {
        self.0.remove(&bus)
    }

    pub fn contains(&self, bus: BusId) -> bool {
        self.0.contains_key(&bus)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, BusId, FuelDescriptor> {
        self.0.iter()
    }

    pub fn buses(&self) -> impl Iterator<Item = BusId> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_json_str(data: &str) -> GatResult<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn to_json_string(&self) -> GatResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<'a> IntoIterator for &'a FuelDict {
    type Item = (&'a BusId, &'a FuelDescriptor);
    type IntoIter = btree_map::Iter<'a, BusId, FuelDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(BusId, FuelDescriptor)> for FuelDict {
    fn from_iter<I: IntoIterator<Item = (BusId, FuelDescriptor)>>(iter: I) -> Self {
        FuelDict(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuel_codes_roundtrip() {
        for fuel in FuelType::ALL {
            assert_eq!(FuelType::from_code(fuel.code()), Some(fuel));
        }
        assert_eq!(FuelType::from_code("OIL"), None);
        assert_eq!(FuelType::from_code("ccgt"), None);
        assert_eq!(FuelType::from_code("FOO"), None);
    }

    #[test]
    fn test_emissions_basis_is_exact_match() {
        assert_eq!(EmissionsBasis::from_code("CO2e"), EmissionsBasis::Co2e);
        assert_eq!(EmissionsBasis::from_code("CO2"), EmissionsBasis::Co2);
        assert_eq!(EmissionsBasis::from_code("co2e"), EmissionsBasis::Co2);
        assert_eq!(EmissionsBasis::from_code(""), EmissionsBasis::Co2);
    }

    #[test]
    fn test_default_descriptor() {
        let descriptor = FuelDescriptor::default();
        assert_eq!(descriptor.fields(), Some((Some("N/A"), Some("CO2"))));
        assert_eq!(descriptor.fuel(), Some(FuelType::NotAvailable));
        assert_eq!(descriptor.emissions_basis(), Some(EmissionsBasis::Co2));
    }

    #[test]
    fn test_descriptor_json_field_names() {
        let json = serde_json::to_string(&FuelDescriptor::new("NUC", "CO2e")).unwrap();
        assert_eq!(json, r#"{"type":"NUC","emissions":"CO2e"}"#);

        let partial: FuelDescriptor = serde_json::from_str(r#"{"type": "GAS"}"#).unwrap();
        assert_eq!(partial.emissions, None);
        assert_eq!(partial.fields(), None);
    }

    #[test]
    fn test_null_fields_are_present() {
        let descriptor: FuelDescriptor =
            serde_json::from_str(r#"{"type": null, "emissions": null}"#).unwrap();
        assert_eq!(descriptor.fuel_type, Some(None));
        assert_eq!(descriptor.fields(), Some((None, None)));
        assert_eq!(descriptor.fuel(), None);
        assert_eq!(descriptor.emissions_basis(), Some(EmissionsBasis::Co2));

        let json = serde_json::to_string(&descriptor).unwrap();
        assert_eq!(json, r#"{"type":null,"emissions":null}"#);
    }

    #[test]
    fn test_fuel_dict_json_keys_are_bus_numbers() {
        let mut dict = FuelDict::new();
        dict.set_fuel(BusId::new(2), "NUC", "CO2e");
        dict.insert(BusId::new(1), FuelDescriptor::default());

        let json = dict.to_json_string().unwrap();
        let parsed = FuelDict::from_json_str(&json).unwrap();
        assert_eq!(parsed, dict);
        assert!(json.contains("\"1\""));
        assert!(json.contains("\"2\""));
    }

    #[test]
    fn test_fuel_dict_rejects_non_numeric_bus_keys() {
        let err = FuelDict::from_json_str(r#"{"north": {"type": "RE", "emissions": "CO2"}}"#)
            .unwrap_err();
        assert!(matches!(err, gat_core::GatError::Parse(_)));
    }

    #[test]
    fn test_fuel_dict_editing() {
        let mut dict: FuelDict = [(BusId::new(1), FuelDescriptor::default())]
            .into_iter()
            .collect();
        assert!(dict.contains(BusId::new(1)));

        if let Some(descriptor) = dict.get_mut(BusId::new(1)) {
            descriptor.fuel_type = Some(Some("HYD".to_string()));
        }
        assert_eq!(dict.get(BusId::new(1)).and_then(FuelDescriptor::fuel), Some(FuelType::Hydro));

        assert!(dict.remove(BusId::new(1)).is_some());
        assert!(dict.is_empty());
    }
}
