//! Greenhouse-gas intensity tables.
//!
//! Two built-in tables, in tonnes per MWh of generation:
//!
//! | code    | CO2    | CO2e   |
//! |---------|--------|--------|
//! | ANT     | 0.9095 | 0.9143 |
//! | BIT     | 0.8204 | 0.8230 |
//! | Oil     | 0.7001 | 0.7018 |
//! | GAS     | 0.5173 | 0.5177 |
//! | CCGT    | 0.3621 | 0.3625 |
//! | ICE     | 0.6030 | 0.6049 |
//! | Thermal | 0.6874 | 0.6894 |
//! | NUC, RE, HYD, N/A | 0.0 | 0.0 |
//!
//! CO2e factors are `CO2 + 21 * CH4 + 310 * N2O`. Codes missing from a table
//! resolve to zero.

use std::collections::BTreeMap;

use gat_core::{GatError, GatResult, TonnesPerMwh};
use once_cell::sync::Lazy;

use crate::fuel::{EmissionsBasis, FuelType};

impl FuelType {
    /// Built-in direct CO2 intensity.
    pub const fn co2_intensity(self) -> TonnesPerMwh {
        TonnesPerMwh(match self {
            FuelType::Anthracite => 0.9095,
            FuelType::Bituminous => 0.8204,
            FuelType::HeavyOil => 0.7001,
            FuelType::Gas => 0.5173,
            FuelType::CombinedCycleGas => 0.3621,
            FuelType::InternalCombustion => 0.6030,
            FuelType::Thermal => 0.6874,
            FuelType::Nuclear
            | FuelType::Renewable
            | FuelType::Hydro
            | FuelType::NotAvailable => 0.0,
        })
    }

    /// Built-in CO2-equivalent intensity.
    pub const fn co2e_intensity(self) -> TonnesPerMwh {
        TonnesPerMwh(match self {
            FuelType::Anthracite => 0.9143,
            FuelType::Bituminous => 0.8230,
            FuelType::HeavyOil => 0.7018,
            FuelType::Gas => 0.5177,
            FuelType::CombinedCycleGas => 0.3625,
            FuelType::InternalCombustion => 0.6049,
            FuelType::Thermal => 0.6894,
            FuelType::Nuclear
            | FuelType::Renewable
            | FuelType::Hydro
            | FuelType::NotAvailable => 0.0,
        })
    }

    pub const fn intensity(self, basis: EmissionsBasis) -> TonnesPerMwh {
        match basis {
            EmissionsBasis::Co2 => self.co2_intensity(),
            EmissionsBasis::Co2e => self.co2e_intensity(),
        }
    }
}

static BUILTIN: Lazy<GciTables> = Lazy::new(|| GciTables {
    co2: GciTable::builtin(EmissionsBasis::Co2),
    co2e: GciTable::builtin(EmissionsBasis::Co2e),
});

/// Fuel code to intensity mapping for one emissions basis.
#[derive(Debug, Clone, PartialEq)]
pub struct GciTable {
    basis: EmissionsBasis,
    coefficients: BTreeMap<String, TonnesPerMwh>,
}

impl GciTable {
    pub fn builtin(basis: EmissionsBasis) -> Self {
        let coefficients = FuelType::ALL
            .into_iter()
            .map(|fuel| (fuel.code().to_string(), fuel.intensity(basis)))
            .collect();
        Self {
            basis,
            coefficients,
        }
    }

    pub fn basis(&self) -> EmissionsBasis {
        self.basis
    }

    /// Intensity for `code`, if the table lists it.
    pub fn get(&self, code: &str) -> Option<TonnesPerMwh> {
        self.coefficients.get(code).copied()
    }

    /// Intensity for `code`; unlisted codes are zero.
    pub fn coefficient(&self, code: &str) -> TonnesPerMwh {
        self.get(code).unwrap_or(TonnesPerMwh::ZERO)
    }

    /// Add or replace a fuel code after checking the value is usable.
    pub fn set(&mut self, code: &str, value: f64) -> GatResult<()> {
        if code.trim().is_empty() {
            return Err(GatError::Config(format!(
                "{} table: fuel code cannot be empty",
                self.basis.code()
            )));
        }
        if !value.is_finite() || value < 0.0 {
            return Err(GatError::Config(format!(
                "{} table: intensity for '{}' must be a finite non-negative number, got {}",
                self.basis.code(),
                code,
                value
            )));
        }
        self.coefficients
            .insert(code.to_string(), TonnesPerMwh(value));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

/// The CO2 and CO2e tables used by one annotation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GciTables {
    pub co2: GciTable,
    pub co2e: GciTable,
}

impl GciTables {
    /// Shared built-in tables.
    pub fn builtin() -> &'static GciTables {
        &BUILTIN
    }

    pub fn select(&self, basis: EmissionsBasis) -> &GciTable {
        match basis {
            EmissionsBasis::Co2 => &self.co2,
            EmissionsBasis::Co2e => &self.co2e,
        }
    }

    pub fn select_mut(&mut self, basis: EmissionsBasis) -> &mut GciTable {
        match basis {
            EmissionsBasis::Co2 => &mut self.co2,
            EmissionsBasis::Co2e => &mut self.co2e,
        }
    }

    /// Intensity for a fuel code under an emissions code, defaulting to zero.
    pub fn coefficient(&self, fuel_code: &str, emissions_code: &str) -> TonnesPerMwh {
        self.select(EmissionsBasis::from_code(emissions_code))
            .coefficient(fuel_code)
    }
}

impl Default for GciTables {
    fn default() -> Self {
        GciTables::builtin().clone()
    }
}
