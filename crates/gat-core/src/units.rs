//! Compile-time unit safety for power and emissions quantities.
//!
//! Generator output is held in MW, carbon intensity in tonnes per MWh and
//! emission rates in tonnes per hour. Keeping them as distinct newtypes means
//! an intensity can't be summed with an output by accident; the only bridge
//! between them is `Megawatts * TonnesPerMwh = TonnesPerHour`.
//!
//! # Usage
//!
//! ```
//! use gat_core::units::{Megawatts, TonnesPerHour, TonnesPerMwh};
//!
//! let output = Megawatts(200.0);
//! let ccgt = TonnesPerMwh(0.3621);
//!
//! let rate: TonnesPerHour = output * ccgt;
//! assert!((rate.value() - 72.42).abs() < 1e-9);
//!
//! // This would NOT compile - different units
//! // let wrong = output + ccgt;
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Macro to implement common arithmetic operations for unit types
macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

// =============================================================================
// Power & Voltage Units
// =============================================================================

/// Active power in megawatts (MW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Megawatts(pub f64);

impl_unit_ops!(Megawatts, "MW");

/// Voltage in kilovolts (kV)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilovolts(pub f64);

impl_unit_ops!(Kilovolts, "kV");

// =============================================================================
// Emissions Units
// =============================================================================

/// Greenhouse-gas intensity of generation in tonnes per MWh.
///
/// Numerically equal to kg/kWh, which is how most national inventories
/// publish their factors.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TonnesPerMwh(pub f64);

impl_unit_ops!(TonnesPerMwh, "t/MWh");

impl TonnesPerMwh {
    /// Zero intensity (nuclear, renewables, unknown fuel)
    pub const ZERO: TonnesPerMwh = TonnesPerMwh(0.0);
}

/// Emission rate in tonnes per hour
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TonnesPerHour(pub f64);

impl_unit_ops!(TonnesPerHour, "t/h");

impl Mul<TonnesPerMwh> for Megawatts {
    type Output = TonnesPerHour;
    fn mul(self, rhs: TonnesPerMwh) -> Self::Output {
        TonnesPerHour(self.0 * rhs.0)
    }
}
