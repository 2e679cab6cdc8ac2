//! Refrigerant property oracle trait and backend selection.

use std::fmt;
use std::sync::Arc;

use crate::coolprop::CoolPropOracle;
use crate::correlation::R134aCorrelation;
use crate::error::{FluidError, FluidResult};
use crate::refrigerant::Refrigerant;
use crate::state::{PropertyPair, ThermoState};
use crate::unavailable::UnavailableOracle;
use tp_core::units::{Pressure, Temperature};

/// Two-property-in, full-state-out refrigerant calculator.
///
/// Implementations must be pure functions of their inputs and thread-safe
/// (Send + Sync) so one oracle can be shared by parallel plant solves.
pub trait RefrigerantOracle: Send + Sync {
    /// Backend name (for logging).
    fn name(&self) -> &str;

    /// Check if this backend can evaluate the given refrigerant.
    fn supports(&self, fluid: Refrigerant) -> bool;

    /// Resolve the full state from exactly two independent properties.
    ///
    /// Infeasible requests fail with [`FluidError::Infeasible`] or
    /// [`FluidError::OutOfRange`]; see [`FluidError::is_infeasible`].
    fn state(&self, fluid: Refrigerant, input: PropertyPair) -> FluidResult<ThermoState>;

    /// Saturation pressure at the given temperature.
    fn saturation_pressure(&self, fluid: Refrigerant, t: Temperature) -> FluidResult<Pressure>;

    /// Saturation temperature at the given pressure.
    fn saturation_temperature(&self, fluid: Refrigerant, p: Pressure) -> FluidResult<Temperature>;
}

/// Selectable property backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyBackend {
    /// CoolProp through `rfluids`.
    #[default]
    CoolProp,
    /// Built-in R134a correlations.
    Correlation,
    /// Every query fails immediately.
    Unavailable,
}

impl PropertyBackend {
    pub fn key(&self) -> &'static str {
        match self {
            PropertyBackend::CoolProp => "coolprop",
            PropertyBackend::Correlation => "correlation",
            PropertyBackend::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for PropertyBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for PropertyBackend {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coolprop" => Ok(PropertyBackend::CoolProp),
            "correlation" | "builtin" => Ok(PropertyBackend::Correlation),
            "unavailable" | "none" => Ok(PropertyBackend::Unavailable),
            _ => Err("unknown property backend"),
        }
    }
}

/// Build the shared oracle for a backend.
pub fn build_oracle(backend: PropertyBackend) -> Arc<dyn RefrigerantOracle> {
    match backend {
        PropertyBackend::CoolProp => Arc::new(CoolPropOracle::new()),
        PropertyBackend::Correlation => Arc::new(R134aCorrelation::new()),
        PropertyBackend::Unavailable => Arc::new(UnavailableOracle),
    }
}

/// Validation helpers for property inputs.
pub(crate) mod validation {
    use super::*;

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: Pressure) -> FluidResult<()> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure temperature is positive and finite.
    pub fn validate_temperature(t: Temperature) -> FluidResult<()> {
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure quality lies in [0, 1].
    pub fn validate_quality(x: f64) -> FluidResult<()> {
        if !x.is_finite() || !(0.0..=1.0).contains(&x) {
            return Err(FluidError::OutOfRange {
                what: "quality must lie in [0, 1]",
            });
        }
        Ok(())
    }

    /// Ensure enthalpy or entropy is finite (can be negative).
    pub fn validate_finite(v: f64, what: &'static str) -> FluidResult<()> {
        if !v.is_finite() {
            return Err(FluidError::NonPhysical { what });
        }
        Ok(())
    }
}
