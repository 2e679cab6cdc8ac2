//! CoolProp-based refrigerant properties.

use std::fmt::Display;

use crate::error::{FluidError, FluidResult};
use crate::oracle::{RefrigerantOracle, validation};
use crate::refrigerant::Refrigerant;
use crate::state::{Phase, PropertyPair, ThermoState};
use rfluids::prelude::*;
use tp_core::units::{Pressure, Temperature, k, kg_per_m3, pa};

/// CoolProp backend through `rfluids`.
///
/// Holds no state: every query builds a fresh `Fluid`, so one instance can
/// be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoolPropOracle;

impl CoolPropOracle {
    pub fn new() -> Self {
        Self
    }

    fn fluid_in(&self, fluid: Refrigerant, a: FluidInput, b: FluidInput) -> FluidResult<Fluid> {
        Fluid::from(fluid.rfluids_pure())
            .in_state(a, b)
            .map_err(|e| map_error(format!("{fluid} state: {e}")))
    }

    fn input_for(input: PropertyPair) -> FluidResult<(FluidInput, FluidInput)> {
        let pair = match input {
            PropertyPair::PT { p, t } => {
                validation::validate_pressure(p)?;
                validation::validate_temperature(t)?;
                (FluidInput::pressure(p.value), FluidInput::temperature(t.value))
            }
            PropertyPair::PH { p, h } => {
                validation::validate_pressure(p)?;
                validation::validate_finite(h, "enthalpy must be finite")?;
                (FluidInput::pressure(p.value), FluidInput::enthalpy(h))
            }
            PropertyPair::PS { p, s } => {
                validation::validate_pressure(p)?;
                validation::validate_finite(s, "entropy must be finite")?;
                (FluidInput::pressure(p.value), FluidInput::entropy(s))
            }
            PropertyPair::PQ { p, x } => {
                validation::validate_pressure(p)?;
                validation::validate_quality(x)?;
                (FluidInput::pressure(p.value), FluidInput::quality(x))
            }
            PropertyPair::TQ { t, x } => {
                validation::validate_temperature(t)?;
                validation::validate_quality(x)?;
                (FluidInput::temperature(t.value), FluidInput::quality(x))
            }
            PropertyPair::HS { h, s } => {
                validation::validate_finite(h, "enthalpy must be finite")?;
                validation::validate_finite(s, "entropy must be finite")?;
                (FluidInput::enthalpy(h), FluidInput::entropy(s))
            }
            PropertyPair::TH { .. }
            | PropertyPair::TS { .. }
            | PropertyPair::HQ { .. }
            | PropertyPair::SQ { .. } => {
                return Err(FluidError::NotSupported {
                    what: "CoolProp backend does not accept this input pair",
                });
            }
        };
        Ok(pair)
    }
}

/// Classify an rfluids/CoolProp message.
///
/// CoolProp reports failures as strings only, so range and domain problems
/// are recognized by substring.
pub(crate) fn map_error(message: String) -> FluidError {
    const INFEASIBLE_MARKERS: &[&str] = &[
        "not in range",
        "out of range",
        "outside the range of validity",
        "must be in range",
        "must be between",
        "quality must be",
        "not defined",
        "above the critical",
        "supercritical",
    ];

    let lowered = message.to_lowercase();
    if INFEASIBLE_MARKERS.iter().any(|m| lowered.contains(m)) {
        FluidError::Infeasible { message }
    } else {
        FluidError::Backend { message }
    }
}

pub(crate) fn output<E: Display>(what: &str) -> impl FnOnce(E) -> FluidError + '_ {
    move |e| map_error(format!("rfluids error getting {what}: {e}"))
}

impl RefrigerantOracle for CoolPropOracle {
    fn name(&self) -> &str {
        "coolprop"
    }

    fn supports(&self, _fluid: Refrigerant) -> bool {
        true
    }

    fn state(&self, fluid: Refrigerant, input: PropertyPair) -> FluidResult<ThermoState> {
        let (a, b) = Self::input_for(input)?;
        let mut state = self.fluid_in(fluid, a, b)?;

        let p = state.pressure().map_err(output("pressure"))?;
        let t = state.temperature().map_err(output("temperature"))?;
        let h = state.enthalpy().map_err(output("enthalpy"))?;
        let s = state.entropy().map_err(output("entropy"))?;
        let rho = state.density().map_err(output("density"))?;
        let p_crit = state
            .critical_pressure()
            .map_err(output("critical pressure"))?;
        // CoolProp reports -1 (or an error) outside the dome.
        let quality = state.quality().ok().filter(|x| (0.0..=1.0).contains(x));

        let t_sat = if quality.is_none() && p < p_crit {
            Some(self.saturation_temperature(fluid, pa(p))?.value)
        } else {
            None
        };
        let phase = Phase::classify(p, t, quality, p_crit, t_sat);

        ThermoState::new(fluid, pa(p), k(t), h, s, kg_per_m3(rho), quality, phase)
    }

    fn saturation_pressure(&self, fluid: Refrigerant, t: Temperature) -> FluidResult<Pressure> {
        validation::validate_temperature(t)?;
        let mut sat = self.fluid_in(
            fluid,
            FluidInput::temperature(t.value),
            FluidInput::quality(0.0),
        )?;
        let p = sat.pressure().map_err(output("saturation pressure"))?;
        Ok(pa(p))
    }

    fn saturation_temperature(&self, fluid: Refrigerant, p: Pressure) -> FluidResult<Temperature> {
        validation::validate_pressure(p)?;
        let mut sat = self.fluid_in(fluid, FluidInput::pressure(p.value), FluidInput::quality(0.0))?;
        let t = sat.temperature().map_err(output("saturation temperature"))?;
        Ok(k(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_messages_are_infeasible() {
        let err = map_error("Temperature to QT_flash [400 K] must be in range [169.85 K, 374.21 K]".into());
        assert!(err.is_infeasible());
        let err = map_error("input 3.14 is out of range".into());
        assert!(err.is_infeasible());
    }

    #[test]
    fn other_messages_are_backend_errors() {
        let err = map_error("unable to load library".into());
        assert!(matches!(err, FluidError::Backend { .. }));
    }

    #[test]
    fn rejects_unsupported_pairs_before_calling_backend() {
        let err = CoolPropOracle::input_for(PropertyPair::HQ { h: 4.0e5, x: 0.5 }).unwrap_err();
        assert!(matches!(err, FluidError::NotSupported { .. }));
        let err = CoolPropOracle::input_for(PropertyPair::PQ { p: pa(3.0e5), x: 2.0 }).unwrap_err();
        assert!(err.is_infeasible());
    }
}
