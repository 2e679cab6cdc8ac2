//! Placeholder oracle for machines without a property backend.

use crate::error::{FluidError, FluidResult};
use crate::oracle::RefrigerantOracle;
use crate::refrigerant::Refrigerant;
use crate::state::{PropertyPair, ThermoState};
use tp_core::units::{Pressure, Temperature};

const REASON: &str = "no refrigerant property backend configured";

/// Oracle that rejects every query instead of substituting values.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableOracle;

impl RefrigerantOracle for UnavailableOracle {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn supports(&self, _fluid: Refrigerant) -> bool {
        false
    }

    fn state(&self, _fluid: Refrigerant, _input: PropertyPair) -> FluidResult<ThermoState> {
        Err(FluidError::Unavailable { what: REASON })
    }

    fn saturation_pressure(&self, _fluid: Refrigerant, _t: Temperature) -> FluidResult<Pressure> {
        Err(FluidError::Unavailable { what: REASON })
    }

    fn saturation_temperature(&self, _fluid: Refrigerant, _p: Pressure) -> FluidResult<Temperature> {
        Err(FluidError::Unavailable { what: REASON })
    }
}
