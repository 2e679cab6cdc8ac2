//! Humid-air properties from CoolProp's `HAPropsSI` through `rfluids`.

use rfluids::prelude::{HumidAir, HumidAirInput as HaInput};

use crate::coolprop::{map_error, output};
use crate::error::{FluidError, FluidResult};
use crate::psychro::{HumidAirInput, HumidAirOracle, HumidAirState};
use tp_core::units::constants::{P_ATM_PA, ZERO_CELSIUS_K};

/// CoolProp humid air at a fixed barometric pressure.
///
/// Same state contract as [`crate::AshraePsychrometrics`]: enthalpy per kg
/// dry air, density per m³ of humid air.
#[derive(Debug, Clone, Copy)]
pub struct CoolPropHumidAir {
    pressure_pa: f64,
}

impl Default for CoolPropHumidAir {
    fn default() -> Self {
        Self {
            pressure_pa: P_ATM_PA,
        }
    }
}

impl CoolPropHumidAir {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pressure(pressure_pa: f64) -> FluidResult<Self> {
        if !pressure_pa.is_finite() || pressure_pa <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "barometric pressure must be positive and finite",
            });
        }
        Ok(Self { pressure_pa })
    }

    pub fn pressure_pa(&self) -> f64 {
        self.pressure_pa
    }

    fn second_input(t_db: f64, input: HumidAirInput) -> FluidResult<HaInput> {
        match input {
            HumidAirInput::WetBulb(t_wb) => {
                if !t_wb.is_finite() {
                    return Err(FluidError::NonPhysical {
                        what: "wet-bulb temperature must be finite",
                    });
                }
                // HAPropsSI iterates past this silently on some releases
                if t_wb > t_db {
                    return Err(FluidError::InvalidArg {
                        what: "wet bulb cannot exceed dry bulb",
                    });
                }
                Ok(HaInput::wet_bulb_temperature(t_wb + ZERO_CELSIUS_K))
            }
            HumidAirInput::RelativeHumidity(rh) => {
                if !rh.is_finite() || !(0.0..=1.0).contains(&rh) {
                    return Err(FluidError::OutOfRange {
                        what: "relative humidity must lie in [0, 1]",
                    });
                }
                Ok(HaInput::rel_humidity(rh))
            }
        }
    }
}

impl HumidAirOracle for CoolPropHumidAir {
    fn name(&self) -> &str {
        "coolprop"
    }

    fn state(&self, t_db: f64, input: HumidAirInput) -> FluidResult<HumidAirState> {
        if !t_db.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "dry-bulb temperature must be finite",
            });
        }
        let second = Self::second_input(t_db, input)?;

        let mut air = HumidAir::new()
            .in_state(
                HaInput::pressure(self.pressure_pa),
                HaInput::temperature(t_db + ZERO_CELSIUS_K),
                second,
            )
            .map_err(|e| map_error(format!("humid air at {t_db} °C: {e}")))?;

        let w = air.abs_humidity().map_err(output("humidity ratio"))?;
        let h = air.enthalpy().map_err(output("humid-air enthalpy"))?;
        let rh = air.rel_humidity().map_err(output("relative humidity"))?;
        let rho = air.density().map_err(output("humid-air density"))?;

        Ok(HumidAirState {
            t_db,
            w,
            h,
            rh: rh.clamp(0.0, 1.0),
            rho,
        })
    }
}
