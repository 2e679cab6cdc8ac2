//! Humid-air properties (ASHRAE Handbook Fundamentals 2017, chapter 1).
//!
//! Temperatures in °C, humidity ratio in kg water per kg dry air, enthalpy in
//! J per kg dry air, density in kg humid air per m³.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::coolprop_air::CoolPropHumidAir;
use crate::error::{FluidError, FluidResult};
use tp_core::units::constants::{P_ATM_PA, ZERO_CELSIUS_K};

/// Ratio of molecular masses, water to dry air.
const EPSILON: f64 = 0.622;

/// Second property fixing a humid-air state alongside dry bulb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HumidAirInput {
    /// Thermodynamic wet-bulb temperature [°C].
    WetBulb(f64),
    /// Relative humidity [0, 1].
    RelativeHumidity(f64),
}

/// Moist air at a given dry-bulb temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidAirState {
    /// Dry-bulb temperature [°C]
    pub t_db: f64,
    /// Humidity ratio [kg/kg dry air]
    pub w: f64,
    /// Specific enthalpy [J/kg dry air]
    pub h: f64,
    /// Relative humidity, clamped to [0, 1]
    pub rh: f64,
    /// Density [kg/m³]
    pub rho: f64,
}

/// Humid-air property calculator.
pub trait HumidAirOracle: Send + Sync {
    fn name(&self) -> &str;

    /// Resolve the state from dry bulb plus wet bulb or relative humidity.
    fn state(&self, t_db: f64, input: HumidAirInput) -> FluidResult<HumidAirState>;
}

/// ASHRAE psychrometric relations at a fixed barometric pressure.
#[derive(Debug, Clone, Copy)]
pub struct AshraePsychrometrics {
    pressure_pa: f64,
}

impl Default for AshraePsychrometrics {
    fn default() -> Self {
        Self {
            pressure_pa: P_ATM_PA,
        }
    }
}

impl AshraePsychrometrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a non-standard barometric pressure [Pa].
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

    /// Hyland-Wexler saturation vapor pressure [Pa], over ice below 0 °C.
    pub fn saturation_pressure(t_c: f64) -> FluidResult<f64> {
        if !t_c.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "temperature must be finite",
            });
        }
        if !(-100.0..=200.0).contains(&t_c) {
            return Err(FluidError::OutOfRange {
                what: "saturation pressure valid from -100 °C to 200 °C",
            });
        }

        let t = t_c + ZERO_CELSIUS_K;
        let ln_pws = if t_c >= 0.0 {
            -5.800_220_6e3 / t + 1.391_499_3 - 4.864_023_9e-2 * t + 4.176_476_8e-5 * t.powi(2)
                - 1.445_209_3e-8 * t.powi(3)
                + 6.545_967_3 * t.ln()
        } else {
            -5.674_535_9e3 / t + 6.392_524_7 - 9.677_843_0e-3 * t + 6.221_570_1e-7 * t.powi(2)
                + 2.074_782_5e-9 * t.powi(3)
                - 9.484_024_0e-13 * t.powi(4)
                + 4.163_501_9 * t.ln()
        };
        Ok(ln_pws.exp())
    }

    fn humidity_ratio_from_vapor_pressure(&self, pw: f64) -> FluidResult<f64> {
        if pw >= self.pressure_pa {
            return Err(FluidError::OutOfRange {
                what: "vapor pressure reaches barometric pressure",
            });
        }
        Ok(EPSILON * pw / (self.pressure_pa - pw))
    }

    /// Humidity ratio at saturation [kg/kg].
    pub fn saturation_humidity_ratio(&self, t_c: f64) -> FluidResult<f64> {
        self.humidity_ratio_from_vapor_pressure(Self::saturation_pressure(t_c)?)
    }

    /// Humidity ratio from dry bulb and wet bulb (ASHRAE eq. 33, eq. 35 below freezing).
    pub fn humidity_ratio_from_wet_bulb(&self, t_db: f64, t_wb: f64) -> FluidResult<f64> {
        if t_wb > t_db {
            return Err(FluidError::InvalidArg {
                what: "wet bulb cannot exceed dry bulb",
            });
        }
        let ws = self.saturation_humidity_ratio(t_wb)?;
        let w = if t_wb >= 0.0 {
            ((2501.0 - 2.326 * t_wb) * ws - 1.006 * (t_db - t_wb))
                / (2501.0 + 1.86 * t_db - 4.186 * t_wb)
        } else {
            ((2830.0 - 0.24 * t_wb) * ws - 1.006 * (t_db - t_wb))
                / (2830.0 + 1.86 * t_db - 2.1 * t_wb)
        };
        if w < 0.0 {
            return Err(FluidError::Infeasible {
                message: format!("air at {t_db:.2} °C cannot have a {t_wb:.2} °C wet bulb"),
            });
        }
        Ok(w)
    }

    pub fn humidity_ratio_from_rh(&self, t_db: f64, rh: f64) -> FluidResult<f64> {
        if !rh.is_finite() || !(0.0..=1.0).contains(&rh) {
            return Err(FluidError::OutOfRange {
                what: "relative humidity must lie in [0, 1]",
            });
        }
        self.humidity_ratio_from_vapor_pressure(rh * Self::saturation_pressure(t_db)?)
    }

    /// Relative humidity implied by a humidity ratio, clamped to [0, 1].
    pub fn relative_humidity(&self, t_db: f64, w: f64) -> FluidResult<f64> {
        let pw = w * self.pressure_pa / (EPSILON + w);
        Ok((pw / Self::saturation_pressure(t_db)?).clamp(0.0, 1.0))
    }

    /// Moist-air enthalpy [J/kg dry air].
    pub fn enthalpy(t_db: f64, w: f64) -> f64 {
        1006.0 * t_db + w * (2_501_000.0 + 1860.0 * t_db)
    }

    /// Moist-air density [kg/m³] from the specific volume per kg dry air.
    pub fn density(&self, t_db: f64, w: f64) -> f64 {
        let v = 0.287_042 * (t_db + ZERO_CELSIUS_K) * (1.0 + 1.607_858 * w)
            / (self.pressure_pa / 1000.0);
        (1.0 + w) / v
    }
}

impl HumidAirOracle for AshraePsychrometrics {
    fn name(&self) -> &str {
        "ashrae"
    }

    fn state(&self, t_db: f64, input: HumidAirInput) -> FluidResult<HumidAirState> {
        if !t_db.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "dry-bulb temperature must be finite",
            });
        }
        let w = match input {
            HumidAirInput::WetBulb(t_wb) => {
                if !t_wb.is_finite() {
                    return Err(FluidError::NonPhysical {
                        what: "wet-bulb temperature must be finite",
                    });
                }
                self.humidity_ratio_from_wet_bulb(t_db, t_wb)?
            }
            HumidAirInput::RelativeHumidity(rh) => self.humidity_ratio_from_rh(t_db, rh)?,
        };

        Ok(HumidAirState {
            t_db,
            w,
            h: Self::enthalpy(t_db, w),
            rh: self.relative_humidity(t_db, w)?,
            rho: self.density(t_db, w),
        })
    }
}

/// Selectable humid-air backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AirBackend {
    /// Built-in ASHRAE relations.
    #[default]
    Ashrae,
    /// CoolProp `HAPropsSI` through `rfluids`.
    CoolProp,
}

impl AirBackend {
    pub fn key(&self) -> &'static str {
        match self {
            AirBackend::Ashrae => "ashrae",
            AirBackend::CoolProp => "coolprop",
        }
    }
}

impl fmt::Display for AirBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for AirBackend {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ashrae" | "builtin" => Ok(AirBackend::Ashrae),
            "coolprop" => Ok(AirBackend::CoolProp),
            _ => Err("unknown humid-air backend"),
        }
    }
}

/// Build the shared humid-air oracle for a backend at sea-level pressure.
pub fn build_air_oracle(backend: AirBackend) -> Arc<dyn HumidAirOracle> {
    match backend {
        AirBackend::Ashrae => Arc::new(AshraePsychrometrics::new()),
        AirBackend::CoolProp => Arc::new(CoolPropHumidAir::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn saturation_pressure_reference_points() {
        // ASHRAE table 3: 25 °C -> 3.1699 kPa, -10 °C over ice -> 0.25991 kPa
        assert_relative_eq!(
            AshraePsychrometrics::saturation_pressure(25.0).unwrap(),
            3169.9,
            max_relative = 1e-3
        );
        assert_relative_eq!(
            AshraePsychrometrics::saturation_pressure(-10.0).unwrap(),
            259.91,
            max_relative = 1e-3
        );
    }

    #[test]
    fn state_at_25c_50_percent() {
        let psy = AshraePsychrometrics::new();
        let air = psy
            .state(25.0, HumidAirInput::RelativeHumidity(0.5))
            .unwrap();
        assert_relative_eq!(air.w, 0.009_882, max_relative = 1e-3);
        assert_relative_eq!(air.h, 50_324.0, max_relative = 1e-3);
        assert_relative_eq!(air.rho, 1.177, max_relative = 1e-3);
        assert_relative_eq!(air.rh, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn wet_bulb_equal_to_dry_bulb_is_saturated() {
        let psy = AshraePsychrometrics::new();
        let air = psy.state(20.0, HumidAirInput::WetBulb(20.0)).unwrap();
        assert_relative_eq!(air.rh, 1.0, epsilon = 1e-6);
        assert_relative_eq!(
            air.w,
            psy.saturation_humidity_ratio(20.0).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn tower_inlet_air() {
        let psy = AshraePsychrometrics::new();
        let air = psy.state(35.5, HumidAirInput::WetBulb(25.5)).unwrap();
        assert_relative_eq!(air.w, 0.016_464, max_relative = 1e-3);
        assert_relative_eq!(air.rh, 0.4516, max_relative = 2e-3);
    }

    #[test]
    fn rejects_inconsistent_inputs() {
        let psy = AshraePsychrometrics::new();
        assert!(psy.state(20.0, HumidAirInput::WetBulb(22.0)).is_err());
        assert!(psy.state(20.0, HumidAirInput::RelativeHumidity(1.2)).is_err());
        // Depression far beyond what dry air can produce.
        assert!(psy.state(45.0, HumidAirInput::WetBulb(0.5)).is_err());
        assert!(psy.state(f64::NAN, HumidAirInput::RelativeHumidity(0.5)).is_err());
        assert!(AshraePsychrometrics::with_pressure(0.0).is_err());
    }

    #[test]
    fn lower_pressure_raises_humidity_ratio() {
        let sea = AshraePsychrometrics::new();
        let denver = AshraePsychrometrics::with_pressure(83_400.0).unwrap();
        let w_sea = sea.humidity_ratio_from_rh(25.0, 0.5).unwrap();
        let w_denver = denver.humidity_ratio_from_rh(25.0, 0.5).unwrap();
        assert!(w_denver > w_sea);
    }

    #[test]
    fn air_backend_keys() {
        assert_eq!("ASHRAE".parse::<AirBackend>(), Ok(AirBackend::Ashrae));
        assert_eq!(" coolprop ".parse::<AirBackend>(), Ok(AirBackend::CoolProp));
        assert!("refprop".parse::<AirBackend>().is_err());
        assert_eq!(AirBackend::default().to_string(), "ashrae");
        assert_eq!(build_air_oracle(AirBackend::Ashrae).name(), "ashrae");
        assert_eq!(build_air_oracle(AirBackend::CoolProp).name(), "coolprop");
    }
}
