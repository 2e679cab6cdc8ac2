//! Built-in R134a property correlations.
//!
//! A compact, dependency-free model that reproduces CoolProp within a few
//! percent over the chiller operating envelope (-30 °C to 80 °C):
//!
//! - Wagner-form vapor pressure fitted to the critical point
//!   (Tc = 374.21 K, pc = 4.05929 MPa).
//! - Saturated liquid enthalpy/entropy with constant cp on the IIR reference
//!   (h = 200 kJ/kg, s = 1 kJ/(kg·K) for saturated liquid at 0 °C).
//! - Watson-scaled latent heat.
//! - Superheated vapor with constant cp from the saturated vapor line.
//! - Subcooled liquid evaluated at saturation of the same temperature
//!   (pressure effect on liquid enthalpy neglected).
//!
//! Supported property pairs: PT, PH, PS, PQ and TQ. Supercritical requests are
//! rejected rather than extrapolated.

use crate::error::{FluidError, FluidResult};
use crate::oracle::{RefrigerantOracle, validation};
use crate::refrigerant::Refrigerant;
use crate::state::{Phase, PropertyPair, SpecEnthalpy, SpecEntropy, ThermoState};
use tp_core::units::{Pressure, Temperature, k, kg_per_m3, pa};

const T_CRIT: f64 = 374.21;
const P_CRIT: f64 = 4.059_29e6;
const T_TRIPLE: f64 = 169.85;
const T_MAX: f64 = 455.0;
const T_REF: f64 = 273.15;

const WAGNER: [f64; 4] = [-7.686_556, 2.311_791, -2.039_554, -3.583_758];

const H_LIQ_REF: f64 = 200.0e3;
const S_LIQ_REF: f64 = 1.0e3;
const CP_LIQUID: f64 = 1380.0;
const CP_VAPOR: f64 = 1100.0;
const H_FG_REF: f64 = 198.6e3;
const WATSON_EXPONENT: f64 = 0.38;

const R_SPECIFIC: f64 = 8314.462 / 102.03;

/// Correlation-based oracle; evaluates R134a only.
#[derive(Debug, Clone, Copy, Default)]
pub struct R134aCorrelation;

impl R134aCorrelation {
    pub fn new() -> Self {
        Self
    }

    /// Saturation pressure [Pa] at `t` [K].
    pub fn p_sat(t: f64) -> f64 {
        let tau = 1.0 - t / T_CRIT;
        let sum = WAGNER[0] * tau
            + WAGNER[1] * tau.powf(1.5)
            + WAGNER[2] * tau.powi(2)
            + WAGNER[3] * tau.powi(4);
        P_CRIT * (T_CRIT / t * sum).exp()
    }

    /// Saturation temperature [K] at `p` [Pa], by bisection on [T_TRIPLE, T_CRIT].
    pub fn t_sat(p: f64) -> FluidResult<f64> {
        if p >= P_CRIT {
            return Err(FluidError::OutOfRange {
                what: "pressure above the R134a critical point",
            });
        }
        if p < Self::p_sat(T_TRIPLE) {
            return Err(FluidError::Infeasible {
                message: format!("P={p:.1} Pa is below the R134a triple-point pressure"),
            });
        }

        let (mut lo, mut hi) = (T_TRIPLE, T_CRIT);
        for _ in 0..200 {
            let mid = 0.5 * (lo + hi);
            if Self::p_sat(mid) < p {
                lo = mid;
            } else {
                hi = mid;
            }
            if hi - lo < 1e-10 {
                return Ok(0.5 * (lo + hi));
            }
        }
        Err(FluidError::ConvergenceFailed {
            what: "R134a saturation temperature",
        })
    }

    fn h_liquid(t: f64) -> SpecEnthalpy {
        H_LIQ_REF + CP_LIQUID * (t - T_REF)
    }

    fn s_liquid(t: f64) -> SpecEntropy {
        S_LIQ_REF + CP_LIQUID * (t / T_REF).ln()
    }

    fn h_fg(t: f64) -> SpecEnthalpy {
        H_FG_REF * ((T_CRIT - t) / (T_CRIT - T_REF)).powf(WATSON_EXPONENT)
    }

    fn h_vapor(t_sat: f64) -> SpecEnthalpy {
        Self::h_liquid(t_sat) + Self::h_fg(t_sat)
    }

    fn s_vapor(t_sat: f64) -> SpecEntropy {
        Self::s_liquid(t_sat) + Self::h_fg(t_sat) / t_sat
    }

    fn rho_liquid(t: f64) -> f64 {
        1295.0 - 3.7 * (t - T_REF)
    }

    fn rho_vapor(p: f64, t: f64) -> f64 {
        let z = 1.0 - 0.6 * (p / P_CRIT).powf(0.8);
        p / (z * R_SPECIFIC * t)
    }

    fn check_temperature(t: f64) -> FluidResult<()> {
        if t < T_TRIPLE {
            return Err(FluidError::Infeasible {
                message: format!("T={t:.2} K is below the R134a triple point"),
            });
        }
        if t > T_MAX {
            return Err(FluidError::OutOfRange {
                what: "temperature above the R134a correlation limit",
            });
        }
        Ok(())
    }

    fn two_phase(&self, p: f64, t_sat: f64, x: f64) -> FluidResult<ThermoState> {
        validation::validate_quality(x)?;
        let h = Self::h_liquid(t_sat) + x * Self::h_fg(t_sat);
        let s = Self::s_liquid(t_sat) + x * Self::h_fg(t_sat) / t_sat;
        let v = (1.0 - x) / Self::rho_liquid(t_sat) + x / Self::rho_vapor(p, t_sat);
        self.build(p, t_sat, h, s, 1.0 / v, Some(x), Some(t_sat))
    }

    fn single_phase(&self, p: f64, t: f64, t_sat: f64) -> FluidResult<ThermoState> {
        Self::check_temperature(t)?;
        if t > t_sat {
            let h = Self::h_vapor(t_sat) + CP_VAPOR * (t - t_sat);
            let s = Self::s_vapor(t_sat) + CP_VAPOR * (t / t_sat).ln();
            self.build(p, t, h, s, Self::rho_vapor(p, t), None, Some(t_sat))
        } else {
            let h = Self::h_liquid(t);
            let s = Self::s_liquid(t);
            self.build(p, t, h, s, Self::rho_liquid(t), None, Some(t_sat))
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        &self,
        p: f64,
        t: f64,
        h: f64,
        s: f64,
        rho: f64,
        quality: Option<f64>,
        t_sat: Option<f64>,
    ) -> FluidResult<ThermoState> {
        let phase = Phase::classify(p, t, quality, P_CRIT, t_sat);
        ThermoState::new(
            Refrigerant::R134a,
            pa(p),
            k(t),
            h,
            s,
            kg_per_m3(rho),
            quality,
            phase,
        )
    }

    fn from_ph(&self, p: f64, h: f64) -> FluidResult<ThermoState> {
        let t_sat = Self::t_sat(p)?;
        let (h_f, h_g) = (Self::h_liquid(t_sat), Self::h_vapor(t_sat));
        if h > h_g {
            self.single_phase(p, t_sat + (h - h_g) / CP_VAPOR, t_sat)
        } else if h < h_f {
            self.single_phase(p, T_REF + (h - H_LIQ_REF) / CP_LIQUID, t_sat)
        } else {
            self.two_phase(p, t_sat, (h - h_f) / (h_g - h_f))
        }
    }

    fn from_ps(&self, p: f64, s: f64) -> FluidResult<ThermoState> {
        let t_sat = Self::t_sat(p)?;
        let (s_f, s_g) = (Self::s_liquid(t_sat), Self::s_vapor(t_sat));
        if s > s_g {
            self.single_phase(p, t_sat * ((s - s_g) / CP_VAPOR).exp(), t_sat)
        } else if s < s_f {
            self.single_phase(p, T_REF * ((s - S_LIQ_REF) / CP_LIQUID).exp(), t_sat)
        } else {
            self.two_phase(p, t_sat, (s - s_f) / (s_g - s_f))
        }
    }

    fn check_fluid(fluid: Refrigerant) -> FluidResult<()> {
        if fluid == Refrigerant::R134a {
            Ok(())
        } else {
            Err(FluidError::NotSupported {
                what: "correlation backend only models R134a",
            })
        }
    }
}

impl RefrigerantOracle for R134aCorrelation {
    fn name(&self) -> &str {
        "correlation"
    }

    fn supports(&self, fluid: Refrigerant) -> bool {
        fluid == Refrigerant::R134a
    }

    fn state(&self, fluid: Refrigerant, input: PropertyPair) -> FluidResult<ThermoState> {
        Self::check_fluid(fluid)?;
        match input {
            PropertyPair::PT { p, t } => {
                validation::validate_pressure(p)?;
                validation::validate_temperature(t)?;
                if t.value >= T_CRIT {
                    return Err(FluidError::OutOfRange {
                        what: "supercritical R134a states are not modelled",
                    });
                }
                let t_sat = Self::t_sat(p.value)?;
                self.single_phase(p.value, t.value, t_sat)
            }
            PropertyPair::PH { p, h } => {
                validation::validate_pressure(p)?;
                validation::validate_finite(h, "enthalpy must be finite")?;
                self.from_ph(p.value, h)
            }
            PropertyPair::PS { p, s } => {
                validation::validate_pressure(p)?;
                validation::validate_finite(s, "entropy must be finite")?;
                self.from_ps(p.value, s)
            }
            PropertyPair::PQ { p, x } => {
                validation::validate_pressure(p)?;
                let t_sat = Self::t_sat(p.value)?;
                self.two_phase(p.value, t_sat, x)
            }
            PropertyPair::TQ { t, x } => {
                validation::validate_temperature(t)?;
                Self::check_temperature(t.value)?;
                if t.value >= T_CRIT {
                    return Err(FluidError::Infeasible {
                        message: format!("no two-phase region at T={:.2} K", t.value),
                    });
                }
                self.two_phase(Self::p_sat(t.value), t.value, x)
            }
            _ => Err(FluidError::NotSupported {
                what: "correlation backend accepts PT, PH, PS, PQ and TQ inputs",
            }),
        }
    }

    fn saturation_pressure(&self, fluid: Refrigerant, t: Temperature) -> FluidResult<Pressure> {
        Self::check_fluid(fluid)?;
        validation::validate_temperature(t)?;
        Self::check_temperature(t.value)?;
        if t.value >= T_CRIT {
            return Err(FluidError::Infeasible {
                message: format!("no saturation pressure above Tc (T={:.2} K)", t.value),
            });
        }
        Ok(pa(Self::p_sat(t.value)))
    }

    fn saturation_temperature(&self, fluid: Refrigerant, p: Pressure) -> FluidResult<Temperature> {
        Self::check_fluid(fluid)?;
        validation::validate_pressure(p)?;
        Ok(k(Self::t_sat(p.value)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use tp_core::units::celsius;

    const R134A: Refrigerant = Refrigerant::R134a;

    #[test]
    fn vapor_pressure_matches_reference_data() {
        let oracle = R134aCorrelation::new();
        let p0 = oracle.saturation_pressure(R134A, celsius(0.0)).unwrap();
        let p40 = oracle.saturation_pressure(R134A, celsius(40.0)).unwrap();
        assert_relative_eq!(p0.value, 292_800.0, max_relative = 0.005);
        assert_relative_eq!(p40.value, 1_016_600.0, max_relative = 0.005);
    }

    #[test]
    fn saturation_temperature_inverts_pressure() {
        let oracle = R134aCorrelation::new();
        let p = oracle.saturation_pressure(R134A, celsius(5.0)).unwrap();
        let t = oracle.saturation_temperature(R134A, p).unwrap();
        assert_relative_eq!(t.value, 278.15, epsilon = 1e-6);
    }

    #[test]
    fn saturated_vapor_enthalpy_near_coolprop() {
        let oracle = R134aCorrelation::new();
        let sat = oracle
            .state(R134A, PropertyPair::TQ { t: celsius(40.0), x: 1.0 })
            .unwrap();
        // CoolProp: 419.4 kJ/kg
        assert_relative_eq!(sat.enthalpy(), 419.4e3, max_relative = 0.01);
        assert_eq!(sat.phase(), Phase::TwoPhase);
    }

    #[test]
    fn superheated_pt_state() {
        let oracle = R134aCorrelation::new();
        let p = oracle.saturation_pressure(R134A, celsius(5.0)).unwrap();
        let state = oracle
            .state(R134A, PropertyPair::PT { p, t: celsius(10.0) })
            .unwrap();
        assert_eq!(state.phase(), Phase::SuperheatedVapor);
        assert!(state.quality().is_none());
        assert!(state.density().value > 10.0 && state.density().value < 25.0);
    }

    #[test]
    fn throttled_liquid_lands_in_dome() {
        let oracle = R134aCorrelation::new();
        let p_cond = oracle.saturation_pressure(R134A, celsius(38.0)).unwrap();
        let liquid = oracle
            .state(R134A, PropertyPair::PT { p: p_cond, t: celsius(35.0) })
            .unwrap();
        assert_eq!(liquid.phase(), Phase::SubcooledLiquid);

        let p_evap = oracle.saturation_pressure(R134A, celsius(5.0)).unwrap();
        let flashed = oracle
            .state(R134A, PropertyPair::PH { p: p_evap, h: liquid.enthalpy() })
            .unwrap();
        assert_eq!(flashed.phase(), Phase::TwoPhase);
        let x = flashed.quality().unwrap();
        assert!(x > 0.15 && x < 0.30, "flash quality {x}");
        assert_relative_eq!(flashed.temperature_c(), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn ps_inverts_pt_in_vapor_region() {
        let oracle = R134aCorrelation::new();
        let p = oracle.saturation_pressure(R134A, celsius(38.0)).unwrap();
        let hot = oracle
            .state(R134A, PropertyPair::PT { p, t: celsius(55.0) })
            .unwrap();
        let back = oracle
            .state(R134A, PropertyPair::PS { p, s: hot.entropy() })
            .unwrap();
        assert_relative_eq!(back.temperature().value, hot.temperature().value, epsilon = 1e-9);
        assert_relative_eq!(back.enthalpy(), hot.enthalpy(), epsilon = 1e-6);
    }

    #[test]
    fn supercritical_is_rejected() {
        let oracle = R134aCorrelation::new();
        let err = oracle
            .state(R134A, PropertyPair::PT { p: pa(5.0e6), t: k(400.0) })
            .unwrap_err();
        assert!(err.is_infeasible());
        let err = oracle
            .saturation_pressure(R134A, k(380.0))
            .unwrap_err();
        assert!(err.is_infeasible());
    }

    #[test]
    fn other_fluids_and_pairs_not_supported() {
        let oracle = R134aCorrelation::new();
        assert!(matches!(
            oracle.saturation_pressure(Refrigerant::Ammonia, celsius(5.0)),
            Err(FluidError::NotSupported { .. })
        ));
        assert!(matches!(
            oracle.state(R134A, PropertyPair::HS { h: 4.0e5, s: 1.7e3 }),
            Err(FluidError::NotSupported { .. })
        ));
    }

    proptest! {
        #[test]
        fn vapor_pressure_increases_with_temperature(t_c in -30.0f64..80.0, dt in 0.1f64..5.0) {
            let lo = R134aCorrelation::p_sat(t_c + 273.15);
            let hi = R134aCorrelation::p_sat(t_c + dt + 273.15);
            prop_assert!(hi > lo);
        }

        #[test]
        fn two_phase_enthalpy_between_saturation_lines(t_c in -20.0f64..60.0, x in 0.0f64..=1.0) {
            let oracle = R134aCorrelation::new();
            let mixed = oracle.state(R134A, PropertyPair::TQ { t: celsius(t_c), x }).unwrap();
            let liquid = oracle.state(R134A, PropertyPair::TQ { t: celsius(t_c), x: 0.0 }).unwrap();
            let vapor = oracle.state(R134A, PropertyPair::TQ { t: celsius(t_c), x: 1.0 }).unwrap();
            prop_assert!(mixed.enthalpy() >= liquid.enthalpy() - 1e-9);
            prop_assert!(mixed.enthalpy() <= vapor.enthalpy() + 1e-9);
        }
    }
}
