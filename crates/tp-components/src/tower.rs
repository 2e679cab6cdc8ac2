//! Induced-draft cooling tower from a psychrometric mass and energy balance.
//!
//! Single pass, no iteration:
//! - water leaves at wet bulb + approach
//! - inlet air from (dry bulb, wet bulb); dry bulb estimated when missing
//! - exit air nearly saturated at the water outlet temperature
//! - evaporation from the humidity-ratio pickup of the dry-air stream
//! - makeup = evaporation + drift + blowdown, blowdown = evaporation / (COC - 1)

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::common::{CP_WATER, H_FG_WATER, check_closed, check_finite, check_half_open, check_positive};
use crate::diagnostics::Diagnostic;
use crate::error::{ComponentError, ComponentResult};
use tp_core::numeric::relative_residual;
use tp_fluids::{HumidAirInput, HumidAirOracle, HumidAirState};

/// Source of the tower's cycles of concentration.
pub trait CocProvider: Send + Sync + fmt::Debug {
    /// Cycles of concentration (> 1).
    fn cycles(&self) -> f64;

    /// Silica limit in circulating water, when the cycles derive from one [ppm].
    fn silica_limit_ppm(&self) -> Option<f64> {
        None
    }
}

/// Fixed cycles of concentration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantCoc(pub f64);

impl CocProvider for ConstantCoc {
    fn cycles(&self) -> f64 {
        self.0
    }
}

/// Cycles of concentration bounded by silica solubility:
/// `COC = max_silica / makeup_silica`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilicaLimitedCoc {
    makeup_silica_ppm: f64,
    max_silica_ppm: f64,
}

impl SilicaLimitedCoc {
    pub fn new(makeup_silica_ppm: f64, max_silica_ppm: f64) -> ComponentResult<Self> {
        check_finite(makeup_silica_ppm, "makeup silica")?;
        check_finite(max_silica_ppm, "maximum silica")?;
        if makeup_silica_ppm <= 0.0 || makeup_silica_ppm > 100.0 {
            return Err(ComponentError::OutOfRange {
                what: "makeup silica must be in (0, 100] ppm",
                value: makeup_silica_ppm,
            });
        }
        if max_silica_ppm <= makeup_silica_ppm {
            return Err(ComponentError::OutOfRange {
                what: "maximum silica must exceed makeup silica",
                value: max_silica_ppm,
            });
        }
        Ok(Self {
            makeup_silica_ppm,
            max_silica_ppm,
        })
    }

    pub fn makeup_silica_ppm(&self) -> f64 {
        self.makeup_silica_ppm
    }
}

impl CocProvider for SilicaLimitedCoc {
    fn cycles(&self) -> f64 {
        self.max_silica_ppm / self.makeup_silica_ppm
    }

    fn silica_limit_ppm(&self) -> Option<f64> {
        Some(self.max_silica_ppm)
    }
}

/// Fraction of evaporation lost to blowdown: `1 / (COC - 1)`.
pub fn blowdown_fraction(coc: f64) -> f64 {
    1.0 / (coc - 1.0)
}

/// Blowdown comparison against a baseline COC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterSavings {
    pub baseline_coc: f64,
    pub optimized_coc: f64,
    pub blowdown_reduction_pct: f64,
    pub max_silica_limit_ppm: Option<f64>,
}

/// Tower design parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerParams {
    /// Water outlet minus ambient wet bulb [K]
    pub approach: f64,
    /// Drift as a fraction of circulating water
    pub drift_rate: f64,
    /// Moist-air to water mass-flow ratio
    pub air_to_water_ratio: f64,
    /// Fan power as a fraction of heat rejection
    pub fan_power_fraction: f64,
    /// Dry bulb minus wet bulb assumed when dry bulb is unknown [K]
    pub wet_bulb_depression: f64,
    /// Relative humidity of the exit air
    pub outlet_rh: f64,
    /// Energy-balance residual above which a diagnostic is raised
    pub residual_warning: f64,
}

impl Default for TowerParams {
    fn default() -> Self {
        Self {
            approach: 4.0,
            drift_rate: 1.0e-5,
            air_to_water_ratio: 1.2,
            fan_power_fraction: 0.007,
            wet_bulb_depression: 10.0,
            outlet_rh: 0.95,
            residual_warning: 0.15,
        }
    }
}

impl TowerParams {
    pub fn validate(&self) -> ComponentResult<()> {
        check_finite(self.approach, "approach")?;
        if self.approach <= 0.0 || self.approach > 20.0 {
            return Err(ComponentError::OutOfRange {
                what: "approach must be in (0, 20] °C",
                value: self.approach,
            });
        }
        check_closed(self.drift_rate, 0.0, 0.01, "drift rate")?;
        check_finite(self.air_to_water_ratio, "air-to-water ratio")?;
        if self.air_to_water_ratio <= 0.0 || self.air_to_water_ratio > 5.0 {
            return Err(ComponentError::OutOfRange {
                what: "air-to-water ratio must be in (0, 5]",
                value: self.air_to_water_ratio,
            });
        }
        check_closed(self.fan_power_fraction, 0.0, 0.1, "fan power fraction")?;
        check_closed(self.wet_bulb_depression, 0.0, 40.0, "wet-bulb depression")?;
        check_closed(self.outlet_rh, 0.0, 1.0, "outlet relative humidity")?;
        check_positive(self.residual_warning, "residual warning threshold")?;
        Ok(())
    }
}

/// Tower operating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerSolution {
    pub q_cond_w: f64,
    pub q_water_w: f64,
    pub q_air_w: f64,

    pub t_water_in_c: f64,
    pub t_water_out_c: f64,
    pub range_c: f64,
    pub approach_c: f64,
    pub m_cw_kg_s: f64,

    pub t_wb_c: f64,
    pub air_in: HumidAirState,
    pub air_out: HumidAirState,
    pub m_da_kg_s: f64,
    pub air_to_water_ratio: f64,

    pub m_evap_kg_s: f64,
    /// Duty / latent heat, for cross-checking only.
    pub m_evap_energy_kg_s: f64,
    pub m_drift_kg_s: f64,
    pub m_blowdown_kg_s: f64,
    pub m_makeup_kg_s: f64,
    pub coc: f64,

    pub fan_power_w: f64,
    /// |Q_water - Q_air| / Q_water
    pub energy_balance_residual: f64,
    pub diagnostics: Vec<Diagnostic>,
}

impl TowerSolution {
    /// Makeup water in liters per hour (1 kg ≈ 1 L).
    pub fn makeup_l_per_hr(&self) -> f64 {
        self.m_makeup_kg_s * 3600.0
    }
}

/// Cooling tower with an injected COC strategy and humid-air oracle.
#[derive(Clone)]
pub struct CoolingTower {
    params: TowerParams,
    coc: Arc<dyn CocProvider>,
    air: Arc<dyn HumidAirOracle>,
}

impl fmt::Debug for CoolingTower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoolingTower")
            .field("params", &self.params)
            .field("coc", &self.coc)
            .field("air", &self.air.name())
            .finish()
    }
}

impl CoolingTower {
    pub fn new(
        params: TowerParams,
        coc: Arc<dyn CocProvider>,
        air: Arc<dyn HumidAirOracle>,
    ) -> ComponentResult<Self> {
        params.validate()?;
        let cycles = coc.cycles();
        check_finite(cycles, "cycles of concentration")?;
        if !(2.0..=10.0).contains(&cycles) {
            return Err(ComponentError::OutOfRange {
                what: "cycles of concentration must be in [2, 10]",
                value: cycles,
            });
        }
        Ok(Self { params, coc, air })
    }

    pub fn params(&self) -> &TowerParams {
        &self.params
    }

    pub fn coc(&self) -> f64 {
        self.coc.cycles()
    }

    pub fn psychrometrics(&self) -> &dyn HumidAirOracle {
        self.air.as_ref()
    }

    /// Water outlet temperature: wet bulb + approach.
    pub fn outlet_temperature(&self, t_wb: f64) -> ComponentResult<f64> {
        check_closed(t_wb, -20.0, 50.0, "ambient wet bulb")?;
        Ok(t_wb + self.params.approach)
    }

    /// Blowdown reduction relative to `baseline_coc`.
    pub fn water_savings(&self, baseline_coc: f64) -> ComponentResult<WaterSavings> {
        check_finite(baseline_coc, "baseline COC")?;
        if baseline_coc <= 1.0 {
            return Err(ComponentError::OutOfRange {
                what: "baseline COC must exceed 1",
                value: baseline_coc,
            });
        }
        let baseline = blowdown_fraction(baseline_coc);
        let optimized = blowdown_fraction(self.coc());
        Ok(WaterSavings {
            baseline_coc,
            optimized_coc: self.coc(),
            blowdown_reduction_pct: (baseline - optimized) / baseline * 100.0,
            max_silica_limit_ppm: self.coc.silica_limit_ppm(),
        })
    }

    /// Solve for heat rejection `q_cond` [W], water flow [kg/s] and inlet
    /// temperature, ambient wet bulb and optional dry bulb [°C].
    pub fn solve(
        &self,
        q_cond: f64,
        m_cw: f64,
        t_in: f64,
        t_wb: f64,
        t_db: Option<f64>,
    ) -> ComponentResult<TowerSolution> {
        check_positive(q_cond, "tower heat rejection")?;
        check_positive(m_cw, "tower water flow")?;
        check_half_open(t_in, 0.0, 100.0, "tower water inlet temperature")?;

        let p = &self.params;
        let t_out = self.outlet_temperature(t_wb)?;
        let range = t_in - t_out;
        if range <= 0.0 {
            return Err(ComponentError::OutOfRange {
                what: "tower range (inlet must be warmer than wet bulb + approach)",
                value: range,
            });
        }

        let mut diagnostics = Vec::new();
        let t_db = match t_db {
            Some(t) => check_finite(t, "ambient dry bulb")?,
            None => {
                let estimate = t_wb + p.wet_bulb_depression;
                diagnostics.push(
                    Diagnostic::EstimatedDryBulb {
                        t_db: estimate,
                        depression: p.wet_bulb_depression,
                    }
                    .emit(),
                );
                estimate
            }
        };

        let air_in = self
            .air
            .state(t_db, HumidAirInput::WetBulb(t_wb))
            .map_err(ComponentError::at("tower inlet air"))?;
        let air_out = self
            .air
            .state(t_out, HumidAirInput::RelativeHumidity(p.outlet_rh))
            .map_err(ComponentError::at("tower exit air"))?;

        let m_da = m_cw * p.air_to_water_ratio / (1.0 + air_in.w);
        let m_evap = m_da * (air_out.w - air_in.w);
        if m_evap < 0.0 {
            return Err(ComponentError::OutOfRange {
                what: "tower evaporation (exit air drier than inlet air)",
                value: m_evap,
            });
        }

        let coc = self.coc();
        let m_drift = p.drift_rate * m_cw;
        let m_blowdown = m_evap * blowdown_fraction(coc);
        let m_makeup = m_evap + m_drift + m_blowdown;

        let q_water = m_cw * CP_WATER * range;
        let q_air = m_da * (air_out.h - air_in.h);
        let energy_balance_residual = relative_residual(q_water, q_air, q_water);
        if energy_balance_residual > p.residual_warning {
            diagnostics.push(
                Diagnostic::TowerEnergyBalance {
                    residual: energy_balance_residual,
                    threshold: p.residual_warning,
                }
                .emit(),
            );
        }

        tracing::debug!(t_out, range, m_evap, m_makeup, energy_balance_residual, "cooling tower solved");

        Ok(TowerSolution {
            q_cond_w: q_cond,
            q_water_w: q_water,
            q_air_w: q_air,
            t_water_in_c: t_in,
            t_water_out_c: t_out,
            range_c: range,
            approach_c: p.approach,
            m_cw_kg_s: m_cw,
            t_wb_c: t_wb,
            air_in,
            air_out,
            m_da_kg_s: m_da,
            air_to_water_ratio: p.air_to_water_ratio,
            m_evap_kg_s: m_evap,
            m_evap_energy_kg_s: q_cond / H_FG_WATER,
            m_drift_kg_s: m_drift,
            m_blowdown_kg_s: m_blowdown,
            m_makeup_kg_s: m_makeup,
            coc,
            fan_power_w: p.fan_power_fraction * q_cond,
            energy_balance_residual,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tp_fluids::AshraePsychrometrics;

    fn tower(coc: Arc<dyn CocProvider>) -> CoolingTower {
        CoolingTower::new(TowerParams::default(), coc, Arc::new(AshraePsychrometrics::new())).unwrap()
    }

    #[test]
    fn design_scenario() {
        let sol = tower(Arc::new(ConstantCoc(5.0)))
            .solve(1.15e9, 50_000.0, 35.0, 25.5, None)
            .unwrap();
        assert_eq!(sol.t_water_out_c, 29.5);
        assert_eq!(sol.range_c, 5.5);
        assert!(sol.air_out.rh > 0.9);
        assert!(sol.m_makeup_kg_s > sol.m_evap_kg_s);
        assert_relative_eq!(sol.air_in.t_db, 35.5);
        assert_relative_eq!(sol.m_da_kg_s, 59_028.0, max_relative = 1e-3);
        assert_relative_eq!(sol.m_evap_kg_s, 505.5, max_relative = 2e-3);
        assert_relative_eq!(sol.m_blowdown_kg_s, sol.m_evap_kg_s / 4.0);
        assert_relative_eq!(sol.m_drift_kg_s, 0.5, max_relative = 1e-12);
        assert_relative_eq!(sol.m_evap_energy_kg_s, 508.85, max_relative = 1e-3);
        assert_relative_eq!(sol.fan_power_w, 8.05e6, max_relative = 1e-12);
        assert_relative_eq!(sol.energy_balance_residual, 0.1966, epsilon = 2e-3);
    }

    #[test]
    fn warnings_for_estimated_dry_bulb_and_residual() {
        let sol = tower(Arc::new(ConstantCoc(5.0)))
            .solve(1.15e9, 50_000.0, 35.0, 25.5, None)
            .unwrap();
        assert!(sol.diagnostics.iter().any(|d| matches!(d, Diagnostic::EstimatedDryBulb { .. })));
        assert!(sol.diagnostics.iter().any(|d| matches!(d, Diagnostic::TowerEnergyBalance { .. })));

        let sol = tower(Arc::new(ConstantCoc(5.0)))
            .solve(1.15e9, 50_000.0, 35.0, 25.5, Some(33.0))
            .unwrap();
        assert!(!sol.diagnostics.iter().any(|d| matches!(d, Diagnostic::EstimatedDryBulb { .. })));
    }

    #[test]
    fn higher_coc_reduces_blowdown_by_a_fifth() {
        let base = tower(Arc::new(ConstantCoc(5.0)))
            .solve(1.15e9, 50_000.0, 35.0, 25.5, None)
            .unwrap();
        let opt = tower(Arc::new(ConstantCoc(6.0)))
            .solve(1.15e9, 50_000.0, 35.0, 25.5, None)
            .unwrap();
        assert_relative_eq!(opt.m_evap_kg_s, base.m_evap_kg_s);
        assert_relative_eq!(opt.m_blowdown_kg_s / base.m_blowdown_kg_s, 0.8, epsilon = 1e-12);
        assert_eq!(blowdown_fraction(5.0), 0.25);
        assert_relative_eq!(blowdown_fraction(6.0), 0.2);
    }

    #[test]
    fn silica_limit_sets_cycles() {
        let silica = SilicaLimitedCoc::new(25.0, 150.0).unwrap();
        assert_relative_eq!(silica.cycles(), 6.0);
        let t = tower(Arc::new(silica));
        let savings = t.water_savings(5.0).unwrap();
        assert_relative_eq!(savings.blowdown_reduction_pct, 20.0, epsilon = 1e-9);
        assert_eq!(savings.max_silica_limit_ppm, Some(150.0));

        assert!(SilicaLimitedCoc::new(0.0, 150.0).is_err());
        assert!(SilicaLimitedCoc::new(50.0, 40.0).is_err());
    }

    #[test]
    fn coc_outside_band_rejected() {
        let air: Arc<dyn HumidAirOracle> = Arc::new(AshraePsychrometrics::new());
        assert!(CoolingTower::new(TowerParams::default(), Arc::new(ConstantCoc(1.5)), air.clone()).is_err());
        // 150 / 10 = 15 cycles
        let silica = SilicaLimitedCoc::new(10.0, 150.0).unwrap();
        assert!(CoolingTower::new(TowerParams::default(), Arc::new(silica), air).is_err());
    }

    #[test]
    fn cold_inlet_water_rejected() {
        let err = tower(Arc::new(ConstantCoc(5.0)))
            .solve(1.0e9, 50_000.0, 29.0, 25.5, None)
            .unwrap_err();
        assert!(matches!(err, ComponentError::OutOfRange { .. }));
    }

    #[test]
    fn param_validation() {
        let bad = [
            TowerParams { approach: 0.0, ..TowerParams::default() },
            TowerParams { drift_rate: 0.02, ..TowerParams::default() },
            TowerParams { air_to_water_ratio: 6.0, ..TowerParams::default() },
            TowerParams { outlet_rh: 1.1, ..TowerParams::default() },
        ];
        for p in bad {
            assert!(p.validate().is_err(), "{p:?}");
        }
    }
}
