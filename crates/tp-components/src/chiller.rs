//! Water-cooled chiller models.
//!
//! Two strategies share the [`ChillerModel`] contract:
//! - [`CycleChiller`]: full vapor-compression cycle with a damped pinch
//!   corrector on the evaporating and condensing temperatures
//! - [`CurveFitChiller`]: DOE-2 style EIR curves around a rated COP

use serde::{Deserialize, Serialize};
use tp_core::numeric::relative_residual;

use crate::common::{CP_WATER, check_finite, check_half_open, check_positive};
use crate::cycle::{MIN_LIFT_K, VaporCompressionCycle};
use crate::diagnostics::Diagnostic;
use crate::error::{ComponentError, ComponentResult};
use crate::hx::{CounterflowHx, Stream};

/// Nameplate data common to every chiller model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChillerRating {
    /// Rated cooling capacity [W]
    pub rated_capacity: f64,
    /// COP at rated conditions
    pub rated_cop: f64,
    /// Chilled-water supply setpoint [°C]
    pub t_chw_supply: f64,
}

impl ChillerRating {
    pub fn validate(&self) -> ComponentResult<()> {
        check_positive(self.rated_capacity, "rated chiller capacity")?;
        check_finite(self.rated_cop, "rated COP")?;
        if self.rated_cop <= 0.0 || self.rated_cop > 10.0 {
            return Err(ComponentError::OutOfRange {
                what: "rated COP must be in (0, 10]",
                value: self.rated_cop,
            });
        }
        check_half_open(self.t_chw_supply, 0.0, 30.0, "chilled-water supply temperature")?;
        Ok(())
    }
}

/// Pinch band and step policy for the cycle chiller's inner loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchControl {
    /// Lower bound of the acceptable pinch [K]
    pub min_pinch: f64,
    /// Upper bound of the acceptable pinch [K]
    pub max_pinch: f64,
    /// Step applied when the pinch is too small [K]
    pub widen_step: f64,
    /// Step applied when the pinch is too large [K]
    pub tighten_step: f64,
    /// Convergence threshold on saturation-temperature change [K]
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Initial evaporator offset below chilled-water supply [K]
    pub evap_seed_offset: f64,
    /// Initial condenser offset above condenser-water inlet [K]
    pub cond_seed_offset: f64,
}

impl Default for PinchControl {
    fn default() -> Self {
        Self {
            min_pinch: 3.0,
            max_pinch: 8.0,
            widen_step: 0.5,
            tighten_step: 0.3,
            tolerance: 0.1,
            max_iterations: 20,
            evap_seed_offset: 5.0,
            cond_seed_offset: 5.0,
        }
    }
}

impl PinchControl {
    pub fn validate(&self) -> ComponentResult<()> {
        check_positive(self.min_pinch, "minimum pinch")?;
        check_positive(self.widen_step, "pinch widening step")?;
        check_positive(self.tighten_step, "pinch tightening step")?;
        check_positive(self.tolerance, "chiller tolerance")?;
        check_finite(self.evap_seed_offset, "evaporator seed offset")?;
        check_finite(self.cond_seed_offset, "condenser seed offset")?;
        if !(self.max_pinch > self.min_pinch) {
            return Err(ComponentError::OutOfRange {
                what: "maximum pinch must exceed minimum pinch",
                value: self.max_pinch,
            });
        }
        if self.max_iterations == 0 {
            return Err(ComponentError::InvalidArg {
                what: "chiller max_iterations must be positive",
            });
        }
        Ok(())
    }

    /// Step for a pinch reading: positive widens, negative tightens, zero holds.
    fn correction(&self, pinch: f64) -> f64 {
        if pinch < self.min_pinch {
            self.widen_step
        } else if pinch > self.max_pinch {
            -self.tighten_step
        } else {
            0.0
        }
    }

    /// Lowest condensing temperature [°C] held for a given evaporating
    /// temperature. Cold condenser water cannot pull the lift below this.
    fn condensing_floor(&self, t_evap: f64) -> f64 {
        t_evap + MIN_LIFT_K + self.min_pinch
    }
}

/// Design effectiveness targets; exceeding them raises a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectivenessTargets {
    pub evaporator: f64,
    pub condenser: f64,
}

impl Default for EffectivenessTargets {
    fn default() -> Self {
        Self {
            evaporator: 0.85,
            condenser: 0.85,
        }
    }
}

/// Converged chiller operating point. Produced once per solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChillerSolution {
    /// Model that produced the solution.
    pub model: String,
    pub refrigerant: Option<String>,
    pub converged: bool,
    pub iterations: usize,

    pub q_evap_w: f64,
    pub q_cond_w: f64,
    pub w_comp_w: f64,
    pub cop: f64,
    pub plr: f64,

    pub t_chw_supply_c: f64,
    pub t_chw_return_c: f64,
    pub m_chw_kg_s: f64,

    pub t_cw_in_c: f64,
    pub t_cw_out_c: f64,
    pub m_cw_kg_s: f64,

    pub t_evap_sat_c: f64,
    pub t_cond_sat_c: f64,
    pub m_ref_kg_s: Option<f64>,
    pub p_evap_kpa: Option<f64>,
    pub p_cond_kpa: Option<f64>,
    pub compression_ratio: Option<f64>,

    /// |Q_cond - (Q_evap + W)| / Q_cond
    pub energy_balance_residual: f64,
    pub evap_effectiveness: f64,
    pub cond_effectiveness: f64,
    pub diagnostics: Vec<Diagnostic>,
}

/// Capability: size compressor power and heat rejection from a cooling duty.
pub trait ChillerModel: Send + Sync {
    /// Strategy name, e.g. `thermodynamic_cycle`.
    fn name(&self) -> &str;

    fn rating(&self) -> &ChillerRating;

    /// Solve with an optional measured chilled-water return temperature [°C].
    ///
    /// When `t_chw_return` is `None` it follows from the duty and flow.
    fn solve_with_return(
        &self,
        q_evap: f64,
        m_chw: f64,
        m_cw: f64,
        t_cw_in: f64,
        t_chw_return: Option<f64>,
    ) -> ComponentResult<ChillerSolution>;

    /// Solve for duty `q_evap` [W], flows [kg/s] and condenser-water inlet [°C].
    fn solve_energy_balance(
        &self,
        q_evap: f64,
        m_chw: f64,
        m_cw: f64,
        t_cw_in: f64,
    ) -> ComponentResult<ChillerSolution> {
        self.solve_with_return(q_evap, m_chw, m_cw, t_cw_in, None)
    }
}

fn validate_duty(q_evap: f64, m_chw: f64, m_cw: f64, t_cw_in: f64) -> ComponentResult<()> {
    check_positive(q_evap, "evaporator duty")?;
    check_positive(m_chw, "chilled-water flow")?;
    check_positive(m_cw, "condenser-water flow")?;
    check_finite(t_cw_in, "condenser-water inlet temperature")?;
    Ok(())
}

fn chw_return(rating: &ChillerRating, q_evap: f64, m_chw: f64, given: Option<f64>) -> ComponentResult<f64> {
    match given {
        Some(t) => check_finite(t, "chilled-water return temperature"),
        None => Ok(rating.t_chw_supply + q_evap / (m_chw * CP_WATER)),
    }
}

fn effectiveness_diagnostics(
    targets: EffectivenessTargets,
    evap: f64,
    cond: f64,
) -> Vec<Diagnostic> {
    [("evaporator", evap, targets.evaporator), ("condenser", cond, targets.condenser)]
        .into_iter()
        .filter(|(_, implied, target)| implied > target)
        .map(|(exchanger, implied, target)| {
            Diagnostic::EffectivenessAboveTarget {
                exchanger: exchanger.to_string(),
                implied,
                target,
            }
            .emit()
        })
        .collect()
}

/// Chiller built on the full refrigeration cycle.
#[derive(Debug, Clone)]
pub struct CycleChiller {
    rating: ChillerRating,
    cycle: VaporCompressionCycle,
    control: PinchControl,
    targets: EffectivenessTargets,
    hx: CounterflowHx,
}

impl CycleChiller {
    pub fn new(
        rating: ChillerRating,
        cycle: VaporCompressionCycle,
        control: PinchControl,
        targets: EffectivenessTargets,
    ) -> ComponentResult<Self> {
        rating.validate()?;
        control.validate()?;
        Ok(Self {
            rating,
            cycle,
            control,
            targets,
            hx: CounterflowHx,
        })
    }

    pub fn cycle(&self) -> &VaporCompressionCycle {
        &self.cycle
    }

    pub fn control(&self) -> &PinchControl {
        &self.control
    }
}

impl ChillerModel for CycleChiller {
    fn name(&self) -> &str {
        "thermodynamic_cycle"
    }

    fn rating(&self) -> &ChillerRating {
        &self.rating
    }

    fn solve_with_return(
        &self,
        q_evap: f64,
        m_chw: f64,
        m_cw: f64,
        t_cw_in: f64,
        t_chw_return: Option<f64>,
    ) -> ComponentResult<ChillerSolution> {
        validate_duty(q_evap, m_chw, m_cw, t_cw_in)?;
        let t_supply = self.rating.t_chw_supply;
        let t_return = chw_return(&self.rating, q_evap, m_chw, t_chw_return)?;
        let ctl = &self.control;

        let mut t_evap = t_supply - ctl.evap_seed_offset;
        let mut t_cond = (t_cw_in + ctl.cond_seed_offset).max(ctl.condensing_floor(t_evap));
        let (mut delta_evap, mut delta_cond) = (f64::NAN, f64::NAN);

        for iteration in 1..=ctl.max_iterations {
            let (evap_prev, cond_prev) = (t_evap, t_cond);
            let cycle = self.cycle.solve(t_evap, t_cond, q_evap)?;

            // Evaporator: lowering T_evap widens the pinch.
            let pinch_evap = t_supply - t_evap;
            t_evap -= ctl.correction(pinch_evap);

            let cond_hx = self.hx.solve(
                Stream::isothermal(t_cond),
                Stream::new(m_cw, CP_WATER, t_cw_in),
                cycle.q_cond,
            )?;
            let t_cw_out = cond_hx.t_cold_out;

            // Condenser: raising T_cond widens the pinch.
            let pinch_cond = t_cond - t_cw_out;
            t_cond = (t_cond + ctl.correction(pinch_cond)).max(ctl.condensing_floor(t_evap));

            delta_evap = (t_evap - evap_prev).abs();
            delta_cond = (t_cond - cond_prev).abs();
            tracing::debug!(
                iteration,
                t_evap,
                t_cond,
                pinch_evap,
                pinch_cond,
                t_cw_out,
                cop = cycle.cop,
                "chiller inner iteration"
            );

            if delta_evap < ctl.tolerance && delta_cond < ctl.tolerance {
                let evap_hx = self.hx.solve(
                    Stream::new(m_chw, CP_WATER, t_return),
                    Stream::isothermal(t_evap),
                    q_evap,
                )?;
                let mut diagnostics = cycle.diagnostics.clone();
                diagnostics.extend(effectiveness_diagnostics(
                    self.targets,
                    evap_hx.effectiveness,
                    cond_hx.effectiveness,
                ));
                tracing::info!(
                    iterations = iteration,
                    t_evap,
                    t_cond,
                    cop = cycle.cop,
                    "chiller converged"
                );

                return Ok(ChillerSolution {
                    model: self.name().to_string(),
                    refrigerant: Some(self.cycle.fluid().to_string()),
                    converged: true,
                    iterations: iteration,
                    q_evap_w: q_evap,
                    q_cond_w: cycle.q_cond,
                    w_comp_w: cycle.w_comp,
                    cop: cycle.cop,
                    plr: q_evap / self.rating.rated_capacity,
                    t_chw_supply_c: t_supply,
                    t_chw_return_c: t_return,
                    m_chw_kg_s: m_chw,
                    t_cw_in_c: t_cw_in,
                    t_cw_out_c: t_cw_out,
                    m_cw_kg_s: m_cw,
                    t_evap_sat_c: t_evap,
                    t_cond_sat_c: t_cond,
                    m_ref_kg_s: Some(cycle.m_ref),
                    p_evap_kpa: Some(cycle.p_evap / 1000.0),
                    p_cond_kpa: Some(cycle.p_cond / 1000.0),
                    compression_ratio: Some(cycle.compression_ratio),
                    energy_balance_residual: relative_residual(
                        cycle.q_cond,
                        q_evap + cycle.w_comp,
                        cycle.q_cond,
                    ),
                    evap_effectiveness: evap_hx.effectiveness,
                    cond_effectiveness: cond_hx.effectiveness,
                    diagnostics,
                });
            }
        }

        Err(ComponentError::NonConvergence {
            iterations: ctl.max_iterations,
            delta_evap,
            delta_cond,
        })
    }
}

/// Biquadratic EIR modifier in chilled-water supply `x` and condenser-water inlet `y` [°C]:
/// `a + b·x + c·x² + d·y + e·y² + f·x·y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EirTemperatureCurve {
    pub coefficients: [f64; 6],
}

impl Default for EirTemperatureCurve {
    fn default() -> Self {
        Self {
            coefficients: [
                0.596_191_5,
                -0.009_949_6,
                0.000_788_8,
                -0.000_450_6,
                0.000_487_5,
                -0.000_762_3,
            ],
        }
    }
}

impl EirTemperatureCurve {
    /// AHRI rating point: 6.67 °C leaving chilled water, 29.44 °C entering condenser water.
    pub const RATING_POINT: (f64, f64) = (6.67, 29.44);

    fn raw(&self, x: f64, y: f64) -> f64 {
        let [a, b, c, d, e, f] = self.coefficients;
        a + b * x + c * x * x + d * y + e * y * y + f * x * y
    }

    /// Modifier normalized to 1 at the rating point.
    pub fn eval(&self, t_chw_supply: f64, t_cw_in: f64) -> ComponentResult<f64> {
        let (x0, y0) = Self::RATING_POINT;
        let reference = self.raw(x0, y0);
        if reference <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "EIR(T) curve must be positive at the rating point",
            });
        }
        let value = self.raw(t_chw_supply, t_cw_in) / reference;
        if !(value.is_finite() && value > 0.0) {
            return Err(ComponentError::OutOfRange {
                what: "EIR(T) modifier",
                value,
            });
        }
        Ok(value)
    }
}

/// Quadratic EIR modifier in part-load ratio: `a + b·p + c·p²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EirPartLoadCurve {
    pub coefficients: [f64; 3],
}

impl Default for EirPartLoadCurve {
    fn default() -> Self {
        Self {
            coefficients: [0.171_492_73, 0.588_202_08, 0.237_372_57],
        }
    }
}

impl EirPartLoadCurve {
    pub const PLR_MIN: f64 = 0.1;
    pub const PLR_MAX: f64 = 1.2;

    /// Modifier normalized to 1 at full load; PLR is clamped to [0.1, 1.2].
    pub fn eval(&self, plr: f64) -> ComponentResult<f64> {
        let [a, b, c] = self.coefficients;
        let full_load = a + b + c;
        if full_load <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "EIR(PLR) curve must be positive at full load",
            });
        }
        let p = plr.clamp(Self::PLR_MIN, Self::PLR_MAX);
        let value = (a + b * p + c * p * p) / full_load;
        if !(value.is_finite() && value > 0.0) {
            return Err(ComponentError::OutOfRange {
                what: "EIR(PLR) modifier",
                value,
            });
        }
        Ok(value)
    }
}

/// Chiller using performance curves around its rated COP.
#[derive(Debug, Clone)]
pub struct CurveFitChiller {
    rating: ChillerRating,
    eir_ft: EirTemperatureCurve,
    eir_fplr: EirPartLoadCurve,
    /// Design offsets used to report saturation temperatures [K]
    evap_offset: f64,
    cond_offset: f64,
    targets: EffectivenessTargets,
    hx: CounterflowHx,
}

impl CurveFitChiller {
    pub fn new(
        rating: ChillerRating,
        eir_ft: EirTemperatureCurve,
        eir_fplr: EirPartLoadCurve,
        control: &PinchControl,
        targets: EffectivenessTargets,
    ) -> ComponentResult<Self> {
        rating.validate()?;
        eir_ft.eval(EirTemperatureCurve::RATING_POINT.0, EirTemperatureCurve::RATING_POINT.1)?;
        eir_fplr.eval(1.0)?;
        Ok(Self {
            rating,
            eir_ft,
            eir_fplr,
            evap_offset: control.evap_seed_offset,
            cond_offset: control.cond_seed_offset,
            targets,
            hx: CounterflowHx,
        })
    }
}

impl ChillerModel for CurveFitChiller {
    fn name(&self) -> &str {
        "curve_fit"
    }

    fn rating(&self) -> &ChillerRating {
        &self.rating
    }

    fn solve_with_return(
        &self,
        q_evap: f64,
        m_chw: f64,
        m_cw: f64,
        t_cw_in: f64,
        t_chw_return: Option<f64>,
    ) -> ComponentResult<ChillerSolution> {
        validate_duty(q_evap, m_chw, m_cw, t_cw_in)?;
        let t_supply = self.rating.t_chw_supply;
        let t_return = chw_return(&self.rating, q_evap, m_chw, t_chw_return)?;

        let plr = q_evap / self.rating.rated_capacity;
        let eir_ft = self.eir_ft.eval(t_supply, t_cw_in)?;
        let eir_fplr = self.eir_fplr.eval(plr)?;
        let w_comp = self.rating.rated_capacity / self.rating.rated_cop * eir_ft * eir_fplr;
        let q_cond = q_evap + w_comp;

        let t_evap = t_supply - self.evap_offset;
        let t_cond = t_cw_in + self.cond_offset;
        let cond_hx = self.hx.solve(
            Stream::isothermal(t_cond),
            Stream::new(m_cw, CP_WATER, t_cw_in),
            q_cond,
        )?;
        let evap_hx = self.hx.solve(
            Stream::new(m_chw, CP_WATER, t_return),
            Stream::isothermal(t_evap),
            q_evap,
        )?;
        tracing::debug!(plr, eir_ft, eir_fplr, w_comp, "curve-fit chiller evaluated");

        Ok(ChillerSolution {
            model: self.name().to_string(),
            refrigerant: None,
            converged: true,
            iterations: 1,
            q_evap_w: q_evap,
            q_cond_w: q_cond,
            w_comp_w: w_comp,
            cop: q_evap / w_comp,
            plr,
            t_chw_supply_c: t_supply,
            t_chw_return_c: t_return,
            m_chw_kg_s: m_chw,
            t_cw_in_c: t_cw_in,
            t_cw_out_c: cond_hx.t_cold_out,
            m_cw_kg_s: m_cw,
            t_evap_sat_c: t_evap,
            t_cond_sat_c: t_cond,
            m_ref_kg_s: None,
            p_evap_kpa: None,
            p_cond_kpa: None,
            compression_ratio: None,
            energy_balance_residual: 0.0,
            evap_effectiveness: evap_hx.effectiveness,
            cond_effectiveness: cond_hx.effectiveness,
            diagnostics: effectiveness_diagnostics(
                self.targets,
                evap_hx.effectiveness,
                cond_hx.effectiveness,
            ),
        })
    }
}
