//! Single-stage vapor-compression refrigeration cycle.
//!
//! State points:
//! 1. evaporator exit / compressor inlet: superheated vapor at p_evap
//! 2. compressor exit: p_cond, h2 = h1 + (h2s - h1) / η
//! 3. condenser exit: subcooled liquid at p_cond
//! 4. expansion-valve exit: p_evap, h4 = h3

use std::sync::Arc;

use crate::common::{check_finite, check_positive};
use crate::diagnostics::Diagnostic;
use crate::error::{ComponentError, ComponentResult};
use tp_core::units::celsius;
use tp_fluids::{PropertyPair, Refrigerant, RefrigerantOracle, ThermoState};

/// Minimum condensing-over-evaporating lift [K].
pub const MIN_LIFT_K: f64 = 1.0;

/// Compression ratio above which a diagnostic is raised.
pub const COMPRESSION_RATIO_WARNING: f64 = 8.0;

/// Cycle design parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleParams {
    /// Compressor isentropic efficiency (0, 1]
    pub eta_isentropic: f64,
    /// Superheat at the evaporator exit [K]
    pub superheat_c: f64,
    /// Subcooling at the condenser exit [K]
    pub subcool_c: f64,
}

impl Default for CycleParams {
    fn default() -> Self {
        Self {
            eta_isentropic: 0.80,
            superheat_c: 5.0,
            subcool_c: 3.0,
        }
    }
}

/// Solved cycle at one (T_evap, T_cond, duty) operating point.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleResult {
    pub evaporator_exit: ThermoState,
    pub compressor_exit: ThermoState,
    pub condenser_exit: ThermoState,
    pub valve_exit: ThermoState,
    /// Refrigerant mass flow [kg/s]
    pub m_ref: f64,
    /// Compressor power [W]
    pub w_comp: f64,
    /// Evaporator duty [W]
    pub q_evap: f64,
    /// Condenser duty [W]
    pub q_cond: f64,
    pub cop: f64,
    /// Evaporating pressure [Pa]
    pub p_evap: f64,
    /// Condensing pressure [Pa]
    pub p_cond: f64,
    pub compression_ratio: f64,
    pub diagnostics: Vec<Diagnostic>,
}

/// Vapor-compression cycle bound to one refrigerant and property oracle.
#[derive(Clone)]
pub struct VaporCompressionCycle {
    oracle: Arc<dyn RefrigerantOracle>,
    fluid: Refrigerant,
    params: CycleParams,
}

impl std::fmt::Debug for VaporCompressionCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaporCompressionCycle")
            .field("oracle", &self.oracle.name())
            .field("fluid", &self.fluid)
            .field("params", &self.params)
            .finish()
    }
}

impl VaporCompressionCycle {
    /// Bind a cycle to `oracle`.
    ///
    /// The oracle is queried once so a missing backend fails here instead of
    /// inside an iteration.
    pub fn new(
        oracle: Arc<dyn RefrigerantOracle>,
        fluid: Refrigerant,
        params: CycleParams,
    ) -> ComponentResult<Self> {
        check_finite(params.eta_isentropic, "isentropic efficiency")?;
        if params.eta_isentropic <= 0.0 || params.eta_isentropic > 1.0 {
            return Err(ComponentError::OutOfRange {
                what: "isentropic efficiency must be in (0, 1]",
                value: params.eta_isentropic,
            });
        }
        if !(params.superheat_c >= 0.0 && params.superheat_c.is_finite()) {
            return Err(ComponentError::OutOfRange {
                what: "superheat",
                value: params.superheat_c,
            });
        }
        if !(params.subcool_c >= 0.0 && params.subcool_c.is_finite()) {
            return Err(ComponentError::OutOfRange {
                what: "subcooling",
                value: params.subcool_c,
            });
        }

        oracle
            .saturation_pressure(fluid, celsius(0.0))
            .map_err(ComponentError::at("property backend check"))?;

        Ok(Self {
            oracle,
            fluid,
            params,
        })
    }

    pub fn fluid(&self) -> Refrigerant {
        self.fluid
    }

    pub fn params(&self) -> CycleParams {
        self.params
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    fn state(&self, stage: &'static str, input: PropertyPair) -> ComponentResult<ThermoState> {
        self.oracle
            .state(self.fluid, input)
            .map_err(ComponentError::at(stage))
    }

    /// Solve the cycle for saturation temperatures [°C] and a cooling duty [W].
    pub fn solve(&self, t_evap_c: f64, t_cond_c: f64, q_required: f64) -> ComponentResult<CycleResult> {
        check_finite(t_evap_c, "evaporating temperature")?;
        check_finite(t_cond_c, "condensing temperature")?;
        check_positive(q_required, "required cooling duty")?;
        let lift = t_cond_c - t_evap_c;
        if lift < MIN_LIFT_K {
            return Err(ComponentError::OutOfRange {
                what: "condensing minus evaporating temperature",
                value: lift,
            });
        }

        let p_evap = self
            .oracle
            .saturation_pressure(self.fluid, celsius(t_evap_c))
            .map_err(ComponentError::at("evaporator saturation"))?;
        let p_cond = self
            .oracle
            .saturation_pressure(self.fluid, celsius(t_cond_c))
            .map_err(ComponentError::at("condenser saturation"))?;

        let s1 = self.state(
            "state 1 (evaporator exit)",
            PropertyPair::PT {
                p: p_evap,
                t: celsius(t_evap_c + self.params.superheat_c),
            },
        )?;
        let s2s = self.state(
            "state 2s (isentropic compression)",
            PropertyPair::PS {
                p: p_cond,
                s: s1.entropy(),
            },
        )?;
        let h1 = s1.enthalpy();
        let h2 = h1 + (s2s.enthalpy() - h1) / self.params.eta_isentropic;
        let s2 = self.state(
            "state 2 (compressor exit)",
            PropertyPair::PH { p: p_cond, h: h2 },
        )?;
        let s3 = self.state(
            "state 3 (condenser exit)",
            PropertyPair::PT {
                p: p_cond,
                t: celsius(t_cond_c - self.params.subcool_c),
            },
        )?;
        let h4 = s3.enthalpy();
        let s4 = self.state(
            "state 4 (valve exit)",
            PropertyPair::PH { p: p_evap, h: h4 },
        )?;

        let refrigeration_effect = h1 - h4;
        let specific_work = h2 - h1;
        if refrigeration_effect <= 0.0 || specific_work <= 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "cycle enthalpy differences must be positive",
            });
        }

        let m_ref = q_required / refrigeration_effect;
        let w_comp = m_ref * specific_work;
        let q_cond = m_ref * (h2 - h4);
        let compression_ratio = p_cond.value / p_evap.value;

        let mut diagnostics = Vec::new();
        if compression_ratio > COMPRESSION_RATIO_WARNING {
            diagnostics.push(
                Diagnostic::HighCompressionRatio {
                    ratio: compression_ratio,
                    limit: COMPRESSION_RATIO_WARNING,
                }
                .emit(),
            );
        }

        Ok(CycleResult {
            evaporator_exit: s1,
            compressor_exit: s2,
            condenser_exit: s3,
            valve_exit: s4,
            m_ref,
            w_comp,
            q_evap: q_required,
            q_cond,
            cop: q_required / w_comp,
            p_evap: p_evap.value,
            p_cond: p_cond.value,
            compression_ratio,
            diagnostics,
        })
    }
}
