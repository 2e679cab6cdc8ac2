//! Counterflow heat-exchanger energy-balance bridge.
//!
//! Converts a duty fixed elsewhere (by the refrigeration cycle) into outlet
//! temperatures on both streams:
//!
//! ```text
//! T_hot_out  = T_hot_in  - Q / (m_hot  * cp_hot)
//! T_cold_out = T_cold_in + Q / (m_cold * cp_cold)
//! ε          = Q / (C_min * (T_hot_in - T_cold_in))
//! ```
//!
//! A phase-changing refrigerant is an isothermal stream with unbounded
//! capacity rate. No NTU sizing is done; ε is reported for diagnostics and
//! values above 1 indicate a temperature cross.

use crate::common::{check_finite, check_positive};
use crate::error::{ComponentError, ComponentResult};

/// One side of the exchanger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stream {
    /// Mass flow [kg/s]
    pub m_dot: f64,
    /// Specific heat [J/(kg·K)]
    pub cp: f64,
    /// Inlet temperature [°C]
    pub t_in: f64,
}

impl Stream {
    pub fn new(m_dot: f64, cp: f64, t_in: f64) -> Self {
        Self { m_dot, cp, t_in }
    }

    /// Condensing or evaporating refrigerant held at `t_sat`.
    pub fn isothermal(t_sat: f64) -> Self {
        Self {
            m_dot: f64::INFINITY,
            cp: 1.0,
            t_in: t_sat,
        }
    }

    /// Capacity rate m·cp [W/K].
    pub fn capacity_rate(&self) -> f64 {
        self.m_dot * self.cp
    }

    fn is_isothermal(&self) -> bool {
        self.capacity_rate().is_infinite()
    }

    fn validate(&self, what: &'static str) -> ComponentResult<()> {
        check_finite(self.t_in, what)?;
        if !self.is_isothermal() {
            check_positive(self.m_dot, what)?;
            check_positive(self.cp, what)?;
        }
        Ok(())
    }

    fn outlet(&self, q_gained: f64) -> f64 {
        if self.is_isothermal() {
            self.t_in
        } else {
            self.t_in + q_gained / self.capacity_rate()
        }
    }
}

/// Result of a duty-driven exchanger evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HxSolution {
    pub t_hot_out: f64,
    pub t_cold_out: f64,
    pub effectiveness: f64,
    pub duty: f64,
}

/// Counterflow exchanger evaluated from a known duty.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterflowHx;

impl CounterflowHx {
    /// Apply `duty` [W] from `hot` to `cold`.
    pub fn solve(&self, hot: Stream, cold: Stream, duty: f64) -> ComponentResult<HxSolution> {
        hot.validate("hot stream")?;
        cold.validate("cold stream")?;
        check_finite(duty, "heat-exchanger duty")?;
        if duty < 0.0 {
            return Err(ComponentError::OutOfRange {
                what: "heat-exchanger duty",
                value: duty,
            });
        }
        if hot.is_isothermal() && cold.is_isothermal() {
            return Err(ComponentError::InvalidArg {
                what: "at least one stream must have a finite capacity rate",
            });
        }

        let dt_max = hot.t_in - cold.t_in;
        if dt_max <= 0.0 {
            return Err(ComponentError::OutOfRange {
                what: "hot inlet minus cold inlet temperature",
                value: dt_max,
            });
        }

        let c_min = hot.capacity_rate().min(cold.capacity_rate());
        Ok(HxSolution {
            t_hot_out: hot.outlet(-duty),
            t_cold_out: cold.outlet(duty),
            effectiveness: duty / (c_min * dt_max),
            duty,
        })
    }
}
