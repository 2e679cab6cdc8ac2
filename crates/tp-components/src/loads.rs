//! Single-pass heat-load models for the IT equipment.
//!
//! Both loads are affine in utilization: `Q = Q_rated · u`, and the coolant
//! outlet follows `T_out = T_in + Q / (m · cp)`. No iteration.

use serde::{Deserialize, Serialize};

use crate::common::{CP_AIR, CP_WATER, check_closed, check_finite, check_half_open, check_positive};
use crate::error::{ComponentError, ComponentResult};

/// Shared behaviour of a heat load cooled by a single coolant stream.
pub trait LoadModel: Send + Sync {
    fn name(&self) -> &str;

    /// Rated heat load at full utilization [W].
    fn rated_load(&self) -> f64;

    /// Coolant specific heat [J/(kg·K)].
    fn cp(&self) -> f64;

    /// Maximum allowed coolant outlet temperature [°C].
    fn max_temp(&self) -> f64;

    /// Accepted coolant inlet temperatures `[min, max)` [°C].
    fn inlet_range(&self) -> (f64, f64);

    /// Heat load at utilization `u` in [0, 1] [W].
    fn heat_load(&self, utilization: f64) -> ComponentResult<f64> {
        check_closed(utilization, 0.0, 1.0, "utilization")?;
        Ok(self.rated_load() * utilization)
    }

    /// Coolant outlet temperature [°C] for inlet [°C] and flow [kg/s].
    fn outlet_temperature(&self, t_in: f64, m_dot: f64, utilization: f64) -> ComponentResult<f64> {
        check_positive(m_dot, "coolant mass flow")?;
        let (lo, hi) = self.inlet_range();
        check_half_open(t_in, lo, hi, "coolant inlet temperature")?;
        Ok(t_in + self.heat_load(utilization)? / (m_dot * self.cp()))
    }

    /// Minimum flow [kg/s] keeping the outlet at `t_target` (defaults to the limit).
    fn required_flow_rate(&self, t_in: f64, t_target: Option<f64>, utilization: f64) -> ComponentResult<f64> {
        check_finite(t_in, "coolant inlet temperature")?;
        let t_target = t_target.unwrap_or(self.max_temp());
        let dt = t_target - t_in;
        if dt <= 0.0 {
            return Err(ComponentError::OutOfRange {
                what: "target outlet minus inlet temperature",
                value: dt,
            });
        }
        Ok(self.heat_load(utilization)? / (self.cp() * dt))
    }

    fn meets_temperature_limit(&self, t_out: f64) -> bool {
        t_out <= self.max_temp()
    }

    fn summary(&self, t_in: f64, m_dot: f64, utilization: f64) -> ComponentResult<LoadSummary> {
        let t_out = self.outlet_temperature(t_in, m_dot, utilization)?;
        Ok(LoadSummary {
            name: self.name().to_string(),
            q_load_w: self.heat_load(utilization)?,
            m_dot_kg_s: m_dot,
            t_in_c: t_in,
            t_out_c: t_out,
            max_temp_c: self.max_temp(),
            constraint_satisfied: self.meets_temperature_limit(t_out),
        })
    }
}

/// Snapshot of a load at one operating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub name: String,
    pub q_load_w: f64,
    pub m_dot_kg_s: f64,
    pub t_in_c: f64,
    pub t_out_c: f64,
    pub max_temp_c: f64,
    pub constraint_satisfied: bool,
}

/// Liquid-cooled GPU cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuLoad {
    model: String,
    tdp_per_gpu: f64,
    total_load: f64,
    max_temp: f64,
}

impl GpuLoad {
    /// `total_load_mw` in MW, `tdp_per_gpu` in W, `max_temp` in °C.
    pub fn new(model: impl Into<String>, tdp_per_gpu: f64, total_load_mw: f64, max_temp: f64) -> ComponentResult<Self> {
        check_positive(total_load_mw, "GPU load")?;
        check_positive(tdp_per_gpu, "GPU TDP")?;
        check_finite(max_temp, "GPU max temperature")?;
        if max_temp <= 0.0 || max_temp >= 100.0 {
            return Err(ComponentError::OutOfRange {
                what: "GPU max temperature must be in (0, 100) °C",
                value: max_temp,
            });
        }
        Ok(Self {
            model: model.into(),
            tdp_per_gpu,
            total_load: total_load_mw * 1e6,
            max_temp,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn num_gpus(&self) -> u64 {
        (self.total_load / self.tdp_per_gpu).floor() as u64
    }
}

impl LoadModel for GpuLoad {
    fn name(&self) -> &str {
        "gpu"
    }

    fn rated_load(&self) -> f64 {
        self.total_load
    }

    fn cp(&self) -> f64 {
        CP_WATER
    }

    fn max_temp(&self) -> f64 {
        self.max_temp
    }

    fn inlet_range(&self) -> (f64, f64) {
        (0.0, 100.0)
    }
}

/// Air-cooled building equipment (networking, storage, lighting).
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingLoad {
    total_load: f64,
    max_temp: f64,
}

impl BuildingLoad {
    /// `total_load_mw` in MW, `max_temp` in °C.
    pub fn new(total_load_mw: f64, max_temp: f64) -> ComponentResult<Self> {
        check_positive(total_load_mw, "building load")?;
        check_finite(max_temp, "building max temperature")?;
        if max_temp <= 0.0 || max_temp >= 50.0 {
            return Err(ComponentError::OutOfRange {
                what: "building max temperature must be in (0, 50) °C",
                value: max_temp,
            });
        }
        Ok(Self {
            total_load: total_load_mw * 1e6,
            max_temp,
        })
    }
}

impl LoadModel for BuildingLoad {
    fn name(&self) -> &str {
        "building"
    }

    fn rated_load(&self) -> f64 {
        self.total_load
    }

    fn cp(&self) -> f64 {
        CP_AIR
    }

    fn max_temp(&self) -> f64 {
        self.max_temp
    }

    fn inlet_range(&self) -> (f64, f64) {
        (0.0, 50.0)
    }
}
