//! Design mass flows for each loop, sized once from the rated loads.

use serde::{Deserialize, Serialize};
use tp_core::constants::{CP_AIR, CP_WATER};

use crate::error::{SolverError, SolverResult};

/// GPU coolant temperature rise at design [K].
pub const DT_GPU: f64 = 25.0;
/// Chilled-water temperature rise at design [K].
pub const DT_CHW: f64 = 5.0;
/// Condenser-water range at design [K].
pub const DT_CW: f64 = 5.5;
/// Building air temperature rise at design [K].
pub const DT_AIR: f64 = 5.0;
/// Heat-rejection estimate relative to the evaporator duty (COP near 6).
pub const COND_TO_EVAP: f64 = 1.15;

/// Loop mass flows [kg/s].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignFlows {
    pub m_gpu: f64,
    pub m_chw: f64,
    pub m_cw: f64,
    pub m_air: f64,
}

impl DesignFlows {
    /// Size flows from rated GPU and building loads [W].
    pub fn from_loads(q_gpu: f64, q_building: f64) -> SolverResult<Self> {
        for (q, what) in [(q_gpu, "rated GPU load"), (q_building, "rated building load")] {
            if !(q.is_finite() && q > 0.0) {
                return Err(SolverError::invalid(format!("{what} must be positive, got {q}")));
            }
        }
        let q_evap = q_gpu + q_building;
        Ok(Self {
            m_gpu: q_gpu / (CP_WATER * DT_GPU),
            m_chw: q_evap / (CP_WATER * DT_CHW),
            m_cw: COND_TO_EVAP * q_evap / (CP_WATER * DT_CW),
            m_air: q_building / (CP_AIR * DT_AIR),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gigawatt_campus() {
        let f = DesignFlows::from_loads(900e6, 100e6).unwrap();
        assert_relative_eq!(f.m_chw, 47_778.3, epsilon = 0.1);
        assert_relative_eq!(f.m_cw, 49_950.05, epsilon = 0.01);
        assert_relative_eq!(f.m_gpu, 8_600.1, epsilon = 0.1);
        assert_relative_eq!(f.m_air, 19_900.5, epsilon = 0.1);
    }

    #[test]
    fn rejects_empty_loads() {
        assert!(DesignFlows::from_loads(0.0, 100e6).is_err());
        assert!(DesignFlows::from_loads(900e6, f64::NAN).is_err());
    }
}
