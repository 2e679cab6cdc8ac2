//! Facility-level performance ratios.

use tp_core::constants::{HOURS_PER_YEAR, SECONDS_PER_HOUR};

/// Loop pump power as fractions of the duty each loop carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PumpFractions {
    /// Chilled-water pumps, per W of evaporator duty
    pub chw: f64,
    /// Condenser-water pumps, per W of evaporator duty
    pub cw: f64,
    /// GPU coolant pumps, per W of GPU load
    pub gpu: f64,
}

impl Default for PumpFractions {
    fn default() -> Self {
        Self {
            chw: 0.03,
            cw: 0.02,
            gpu: 0.015,
        }
    }
}

impl PumpFractions {
    /// Total pump power [W].
    pub fn power(&self, q_evap: f64, q_gpu: f64) -> f64 {
        (self.chw + self.cw) * q_evap + self.gpu * q_gpu
    }
}

/// Power usage effectiveness: (IT + cooling) / IT.
pub fn pue(p_it: f64, p_cooling: f64) -> f64 {
    (p_it + p_cooling) / p_it
}

/// Annual makeup volume [m³], taking 1 kg of water as 1 L.
pub fn annual_water_m3(m_makeup_kg_s: f64) -> f64 {
    m_makeup_kg_s * SECONDS_PER_HOUR * HOURS_PER_YEAR / 1000.0
}

/// Water usage effectiveness [L/kWh] for a makeup flow [kg/s] and IT power [W].
pub fn wue(m_makeup_kg_s: f64, p_it: f64) -> f64 {
    let annual_water_l = m_makeup_kg_s * SECONDS_PER_HOUR * HOURS_PER_YEAR;
    let annual_it_kwh = p_it / 1000.0 * HOURS_PER_YEAR;
    annual_water_l / annual_it_kwh
}
