//! Named temperature state points of the plant loops.

use serde::{Deserialize, Serialize};

/// Loop temperatures [°C] carried across outer iterations.
///
/// ```text
/// chilled water:   T1 supply -> building HX -> T2 -> compute HX -> T3 -> T4 return
/// GPU coolant:     T5 supply -> GPUs -> T6 return -> T7 to HX
/// condenser water: T8 from tower -> T10 to chiller -> T9 from chiller -> tower
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantState {
    pub t1_chw_supply: f64,
    pub t2_after_building_hx: f64,
    pub t3_after_compute_hx: f64,
    pub t4_chw_return: f64,
    pub t5_gpu_supply: f64,
    pub t6_gpu_return: f64,
    pub t7_gpu_to_hx: f64,
    pub t8_cw_from_tower: f64,
    pub t9_cw_from_chiller: f64,
    pub t10_cw_to_chiller: f64,
}

impl PlantState {
    /// Initial guess before the first outer iteration.
    pub fn seed(t_chw_supply: f64, t_gpu_in: f64, t_wb: f64, approach: f64) -> Self {
        Self {
            t1_chw_supply: t_chw_supply,
            t2_after_building_hx: 12.0,
            t3_after_compute_hx: 15.0,
            t4_chw_return: 15.0,
            t5_gpu_supply: t_gpu_in,
            t6_gpu_return: 38.0,
            t7_gpu_to_hx: 38.0,
            t8_cw_from_tower: t_wb + approach,
            t9_cw_from_chiller: 35.0,
            t10_cw_to_chiller: t_wb + approach,
        }
    }

    /// `(label, value)` pairs in loop order.
    pub fn points(&self) -> [(&'static str, f64); 10] {
        [
            ("T1_chw_supply", self.t1_chw_supply),
            ("T2_after_building_hx", self.t2_after_building_hx),
            ("T3_after_compute_hx", self.t3_after_compute_hx),
            ("T4_chw_return", self.t4_chw_return),
            ("T5_gpu_supply", self.t5_gpu_supply),
            ("T6_gpu_return", self.t6_gpu_return),
            ("T7_gpu_to_hx", self.t7_gpu_to_hx),
            ("T8_cw_from_tower", self.t8_cw_from_tower),
            ("T9_cw_from_chiller", self.t9_cw_from_chiller),
            ("T10_cw_to_chiller", self.t10_cw_to_chiller),
        ]
    }

    /// Largest absolute difference over all points.
    pub fn max_abs_change(&self, previous: &PlantState) -> f64 {
        self.points()
            .iter()
            .zip(previous.points().iter())
            .map(|((_, a), (_, b))| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Condenser-water range across the tower [K].
    pub fn cw_range(&self) -> f64 {
        self.t9_cw_from_chiller - self.t8_cw_from_tower
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_places_tower_outlet_at_approach() {
        let s = PlantState::seed(10.0, 15.0, 25.5, 4.0);
        assert_eq!(s.t8_cw_from_tower, 29.5);
        assert_eq!(s.t10_cw_to_chiller, 29.5);
        assert_eq!(s.t5_gpu_supply, 15.0);
        assert_eq!(s.points()[0], ("T1_chw_supply", 10.0));
    }

    #[test]
    fn max_change_picks_largest_entry() {
        let a = PlantState::seed(10.0, 15.0, 25.5, 4.0);
        let mut b = a;
        b.t6_gpu_return = 40.0;
        b.t4_chw_return = 15.5;
        assert_eq!(b.max_abs_change(&a), 2.0);
        assert_eq!(a.max_abs_change(&a), 0.0);
    }
}
