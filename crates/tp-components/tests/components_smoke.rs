//! Integration tests for tp-components with the built-in property models.

use std::sync::Arc;

use proptest::prelude::*;
use tp_components::{
    ChillerModel, ChillerRating, ConstantCoc, CoolingTower, CycleChiller, CycleParams, EffectivenessTargets,
    PinchControl, TowerParams, VaporCompressionCycle, blowdown_fraction,
};
use tp_fluids::{AshraePsychrometrics, PropertyBackend, Refrigerant, build_oracle};

fn chiller() -> CycleChiller {
    let cycle = VaporCompressionCycle::new(
        build_oracle(PropertyBackend::Correlation),
        Refrigerant::R134a,
        CycleParams::default(),
    )
    .unwrap();
    CycleChiller::new(
        ChillerRating {
            rated_capacity: 1.0e9,
            rated_cop: 6.1,
            t_chw_supply: 10.0,
        },
        cycle,
        PinchControl::default(),
        EffectivenessTargets::default(),
    )
    .unwrap()
}

fn tower(coc: f64, approach: f64) -> CoolingTower {
    CoolingTower::new(
        TowerParams {
            approach,
            ..TowerParams::default()
        },
        Arc::new(ConstantCoc(coc)),
        Arc::new(AshraePsychrometrics::new()),
    )
    .unwrap()
}

#[test]
fn chiller_feeds_tower() {
    let c = chiller()
        .solve_energy_balance(1.0e9, 47_800.0, 50_000.0, 29.5)
        .unwrap();
    let t = tower(5.0, 4.0)
        .solve(c.q_cond_w, c.m_cw_kg_s, c.t_cw_out_c, 25.5, None)
        .unwrap();
    // Tower returns the water exactly where the chiller took it from.
    assert_eq!(t.t_water_out_c, 29.5);
    assert!(t.m_makeup_kg_s > t.m_evap_kg_s);
    assert!(t.fan_power_w > 0.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chiller_converges_within_band(
        q_mw in 100.0f64..1000.0,
        t_cw_in in 18.0f64..32.0,
        m_cw in 40_000.0f64..60_000.0,
        m_chw in 30_000.0f64..60_000.0,
    ) {
        let sol = chiller().solve_energy_balance(q_mw * 1e6, m_chw, m_cw, t_cw_in).unwrap();
        prop_assert!(sol.converged);
        prop_assert!(sol.iterations <= 20);
        prop_assert!(sol.energy_balance_residual < 1e-3);
    }

    #[test]
    fn cycle_energy_balance(t_evap in -5.0f64..12.0, lift in 15.0f64..45.0, q_mw in 1.0f64..1000.0) {
        let cycle = VaporCompressionCycle::new(
            build_oracle(PropertyBackend::Correlation),
            Refrigerant::R134a,
            CycleParams::default(),
        ).unwrap();
        let r = cycle.solve(t_evap, t_evap + lift, q_mw * 1e6).unwrap();
        prop_assert!((r.q_cond - (r.q_evap + r.w_comp)).abs() / r.q_cond < 1e-3);
        prop_assert_eq!(r.cop, r.q_evap / r.w_comp);
    }

    #[test]
    fn tower_outlet_is_wet_bulb_plus_approach(
        t_wb in 5.0f64..30.0,
        approach in 2.0f64..8.0,
        range in 2.0f64..12.0,
    ) {
        let t_in = t_wb + approach + range;
        let sol = tower(5.0, approach).solve(5.0e8, 30_000.0, t_in, t_wb, None).unwrap();
        prop_assert_eq!(sol.t_water_out_c, t_wb + approach);
    }

    #[test]
    fn blowdown_falls_as_coc_rises(coc in 2.0f64..9.5, step in 0.1f64..0.5) {
        prop_assert!(blowdown_fraction(coc + step) < blowdown_fraction(coc));
        let lo = tower(coc, 4.0).solve(1.0e9, 50_000.0, 35.0, 25.5, None).unwrap();
        let hi = tower(coc + step, 4.0).solve(1.0e9, 50_000.0, 35.0, 25.5, None).unwrap();
        prop_assert!(hi.m_blowdown_kg_s < lo.m_blowdown_kg_s);
    }
}
