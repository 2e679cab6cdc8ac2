//! CoolProp integration tests.
//!
//! Broad tolerances only: the goal is physical plausibility, not agreement
//! with a particular CoolProp release.

use tp_core::units::celsius;
use tp_fluids::{
    AshraePsychrometrics, CoolPropHumidAir, CoolPropOracle, HumidAirInput, HumidAirOracle, Phase,
    PropertyPair, R134aCorrelation, Refrigerant, RefrigerantOracle,
};

#[test]
fn r134a_saturation_near_reference() {
    let oracle = CoolPropOracle::new();
    let p = oracle
        .saturation_pressure(Refrigerant::R134a, celsius(5.0))
        .unwrap();
    // 349.9 kPa in the ASHRAE tables
    assert!(p.value > 340e3 && p.value < 360e3, "p_sat = {} Pa", p.value);

    let t = oracle.saturation_temperature(Refrigerant::R134a, p).unwrap();
    assert!((t.value - 278.15).abs() < 0.05, "t_sat = {} K", t.value);
}

#[test]
fn r134a_phases_around_saturation() {
    let oracle = CoolPropOracle::new();
    let p = oracle
        .saturation_pressure(Refrigerant::R134a, celsius(38.0))
        .unwrap();

    let vapor = oracle
        .state(Refrigerant::R134a, PropertyPair::PT { p, t: celsius(55.0) })
        .unwrap();
    assert_eq!(vapor.phase(), Phase::SuperheatedVapor);

    let liquid = oracle
        .state(Refrigerant::R134a, PropertyPair::PT { p, t: celsius(35.0) })
        .unwrap();
    assert_eq!(liquid.phase(), Phase::SubcooledLiquid);
    assert!(liquid.density().value > 1000.0);

    let mixed = oracle
        .state(Refrigerant::R134a, PropertyPair::PQ { p, x: 0.4 })
        .unwrap();
    assert_eq!(mixed.phase(), Phase::TwoPhase);
    assert!((mixed.quality().unwrap() - 0.4).abs() < 1e-6);
}

#[test]
fn correlation_tracks_coolprop() {
    let coolprop = CoolPropOracle::new();
    let builtin = R134aCorrelation::new();
    for t_c in [0.0, 10.0, 25.0, 40.0] {
        let reference = coolprop
            .state(Refrigerant::R134a, PropertyPair::TQ { t: celsius(t_c), x: 1.0 })
            .unwrap();
        let approx = builtin
            .state(Refrigerant::R134a, PropertyPair::TQ { t: celsius(t_c), x: 1.0 })
            .unwrap();
        let rel = (approx.enthalpy() - reference.enthalpy()).abs() / reference.enthalpy();
        assert!(rel < 0.02, "h_g at {t_c} °C differs by {:.2}%", rel * 100.0);
        let rel_p = (approx.pressure().value - reference.pressure().value).abs()
            / reference.pressure().value;
        assert!(rel_p < 0.01, "p_sat at {t_c} °C differs by {:.2}%", rel_p * 100.0);
    }
}

#[test]
fn ammonia_is_available() {
    let oracle = CoolPropOracle::new();
    let p = oracle
        .saturation_pressure(Refrigerant::Ammonia, celsius(0.0))
        .unwrap();
    // about 429 kPa
    assert!(p.value > 400e3 && p.value < 460e3, "p_sat = {} Pa", p.value);
}

#[test]
fn saturation_above_critical_fails() {
    let oracle = CoolPropOracle::new();
    let result = oracle.saturation_pressure(Refrigerant::R134a, celsius(120.0));
    assert!(result.is_err());
}

#[test]
fn humid_air_tracks_ashrae_at_tower_inlet() {
    let cp = CoolPropHumidAir::new();
    let ashrae = AshraePsychrometrics::new();
    for (t_db, t_wb) in [(35.5, 25.5), (20.0, 12.0), (5.0, 1.0)] {
        let a = cp.state(t_db, HumidAirInput::WetBulb(t_wb)).unwrap();
        let b = ashrae.state(t_db, HumidAirInput::WetBulb(t_wb)).unwrap();
        assert!((a.w - b.w).abs() < 3e-4, "w {} vs {} at {t_db}/{t_wb}", a.w, b.w);
        assert!((a.rh - b.rh).abs() < 0.02, "rh {} vs {}", a.rh, b.rh);
        assert!((a.rho - b.rho).abs() / b.rho < 0.01, "rho {} vs {}", a.rho, b.rho);
    }
}

#[test]
fn humid_air_enthalpy_differences_agree() {
    // Reference states differ between backends; differences must not.
    let cp = CoolPropHumidAir::new();
    let ashrae = AshraePsychrometrics::new();
    let dh = |o: &dyn HumidAirOracle| {
        let hot = o.state(35.5, HumidAirInput::WetBulb(25.5)).unwrap();
        let sat = o.state(30.0, HumidAirInput::RelativeHumidity(1.0)).unwrap();
        sat.h - hot.h
    };
    let (a, b) = (dh(&cp), dh(&ashrae));
    assert!((a - b).abs() < 1500.0, "dh {a} vs {b} J/kg");
}
