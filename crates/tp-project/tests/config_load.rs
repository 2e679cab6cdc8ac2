use std::path::{Path, PathBuf};

use tp_project::{
    AirBackendDef, ChillerKind, ConfigFormat, CyclesDef, ProjectError, WeatherSeries, load_config, parse_config, save_config,
    validate_config,
};

fn repo_file(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(rel)
}

#[test]
fn shipped_configs_load_and_validate() {
    let baseline = load_config(&repo_file("configs/baseline.yaml")).unwrap();
    assert_eq!(baseline.scenario, "baseline");
    assert_eq!(baseline.chiller.kind, ChillerKind::ThermodynamicCycle);
    assert_eq!(baseline.tower.cycles, CyclesDef::Constant { coc: 5.0 });

    let optimized = load_config(&repo_file("configs/optimized.yaml")).unwrap();
    assert_eq!(optimized.tower.cycles.coc(), 6.0);
    // Omitted sections take their defaults.
    assert_eq!(optimized.gpu.tdp_per_gpu_w, 1200.0);
    assert_eq!(optimized.solver.max_iterations, 100);
    assert_eq!(optimized.pumps.gpu_fraction, 0.015);
    assert_eq!(optimized.chiller.max_iterations, 20);
}

#[test]
fn roundtrip_through_both_formats() {
    let config = load_config(&repo_file("configs/baseline.yaml")).unwrap();
    let dir = std::env::temp_dir();
    for name in ["tp_project_roundtrip.json", "tp_project_roundtrip.yaml"] {
        let path = dir.join(name);
        save_config(&path, &config).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(config, loaded);
    }
}

#[test]
fn minimal_json_with_curve_fit_chiller() {
    let json = r#"{
        "gpu_load_mw": 900, "building_load_mw": 100,
        "t_chw_supply_c": 10, "t_gpu_in_c": 15, "t_air_in_c": 20, "t_wb_ambient_c": 25.5,
        "chiller": { "type": "curve_fit", "rated_cop": 6.1 },
        "tower": { "approach_c": 4, "cycles": { "type": "constant", "coc": 5 } },
        "properties": { "backend": "correlation" }
    }"#;
    let config = parse_config(json, ConfigFormat::Json).unwrap();
    assert_eq!(config.chiller.kind, ChillerKind::CurveFit);
    assert_eq!(config.utilization, 1.0);
    assert_eq!(config.chiller.eir_fplr.len(), 3);
    assert_eq!(config.properties.humid_air, AirBackendDef::Ashrae);
    validate_config(&config).unwrap();

    let coolprop_air = json.replace(r#""backend": "correlation""#, r#""backend": "correlation", "humid_air": "coolprop""#);
    let config = parse_config(&coolprop_air, ConfigFormat::Json).unwrap();
    assert_eq!(config.properties.humid_air, AirBackendDef::CoolProp);
}

#[test]
fn missing_required_field_is_a_parse_error() {
    let yaml = "gpu_load_mw: 900\nbuilding_load_mw: 100\n";
    assert!(matches!(
        parse_config(yaml, ConfigFormat::Yaml),
        Err(ProjectError::Json(_))
    ));
}

#[test]
fn legacy_flat_json_is_upgraded() {
    let json = r#"{
        "scenario": "baseline", "gpu_load_mw": 900, "building_load_mw": 100,
        "chiller_rated_cop": 6.1, "cooling_tower_approach": 4.0, "coc": 5.0,
        "t_chw_supply": 10.0, "t_gpu_in": 15.0, "t_air_in": 20.0, "t_wb_ambient": 25.5
    }"#;
    let config = parse_config(json, ConfigFormat::Json).unwrap();
    assert_eq!(config.chiller.rated_cop, 6.1);
    assert_eq!(config.tower.approach_c, 4.0);
    validate_config(&config).unwrap();
}

#[test]
fn unknown_extension_is_rejected() {
    let err = load_config(Path::new("plant.toml")).unwrap_err();
    assert!(matches!(err, ProjectError::Format { .. }));
}

#[test]
fn invalid_file_reports_validation_error() {
    let mut config = load_config(&repo_file("configs/baseline.yaml")).unwrap();
    config.tower.approach_c = -1.0;
    let path = std::env::temp_dir().join("tp_project_invalid.yaml");
    assert!(matches!(
        save_config(&path, &config),
        Err(ProjectError::Validation(_))
    ));
}

#[test]
fn example_weather_file() {
    let series = WeatherSeries::load(&repo_file("data/weather_example.csv")).unwrap();
    assert_eq!(series.len(), 24);
    assert_eq!(series.dry_bulb_column(), Some("dry_bulb_temp_C"));
    let (lo, hi) = series.wet_bulb_range();
    assert!(lo >= 18.0 && hi <= 26.0);
    assert!(series.points().iter().all(|p| p.t_db_c.unwrap_or(f64::NAN) >= p.t_wb_c));
}
