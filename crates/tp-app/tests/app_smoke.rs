use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use tp_app::*;
use tp_project::{AirBackendDef, BackendDef, PlantConfig};

fn repo_path(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(rel)
}

/// Shipped configuration on the deterministic property backend.
fn config(name: &str) -> PlantConfig {
    let mut cfg = load_plant_config(&repo_path(&format!("configs/{name}.yaml")), true).unwrap();
    cfg.properties.backend = BackendDef::Correlation;
    cfg
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tp_app_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn baseline_scenario_design_point() {
    let report = run_scenario(&config("baseline"), &RunOptions::default()).unwrap();

    assert_eq!(report.scenario, "baseline");
    assert!(report.solution.converged);
    assert_eq!(report.solution.iterations, 2);
    assert_relative_eq!(report.pue, 1.2418, epsilon = 1e-3);
    assert_relative_eq!(report.wue, 2.274, epsilon = 1e-2);
    assert_relative_eq!(report.solution.cop, 5.877, epsilon = 1e-2);

    let checks = report.checks.as_ref().unwrap();
    assert_eq!(checks.outcomes.len(), 6);
    assert!(report.checks_passed());
    assert!(report.saved_to.is_none());
}

#[test]
fn coolprop_humid_air_matches_ashrae_design_point() {
    let ashrae = run_scenario(&config("baseline"), &RunOptions::default()).unwrap();
    let mut cfg = config("baseline");
    cfg.properties.humid_air = AirBackendDef::CoolProp;
    let coolprop = run_scenario(&cfg, &RunOptions::default()).unwrap();

    assert!(coolprop.solution.converged);
    // Chiller side does not see the air model.
    assert_relative_eq!(coolprop.pue, ashrae.pue, epsilon = 1e-3);
    assert_relative_eq!(
        coolprop.solution.m_makeup_kg_s,
        ashrae.solution.m_makeup_kg_s,
        max_relative = 0.03
    );
}

#[test]
fn scenario_is_persisted_with_manifest() {
    let dir = temp_dir("persist");
    let options = RunOptions {
        output_dir: Some(dir.clone()),
        ..RunOptions::default()
    };
    let report = run_scenario(&config("baseline"), &options).unwrap();

    let path = report.saved_to.clone().unwrap();
    assert!(path.ends_with("baseline_results.json"));
    let saved: ScenarioReport = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved.solution, report.solution);

    let runs = list_runs(&dir, Some("baseline")).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].kind.label(), "single");

    // Same inputs hash to the same run.
    run_scenario(&config("baseline"), &options).unwrap();
    assert_eq!(list_runs(&dir, None).unwrap().len(), 1);
}

#[test]
fn comparison_reports_blowdown_reduction() {
    let dir = temp_dir("compare");
    let options = RunOptions {
        output_dir: Some(dir.clone()),
        ..RunOptions::default()
    };
    let report = compare_scenarios(&config("baseline"), &config("optimized"), &options).unwrap();
    let c = &report.comparison;

    assert_eq!(c.coc_baseline, 5.0);
    assert_eq!(c.coc_optimized, 6.0);
    // COC does not change the thermal solution.
    assert_relative_eq!(c.pue_baseline, c.pue_optimized, epsilon = 1e-12);
    assert_relative_eq!(c.blowdown_reduction_pct, 20.0, epsilon = 1e-9);
    assert_relative_eq!(c.silica.blowdown_reduction_pct, 20.0, epsilon = 1e-9);
    assert_eq!(c.silica.max_silica_limit_ppm, Some(150.0));

    assert!(c.makeup_optimized_kg_s < c.makeup_baseline_kg_s);
    assert_relative_eq!(c.water_savings_pct, 4.0, epsilon = 0.05);
    let saved_kg_s = c.makeup_baseline_kg_s - c.makeup_optimized_kg_s;
    assert_relative_eq!(c.annual_water_savings_m3, saved_kg_s * 31_536.0, max_relative = 1e-12);
    assert_relative_eq!(c.people_equivalent, c.annual_water_savings_m3 / 150.0);

    assert!(dir.join(&list_runs(&dir, Some("comparison")).unwrap()[0].run_id)
        .join("comparison_results.json")
        .exists());
    assert!(report.baseline.checks.is_none());
}

#[test]
fn weather_series_preserves_order_and_summarizes() {
    let series = load_weather(&repo_path("data/weather_example.csv")).unwrap();
    let dir = temp_dir("weather");
    let options = RunOptions {
        output_dir: Some(dir.clone()),
        ..RunOptions::default()
    };
    let report = run_weather_series(&config("baseline"), &series, &options).unwrap();

    assert_eq!(report.summary.num_points, 24);
    assert_eq!(report.summary.unconverged_points, 0);
    for (i, (result, point)) in report.data.iter().zip(series.points()).enumerate() {
        assert_eq!(result.index, i);
        assert_eq!(result.timestamp, point.timestamp);
        assert_eq!(result.t_db_c, point.t_db_c);
    }

    assert_relative_eq!(report.summary.avg_pue, 1.2199, epsilon = 2e-3);
    let hottest = report
        .data
        .iter()
        .max_by(|a, b| a.t_wb_c.total_cmp(&b.t_wb_c))
        .unwrap();
    assert!(report.data.iter().all(|r| r.pue <= hottest.pue + 1e-12));

    let expected_m3: f64 = report.data.iter().map(|r| r.m_makeup_kg_s * 3.6).sum();
    assert_relative_eq!(report.summary.total_water_m3, expected_m3, max_relative = 1e-12);

    let run = &list_runs(&dir, Some("weather_series")).unwrap()[0];
    assert!(run.has_timeseries);
    let records: Vec<WeatherPointResult> = tp_results::ResultsStore::new(dir)
        .unwrap()
        .load_timeseries(&run.run_id)
        .unwrap();
    assert_eq!(records, report.data);
}

#[test]
fn weather_point_above_configured_dry_bulb_is_estimated() {
    let mut cfg = config("baseline");
    cfg.t_db_ambient_c = Some(22.0);
    let series = tp_project::WeatherSeries::from_csv_str(
        "timestamp,wet_bulb_temp_C\n2024-07-15 06:00,20.0\n2024-07-15 14:00,24.0\n",
    )
    .unwrap();

    let report = run_weather_series(&cfg, &series, &RunOptions::default()).unwrap();
    assert_eq!(report.summary.num_points, 2);
    assert_eq!(report.data[0].t_db_c, Some(22.0));
    assert_eq!(report.data[1].t_db_c, None);
    assert!(report.data.iter().all(|r| r.converged));
    assert!(report.data[1].pue > report.data[0].pue);
}

#[test]
fn wet_bulb_override_above_dry_bulb_is_rejected() {
    let mut cfg = config("baseline");
    cfg.t_db_ambient_c = Some(22.0);
    cfg.t_wb_ambient_c = 24.0;

    let err = run_scenario(&cfg, &RunOptions::default()).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let unchecked = RunOptions {
        validate: false,
        check: false,
        ..RunOptions::default()
    };
    match run_scenario(&cfg, &unchecked).unwrap_err() {
        AppError::Solver(message) => assert!(message.contains("below the wet bulb"), "{message}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn zero_utilization_is_rejected() {
    let mut cfg = config("baseline");
    cfg.utilization = 0.0;
    assert!(matches!(run_scenario(&cfg, &RunOptions::default()), Err(AppError::Solver(_))));
}

#[test]
fn invalid_configuration_stops_before_solving() {
    let mut cfg = config("baseline");
    cfg.tower.approach_c = 0.0;
    cfg.gpu_load_mw = -1.0;
    let err = run_scenario(&cfg, &RunOptions::default()).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let messages = validation_messages(&cfg);
    assert_eq!(messages.len(), 2);
}

#[test]
fn missing_config_file_is_reported() {
    let err = load_plant_config(Path::new("does/not/exist.yaml"), true).unwrap_err();
    assert!(matches!(err, AppError::FileRead { .. }));
}
