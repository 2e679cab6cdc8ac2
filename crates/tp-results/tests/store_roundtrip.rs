use serde::{Deserialize, Serialize};
use tp_results::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PointRecord {
    timestamp: String,
    t_wb_c: f64,
    pue: f64,
}

fn temp_store(name: &str) -> ResultsStore {
    let dir = std::env::temp_dir().join(format!("tp_results_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    ResultsStore::new(dir).unwrap()
}

#[test]
fn save_and_load_single_run() {
    let store = temp_store("single");
    let config = tp_project::load_config_unchecked(std::path::Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../configs/baseline.yaml"
    )))
    .unwrap();

    let kind = RunKind::Single {
        utilization: 1.0,
        t_wb_c: 25.5,
    };
    let run_id = compute_run_id(&config, &kind, "0.1.0");
    let manifest = RunManifest::new(run_id.clone(), &config.scenario, kind, "0.1.0");
    assert_eq!(manifest.document, "baseline_results.json");

    let document = serde_json::json!({ "pue": 1.2418, "wue": 2.2743 });
    let path = store
        .save_run(&manifest, &document, &[] as &[PointRecord])
        .unwrap();
    assert!(path.ends_with("baseline_results.json"));
    assert!(store.has_run(&run_id));

    let loaded = store.load_manifest(&run_id).unwrap();
    assert_eq!(loaded, manifest);
    let doc: serde_json::Value = store.load_document(&run_id).unwrap();
    assert_eq!(doc, document);

    let err = store.load_timeseries::<PointRecord>(&run_id).unwrap_err();
    assert!(matches!(err, ResultsError::MissingArtifact { .. }));

    store.delete_run(&run_id).unwrap();
    assert!(!store.has_run(&run_id));
}

#[test]
fn weather_run_keeps_point_order() {
    let store = temp_store("weather");
    let records: Vec<PointRecord> = (0..5)
        .map(|i| PointRecord {
            timestamp: format!("2024-07-01T{i:02}:00:00"),
            t_wb_c: 18.5 + i as f64,
            pue: 1.19 + 0.01 * i as f64,
        })
        .collect();

    let kind = RunKind::Weather { points: records.len() };
    let manifest = RunManifest::new("weather_run".to_string(), "baseline", kind, "0.1.0");
    store
        .save_run(&manifest, &serde_json::json!({ "avg_pue": 1.21 }), &records)
        .unwrap();

    let loaded_manifest = store.load_manifest("weather_run").unwrap();
    assert!(loaded_manifest.has_timeseries);
    assert_eq!(loaded_manifest.kind.label(), "weather");

    let loaded: Vec<PointRecord> = store.load_timeseries("weather_run").unwrap();
    assert_eq!(loaded, records);
}

#[test]
fn list_runs_filters_by_scenario() {
    let store = temp_store("list");
    for (id, scenario) in [("a", "baseline"), ("b", "optimized"), ("c", "baseline")] {
        let manifest = RunManifest::new(id.to_string(), scenario, RunKind::Comparison, "0.1.0");
        store
            .save_run(&manifest, &serde_json::json!({}), &[] as &[PointRecord])
            .unwrap();
    }

    assert_eq!(store.list_runs(None).unwrap().len(), 3);
    let baseline = store.list_runs(Some("baseline")).unwrap();
    assert_eq!(baseline.len(), 2);
    assert!(baseline.iter().all(|m| m.scenario == "baseline"));
}

#[test]
fn missing_run_is_reported() {
    let store = temp_store("missing");
    let err = store.load_manifest("nope").unwrap_err();
    assert!(matches!(err, ResultsError::RunNotFound { run_id } if run_id == "nope"));
}
