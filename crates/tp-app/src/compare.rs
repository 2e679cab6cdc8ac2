//! Baseline against optimized scenario comparison.

use serde::{Deserialize, Serialize};
use tp_components::WaterSavings;
use tp_fluids::build_air_oracle;
use tp_project::PlantConfig;
use tp_results::RunKind;
use tp_solver::annual_water_m3;

use crate::error::AppResult;
use crate::run_service::{RunOptions, ScenarioReport, run_scenario, save_document};
use crate::runtime_build::{air_backend, build_tower};

/// Annual water use of one person [m³].
pub const WATER_PER_PERSON_M3: f64 = 150.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    pub coc_baseline: f64,
    pub coc_optimized: f64,
    pub pue_baseline: f64,
    pub pue_optimized: f64,
    pub wue_baseline: f64,
    pub wue_optimized: f64,
    pub makeup_baseline_kg_s: f64,
    pub makeup_optimized_kg_s: f64,
    pub water_savings_pct: f64,
    pub annual_water_savings_m3: f64,
    /// Annual savings expressed as people supplied.
    pub people_equivalent: f64,
    pub blowdown_reduction_pct: f64,
    /// Blowdown reduction implied by the optimized tower's cycles alone.
    pub silica: WaterSavings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub baseline: ScenarioReport,
    pub optimized: ScenarioReport,
    pub comparison: ComparisonMetrics,
}

/// Run both scenarios and compare water and power use.
///
/// With an output directory, each scenario is persisted on its own and the
/// comparison is saved as `comparison_results.json`.
pub fn compare_scenarios(
    baseline: &PlantConfig,
    optimized: &PlantConfig,
    options: &RunOptions,
) -> AppResult<ComparisonReport> {
    let scenario_options = RunOptions {
        check: false,
        ..options.clone()
    };
    let base = run_scenario(baseline, &scenario_options)?;
    let opt = run_scenario(optimized, &scenario_options)?;

    let b = &base.solution;
    let o = &opt.solution;
    let water_savings_pct = (b.m_makeup_kg_s - o.m_makeup_kg_s) / b.m_makeup_kg_s * 100.0;
    let annual_water_savings_m3 = annual_water_m3(b.m_makeup_kg_s - o.m_makeup_kg_s);
    let air = build_air_oracle(air_backend(optimized.properties.humid_air));
    let silica = build_tower(&optimized.tower, air)?.water_savings(baseline.tower.cycles.coc())?;

    let comparison = ComparisonMetrics {
        coc_baseline: b.coc,
        coc_optimized: o.coc,
        pue_baseline: base.pue,
        pue_optimized: opt.pue,
        wue_baseline: base.wue,
        wue_optimized: opt.wue,
        makeup_baseline_kg_s: b.m_makeup_kg_s,
        makeup_optimized_kg_s: o.m_makeup_kg_s,
        water_savings_pct,
        annual_water_savings_m3,
        people_equivalent: annual_water_savings_m3 / WATER_PER_PERSON_M3,
        blowdown_reduction_pct: (b.m_blowdown_kg_s - o.m_blowdown_kg_s) / b.m_blowdown_kg_s * 100.0,
        silica,
    };

    tracing::info!(
        water_savings_pct,
        annual_water_savings_m3,
        pue_change = opt.pue - base.pue,
        "comparison complete"
    );

    let report = ComparisonReport {
        baseline: base,
        optimized: opt,
        comparison,
    };

    if let Some(dir) = &options.output_dir {
        save_document(
            dir,
            &(baseline, optimized),
            RunKind::Comparison,
            "comparison",
            &report,
            &[] as &[()],
            options,
        )?;
    }

    Ok(report)
}
