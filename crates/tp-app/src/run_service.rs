//! Single-scenario execution and result persistence.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tp_project::{PlantConfig, validate_config};
use tp_results::{ResultsStore, RunKind, RunManifest, compute_run_id};
use tp_solver::{
    CheckReport, ENERGY_BALANCE_TOLERANCE, PlantSolution, check_constraints, check_energy_balance,
};

use crate::error::AppResult;
use crate::runtime_build::{build_plant, solve_options};

/// Options shared by every run entry point.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Validate the configuration before building.
    pub validate: bool,
    /// Run the post-solve energy-balance and constraint checks.
    pub check: bool,
    /// Persist results under this directory.
    pub output_dir: Option<PathBuf>,
    pub solver_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            validate: true,
            check: true,
            output_dir: None,
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub pue: f64,
    /// L/kWh
    pub wue: f64,
    pub solution: PlantSolution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checks: Option<CheckReport>,
    pub solve_time_s: f64,
    #[serde(skip)]
    pub saved_to: Option<PathBuf>,
}

impl ScenarioReport {
    pub fn checks_passed(&self) -> bool {
        self.checks.as_ref().is_none_or(CheckReport::all_passed)
    }
}

/// Energy balance followed by the temperature, COP and convergence checks.
pub fn run_checks(solution: &PlantSolution) -> AppResult<CheckReport> {
    let report = check_energy_balance(solution, ENERGY_BALANCE_TOLERANCE)?
        .merge(check_constraints(solution)?);
    for failure in report.failures() {
        tracing::warn!(check = %failure.name, detail = %failure.detail, "post-solve check failed");
    }
    Ok(report)
}

/// Validate, build and solve one scenario at its configured utilization and
/// wet bulb.
///
/// Failed checks are reported on the result, not raised.
pub fn run_scenario(config: &PlantConfig, options: &RunOptions) -> AppResult<ScenarioReport> {
    if options.validate {
        validate_config(config)?;
    }

    let started = Instant::now();
    let mut solver = build_plant(config)?;
    let solution = solver.solve_steady_state(
        config.utilization,
        Some(config.t_wb_ambient_c),
        &solve_options(&config.solver),
    )?;
    let solve_time_s = started.elapsed().as_secs_f64();

    let checks = if options.check {
        Some(run_checks(&solution)?)
    } else {
        None
    };

    tracing::info!(
        scenario = %config.scenario,
        converged = solution.converged,
        iterations = solution.iterations,
        pue = solution.pue,
        wue = solution.wue,
        "scenario solved"
    );

    let mut report = ScenarioReport {
        scenario: config.scenario.clone(),
        pue: solution.pue,
        wue: solution.wue,
        solution,
        checks,
        solve_time_s,
        saved_to: None,
    };

    if let Some(dir) = &options.output_dir {
        let kind = RunKind::Single {
            utilization: config.utilization,
            t_wb_c: config.t_wb_ambient_c,
        };
        let path = save_document(dir, config, kind, &config.scenario, &report, &[] as &[()], options)?;
        report.saved_to = Some(path);
    }

    Ok(report)
}

/// Persist a result document (and optional per-point records) as a run
/// keyed by the hash of `inputs`.
pub(crate) fn save_document<I, D, R>(
    dir: &Path,
    inputs: &I,
    kind: RunKind,
    scenario: &str,
    document: &D,
    records: &[R],
    options: &RunOptions,
) -> AppResult<PathBuf>
where
    I: Serialize + ?Sized,
    D: Serialize + ?Sized,
    R: Serialize,
{
    let store = ResultsStore::new(dir.to_path_buf())?;
    let run_id = compute_run_id(inputs, &kind, &options.solver_version);
    let manifest = RunManifest::new(run_id, scenario, kind, options.solver_version.clone());
    let path = store.save_run(&manifest, document, records)?;
    tracing::info!(run_id = %manifest.run_id, path = %path.display(), "results saved");
    Ok(path)
}

pub fn list_runs(dir: &Path, scenario: Option<&str>) -> AppResult<Vec<RunManifest>> {
    Ok(ResultsStore::new(dir.to_path_buf())?.list_runs(scenario)?)
}
