//! Post-solve validation of a [`PlantSolution`].

use serde::{Deserialize, Serialize};
use tp_core::numeric::relative_residual;

use crate::error::{SolverError, SolverResult};
use crate::plant::PlantSolution;

/// Default relative tolerance for the energy-balance checks.
pub const ENERGY_BALANCE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl CheckReport {
    fn push(&mut self, name: &str, passed: bool, detail: String) {
        self.outcomes.push(CheckOutcome {
            name: name.to_string(),
            passed,
            detail,
        });
    }

    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    /// `Ok(self)` when every check passed, otherwise the failed checks.
    pub fn into_result(self) -> SolverResult<Self> {
        if self.all_passed() {
            return Ok(self);
        }
        Err(SolverError::ChecksFailed {
            failed: self
                .failures()
                .map(|o| format!("{}: {}", o.name, o.detail))
                .collect(),
        })
    }

    pub fn merge(mut self, other: CheckReport) -> Self {
        self.outcomes.extend(other.outcomes);
        self
    }
}

/// Evaporator duty against IT heat, and condenser duty against evaporator
/// duty plus compressor work, both relative to `tolerance`.
pub fn check_energy_balance(sol: &PlantSolution, tolerance: f64) -> SolverResult<CheckReport> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(SolverError::invalid(format!(
            "energy-balance tolerance must be positive, got {tolerance}"
        )));
    }
    let mut report = CheckReport::default();

    let it_error = relative_residual(sol.chiller.q_evap_w, sol.p_it_w, sol.p_it_w);
    report.push(
        "evaporator duty matches IT load",
        it_error < tolerance,
        format!("relative error {it_error:.2e} (limit {tolerance:.2e})"),
    );

    let cond_error = relative_residual(sol.q_cond_w, sol.q_evap_w + sol.w_comp_w, sol.q_cond_w);
    report.push(
        "condenser duty closes",
        cond_error < tolerance,
        format!("relative error {cond_error:.2e} (limit {tolerance:.2e})"),
    );

    report.into_result()
}

/// Temperature limits, COP sanity and convergence.
pub fn check_constraints(sol: &PlantSolution) -> SolverResult<CheckReport> {
    let mut report = CheckReport::default();
    report.push(
        "GPU coolant outlet within limit",
        sol.gpu_temp_ok,
        format!("{:.2} °C (limit {:.1} °C)", sol.t_gpu_out_c, sol.gpu_max_temp_c),
    );
    report.push(
        "building air outlet within limit",
        sol.building_temp_ok,
        format!("{:.2} °C (limit {:.1} °C)", sol.t_air_out_c, sol.building_max_temp_c),
    );
    report.push(
        "COP in (0, 10)",
        sol.cop > 0.0 && sol.cop < 10.0,
        format!("{:.3}", sol.cop),
    );
    report.push(
        "outer loop converged",
        sol.converged,
        format!("{} iterations, last change {:.4} K", sol.iterations, sol.max_change_c),
    );
    report.into_result()
}
