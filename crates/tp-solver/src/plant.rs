//! Plant equilibrium solver.
//!
//! The chiller needs the condenser-water temperature leaving the tower, and
//! the tower needs the condenser-water temperature leaving the chiller. The
//! outer loop resolves that cycle by fixed-point iteration over
//! [`PlantState`]:
//!
//! 1. IT loads at the requested utilization
//! 2. chiller at the current tower-outlet temperature (T8)
//! 3. tower fed with the chiller's condenser-water outlet
//! 4. state update (T8 and T10 from the tower, chilled-water and GPU legs)
//! 5. stop once the largest state change drops below the tolerance
//!
//! Running out of iterations is reported on the solution, not raised.

use serde::{Deserialize, Serialize};
use tp_components::{
    BuildingLoad, ChillerModel, ChillerSolution, CoolingTower, Diagnostic, GpuLoad, LoadModel,
    TowerSolution,
};
use tp_core::constants::CP_WATER;

use crate::error::{SolverError, SolverResult};
use crate::flows::DesignFlows;
use crate::metrics::{PumpFractions, annual_water_m3, pue, wue};
use crate::state::PlantState;

/// Fixed boundary temperatures of the plant [°C].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setpoints {
    /// GPU coolant supply
    pub t_gpu_in: f64,
    /// Building supply air
    pub t_air_in: f64,
    /// Design ambient wet bulb, used when a solve does not name one
    pub t_wb_design: f64,
    /// Ambient dry bulb; estimated by the tower when absent
    pub t_db: Option<f64>,
}

/// Outer-loop controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    pub max_iterations: usize,
    /// Convergence threshold on the largest state-point change [K]
    pub tolerance: f64,
    /// Start from the last solved state instead of the seed.
    pub warm_start: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 0.01,
            warm_start: false,
        }
    }
}

impl SolveOptions {
    pub fn validate(&self) -> SolverResult<()> {
        if self.max_iterations == 0 {
            return Err(SolverError::invalid("max_iterations must be at least 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolverError::invalid(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Reported after every outer iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OuterProgress {
    pub iteration: usize,
    pub max_iterations: usize,
    pub max_change: f64,
    pub t_cw_to_chiller: f64,
}

/// Snapshot of the plant at one operating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantSolution {
    pub converged: bool,
    pub iterations: usize,
    /// Largest state change in the final iteration [K]
    pub max_change_c: f64,
    pub utilization: f64,
    pub t_wb_c: f64,

    pub p_it_w: f64,
    pub q_gpu_w: f64,
    pub q_building_w: f64,
    pub q_evap_w: f64,
    pub q_cond_w: f64,
    pub w_comp_w: f64,
    pub w_pumps_w: f64,
    pub w_fans_w: f64,
    pub w_cooling_w: f64,

    pub cop: f64,
    pub plr: f64,
    pub pue: f64,
    /// L/kWh
    pub wue: f64,

    pub m_makeup_kg_s: f64,
    pub m_evap_kg_s: f64,
    pub m_blowdown_kg_s: f64,
    pub m_drift_kg_s: f64,
    pub annual_water_m3: f64,
    pub coc: f64,

    pub t_gpu_out_c: f64,
    pub t_air_out_c: f64,
    pub gpu_max_temp_c: f64,
    pub building_max_temp_c: f64,
    pub gpu_temp_ok: bool,
    pub building_temp_ok: bool,

    /// |Q_cond - (Q_evap + W)| / Q_cond
    pub energy_balance_residual: f64,

    pub state: PlantState,
    pub flows: DesignFlows,
    pub chiller: ChillerSolution,
    pub tower: TowerSolution,
    pub diagnostics: Vec<Diagnostic>,
}

/// Owns the plant components and the loop state between solves.
pub struct PlantSolver {
    chiller: Box<dyn ChillerModel>,
    tower: CoolingTower,
    gpu: GpuLoad,
    building: BuildingLoad,
    setpoints: Setpoints,
    pumps: PumpFractions,
    flows: DesignFlows,
    state: PlantState,
}

impl std::fmt::Debug for PlantSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlantSolver")
            .field("chiller", &self.chiller.name())
            .field("tower", &self.tower)
            .field("gpu", &self.gpu)
            .field("building", &self.building)
            .field("setpoints", &self.setpoints)
            .field("flows", &self.flows)
            .finish()
    }
}

fn check_band(v: f64, min: f64, max: f64, what: &str) -> SolverResult<f64> {
    if v.is_finite() && v >= min && v <= max {
        Ok(v)
    } else {
        Err(SolverError::invalid(format!("{what} = {v} outside [{min}, {max}]")))
    }
}

impl PlantSolver {
    pub fn new(
        chiller: Box<dyn ChillerModel>,
        tower: CoolingTower,
        gpu: GpuLoad,
        building: BuildingLoad,
        setpoints: Setpoints,
        pumps: PumpFractions,
    ) -> SolverResult<Self> {
        check_band(setpoints.t_gpu_in, 0.0, 100.0, "GPU supply temperature")?;
        check_band(setpoints.t_air_in, 0.0, 50.0, "building supply air temperature")?;
        check_band(setpoints.t_wb_design, -20.0, 50.0, "design wet bulb")?;
        if let Some(t_db) = setpoints.t_db {
            check_band(t_db, -40.0, 60.0, "ambient dry bulb")?;
        }
        for (f, what) in [(pumps.chw, "chw pump fraction"), (pumps.cw, "cw pump fraction"), (pumps.gpu, "gpu pump fraction")] {
            check_band(f, 0.0, 1.0, what)?;
        }

        let flows = DesignFlows::from_loads(gpu.rated_load(), building.rated_load())?;
        let state = PlantState::seed(
            chiller.rating().t_chw_supply,
            setpoints.t_gpu_in,
            setpoints.t_wb_design,
            tower.params().approach,
        );
        Ok(Self {
            chiller,
            tower,
            gpu,
            building,
            setpoints,
            pumps,
            flows,
            state,
        })
    }

    pub fn chiller(&self) -> &dyn ChillerModel {
        self.chiller.as_ref()
    }

    pub fn tower(&self) -> &CoolingTower {
        &self.tower
    }

    pub fn gpu(&self) -> &GpuLoad {
        &self.gpu
    }

    pub fn building(&self) -> &BuildingLoad {
        &self.building
    }

    pub fn setpoints(&self) -> Setpoints {
        self.setpoints
    }

    pub fn flows(&self) -> DesignFlows {
        self.flows
    }

    /// Current loop state (the seed before any solve).
    pub fn state(&self) -> PlantState {
        self.state
    }

    fn seed_state(&self, t_wb: f64) -> PlantState {
        PlantState::seed(
            self.chiller.rating().t_chw_supply,
            self.setpoints.t_gpu_in,
            t_wb,
            self.tower.params().approach,
        )
    }

    /// Solve the plant at `utilization` in (0, 1] and ambient wet bulb [°C]
    /// (the design wet bulb when `None`).
    pub fn solve_steady_state(
        &mut self,
        utilization: f64,
        t_wb: Option<f64>,
        options: &SolveOptions,
    ) -> SolverResult<PlantSolution> {
        self.solve_with_progress(utilization, t_wb, options, |_| {})
    }

    /// [`Self::solve_steady_state`] with a callback after each outer iteration.
    pub fn solve_with_progress<F>(
        &mut self,
        utilization: f64,
        t_wb: Option<f64>,
        options: &SolveOptions,
        mut on_progress: F,
    ) -> SolverResult<PlantSolution>
    where
        F: FnMut(&OuterProgress),
    {
        options.validate()?;
        check_band(utilization, 0.0, 1.0, "utilization")?;
        if utilization == 0.0 {
            return Err(SolverError::invalid(
                "utilization must be above 0: the chiller cannot be solved at zero duty",
            ));
        }
        let t_wb = check_band(t_wb.unwrap_or(self.setpoints.t_wb_design), -20.0, 50.0, "ambient wet bulb")?;
        let t_basin = t_wb + self.tower.params().approach;
        if t_basin < 0.0 {
            return Err(SolverError::invalid(format!(
                "ambient wet bulb {t_wb} °C puts the tower water outlet at {t_basin} °C, below freezing"
            )));
        }
        if let Some(t_db) = self.setpoints.t_db
            && t_db < t_wb
        {
            return Err(SolverError::invalid(format!(
                "ambient dry bulb {t_db} °C is below the wet bulb {t_wb} °C"
            )));
        }

        if !options.warm_start {
            self.state = self.seed_state(t_wb);
        }

        let flows = self.flows;
        let q_gpu = self.gpu.heat_load(utilization)?;
        let q_building = self.building.heat_load(utilization)?;
        let q_evap = q_gpu + q_building;

        // The load loops have fixed supply and flow, so their outlets do not
        // depend on the condenser loop.
        let t_gpu_out = self.gpu.outlet_temperature(self.setpoints.t_gpu_in, flows.m_gpu, utilization)?;
        let t_air_out = self
            .building
            .outlet_temperature(self.setpoints.t_air_in, flows.m_air, utilization)?;

        let mut converged = false;
        let mut iterations = 0;
        let mut max_change = f64::INFINITY;
        let mut last: Option<(ChillerSolution, TowerSolution)> = None;

        for iteration in 1..=options.max_iterations {
            let previous = self.state;

            let chiller = self.chiller.solve_energy_balance(
                q_evap,
                flows.m_chw,
                flows.m_cw,
                previous.t8_cw_from_tower,
            )?;
            let tower = self.tower.solve(
                chiller.q_cond_w,
                flows.m_cw,
                chiller.t_cw_out_c,
                t_wb,
                self.setpoints.t_db,
            )?;

            let s = &mut self.state;
            s.t1_chw_supply = chiller.t_chw_supply_c;
            s.t2_after_building_hx = chiller.t_chw_supply_c + q_building / (flows.m_chw * CP_WATER);
            s.t3_after_compute_hx = chiller.t_chw_return_c;
            s.t4_chw_return = chiller.t_chw_return_c;
            s.t5_gpu_supply = self.setpoints.t_gpu_in;
            s.t6_gpu_return = t_gpu_out;
            s.t7_gpu_to_hx = t_gpu_out;
            s.t8_cw_from_tower = tower.t_water_out_c;
            s.t9_cw_from_chiller = chiller.t_cw_out_c;
            s.t10_cw_to_chiller = tower.t_water_out_c;

            max_change = self.state.max_abs_change(&previous);
            iterations = iteration;
            tracing::debug!(
                iteration,
                max_change,
                t_cw_to_chiller = self.state.t10_cw_to_chiller,
                cop = chiller.cop,
                "plant outer iteration"
            );
            on_progress(&OuterProgress {
                iteration,
                max_iterations: options.max_iterations,
                max_change,
                t_cw_to_chiller: self.state.t10_cw_to_chiller,
            });
            last = Some((chiller, tower));

            if max_change < options.tolerance {
                converged = true;
                break;
            }
        }

        let (chiller, tower) = last.ok_or_else(|| SolverError::invalid("no outer iteration ran"))?;
        if converged {
            tracing::info!(iterations, cop = chiller.cop, "plant converged");
        } else {
            tracing::warn!(
                iterations,
                max_change,
                tolerance = options.tolerance,
                "plant did not converge; returning last state"
            );
        }

        let p_it = q_evap;
        let w_pumps = self.pumps.power(q_evap, q_gpu);
        let w_cooling = chiller.w_comp_w + w_pumps + tower.fan_power_w;
        let mut diagnostics = chiller.diagnostics.clone();
        diagnostics.extend(tower.diagnostics.iter().cloned());

        Ok(PlantSolution {
            converged,
            iterations,
            max_change_c: max_change,
            utilization,
            t_wb_c: t_wb,
            p_it_w: p_it,
            q_gpu_w: q_gpu,
            q_building_w: q_building,
            q_evap_w: q_evap,
            q_cond_w: chiller.q_cond_w,
            w_comp_w: chiller.w_comp_w,
            w_pumps_w: w_pumps,
            w_fans_w: tower.fan_power_w,
            w_cooling_w: w_cooling,
            cop: chiller.cop,
            plr: chiller.plr,
            pue: pue(p_it, w_cooling),
            wue: wue(tower.m_makeup_kg_s, p_it),
            m_makeup_kg_s: tower.m_makeup_kg_s,
            m_evap_kg_s: tower.m_evap_kg_s,
            m_blowdown_kg_s: tower.m_blowdown_kg_s,
            m_drift_kg_s: tower.m_drift_kg_s,
            annual_water_m3: annual_water_m3(tower.m_makeup_kg_s),
            coc: tower.coc,
            t_gpu_out_c: t_gpu_out,
            t_air_out_c: t_air_out,
            gpu_max_temp_c: self.gpu.max_temp(),
            building_max_temp_c: self.building.max_temp(),
            gpu_temp_ok: self.gpu.meets_temperature_limit(t_gpu_out),
            building_temp_ok: self.building.meets_temperature_limit(t_air_out),
            energy_balance_residual: chiller.energy_balance_residual,
            state: self.state,
            flows,
            chiller,
            tower,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;
    use tp_components::{
        ChillerRating, ConstantCoc, CycleChiller, CycleParams, EffectivenessTargets, PinchControl,
        TowerParams, VaporCompressionCycle,
    };
    use tp_fluids::{AshraePsychrometrics, PropertyBackend, Refrigerant, build_oracle};

    fn solver(coc: f64) -> PlantSolver {
        let cycle = VaporCompressionCycle::new(
            build_oracle(PropertyBackend::Correlation),
            Refrigerant::R134a,
            CycleParams::default(),
        )
        .unwrap();
        let chiller = CycleChiller::new(
            ChillerRating {
                rated_capacity: 1.0e9,
                rated_cop: 6.1,
                t_chw_supply: 10.0,
            },
            cycle,
            PinchControl::default(),
            EffectivenessTargets::default(),
        )
        .unwrap();
        let tower = CoolingTower::new(
            TowerParams::default(),
            Arc::new(ConstantCoc(coc)),
            Arc::new(AshraePsychrometrics::new()),
        )
        .unwrap();
        PlantSolver::new(
            Box::new(chiller),
            tower,
            GpuLoad::new("NVIDIA B200", 1200.0, 900.0, 40.0).unwrap(),
            BuildingLoad::new(100.0, 25.0).unwrap(),
            Setpoints {
                t_gpu_in: 15.0,
                t_air_in: 20.0,
                t_wb_design: 25.5,
                t_db: None,
            },
            PumpFractions::default(),
        )
        .unwrap()
    }

    #[test]
    fn design_point() {
        let mut plant = solver(5.0);
        let sol = plant.solve_steady_state(1.0, None, &SolveOptions::default()).unwrap();
        assert!(sol.converged);
        assert_eq!(sol.iterations, 2);
        assert_relative_eq!(sol.pue, 1.2418, epsilon = 1e-3);
        assert_relative_eq!(sol.wue, 2.274, epsilon = 5e-3);
        assert_relative_eq!(sol.t_gpu_out_c, 40.0, epsilon = 1e-9);
        assert_relative_eq!(sol.t_air_out_c, 25.0, epsilon = 1e-9);
        assert!(sol.gpu_temp_ok && sol.building_temp_ok);
        assert_eq!(sol.state.t8_cw_from_tower, 29.5);
        assert_eq!(sol.state.t10_cw_to_chiller, 29.5);
        assert_relative_eq!(sol.state.t4_chw_return, 15.0, epsilon = 0.01);
    }

    #[test]
    fn progress_is_reported_per_iteration() {
        let mut plant = solver(5.0);
        let mut seen = Vec::new();
        let sol = plant
            .solve_with_progress(1.0, None, &SolveOptions::default(), |p| seen.push(p.iteration))
            .unwrap();
        assert_eq!(seen, (1..=sol.iterations).collect::<Vec<_>>());
    }

    #[test]
    fn iteration_cap_is_a_soft_failure() {
        let mut plant = solver(5.0);
        let options = SolveOptions {
            max_iterations: 1,
            ..SolveOptions::default()
        };
        let sol = plant.solve_steady_state(1.0, None, &options).unwrap();
        assert!(!sol.converged);
        assert_eq!(sol.iterations, 1);
        assert!(sol.max_change_c > options.tolerance);
    }

    #[test]
    fn rejects_bad_inputs_before_iterating() {
        let mut plant = solver(5.0);
        let seed = plant.state();
        let options = SolveOptions::default();
        for (u, wb) in [(0.0, None), (1.1, None), (f64::NAN, None), (0.5, Some(60.0)), (0.5, Some(-5.0))] {
            let err = plant.solve_steady_state(u, wb, &options).unwrap_err();
            assert!(matches!(err, SolverError::InvalidInput { .. }));
        }
        assert_eq!(plant.state(), seed);
        let zero_tol = SolveOptions {
            tolerance: 0.0,
            ..options
        };
        assert!(plant.solve_steady_state(1.0, None, &zero_tol).is_err());
    }

    #[test]
    fn warm_start_resumes_from_last_state() {
        let mut plant = solver(5.0);
        plant.solve_steady_state(1.0, None, &SolveOptions::default()).unwrap();
        let warm = SolveOptions {
            warm_start: true,
            ..SolveOptions::default()
        };
        let sol = plant.solve_steady_state(1.0, None, &warm).unwrap();
        assert!(sol.converged);
        assert_eq!(sol.iterations, 1);
    }
}
