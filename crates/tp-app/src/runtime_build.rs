//! Runtime construction of a [`PlantConfig`] into a ready-to-solve plant.

use std::sync::Arc;

use tp_components::{
    BuildingLoad, ChillerModel, ChillerRating, CocProvider, ConstantCoc, CoolingTower,
    CurveFitChiller, CycleChiller, CycleParams, EffectivenessTargets, EirPartLoadCurve,
    EirTemperatureCurve, GpuLoad, PinchControl, SilicaLimitedCoc, TowerParams,
    VaporCompressionCycle,
};
use tp_fluids::{
    AirBackend, HumidAirOracle, PropertyBackend, Refrigerant, RefrigerantOracle, build_air_oracle,
    build_oracle,
};
use tp_project::{AirBackendDef, BackendDef, ChillerDef, ChillerKind, CyclesDef, PlantConfig, SolverDef, TowerDef};
use tp_solver::{PlantSolver, PumpFractions, Setpoints, SolveOptions};

use crate::error::{AppError, AppResult};

pub fn property_backend(def: BackendDef) -> PropertyBackend {
    match def {
        BackendDef::CoolProp => PropertyBackend::CoolProp,
        BackendDef::Correlation => PropertyBackend::Correlation,
        BackendDef::Unavailable => PropertyBackend::Unavailable,
    }
}

pub fn air_backend(def: AirBackendDef) -> AirBackend {
    match def {
        AirBackendDef::Ashrae => AirBackend::Ashrae,
        AirBackendDef::CoolProp => AirBackend::CoolProp,
    }
}

pub fn parse_refrigerant(name: &str) -> AppResult<Refrigerant> {
    name.parse()
        .map_err(|e| AppError::InvalidInput(format!("refrigerant '{name}': {e}")))
}

fn rating(def: &ChillerDef, t_chw_supply: f64) -> ChillerRating {
    ChillerRating {
        rated_capacity: def.rated_capacity_mw * 1e6,
        rated_cop: def.rated_cop,
        t_chw_supply,
    }
}

fn pinch_control(def: &ChillerDef) -> PinchControl {
    PinchControl {
        min_pinch: def.min_pinch_c,
        max_pinch: def.max_pinch_c,
        widen_step: def.widen_step_c,
        tighten_step: def.tighten_step_c,
        tolerance: def.tolerance_c,
        max_iterations: def.max_iterations,
        ..PinchControl::default()
    }
}

/// Build the configured chiller. The oracle is only consulted by the
/// thermodynamic-cycle model.
pub fn build_chiller(
    def: &ChillerDef,
    t_chw_supply: f64,
    oracle: Arc<dyn RefrigerantOracle>,
) -> AppResult<Box<dyn ChillerModel>> {
    let rating = rating(def, t_chw_supply);
    let control = pinch_control(def);
    let targets = EffectivenessTargets {
        evaporator: def.evap_effectiveness,
        condenser: def.cond_effectiveness,
    };

    let chiller: Box<dyn ChillerModel> = match def.kind {
        ChillerKind::ThermodynamicCycle => {
            let params = CycleParams {
                eta_isentropic: def.eta_isentropic,
                superheat_c: def.superheat_c,
                subcool_c: def.subcool_c,
            };
            let cycle = VaporCompressionCycle::new(oracle, parse_refrigerant(&def.refrigerant)?, params)?;
            Box::new(CycleChiller::new(rating, cycle, control, targets)?)
        }
        ChillerKind::CurveFit => Box::new(CurveFitChiller::new(
            rating,
            EirTemperatureCurve {
                coefficients: def.eir_ft,
            },
            EirPartLoadCurve {
                coefficients: def.eir_fplr,
            },
            &control,
            targets,
        )?),
    };
    Ok(chiller)
}

pub fn build_coc(def: &CyclesDef) -> AppResult<Arc<dyn CocProvider>> {
    Ok(match def {
        CyclesDef::Constant { coc } => Arc::new(ConstantCoc(*coc)),
        CyclesDef::SilicaLimited {
            makeup_silica_ppm,
            max_silica_ppm,
        } => Arc::new(SilicaLimitedCoc::new(*makeup_silica_ppm, *max_silica_ppm)?),
    })
}

pub fn build_tower(def: &TowerDef, air: Arc<dyn HumidAirOracle>) -> AppResult<CoolingTower> {
    let params = TowerParams {
        approach: def.approach_c,
        drift_rate: def.drift_rate,
        air_to_water_ratio: def.air_to_water_ratio,
        fan_power_fraction: def.fan_power_fraction,
        wet_bulb_depression: def.wet_bulb_depression_c,
        outlet_rh: def.outlet_rh,
        residual_warning: def.residual_warning,
    };
    Ok(CoolingTower::new(params, build_coc(&def.cycles)?, air)?)
}

pub fn solve_options(def: &SolverDef) -> SolveOptions {
    SolveOptions {
        max_iterations: def.max_iterations,
        tolerance: def.tolerance_c,
        ..SolveOptions::default()
    }
}

/// Build the plant with a fresh oracle for the configured backend.
pub fn build_plant(config: &PlantConfig) -> AppResult<PlantSolver> {
    let oracle = build_oracle(property_backend(config.properties.backend));
    build_plant_with_oracle(config, oracle)
}

/// Build the plant around a shared oracle.
pub fn build_plant_with_oracle(
    config: &PlantConfig,
    oracle: Arc<dyn RefrigerantOracle>,
) -> AppResult<PlantSolver> {
    let chiller = build_chiller(&config.chiller, config.t_chw_supply_c, oracle)?;
    let air = build_air_oracle(air_backend(config.properties.humid_air));
    let tower = build_tower(&config.tower, air)?;
    let gpu = GpuLoad::new(
        config.gpu.model.as_str(),
        config.gpu.tdp_per_gpu_w,
        config.gpu_load_mw,
        config.gpu.max_temp_c,
    )?;
    let building = BuildingLoad::new(config.building_load_mw, config.building.max_temp_c)?;
    let setpoints = Setpoints {
        t_gpu_in: config.t_gpu_in_c,
        t_air_in: config.t_air_in_c,
        t_wb_design: config.t_wb_ambient_c,
        t_db: config.t_db_ambient_c,
    };
    let pumps = PumpFractions {
        chw: config.pumps.chw_fraction,
        cw: config.pumps.cw_fraction,
        gpu: config.pumps.gpu_fraction,
    };

    tracing::debug!(
        scenario = %config.scenario,
        chiller = chiller.name(),
        humid_air = tower.psychrometrics().name(),
        coc = tower.coc(),
        "built plant"
    );
    Ok(PlantSolver::new(chiller, tower, gpu, building, setpoints, pumps)?)
}
