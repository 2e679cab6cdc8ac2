//! Configuration validation.
//!
//! Every violated range is collected so a user sees all problems at once.

use crate::schema::{ChillerDef, CyclesDef, PlantConfig, TowerDef};
use tp_fluids::Refrigerant;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("{} validation errors: {}", .0.len(), .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Individual violations, flattening [`ValidationError::Multiple`].
    pub fn violations(&self) -> Vec<&ValidationError> {
        match self {
            ValidationError::Multiple(errors) => errors.iter().flat_map(|e| e.violations()).collect(),
            other => vec![other],
        }
    }
}

#[derive(Default)]
struct Collector {
    errors: Vec<ValidationError>,
}

impl Collector {
    fn fail(&mut self, field: &str, value: impl ToString, reason: &str) {
        self.errors.push(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        });
    }

    /// `min < v <= max` or `min <= v <= max` depending on `open_min`.
    fn range(&mut self, field: &str, v: f64, min: f64, max: f64, open_min: bool) {
        let above_min = if open_min { v > min } else { v >= min };
        if !(v.is_finite() && above_min && v <= max) {
            let lower = if open_min { "(" } else { "[" };
            self.fail(field, v, &format!("must be in {lower}{min}, {max}]"));
        }
    }

    fn below(&mut self, field: &str, v: f64, min: f64, max: f64) {
        if !(v.is_finite() && v >= min && v < max) {
            self.fail(field, v, &format!("must be in [{min}, {max})"));
        }
    }

    fn positive(&mut self, field: &str, v: f64) {
        if !(v.is_finite() && v > 0.0) {
            self.fail(field, v, "must be positive");
        }
    }
}

/// All violations in `config`; empty when valid.
pub fn collect_violations(config: &PlantConfig) -> Vec<ValidationError> {
    let mut c = Collector::default();

    if config.scenario.trim().is_empty() {
        c.fail("scenario", "\"\"", "must not be empty");
    }
    c.positive("gpu_load_mw", config.gpu_load_mw);
    c.positive("building_load_mw", config.building_load_mw);
    c.below("t_chw_supply_c", config.t_chw_supply_c, 0.0, 30.0);
    c.below("t_gpu_in_c", config.t_gpu_in_c, 0.0, 100.0);
    c.below("t_air_in_c", config.t_air_in_c, 0.0, 50.0);
    c.range("t_wb_ambient_c", config.t_wb_ambient_c, -20.0, 50.0, false);
    if config.t_wb_ambient_c + config.tower.approach_c < 0.0 {
        c.fail(
            "t_wb_ambient_c",
            config.t_wb_ambient_c,
            "wet bulb plus tower approach must not be below 0 °C",
        );
    }
    if let Some(t_db) = config.t_db_ambient_c {
        c.range("t_db_ambient_c", t_db, -40.0, 60.0, false);
        if t_db < config.t_wb_ambient_c {
            c.fail("t_db_ambient_c", t_db, "must not be below the wet bulb");
        }
    }
    c.range("utilization", config.utilization, 0.0, 1.0, false);

    c.positive("gpu.tdp_per_gpu_w", config.gpu.tdp_per_gpu_w);
    if !(config.gpu.max_temp_c > 0.0 && config.gpu.max_temp_c < 100.0) {
        c.fail("gpu.max_temp_c", config.gpu.max_temp_c, "must be in (0, 100)");
    }
    if !(config.building.max_temp_c > 0.0 && config.building.max_temp_c < 50.0) {
        c.fail("building.max_temp_c", config.building.max_temp_c, "must be in (0, 50)");
    }

    chiller(&mut c, &config.chiller);
    tower(&mut c, &config.tower);

    for (field, v) in [
        ("pumps.chw_fraction", config.pumps.chw_fraction),
        ("pumps.cw_fraction", config.pumps.cw_fraction),
        ("pumps.gpu_fraction", config.pumps.gpu_fraction),
    ] {
        c.range(field, v, 0.0, 1.0, false);
    }

    if config.solver.max_iterations == 0 {
        c.fail("solver.max_iterations", 0, "must be at least 1");
    }
    c.positive("solver.tolerance_c", config.solver.tolerance_c);

    c.errors
}

fn chiller(c: &mut Collector, def: &ChillerDef) {
    c.positive("chiller.rated_capacity_mw", def.rated_capacity_mw);
    c.range("chiller.rated_cop", def.rated_cop, 0.0, 10.0, true);
    if def.refrigerant.parse::<Refrigerant>().is_err() {
        c.fail("chiller.refrigerant", &def.refrigerant, "unknown refrigerant");
    }
    c.range("chiller.eta_isentropic", def.eta_isentropic, 0.0, 1.0, true);
    c.range("chiller.superheat_c", def.superheat_c, 0.0, 30.0, false);
    c.range("chiller.subcool_c", def.subcool_c, 0.0, 30.0, false);
    c.range("chiller.evap_effectiveness", def.evap_effectiveness, 0.0, 1.0, true);
    c.range("chiller.cond_effectiveness", def.cond_effectiveness, 0.0, 1.0, true);
    c.positive("chiller.min_pinch_c", def.min_pinch_c);
    if !(def.max_pinch_c > def.min_pinch_c) {
        c.fail("chiller.max_pinch_c", def.max_pinch_c, "must exceed min_pinch_c");
    }
    c.positive("chiller.widen_step_c", def.widen_step_c);
    c.positive("chiller.tighten_step_c", def.tighten_step_c);
    c.positive("chiller.tolerance_c", def.tolerance_c);
    if def.max_iterations == 0 {
        c.fail("chiller.max_iterations", 0, "must be at least 1");
    }
}

fn tower(c: &mut Collector, def: &TowerDef) {
    c.range("tower.approach_c", def.approach_c, 0.0, 20.0, true);
    c.range("tower.drift_rate", def.drift_rate, 0.0, 0.01, false);
    c.range("tower.air_to_water_ratio", def.air_to_water_ratio, 0.0, 5.0, true);
    c.range("tower.fan_power_fraction", def.fan_power_fraction, 0.0, 0.1, false);
    c.range("tower.wet_bulb_depression_c", def.wet_bulb_depression_c, 0.0, 40.0, false);
    c.range("tower.outlet_rh", def.outlet_rh, 0.0, 1.0, true);
    c.positive("tower.residual_warning", def.residual_warning);

    match def.cycles {
        CyclesDef::Constant { coc } => c.range("tower.cycles.coc", coc, 2.0, 10.0, false),
        CyclesDef::SilicaLimited {
            makeup_silica_ppm,
            max_silica_ppm,
        } => {
            c.range("tower.cycles.makeup_silica_ppm", makeup_silica_ppm, 0.0, 100.0, true);
            if !(max_silica_ppm > makeup_silica_ppm) {
                c.fail(
                    "tower.cycles.max_silica_ppm",
                    max_silica_ppm,
                    "must exceed makeup_silica_ppm",
                );
            } else if makeup_silica_ppm > 0.0 {
                c.range("tower.cycles (derived coc)", def.cycles.coc(), 2.0, 10.0, false);
            }
        }
    }
}

pub fn validate_config(config: &PlantConfig) -> Result<(), ValidationError> {
    let mut errors = collect_violations(config);
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
