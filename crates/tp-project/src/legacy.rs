//! Upgrade of the flat, single-level configuration files used by earlier
//! versions of the model.
//!
//! A legacy file is recognised by its top-level `chiller_rated_cop` key.

use serde::Deserialize;

use crate::schema::{
    BuildingDef, ChillerDef, CyclesDef, GpuDef, PlantConfig, PropertiesDef, PumpsDef, SolverDef, TowerDef,
};

/// Key only present in the flat layout.
pub const LEGACY_MARKER: &str = "chiller_rated_cop";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LegacyConfig {
    #[serde(default)]
    pub scenario: Option<String>,
    pub gpu_load_mw: f64,
    pub building_load_mw: f64,
    pub chiller_rated_cop: f64,
    #[serde(default)]
    pub chiller_rated_capacity_mw: Option<f64>,
    pub cooling_tower_approach: f64,
    pub coc: f64,
    pub t_chw_supply: f64,
    pub t_gpu_in: f64,
    pub t_air_in: f64,
    pub t_wb_ambient: f64,
    #[serde(default)]
    pub utilization: Option<f64>,
    #[serde(default)]
    pub gpu_model: Option<String>,
    #[serde(default)]
    pub tdp_per_gpu: Option<f64>,
    #[serde(default)]
    pub gpu_max_temp: Option<f64>,
    #[serde(default)]
    pub building_max_temp: Option<f64>,
    #[serde(default)]
    pub drift_rate: Option<f64>,
    #[serde(default)]
    pub use_optimized_tower: bool,
    #[serde(default)]
    pub makeup_silica_ppm: Option<f64>,
    #[serde(default)]
    pub max_silica_ppm: Option<f64>,
}

pub fn is_legacy(value: &serde_json::Value) -> bool {
    value.get(LEGACY_MARKER).is_some()
}

impl From<LegacyConfig> for PlantConfig {
    fn from(old: LegacyConfig) -> Self {
        let gpu_defaults = GpuDef::default();
        let cycles = if old.use_optimized_tower {
            CyclesDef::SilicaLimited {
                makeup_silica_ppm: old.makeup_silica_ppm.unwrap_or(25.0),
                max_silica_ppm: old.max_silica_ppm.unwrap_or(150.0),
            }
        } else {
            CyclesDef::Constant { coc: old.coc }
        };
        let mut tower = TowerDef::new(old.cooling_tower_approach, cycles);
        if let Some(drift) = old.drift_rate {
            tower.drift_rate = drift;
        }
        let mut chiller = ChillerDef::with_rated_cop(old.chiller_rated_cop);
        if let Some(capacity) = old.chiller_rated_capacity_mw {
            chiller.rated_capacity_mw = capacity;
        }

        PlantConfig {
            scenario: old.scenario.unwrap_or_else(|| "unknown".to_string()),
            gpu_load_mw: old.gpu_load_mw,
            building_load_mw: old.building_load_mw,
            t_chw_supply_c: old.t_chw_supply,
            t_gpu_in_c: old.t_gpu_in,
            t_air_in_c: old.t_air_in,
            t_wb_ambient_c: old.t_wb_ambient,
            t_db_ambient_c: None,
            utilization: old.utilization.unwrap_or(1.0),
            gpu: GpuDef {
                model: old.gpu_model.unwrap_or(gpu_defaults.model),
                tdp_per_gpu_w: old.tdp_per_gpu.unwrap_or(gpu_defaults.tdp_per_gpu_w),
                max_temp_c: old.gpu_max_temp.unwrap_or(gpu_defaults.max_temp_c),
            },
            building: BuildingDef {
                max_temp_c: old
                    .building_max_temp
                    .unwrap_or(BuildingDef::default().max_temp_c),
            },
            chiller,
            tower,
            pumps: PumpsDef::default(),
            solver: SolverDef::default(),
            properties: PropertiesDef::default(),
        }
    }
}
