//! Plant configuration schema.
//!
//! Only the load totals, the chiller's rated COP, the tower approach and
//! cycles of concentration, and the plant setpoints are required. Every
//! other field has a default.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantConfig {
    #[serde(default = "default_scenario")]
    pub scenario: String,
    pub gpu_load_mw: f64,
    pub building_load_mw: f64,
    pub t_chw_supply_c: f64,
    pub t_gpu_in_c: f64,
    pub t_air_in_c: f64,
    pub t_wb_ambient_c: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_db_ambient_c: Option<f64>,
    #[serde(default = "default_utilization")]
    pub utilization: f64,
    #[serde(default)]
    pub gpu: GpuDef,
    #[serde(default)]
    pub building: BuildingDef,
    pub chiller: ChillerDef,
    pub tower: TowerDef,
    #[serde(default)]
    pub pumps: PumpsDef,
    #[serde(default)]
    pub solver: SolverDef,
    #[serde(default)]
    pub properties: PropertiesDef,
}

fn default_scenario() -> String {
    "unnamed".to_string()
}

fn default_utilization() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GpuDef {
    #[serde(default = "default_gpu_model")]
    pub model: String,
    #[serde(default = "default_tdp")]
    pub tdp_per_gpu_w: f64,
    #[serde(default = "default_gpu_max_temp")]
    pub max_temp_c: f64,
}

fn default_gpu_model() -> String {
    "NVIDIA B200".to_string()
}

fn default_tdp() -> f64 {
    1200.0
}

fn default_gpu_max_temp() -> f64 {
    40.0
}

impl Default for GpuDef {
    fn default() -> Self {
        Self {
            model: default_gpu_model(),
            tdp_per_gpu_w: default_tdp(),
            max_temp_c: default_gpu_max_temp(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildingDef {
    #[serde(default = "default_building_max_temp")]
    pub max_temp_c: f64,
}

fn default_building_max_temp() -> f64 {
    25.0
}

impl Default for BuildingDef {
    fn default() -> Self {
        Self {
            max_temp_c: default_building_max_temp(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChillerKind {
    #[default]
    ThermodynamicCycle,
    CurveFit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChillerDef {
    #[serde(rename = "type", default)]
    pub kind: ChillerKind,
    #[serde(default = "default_rated_capacity")]
    pub rated_capacity_mw: f64,
    pub rated_cop: f64,
    #[serde(default = "default_refrigerant")]
    pub refrigerant: String,
    #[serde(default = "default_eta")]
    pub eta_isentropic: f64,
    #[serde(default = "default_superheat")]
    pub superheat_c: f64,
    #[serde(default = "default_subcool")]
    pub subcool_c: f64,
    #[serde(default = "default_effectiveness")]
    pub evap_effectiveness: f64,
    #[serde(default = "default_effectiveness")]
    pub cond_effectiveness: f64,
    #[serde(default = "default_min_pinch")]
    pub min_pinch_c: f64,
    #[serde(default = "default_max_pinch")]
    pub max_pinch_c: f64,
    #[serde(default = "default_widen_step")]
    pub widen_step_c: f64,
    #[serde(default = "default_tighten_step")]
    pub tighten_step_c: f64,
    #[serde(default = "default_chiller_tolerance")]
    pub tolerance_c: f64,
    #[serde(default = "default_chiller_iterations")]
    pub max_iterations: usize,
    /// Biquadratic EIR(T_chw, T_cw) coefficients, curve-fit model only.
    #[serde(default = "default_eir_ft")]
    pub eir_ft: [f64; 6],
    /// Quadratic EIR(PLR) coefficients, curve-fit model only.
    #[serde(default = "default_eir_fplr")]
    pub eir_fplr: [f64; 3],
}

fn default_rated_capacity() -> f64 {
    1000.0
}

fn default_refrigerant() -> String {
    "R134a".to_string()
}

fn default_eta() -> f64 {
    0.80
}

fn default_superheat() -> f64 {
    5.0
}

fn default_subcool() -> f64 {
    3.0
}

fn default_effectiveness() -> f64 {
    0.85
}

fn default_min_pinch() -> f64 {
    3.0
}

fn default_max_pinch() -> f64 {
    8.0
}

fn default_widen_step() -> f64 {
    0.5
}

fn default_tighten_step() -> f64 {
    0.3
}

fn default_chiller_tolerance() -> f64 {
    0.1
}

fn default_chiller_iterations() -> usize {
    20
}

fn default_eir_ft() -> [f64; 6] {
    [0.5961915, -0.0099496, 0.0007888, -0.0004506, 0.0004875, -0.0007623]
}

fn default_eir_fplr() -> [f64; 3] {
    [0.17149273, 0.58820208, 0.23737257]
}

impl ChillerDef {
    /// Cycle-based chiller with every optional field at its default.
    pub fn with_rated_cop(rated_cop: f64) -> Self {
        Self {
            kind: ChillerKind::default(),
            rated_capacity_mw: default_rated_capacity(),
            rated_cop,
            refrigerant: default_refrigerant(),
            eta_isentropic: default_eta(),
            superheat_c: default_superheat(),
            subcool_c: default_subcool(),
            evap_effectiveness: default_effectiveness(),
            cond_effectiveness: default_effectiveness(),
            min_pinch_c: default_min_pinch(),
            max_pinch_c: default_max_pinch(),
            widen_step_c: default_widen_step(),
            tighten_step_c: default_tighten_step(),
            tolerance_c: default_chiller_tolerance(),
            max_iterations: default_chiller_iterations(),
            eir_ft: default_eir_ft(),
            eir_fplr: default_eir_fplr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CyclesDef {
    Constant {
        coc: f64,
    },
    SilicaLimited {
        #[serde(default = "default_makeup_silica")]
        makeup_silica_ppm: f64,
        #[serde(default = "default_max_silica")]
        max_silica_ppm: f64,
    },
}

fn default_makeup_silica() -> f64 {
    25.0
}

fn default_max_silica() -> f64 {
    150.0
}

impl CyclesDef {
    /// Cycles of concentration implied by this definition.
    pub fn coc(&self) -> f64 {
        match self {
            CyclesDef::Constant { coc } => *coc,
            CyclesDef::SilicaLimited {
                makeup_silica_ppm,
                max_silica_ppm,
            } => max_silica_ppm / makeup_silica_ppm,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TowerDef {
    pub approach_c: f64,
    pub cycles: CyclesDef,
    #[serde(default = "default_drift")]
    pub drift_rate: f64,
    #[serde(default = "default_air_to_water")]
    pub air_to_water_ratio: f64,
    #[serde(default = "default_fan_fraction")]
    pub fan_power_fraction: f64,
    #[serde(default = "default_wb_depression")]
    pub wet_bulb_depression_c: f64,
    #[serde(default = "default_outlet_rh")]
    pub outlet_rh: f64,
    #[serde(default = "default_residual_warning")]
    pub residual_warning: f64,
}

fn default_drift() -> f64 {
    1e-5
}

fn default_air_to_water() -> f64 {
    1.2
}

fn default_fan_fraction() -> f64 {
    0.007
}

fn default_wb_depression() -> f64 {
    10.0
}

fn default_outlet_rh() -> f64 {
    0.95
}

fn default_residual_warning() -> f64 {
    0.15
}

impl TowerDef {
    pub fn new(approach_c: f64, cycles: CyclesDef) -> Self {
        Self {
            approach_c,
            cycles,
            drift_rate: default_drift(),
            air_to_water_ratio: default_air_to_water(),
            fan_power_fraction: default_fan_fraction(),
            wet_bulb_depression_c: default_wb_depression(),
            outlet_rh: default_outlet_rh(),
            residual_warning: default_residual_warning(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PumpsDef {
    pub chw_fraction: f64,
    pub cw_fraction: f64,
    pub gpu_fraction: f64,
}

impl Default for PumpsDef {
    fn default() -> Self {
        Self {
            chw_fraction: 0.03,
            cw_fraction: 0.02,
            gpu_fraction: 0.015,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverDef {
    pub max_iterations: usize,
    pub tolerance_c: f64,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance_c: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BackendDef {
    #[default]
    #[serde(rename = "coolprop")]
    CoolProp,
    #[serde(rename = "correlation")]
    Correlation,
    #[serde(rename = "unavailable")]
    Unavailable,
}

/// Humid-air property source for the tower.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AirBackendDef {
    #[default]
    #[serde(rename = "ashrae")]
    Ashrae,
    #[serde(rename = "coolprop")]
    CoolProp,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PropertiesDef {
    #[serde(default)]
    pub backend: BackendDef,
    #[serde(default)]
    pub humid_air: AirBackendDef,
}
