//! Shared application service layer for thermoplant.
//!
//! Front ends go through this crate to load configurations, build the plant,
//! run single scenarios, baseline-vs-optimized comparisons and weather time
//! series, and persist results.

pub mod compare;
pub mod error;
pub mod project_service;
pub mod query;
pub mod run_service;
pub mod runtime_build;
pub mod weather_service;

pub use compare::{ComparisonMetrics, ComparisonReport, WATER_PER_PERSON_M3, compare_scenarios};
pub use error::{AppError, AppResult};
pub use project_service::{load_plant_config, load_weather, validation_messages};
pub use query::{StateQuery, StateReport, humid_air_state, refrigerant_state};
pub use run_service::{RunOptions, ScenarioReport, list_runs, run_checks, run_scenario};
pub use runtime_build::{
    build_chiller, build_plant, build_plant_with_oracle, build_tower, property_backend,
    solve_options,
};
pub use weather_service::{WeatherPointResult, WeatherReport, WeatherSummary, run_weather_series};
