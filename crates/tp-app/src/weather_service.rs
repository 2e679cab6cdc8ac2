//! Weather time series: one steady-state solve per weather point.
//!
//! Points are independent, so they are solved in parallel, each with its
//! own plant built from the same configuration and one shared property
//! oracle. Results keep the input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tp_core::constants::SECONDS_PER_HOUR;
use tp_fluids::{RefrigerantOracle, build_oracle};
use tp_project::{PlantConfig, WeatherPoint, WeatherSeries, validate_config};
use tp_results::RunKind;

use crate::error::{AppError, AppResult};
use crate::run_service::{RunOptions, save_document};
use crate::runtime_build::{build_plant_with_oracle, property_backend, solve_options};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPointResult {
    pub index: usize,
    pub timestamp: String,
    pub t_wb_c: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_db_c: Option<f64>,
    pub converged: bool,
    pub iterations: usize,
    pub pue: f64,
    pub wue: f64,
    pub cop: f64,
    pub w_cooling_w: f64,
    pub m_makeup_kg_s: f64,
    pub t_cw_from_tower_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub num_points: usize,
    pub unconverged_points: usize,
    pub avg_pue: f64,
    pub avg_cop: f64,
    pub avg_makeup_kg_s: f64,
    /// Makeup over the series, each point standing for one hour [m³].
    pub total_water_m3: f64,
    pub t_wb_min_c: f64,
    pub t_wb_max_c: f64,
    pub t_wb_avg_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub scenario: String,
    pub summary: WeatherSummary,
    pub data: Vec<WeatherPointResult>,
    pub solve_time_s: f64,
}

/// Configuration for one weather point: its wet bulb replaces the design
/// value, and its dry bulb (when present) the configured one. A configured
/// dry bulb colder than the point's wet bulb is dropped so the tower
/// estimates one instead.
fn point_config(config: &PlantConfig, point: &WeatherPoint) -> PlantConfig {
    let mut cfg = config.clone();
    cfg.t_wb_ambient_c = point.t_wb_c;
    cfg.t_db_ambient_c = point.t_db_c.or_else(|| {
        config.t_db_ambient_c.filter(|&t_db| {
            let usable = t_db >= point.t_wb_c;
            if !usable {
                tracing::debug!(
                    timestamp = %point.timestamp,
                    t_wb = point.t_wb_c,
                    t_db,
                    "configured dry bulb below point wet bulb, estimating"
                );
            }
            usable
        })
    });
    cfg
}

fn solve_point(
    config: &PlantConfig,
    oracle: Arc<dyn RefrigerantOracle>,
    index: usize,
    point: &WeatherPoint,
) -> AppResult<WeatherPointResult> {
    let cfg = point_config(config, point);
    let mut solver = build_plant_with_oracle(&cfg, oracle)?;
    let sol = solver
        .solve_steady_state(cfg.utilization, Some(point.t_wb_c), &solve_options(&cfg.solver))
        .map_err(|e| AppError::Solver(format!("weather point {index} ({}): {e}", point.timestamp)))?;

    tracing::debug!(index, t_wb = point.t_wb_c, pue = sol.pue, "weather point solved");
    Ok(WeatherPointResult {
        index,
        timestamp: point.timestamp.clone(),
        t_wb_c: point.t_wb_c,
        t_db_c: cfg.t_db_ambient_c,
        converged: sol.converged,
        iterations: sol.iterations,
        pue: sol.pue,
        wue: sol.wue,
        cop: sol.cop,
        w_cooling_w: sol.w_cooling_w,
        m_makeup_kg_s: sol.m_makeup_kg_s,
        t_cw_from_tower_c: sol.state.t8_cw_from_tower,
    })
}

fn mean(data: &[WeatherPointResult], f: impl Fn(&WeatherPointResult) -> f64) -> f64 {
    data.iter().map(f).sum::<f64>() / data.len() as f64
}

fn summarize(series: &WeatherSeries, data: &[WeatherPointResult]) -> WeatherSummary {
    let (t_wb_min_c, t_wb_max_c) = series.wet_bulb_range();
    WeatherSummary {
        num_points: data.len(),
        unconverged_points: data.iter().filter(|r| !r.converged).count(),
        avg_pue: mean(data, |r| r.pue),
        avg_cop: mean(data, |r| r.cop),
        avg_makeup_kg_s: mean(data, |r| r.m_makeup_kg_s),
        total_water_m3: data.iter().map(|r| r.m_makeup_kg_s * SECONDS_PER_HOUR).sum::<f64>() / 1000.0,
        t_wb_min_c,
        t_wb_max_c,
        t_wb_avg_c: series.average_wet_bulb(),
    }
}

/// Solve the plant at every point of `series`.
///
/// The first failing point (in input order) aborts the series.
pub fn run_weather_series(
    config: &PlantConfig,
    series: &WeatherSeries,
    options: &RunOptions,
) -> AppResult<WeatherReport> {
    if options.validate {
        validate_config(config)?;
    }
    if series.is_empty() {
        return Err(AppError::InvalidInput("weather series has no points".to_string()));
    }

    tracing::info!(
        scenario = %config.scenario,
        points = series.len(),
        wet_bulb_column = series.wet_bulb_column(),
        "running weather series"
    );

    let started = Instant::now();
    let oracle = build_oracle(property_backend(config.properties.backend));
    let data = series
        .points()
        .par_iter()
        .enumerate()
        .map(|(i, point)| solve_point(config, oracle.clone(), i, point))
        .collect::<AppResult<Vec<_>>>()?;

    let summary = summarize(series, &data);
    if summary.unconverged_points > 0 {
        tracing::warn!(
            unconverged = summary.unconverged_points,
            "some weather points hit the iteration cap"
        );
    }
    tracing::info!(avg_pue = summary.avg_pue, avg_cop = summary.avg_cop, "weather series complete");

    let report = WeatherReport {
        scenario: config.scenario.clone(),
        summary,
        data,
        solve_time_s: started.elapsed().as_secs_f64(),
    };

    if let Some(dir) = &options.output_dir {
        save_document(
            dir,
            &(config, series.points()),
            RunKind::Weather {
                points: report.data.len(),
            },
            "weather_series",
            &report,
            &report.data,
            options,
        )?;
    }

    Ok(report)
}
