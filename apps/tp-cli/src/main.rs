use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tp_app::{
    AppError, AppResult, ComparisonReport, RunOptions, ScenarioReport, StateQuery, WeatherReport,
    compare_scenarios, humid_air_state, load_plant_config, load_weather, refrigerant_state,
    run_scenario, run_weather_series, validation_messages,
};
use tp_core::units::{celsius_to_fahrenheit, fahrenheit_to_celsius, mw_to_tons, tons_to_mw};
use tp_fluids::{AirBackend, PropertyBackend};
use tp_project::{BackendDef, PlantConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tp-cli")]
#[command(about = "ThermoPlant CLI - datacenter chiller and cooling tower plant model", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one scenario at steady state
    Run {
        /// Path to the plant configuration (YAML or JSON)
        config: PathBuf,
        /// IT utilization in (0, 1]; overrides the configuration
        #[arg(long)]
        utilization: Option<f64>,
        /// Ambient wet bulb [°C]; overrides the configuration
        #[arg(long)]
        wet_bulb: Option<f64>,
        /// Property backend; overrides the configuration
        #[arg(long, value_enum)]
        backend: Option<Backend>,
        /// Directory for result files
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip configuration validation and post-solve checks
        #[arg(long)]
        no_validate: bool,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare a baseline and an optimized scenario
    Compare {
        baseline: PathBuf,
        optimized: PathBuf,
        #[arg(long, value_enum)]
        backend: Option<Backend>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Solve a scenario at every point of a weather CSV
    Weather {
        config: PathBuf,
        /// CSV with a wet-bulb column
        csv: PathBuf,
        #[arg(long, value_enum)]
        backend: Option<Backend>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a configuration and list every violated range
    Validate { config: PathBuf },
    /// Refrigerant state from exactly two properties
    State {
        /// Refrigerant name, e.g. R134a
        fluid: String,
        /// Pressure [kPa]
        #[arg(long)]
        p: Option<f64>,
        /// Temperature [°C]
        #[arg(long)]
        t: Option<f64>,
        /// Specific enthalpy [kJ/kg]
        #[arg(long)]
        h: Option<f64>,
        /// Specific entropy [kJ/(kg·K)]
        #[arg(long)]
        s: Option<f64>,
        /// Vapor quality [0, 1]
        #[arg(long)]
        q: Option<f64>,
        #[arg(long, value_enum, default_value_t = Backend::Coolprop)]
        backend: Backend,
    },
    /// Moist-air state from dry bulb and wet bulb or relative humidity
    Psychro {
        /// Dry bulb [°C]
        #[arg(long)]
        tdb: f64,
        /// Wet bulb [°C]
        #[arg(long, conflicts_with = "rh")]
        twb: Option<f64>,
        /// Relative humidity [0, 1]
        #[arg(long)]
        rh: Option<f64>,
        #[arg(long, value_enum, default_value_t = AirModel::Ashrae)]
        backend: AirModel,
    },
    /// Convert temperature or power units
    Convert {
        value: f64,
        #[arg(value_enum)]
        from: Unit,
        #[arg(value_enum)]
        to: Unit,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    Coolprop,
    Correlation,
    Unavailable,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AirModel {
    Ashrae,
    Coolprop,
}

impl AirModel {
    fn backend(self) -> AirBackend {
        match self {
            AirModel::Ashrae => AirBackend::Ashrae,
            AirModel::Coolprop => AirBackend::CoolProp,
        }
    }
}

impl Backend {
    fn def(self) -> BackendDef {
        match self {
            Backend::Coolprop => BackendDef::CoolProp,
            Backend::Correlation => BackendDef::Correlation,
            Backend::Unavailable => BackendDef::Unavailable,
        }
    }

    fn oracle(self) -> PropertyBackend {
        tp_app::property_backend(self.def())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Unit {
    C,
    F,
    Mw,
    Tons,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            utilization,
            wet_bulb,
            backend,
            output,
            no_validate,
            json,
        } => cmd_run(&config, utilization, wet_bulb, backend, output, !no_validate, json),
        Commands::Compare {
            baseline,
            optimized,
            backend,
            output,
        } => cmd_compare(&baseline, &optimized, backend, output),
        Commands::Weather {
            config,
            csv,
            backend,
            output,
        } => cmd_weather(&config, &csv, backend, output),
        Commands::Validate { config } => cmd_validate(&config),
        Commands::State {
            fluid,
            p,
            t,
            h,
            s,
            q,
            backend,
        } => cmd_state(
            &fluid,
            backend,
            StateQuery {
                p_kpa: p,
                t_c: t,
                h_kj_kg: h,
                s_kj_kg_k: s,
                quality: q,
            },
        ),
        Commands::Psychro { tdb, twb, rh, backend } => cmd_psychro(backend, tdb, twb, rh),
        Commands::Convert { value, from, to } => cmd_convert(value, from, to),
    }
}

fn load(path: &Path, backend: Option<Backend>, validate: bool) -> AppResult<PlantConfig> {
    let mut config = load_plant_config(path, validate)?;
    if let Some(backend) = backend {
        config.properties.backend = backend.def();
    }
    tracing::debug!(path = %path.display(), scenario = %config.scenario, "loaded configuration");
    Ok(config)
}

fn cmd_run(
    path: &Path,
    utilization: Option<f64>,
    wet_bulb: Option<f64>,
    backend: Option<Backend>,
    output: Option<PathBuf>,
    validate: bool,
    json: bool,
) -> AppResult<()> {
    let mut config = load(path, backend, validate)?;
    if let Some(u) = utilization {
        config.utilization = u;
    }
    if let Some(t_wb) = wet_bulb {
        config.t_wb_ambient_c = t_wb;
    }

    let options = RunOptions {
        validate,
        check: validate,
        output_dir: output,
        ..RunOptions::default()
    };
    let report = run_scenario(&config, &options)?;

    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::Results(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    print_scenario(&report);
    if let Some(checks) = &report.checks {
        println!();
        for outcome in &checks.outcomes {
            let mark = if outcome.passed { "✓" } else { "✗" };
            println!("  {mark} {:<36} {}", outcome.name, outcome.detail);
        }
    }
    if let Some(path) = &report.saved_to {
        println!("\nResults saved to: {}", path.display());
    }
    Ok(())
}

fn print_scenario(report: &ScenarioReport) {
    let s = &report.solution;
    println!("Scenario: {}", report.scenario);
    println!(
        "  Outer loop: {} after {} iterations (max ΔT {:.4} °C)",
        if s.converged { "converged" } else { "NOT converged" },
        s.iterations,
        s.max_change_c
    );
    println!("  Utilization:        {:>10.0} %", s.utilization * 100.0);
    println!("  Ambient wet bulb:   {:>10.1} °C", s.t_wb_c);
    println!("  IT load:            {:>10.1} MW", s.p_it_w / 1e6);
    println!("  Compressor:         {:>10.1} MW", s.w_comp_w / 1e6);
    println!("  Pumps:              {:>10.1} MW", s.w_pumps_w / 1e6);
    println!("  Tower fans:         {:>10.1} MW", s.w_fans_w / 1e6);
    println!("  Chiller COP:        {:>10.2}", s.cop);
    println!(
        "  T_evap / T_cond:    {:>6.1} / {:.1} °C",
        s.chiller.t_evap_sat_c, s.chiller.t_cond_sat_c
    );
    println!("  PUE:                {:>10.4}", report.pue);
    println!("  WUE:                {:>10.3} L/kWh", report.wue);
    println!(
        "  Makeup water:       {:>10.1} kg/s ({:.0} L/hr)",
        s.m_makeup_kg_s,
        s.tower.makeup_l_per_hr()
    );
    println!("  Blowdown:           {:>10.1} kg/s (COC {:.1})", s.m_blowdown_kg_s, s.coc);
    println!(
        "  GPU outlet:         {:>10.1} °C (limit {:.1})",
        s.t_gpu_out_c, s.gpu_max_temp_c
    );
    println!(
        "  Building air out:   {:>10.1} °C (limit {:.1})",
        s.t_air_out_c, s.building_max_temp_c
    );
    for diagnostic in &s.diagnostics {
        println!("  ! {diagnostic}");
    }
}

fn cmd_compare(
    baseline: &Path,
    optimized: &Path,
    backend: Option<Backend>,
    output: Option<PathBuf>,
) -> AppResult<()> {
    let base = load(baseline, backend, true)?;
    let opt = load(optimized, backend, true)?;
    let options = RunOptions {
        output_dir: output,
        ..RunOptions::default()
    };
    let report = compare_scenarios(&base, &opt, &options)?;
    print_comparison(&report);
    Ok(())
}

fn print_comparison(report: &ComparisonReport) {
    let c = &report.comparison;
    let b = &report.baseline.solution;
    let o = &report.optimized.solution;
    println!("{:<28} {:>14} {:>14} {:>12}", "Metric", "Baseline", "Optimized", "Change");
    println!("{}", "-".repeat(71));
    println!(
        "{:<28} {:>14.1} {:>14.1} {:>+11.1}%",
        "COC",
        c.coc_baseline,
        c.coc_optimized,
        (c.coc_optimized - c.coc_baseline) / c.coc_baseline * 100.0
    );
    println!(
        "{:<28} {:>14.4} {:>14.4} {:>+12.4}",
        "PUE",
        c.pue_baseline,
        c.pue_optimized,
        c.pue_optimized - c.pue_baseline
    );
    println!(
        "{:<28} {:>14.3} {:>14.3} {:>+12.4}",
        "WUE (L/kWh)",
        c.wue_baseline,
        c.wue_optimized,
        c.wue_optimized - c.wue_baseline
    );
    println!(
        "{:<28} {:>14.1} {:>14.1} {:>+11.1}%",
        "Makeup water (kg/s)", c.makeup_baseline_kg_s, c.makeup_optimized_kg_s, -c.water_savings_pct
    );
    println!(
        "{:<28} {:>14.1} {:>14.1}",
        "Evaporation (kg/s)", b.m_evap_kg_s, o.m_evap_kg_s
    );
    println!(
        "{:<28} {:>14.1} {:>14.1} {:>+11.1}%",
        "Blowdown (kg/s)", b.m_blowdown_kg_s, o.m_blowdown_kg_s, -c.blowdown_reduction_pct
    );
    println!();
    println!("Annual water savings:  {:>14.0} m³/year", c.annual_water_savings_m3);
    println!("People equivalent:     {:>14.0}", c.people_equivalent);
    if let Some(limit) = c.silica.max_silica_limit_ppm {
        println!(
            "Silica limit {:.0} ppm allows COC {:.1}: blowdown -{:.1}% vs COC {:.1}",
            limit, c.silica.optimized_coc, c.silica.blowdown_reduction_pct, c.silica.baseline_coc
        );
    }
}

fn cmd_weather(
    config: &Path,
    csv: &Path,
    backend: Option<Backend>,
    output: Option<PathBuf>,
) -> AppResult<()> {
    let config = load(config, backend, true)?;
    let series = load_weather(csv)?;
    let (min, max) = series.wet_bulb_range();
    println!(
        "Weather data: {} points, wet bulb {:.1}-{:.1} °C (avg {:.1})",
        series.len(),
        min,
        max,
        series.average_wet_bulb()
    );

    let options = RunOptions {
        output_dir: output,
        ..RunOptions::default()
    };
    let report = run_weather_series(&config, &series, &options)?;
    print_weather(&report);
    Ok(())
}

fn print_weather(report: &WeatherReport) {
    println!("\n{:<20} {:>8} {:>8} {:>8} {:>12}", "Timestamp", "T_wb", "PUE", "COP", "Makeup kg/s");
    for point in &report.data {
        println!(
            "{:<20} {:>8.1} {:>8.4} {:>8.2} {:>12.1}{}",
            point.timestamp,
            point.t_wb_c,
            point.pue,
            point.cop,
            point.m_makeup_kg_s,
            if point.converged { "" } else { "  (not converged)" }
        );
    }
    let s = &report.summary;
    println!();
    println!("Average PUE:           {:.4}", s.avg_pue);
    println!("Average chiller COP:   {:.2}", s.avg_cop);
    println!(
        "Average makeup water:  {:.1} kg/s ({:.0} L/hr)",
        s.avg_makeup_kg_s,
        s.avg_makeup_kg_s * 3600.0
    );
    println!("Total makeup water:    {:.0} m³", s.total_water_m3);
}

fn cmd_validate(path: &Path) -> AppResult<()> {
    println!("Validating configuration: {}", path.display());
    let config = load_plant_config(path, false)?;
    let messages = validation_messages(&config);
    if messages.is_empty() {
        println!("✓ Configuration is valid");
        return Ok(());
    }
    for message in &messages {
        println!("  ✗ {message}");
    }
    Err(AppError::Validation(format!("{} violation(s)", messages.len())))
}

fn cmd_state(fluid: &str, backend: Backend, query: StateQuery) -> AppResult<()> {
    let state = refrigerant_state(fluid, backend.oracle(), &query)?;
    println!("{} ({})", state.fluid, state.backend);
    println!("  p   = {:>12.3} kPa", state.p_kpa);
    println!("  T   = {:>12.3} °C", state.t_c);
    println!("  h   = {:>12.3} kJ/kg", state.h_kj_kg);
    println!("  s   = {:>12.5} kJ/(kg·K)", state.s_kj_kg_k);
    println!("  rho = {:>12.4} kg/m³", state.rho_kg_m3);
    if let Some(x) = state.quality {
        println!("  x   = {x:>12.4}");
    }
    println!("  phase: {}", state.phase);
    Ok(())
}

fn cmd_psychro(backend: AirModel, t_db: f64, t_wb: Option<f64>, rh: Option<f64>) -> AppResult<()> {
    let air = humid_air_state(backend.backend(), t_db, t_wb, rh)?;
    println!("  T_db = {:>10.2} °C", air.t_db);
    println!("  W    = {:>10.5} kg/kg dry air", air.w);
    println!("  RH   = {:>10.1} %", air.rh * 100.0);
    println!("  h    = {:>10.2} kJ/kg dry air", air.h / 1000.0);
    println!("  rho  = {:>10.4} kg/m³", air.rho);
    Ok(())
}

fn cmd_convert(value: f64, from: Unit, to: Unit) -> AppResult<()> {
    let converted = match (from, to) {
        (a, b) if a == b => value,
        (Unit::C, Unit::F) => celsius_to_fahrenheit(value),
        (Unit::F, Unit::C) => fahrenheit_to_celsius(value),
        (Unit::Mw, Unit::Tons) => mw_to_tons(value),
        (Unit::Tons, Unit::Mw) => tons_to_mw(value),
        _ => {
            return Err(AppError::InvalidInput(format!(
                "cannot convert {from:?} to {to:?}"
            )));
        }
    };
    println!("{converted}");
    Ok(())
}
