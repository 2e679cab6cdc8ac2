//! tp-components: plant component models for thermoplant.
//!
//! Provides:
//! - A counterflow heat-exchanger energy-balance bridge
//! - The vapor-compression refrigeration cycle
//! - Chillers behind the [`ChillerModel`] capability (full cycle with pinch
//!   correction, or curve fit)
//! - A psychrometric cooling tower with a pluggable cycles-of-concentration source
//! - GPU and building heat-load models
//!
//! Property evaluation is injected: cycles take an `Arc<dyn RefrigerantOracle>`
//! and towers an `Arc<dyn HumidAirOracle>`.
//!
//! # Example
//!
//! ```no_run
//! use tp_components::{
//!     ChillerModel, ChillerRating, CycleChiller, CycleParams, EffectivenessTargets,
//!     PinchControl, VaporCompressionCycle,
//! };
//! use tp_fluids::{PropertyBackend, Refrigerant, build_oracle};
//!
//! let cycle = VaporCompressionCycle::new(
//!     build_oracle(PropertyBackend::CoolProp),
//!     Refrigerant::R134a,
//!     CycleParams::default(),
//! )
//! .unwrap();
//! let rating = ChillerRating { rated_capacity: 1.0e9, rated_cop: 6.1, t_chw_supply: 10.0 };
//! let chiller = CycleChiller::new(rating, cycle, PinchControl::default(), EffectivenessTargets::default())
//!     .unwrap();
//! let sol = chiller.solve_energy_balance(1.0e9, 47_800.0, 50_000.0, 29.5).unwrap();
//! println!("COP = {:.2}", sol.cop);
//! ```

pub mod chiller;
pub mod common;
pub mod cycle;
pub mod diagnostics;
pub mod error;
pub mod hx;
pub mod loads;
pub mod tower;

pub use chiller::{
    ChillerModel, ChillerRating, ChillerSolution, CurveFitChiller, CycleChiller, EffectivenessTargets,
    EirPartLoadCurve, EirTemperatureCurve, PinchControl,
};
pub use cycle::{CycleParams, CycleResult, VaporCompressionCycle};
pub use diagnostics::Diagnostic;
pub use error::{ComponentError, ComponentResult};
pub use hx::{CounterflowHx, HxSolution, Stream};
pub use loads::{BuildingLoad, GpuLoad, LoadModel, LoadSummary};
pub use tower::{
    CocProvider, ConstantCoc, CoolingTower, SilicaLimitedCoc, TowerParams, TowerSolution, WaterSavings,
    blowdown_fraction,
};
