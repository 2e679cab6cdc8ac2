//! Plant equilibrium solver for a chiller-cooled datacenter.
//!
//! The chiller and cooling tower share the condenser-water loop; this crate
//! iterates the two until the loop temperatures settle, then derives
//! facility power, PUE and water use from the converged operating point.

pub mod checks;
pub mod error;
pub mod flows;
pub mod metrics;
pub mod plant;
pub mod state;

pub use checks::{CheckOutcome, CheckReport, ENERGY_BALANCE_TOLERANCE, check_constraints, check_energy_balance};
pub use error::{SolverError, SolverResult};
pub use flows::DesignFlows;
pub use metrics::{PumpFractions, annual_water_m3, pue, wue};
pub use plant::{OuterProgress, PlantSolution, PlantSolver, Setpoints, SolveOptions};
pub use state::PlantState;
