//! Error types for component operations.

use thiserror::Error;
use tp_core::error::TpError;
use tp_fluids::FluidError;

/// Errors that can occur during component calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    /// The property oracle could not resolve a state; the fluid error is kept as-is.
    #[error("Property evaluation failed at {stage}: {source}")]
    Property {
        stage: &'static str,
        #[source]
        source: FluidError,
    },

    #[error(
        "Chiller did not converge after {iterations} iterations \
         (last ΔT_evap={delta_evap:.3} °C, ΔT_cond={delta_cond:.3} °C)"
    )]
    NonConvergence {
        iterations: usize,
        delta_evap: f64,
        delta_cond: f64,
    },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl ComponentError {
    /// Closure tagging a fluid error with the cycle or tower stage that raised it.
    pub fn at(stage: &'static str) -> impl FnOnce(FluidError) -> ComponentError {
        move |source| ComponentError::Property { stage, source }
    }
}

impl From<ComponentError> for TpError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::InvalidArg { what } => TpError::InvalidArg { what },
            ComponentError::OutOfRange { what, .. } => TpError::InvalidArg { what },
            ComponentError::NonPhysical { what } => TpError::Invariant { what },
            ComponentError::Property { source, .. } => source.into(),
            ComponentError::NonConvergence { .. } => TpError::Invariant {
                what: "chiller non-convergence",
            },
        }
    }
}
