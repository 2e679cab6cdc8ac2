//! Error types for plant solving.

use thiserror::Error;
use tp_components::ComponentError;
use tp_core::error::TpError;
use tp_fluids::FluidError;

/// Errors that can occur while solving the plant.
///
/// Outer-loop non-convergence is not an error: it is reported on
/// [`crate::PlantSolution::converged`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Checks failed: {}", failed.join("; "))]
    ChecksFailed { failed: Vec<String> },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        SolverError::InvalidInput { what: what.into() }
    }
}

impl From<SolverError> for TpError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::InvalidInput { .. } => TpError::InvalidArg { what: "plant input" },
            SolverError::Component(inner) => inner.into(),
            SolverError::Fluid(inner) => inner.into(),
            SolverError::ChecksFailed { .. } => TpError::Invariant {
                what: "post-solve checks",
            },
        }
    }
}
