//! Fluid property errors.

use thiserror::Error;
use tp_core::TpError;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during refrigerant or humid-air property evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value out of the valid range of a correlation.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Operation not supported (fluid, property pair).
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    /// The requested state does not exist (below triple point, quality above
    /// the critical pressure, ...).
    #[error("Infeasible state: {message}")]
    Infeasible { message: String },

    /// Backend (CoolProp) error.
    #[error("Backend error: {message}")]
    Backend { message: String },

    /// Convergence failure (e.g., inverting saturation pressure).
    #[error("Convergence failed for {what}")]
    ConvergenceFailed { what: &'static str },

    /// No property backend is configured.
    #[error("Property backend unavailable: {what}")]
    Unavailable { what: &'static str },
}

impl FluidError {
    /// True when the inputs describe a state that cannot exist, as opposed to a
    /// backend or configuration failure.
    pub fn is_infeasible(&self) -> bool {
        matches!(
            self,
            FluidError::Infeasible { .. } | FluidError::OutOfRange { .. }
        )
    }
}

impl From<FluidError> for TpError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::NonPhysical { what } => TpError::Invariant { what },
            FluidError::OutOfRange { what } => TpError::InvalidArg { what },
            FluidError::InvalidArg { what } => TpError::InvalidArg { what },
            FluidError::NotSupported { what } => TpError::InvalidArg { what },
            FluidError::Infeasible { .. } => TpError::InvalidArg {
                what: "infeasible thermodynamic state",
            },
            FluidError::Backend { .. } => TpError::Invariant {
                what: "fluid backend error",
            },
            FluidError::ConvergenceFailed { what } => TpError::Invariant { what },
            FluidError::Unavailable { what } => TpError::InvalidArg { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::NonPhysical { what: "pressure" };
        assert!(err.to_string().contains("pressure"));

        let err = FluidError::Backend {
            message: "CoolProp failed".into(),
        };
        assert!(err.to_string().contains("CoolProp"));
    }

    #[test]
    fn infeasible_is_distinguishable() {
        let err = FluidError::Infeasible {
            message: "T below triple point".into(),
        };
        assert!(err.is_infeasible());
        assert!(!FluidError::Unavailable { what: "none" }.is_infeasible());
    }

    #[test]
    fn error_to_tp_error() {
        let fluid_err = FluidError::NotSupported { what: "R32 correlation" };
        let tp_err: TpError = fluid_err.into();
        assert!(matches!(tp_err, TpError::InvalidArg { .. }));
    }
}
