//! Error types for the tp-app service layer.

use std::path::PathBuf;

/// Unified error for the CLI and any other front end. Backend errors are
/// flattened to their display text.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Project(String),

    #[error("Failed to read {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration validation failed: {0}")]
    Validation(String),

    #[error("Failed to build plant: {0}")]
    Build(String),

    #[error("Property evaluation failed: {0}")]
    Property(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Post-solve checks failed: {0}")]
    Checks(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tp-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<tp_project::ProjectError> for AppError {
    fn from(err: tp_project::ProjectError) -> Self {
        match err {
            tp_project::ProjectError::Validation(v) => AppError::Validation(v.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<tp_project::ValidationError> for AppError {
    fn from(err: tp_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<tp_fluids::FluidError> for AppError {
    fn from(err: tp_fluids::FluidError) -> Self {
        match err {
            tp_fluids::FluidError::InvalidArg { what } => AppError::InvalidInput(what.to_string()),
            other => AppError::Property(other.to_string()),
        }
    }
}

impl From<tp_components::ComponentError> for AppError {
    fn from(err: tp_components::ComponentError) -> Self {
        AppError::Build(err.to_string())
    }
}

impl From<tp_solver::SolverError> for AppError {
    fn from(err: tp_solver::SolverError) -> Self {
        match err {
            tp_solver::SolverError::ChecksFailed { failed } => AppError::Checks(failed.join("; ")),
            other => AppError::Solver(other.to_string()),
        }
    }
}

impl From<tp_results::ResultsError> for AppError {
    fn from(err: tp_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}
