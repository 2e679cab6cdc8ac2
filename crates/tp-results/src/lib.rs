//! tp-results: run manifests, result documents and time series on disk.

pub mod hash;
pub mod store;
pub mod types;

pub use hash::compute_run_id;
pub use store::ResultsStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Run {run_id} has no {what}")]
    MissingArtifact { run_id: String, what: &'static str },
}
