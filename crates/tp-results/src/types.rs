//! Result data types.

use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub scenario: String,
    /// RFC 3339, UTC
    pub created_at: String,
    pub kind: RunKind,
    pub solver_version: String,
    /// Result document file name inside the run directory.
    pub document: String,
    #[serde(default)]
    pub has_timeseries: bool,
}

impl RunManifest {
    /// Manifest stamped with the current time.
    pub fn new(run_id: RunId, scenario: impl Into<String>, kind: RunKind, solver_version: impl Into<String>) -> Self {
        let scenario = scenario.into();
        Self {
            document: format!("{scenario}_results.json"),
            run_id,
            scenario,
            created_at: chrono::Utc::now().to_rfc3339(),
            kind,
            solver_version: solver_version.into(),
            has_timeseries: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunKind {
    Single { utilization: f64, t_wb_c: f64 },
    Comparison,
    Weather { points: usize },
}

impl RunKind {
    pub fn label(&self) -> &'static str {
        match self {
            RunKind::Single { .. } => "single",
            RunKind::Comparison => "comparison",
            RunKind::Weather { .. } => "weather",
        }
    }
}
