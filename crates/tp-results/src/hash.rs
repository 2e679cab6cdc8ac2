//! Content-based hashing for run IDs.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 over the serialized inputs, run kind and solver version.
///
/// Identical configuration and kind give the same id, so a rerun replaces
/// the earlier result directory.
pub fn compute_run_id<T: Serialize + ?Sized>(
    inputs: &T,
    kind: &crate::types::RunKind,
    solver_version: &str,
) -> String {
    let mut hasher = Sha256::new();

    let inputs_json = serde_json::to_string(inputs).unwrap_or_default();
    hasher.update(inputs_json.as_bytes());

    let kind_json = serde_json::to_string(kind).unwrap_or_default();
    hasher.update(kind_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    format!("{:x}", hasher.finalize())
}
