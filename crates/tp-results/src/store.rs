//! Run storage API.
//!
//! ```text
//! <root>/<run_id>/manifest.json
//! <root>/<run_id>/<scenario>_results.json
//! <root>/<run_id>/timeseries.jsonl        (weather runs)
//! ```

use crate::types::RunManifest;
use crate::{ResultsError, ResultsResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST: &str = "manifest.json";
const TIMESERIES: &str = "timeseries.jsonl";

#[derive(Debug, Clone)]
pub struct ResultsStore {
    root_dir: PathBuf,
}

impl ResultsStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        fs::create_dir_all(&root_dir)?;
        Ok(Self { root_dir })
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    pub fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join(MANIFEST).exists()
    }

    /// Write the manifest, the pretty-printed document and, when `records`
    /// is non-empty, one JSON line per record. Returns the document path.
    pub fn save_run<D, R>(&self, manifest: &RunManifest, document: &D, records: &[R]) -> ResultsResult<PathBuf>
    where
        D: Serialize + ?Sized,
        R: Serialize,
    {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        let mut manifest = manifest.clone();
        manifest.has_timeseries = !records.is_empty();
        fs::write(run_dir.join(MANIFEST), serde_json::to_string_pretty(&manifest)?)?;

        let document_path = run_dir.join(&manifest.document);
        fs::write(&document_path, serde_json::to_string_pretty(document)?)?;

        if manifest.has_timeseries {
            let mut content = String::new();
            for record in records {
                content.push_str(&serde_json::to_string(record)?);
                content.push('\n');
            }
            fs::write(run_dir.join(TIMESERIES), content)?;
        }

        Ok(document_path)
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let path = self.run_dir(run_id).join(MANIFEST);
        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    pub fn load_document<D: DeserializeOwned>(&self, run_id: &str) -> ResultsResult<D> {
        let manifest = self.load_manifest(run_id)?;
        let content = fs::read_to_string(self.run_dir(run_id).join(&manifest.document))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_timeseries<R: DeserializeOwned>(&self, run_id: &str) -> ResultsResult<Vec<R>> {
        let manifest = self.load_manifest(run_id)?;
        if !manifest.has_timeseries {
            return Err(ResultsError::MissingArtifact {
                run_id: run_id.to_string(),
                what: "time series",
            });
        }
        let content = fs::read_to_string(self.run_dir(run_id).join(TIMESERIES))?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(ResultsError::from))
            .collect()
    }

    /// Manifests under the root, optionally restricted to one scenario,
    /// oldest first.
    pub fn list_runs(&self, scenario: Option<&str>) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let run_id = entry.file_name().to_string_lossy().to_string();
            if let Ok(manifest) = self.load_manifest(&run_id)
                && scenario.is_none_or(|s| manifest.scenario == s)
            {
                runs.push(manifest);
            }
        }
        runs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
