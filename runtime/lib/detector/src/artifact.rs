//! Persisted form of a fitted model.

use crate::error::Result;
use crate::features::FEATURE_NAMES;
use crate::forest::IsolationForest;
use crate::model::AnomalyModel;
use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const ARTIFACT_FORMAT: u32 = 1;

/// Artifact location shared by the trainer and the scoring service: next to
/// the scoring crate, independent of the working directory.
pub const DEFAULT_MODEL_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../scoring/model.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format: u32,
    pub feature_names: Vec<String>,
    pub trained_at: DateTime<Utc>,
    pub training_samples: usize,
    pub model: IsolationForest,
}

impl ModelArtifact {
    pub fn new(model: IsolationForest, training_samples: usize) -> Self {
        Self {
            format: ARTIFACT_FORMAT,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            trained_at: Utc::now(),
            training_samples,
            model,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec(self)?;
        fs::write(path, json)?;
        info!(path = %path.display(), "Model artifact written");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;

        if artifact.feature_names != FEATURE_NAMES {
            warn!(
                path = %path.display(),
                found = ?artifact.feature_names,
                "Artifact feature layout differs from the extractor; scores may be meaningless"
            );
        }

        Ok(artifact)
    }

    /// Loads `path` if it exists. A missing file is `Ok(None)`; any other
    /// failure is an error.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }
}

impl AnomalyModel for ModelArtifact {
    fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        self.model.fit(x)?;
        self.training_samples = x.nrows();
        self.trained_at = Utc::now();
        Ok(())
    }

    fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.model.decision_function(x)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<i32>> {
        self.model.predict(x)
    }
}
