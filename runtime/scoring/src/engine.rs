use crate::config::{Config, VerdictConfig};
use crate::models::{AnalysisReport, HealthStatus, ScoreResponse, Verdict};
use anyhow::{Context, Result};
use detector::{
    extract_features, AnomalyModel, ModelArtifact, RiskScale, SignatureEngine, ThreatCategory,
};
use std::path::Path;
use tracing::{info, warn};

pub struct ScoringEngine {
    model: Option<ModelArtifact>,
    scale: RiskScale,
    signatures: SignatureEngine,
    verdicts: VerdictConfig,
}

impl ScoringEngine {
    pub fn new(model: Option<ModelArtifact>, verdicts: VerdictConfig) -> Self {
        Self {
            model,
            scale: RiskScale::default(),
            signatures: SignatureEngine::new(),
            verdicts,
        }
    }

    /// Reads the artifact once. A missing file leaves the engine unloaded;
    /// a present but unreadable one is fatal.
    pub fn load(config: &Config) -> Result<Self> {
        let path = Path::new(&config.model.path);
        let model = ModelArtifact::load_optional(path)
            .with_context(|| format!("Failed to load model artifact {}", path.display()))?;

        match &model {
            Some(artifact) => info!(
                path = %path.display(),
                trained_at = %artifact.trained_at,
                samples = artifact.training_samples,
                "Model loaded"
            ),
            None => warn!(
                path = %path.display(),
                "Model artifact not found, serving degraded scores. Run the trainer first."
            ),
        }

        Ok(Self::new(model, config.verdict.clone()))
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn score(&self, features: &[f64]) -> detector::Result<ScoreResponse> {
        let Some(model) = &self.model else {
            return Ok(ScoreResponse::unloaded());
        };

        let raw = model.decision_value(features)?;
        let is_anomaly = model.is_outlier(features)?;

        Ok(ScoreResponse {
            risk: self.scale.risk(raw),
            is_anomaly,
            score: Some(raw),
            message: None,
        })
    }

    pub fn analyze(&self, payload: &str) -> detector::Result<AnalysisReport> {
        let features = extract_features(payload);
        let scored = self.score(&features.to_array())?;
        let threat_type = self.signatures.detect(payload);

        Ok(AnalysisReport {
            features,
            risk: scored.risk,
            is_anomaly: scored.is_anomaly,
            score: scored.score,
            verdict: self.verdict(scored.risk, scored.is_anomaly, threat_type),
            threat_type,
            message: scored.message,
        })
    }

    /// A signature hit blocks regardless of model state.
    fn verdict(&self, risk: f64, is_anomaly: bool, threat: Option<ThreatCategory>) -> Verdict {
        if threat.is_some() || risk > self.verdicts.block_threshold {
            Verdict::Blocked
        } else if is_anomaly || risk > self.verdicts.anomaly_threshold {
            Verdict::Anomaly
        } else {
            Verdict::Normal
        }
    }

    pub fn health(&self, model_path: &str) -> HealthStatus {
        HealthStatus {
            service: "Scoring Service Online",
            model_loaded: self.is_loaded(),
            model_path: model_path.to_string(),
            trained_at: self.model.as_ref().map(|m| m.trained_at),
            training_samples: self.model.as_ref().map(|m| m.training_samples),
        }
    }
}
