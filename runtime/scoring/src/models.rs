use chrono::{DateTime, Utc};
use detector::{FeatureVector, ThreatCategory};
use serde::{Deserialize, Serialize};

pub const MODEL_NOT_LOADED: &str = "Model not loaded";

#[derive(Deserialize)]
pub struct ScoreRequest {
    pub features: Vec<f64>,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub payload: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScoreResponse {
    pub risk: f64,
    pub is_anomaly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ScoreResponse {
    /// Fallback answer while no model artifact is loaded.
    pub fn unloaded() -> Self {
        Self {
            risk: detector::risk::UNSCORED_RISK,
            is_anomaly: false,
            score: None,
            message: Some(MODEL_NOT_LOADED.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Normal,
    #[serde(rename = "Anomaly / Threat")]
    Anomaly,
    Blocked,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AnalysisReport {
    pub features: FeatureVector,
    pub risk: f64,
    pub is_anomaly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat_type: Option<ThreatCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct HealthStatus {
    pub service: &'static str,
    pub model_loaded: bool,
    pub model_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_samples: Option<usize>,
}
