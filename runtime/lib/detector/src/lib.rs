//! Payload anomaly detection: lexical features, an isolation forest behind
//! the [`AnomalyModel`] trait, and the persisted model artifact.

pub mod artifact;
pub mod dataset;
pub mod error;
pub mod features;
pub mod forest;
pub mod model;
pub mod risk;
pub mod signatures;

pub use artifact::{ModelArtifact, DEFAULT_MODEL_PATH};
pub use error::{DetectorError, Result};
pub use features::{extract_features, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use forest::{ForestParams, IsolationForest};
pub use model::AnomalyModel;
pub use risk::{risk_from_decision, RiskScale};
pub use signatures::{SignatureEngine, ThreatCategory};
