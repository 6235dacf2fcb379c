use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub verdict: VerdictConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModelConfig {
    /// Path of the artifact written by the trainer
    pub path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: detector::DEFAULT_MODEL_PATH.to_string(),
        }
    }
}

/// Risk cut-offs used by `/analyze` to label a payload
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VerdictConfig {
    /// Risk above which a payload is reported as blocked
    pub block_threshold: f64,
    /// Risk above which a payload is reported as an anomaly
    pub anomaly_threshold: f64,
}

impl Default for VerdictConfig {
    fn default() -> Self {
        Self {
            block_threshold: 0.88,
            anomaly_threshold: 0.7,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path =
            env::var("SCORING_CONFIG").unwrap_or_else(|_| "scoring.toml".to_string());

        if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
            let config: Config = toml::from_str(&content).context("Failed to parse TOML config")?;
            Ok(config)
        } else {
            Self::from_env()
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let defaults = Config::default();

        let port = env::var("SCORING_PORT")
            .unwrap_or_else(|_| defaults.server.port.to_string())
            .parse()
            .context("Invalid SCORING_PORT")?;

        let model_path = env::var("MODEL_PATH").unwrap_or(defaults.model.path);

        let block_threshold = env::var("BLOCK_THRESHOLD")
            .map(|v| v.parse::<f64>().context("Invalid BLOCK_THRESHOLD"))
            .unwrap_or(Ok(defaults.verdict.block_threshold))?;

        let anomaly_threshold = env::var("ANOMALY_THRESHOLD")
            .map(|v| v.parse::<f64>().context("Invalid ANOMALY_THRESHOLD"))
            .unwrap_or(Ok(defaults.verdict.anomaly_threshold))?;

        Ok(Config {
            server: ServerConfig { port },
            model: ModelConfig { path: model_path },
            verdict: VerdictConfig {
                block_threshold,
                anomaly_threshold,
            },
        })
    }
}
