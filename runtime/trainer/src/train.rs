use crate::config::TrainConfig;
use anyhow::{Context, Result};
use detector::dataset::{generate_corpus, KNOWN_ATTACKS};
use detector::model::OUTLIER;
use detector::{AnomalyModel, IsolationForest, ModelArtifact};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct TrainingSummary {
    pub samples: usize,
    pub flagged: usize,
    pub attacks_flagged: usize,
    pub output: PathBuf,
}

pub fn run(config: &TrainConfig) -> Result<TrainingSummary> {
    let mut rng = match config.data_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let corpus = generate_corpus(&mut rng).context("Failed to build training corpus")?;
    info!(
        rows = corpus.nrows(),
        cols = corpus.ncols(),
        attacks = KNOWN_ATTACKS.len(),
        "Synthetic corpus generated"
    );

    let mut forest = IsolationForest::new(config.forest.clone());
    forest
        .fit(&corpus)
        .context("Failed to fit isolation forest")?;

    let labels = forest.predict(&corpus)?;
    let flagged = labels.iter().filter(|&&l| l == OUTLIER).count();
    let attacks_flagged = labels
        .iter()
        .skip(labels.len() - KNOWN_ATTACKS.len())
        .filter(|&&l| l == OUTLIER)
        .count();

    info!(
        flagged,
        attacks_flagged,
        offset = forest.offset(),
        "Isolation forest trained"
    );

    let artifact = ModelArtifact::new(forest, corpus.nrows());
    artifact
        .save(&config.output)
        .with_context(|| format!("Failed to write model to {}", config.output.display()))?;

    Ok(TrainingSummary {
        samples: corpus.nrows(),
        flagged,
        attacks_flagged,
        output: config.output.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use detector::{extract_features, ForestParams};
    use tempfile::TempDir;

    #[test]
    fn test_trained_artifact_flags_attacks() {
        let dir = TempDir::new().unwrap();
        let config = TrainConfig {
            output: dir.path().join("model.json"),
            data_seed: Some(42),
            forest: ForestParams::default(),
        };

        let summary = run(&config).unwrap();
        assert_eq!(summary.samples, 2007);
        assert_eq!(summary.attacks_flagged, KNOWN_ATTACKS.len());
        assert!(summary.flagged > 100 && summary.flagged < 300);

        let artifact = ModelArtifact::load(&summary.output).unwrap();
        let features = extract_features("' OR 1=1 --").to_array();
        let xss = extract_features("<script>alert(1)</script>").to_array();
        assert!(artifact.is_outlier(&xss).unwrap());
        assert!(artifact.is_outlier(&features).unwrap());
        assert!(artifact.decision_value(&features).unwrap() < 0.0);
    }

    #[test]
    fn test_bad_contamination_fails() {
        let dir = TempDir::new().unwrap();
        let config = TrainConfig {
            output: dir.path().join("model.json"),
            data_seed: Some(1),
            forest: ForestParams {
                contamination: 0.0,
                ..ForestParams::default()
            },
        };

        assert!(run(&config).is_err());
        assert!(!config.output.exists());
    }
}
